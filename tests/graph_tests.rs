//! Network Domain Integration Tests

use cim_domain_network::{
    aggregate::{Graph, Network},
    components::{Edge, Vertex},
    config::{EdgeConfig, VertexConfig},
    events::GraphEvent,
    infrastructure::InMemoryAttributeStore,
    rendering::{RenderTarget, SvgScene},
    value_objects::{Point, VertexId},
    AttributeManager,
};
use std::sync::Arc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graph_creation() {
        let graph = Graph::new();

        assert!(graph.is_empty());
        assert_eq!(graph.number_of_vertices(), 0);
        assert_eq!(graph.number_of_edges(), 0);
    }

    #[test]
    fn test_add_vertex() {
        let mut graph = Graph::new();
        let vertex = Vertex::new("TP53");
        let vertex_id = vertex.id();

        assert!(graph.add_vertex(vertex));
        assert_eq!(graph.number_of_vertices(), 1);
        assert!(graph.contains_vertex(&vertex_id));
    }

    #[test]
    fn test_connect_and_disconnect() {
        let mut graph = Graph::new();
        let a = Vertex::new("a");
        let b = Vertex::new("b");
        let (a_id, b_id) = (a.id(), b.id());
        graph.add_vertex(a);
        graph.add_vertex(b);

        let edge = Edge::new(a_id, b_id);
        let edge_id = edge.id();
        assert!(graph.add_edge(edge));
        assert_eq!(graph.number_of_edges(), 1);
        assert_eq!(graph.neighbors(&a_id), vec![b_id]);

        assert!(graph.remove_edge(&edge_id));
        assert!(!graph.remove_edge(&edge_id));
        assert_eq!(graph.degree(&a_id), Some(0));
    }

    #[test]
    fn test_graph_events_follow_mutations() {
        let mut graph = Graph::new();
        let a = Vertex::new("a");
        let b = Vertex::new("b");
        let (a_id, b_id) = (a.id(), b.id());
        graph.add_vertex(a);
        graph.add_vertex(b);
        graph.add_edge(Edge::new(a_id, b_id));
        graph.remove_vertex(&a_id);

        let kinds: Vec<&str> = graph.take_events().iter().map(GraphEvent::event_type).collect();
        assert_eq!(
            kinds,
            vec!["vertex:add", "vertex:add", "edge:add", "edge:remove", "vertex:remove"]
        );
        assert!(graph.take_events().is_empty());
    }

    #[test]
    fn test_network_keeps_graph_config_and_scene_in_step() {
        let manager = AttributeManager::new(Arc::new(InMemoryAttributeStore::new()));
        let mut network = Network::new(manager);
        let mut scene = SvgScene::new(400.0, 400.0);
        let root = scene.root();

        let ids: Vec<VertexId> = (0..4)
            .map(|i| {
                let vertex = Vertex::new(format!("v{i}"));
                let id = vertex.id();
                network.add_vertex(vertex, VertexConfig::at(Point::new(50.0 * i as f64, 20.0)), &mut scene, root);
                id
            })
            .collect();
        for pair in ids.windows(2) {
            network.add_edge(Edge::new(pair[0], pair[1]), EdgeConfig::default(), std::iter::empty(), &mut scene, root);
        }
        assert_eq!(network.config().number_of_edge_configs(), 3);
        assert_eq!(scene.find_by_attribute("network-type", "edge").len(), 3);

        network.remove_vertex(&ids[1], &mut scene);
        assert_eq!(network.graph().number_of_edges(), 1);
        assert_eq!(network.config().number_of_edge_configs(), 1);
        assert_eq!(network.config().number_of_vertex_configs(), 3);
        assert_eq!(scene.find_by_attribute("network-type", "edge").len(), 1);
        assert_eq!(scene.find_by_attribute("network-type", "vertex").len(), 3);
    }
}
