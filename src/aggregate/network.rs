//! Network facade
//!
//! Keeps the topology ([`Graph`]), the per-entity rendering descriptors
//! ([`NetworkConfig`]), the drawn primitives and the attribute store in step.
//! Every mutation runs topology first, then configuration, then rendering;
//! when the topology step is refused nothing else happens.

use super::graph::Graph;
use crate::attributes::{AttributeBatchReport, AttributeFuture, AttributeManager, AttributeMap, AttributeResult};
use crate::components::{Edge, Vertex};
use crate::config::{EdgeConfig, NetworkConfig, VertexConfig};
use crate::events::GraphEvent;
use crate::rendering::{EdgePrimitives, NodeHandle, RenderTarget, VertexPrimitives};
use crate::value_objects::{EdgeId, Point, Rect, VertexId};
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

/// Graph, configuration, rendering and attributes behind one interface
#[derive(Debug)]
pub struct Network {
    graph: Graph,
    config: NetworkConfig,
    attributes: AttributeManager,
    vertex_primitives: HashMap<VertexId, VertexPrimitives>,
    edge_primitives: HashMap<EdgeId, EdgePrimitives>,
    purge_on_remove: bool,
    pending_purge: Vec<String>,
}

impl Network {
    pub fn new(attributes: AttributeManager) -> Self {
        Self {
            graph: Graph::new(),
            config: NetworkConfig::new(),
            attributes,
            vertex_primitives: HashMap::new(),
            edge_primitives: HashMap::new(),
            purge_on_remove: true,
            pending_purge: Vec::new(),
        }
    }

    /// Whether removing a vertex queues its attribute values for purging
    pub fn with_purge_on_remove(mut self, purge: bool) -> Self {
        self.purge_on_remove = purge;
        self
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    /// Direct access to the descriptors. Changes show up on the next render.
    pub fn config_mut(&mut self) -> &mut NetworkConfig {
        &mut self.config
    }

    pub fn attributes(&self) -> &AttributeManager {
        &self.attributes
    }

    pub fn vertex(&self, vertex_id: &VertexId) -> Option<&Vertex> {
        self.graph.vertex(vertex_id)
    }

    pub fn edge(&self, edge_id: &EdgeId) -> Option<&Edge> {
        self.graph.edge(edge_id)
    }

    pub fn vertex_primitives(&self, vertex_id: &VertexId) -> Option<&VertexPrimitives> {
        self.vertex_primitives.get(vertex_id)
    }

    pub fn edge_primitives(&self, edge_id: &EdgeId) -> Option<&EdgePrimitives> {
        self.edge_primitives.get(edge_id)
    }

    /// Drain the topology change notifications
    pub fn take_graph_events(&mut self) -> Vec<GraphEvent> {
        self.graph.take_events()
    }

    /// Add a vertex, store its configuration and draw it
    pub fn add_vertex(
        &mut self,
        vertex: Vertex,
        config: VertexConfig,
        target: &mut dyn RenderTarget,
        parent: NodeHandle,
    ) -> bool {
        let vertex_id = vertex.id();
        if !self.graph.add_vertex(vertex) {
            return false;
        }
        self.config.set_vertex_config(vertex_id, config);
        self.render_vertex(&vertex_id, target, parent);
        true
    }

    /// Add an edge, store its configuration and draw it.
    ///
    /// Endpoints not yet in the graph are taken from `endpoints`, placed at
    /// the origin with a default configuration and drawn as well.
    pub fn add_edge<I>(
        &mut self,
        edge: Edge,
        config: EdgeConfig,
        endpoints: I,
        target: &mut dyn RenderTarget,
        parent: NodeHandle,
    ) -> bool
    where
        I: IntoIterator<Item = Vertex>,
    {
        let edge_id = edge.id();
        let mut implicit: Vec<VertexId> = [edge.source(), edge.target()]
            .into_iter()
            .filter(|id| !self.graph.contains_vertex(id))
            .collect();
        implicit.dedup();

        if !self.graph.add_edge_with(edge, endpoints) {
            return false;
        }
        for vertex_id in implicit {
            if self.config.vertex_config(&vertex_id).is_none() {
                self.config.set_vertex_config(vertex_id, VertexConfig::at(Point::default()));
            }
            self.render_vertex(&vertex_id, target, parent);
        }
        self.config.set_edge_config(edge_id, config);
        self.render_edge(&edge_id, target, parent);
        true
    }

    /// Remove an edge with its configuration and primitives
    pub fn remove_edge(&mut self, edge_id: &EdgeId, target: &mut dyn RenderTarget) -> bool {
        if !self.graph.remove_edge(edge_id) {
            return false;
        }
        self.forget_edge(edge_id, target);
        true
    }

    /// Remove a vertex together with its incident edges, their configurations
    /// and primitives. The vertex name is queued for attribute purging unless
    /// another vertex still carries it.
    pub fn remove_vertex(&mut self, vertex_id: &VertexId, target: &mut dyn RenderTarget) -> bool {
        let Some((name, incident)) = self
            .graph
            .vertex(vertex_id)
            .map(|v| (v.name().to_string(), v.edges().to_vec()))
        else {
            return false;
        };
        if !self.graph.remove_vertex(vertex_id) {
            return false;
        }

        for edge_id in &incident {
            self.forget_edge(edge_id, target);
        }
        self.config.remove_vertex_config(vertex_id);
        if let Some(primitives) = self.vertex_primitives.remove(vertex_id) {
            target.remove(primitives.root);
        }

        if self.purge_on_remove
            && self.graph.vertices_named(&name).next().is_none()
            && !self.pending_purge.contains(&name)
        {
            self.pending_purge.push(name);
        }
        true
    }

    /// Remove every vertex and edge
    pub fn clear(&mut self, target: &mut dyn RenderTarget) {
        let ids: Vec<VertexId> = self.graph.vertices().map(Vertex::id).collect();
        for vertex_id in ids {
            self.remove_vertex(&vertex_id, target);
        }
    }

    /// Draw a vertex, replacing whatever was drawn for it before
    pub fn render_vertex(
        &mut self,
        vertex_id: &VertexId,
        target: &mut dyn RenderTarget,
        parent: NodeHandle,
    ) -> Option<VertexPrimitives> {
        if let Some(previous) = self.vertex_primitives.remove(vertex_id) {
            target.remove(previous.root);
        }
        let vertex = self.graph.vertex(vertex_id)?;
        let config = self.config.vertex_config(vertex_id)?;
        let primitives = config.render(vertex, target, parent);
        self.vertex_primitives.insert(*vertex_id, primitives);
        Some(primitives)
    }

    /// Draw an edge between the current endpoint coordinates, replacing
    /// whatever was drawn for it before
    pub fn render_edge(
        &mut self,
        edge_id: &EdgeId,
        target: &mut dyn RenderTarget,
        parent: NodeHandle,
    ) -> Option<EdgePrimitives> {
        self.erase_edge(edge_id, target);
        let edge = self.graph.edge(edge_id)?;
        let config = self.config.edge_config(edge_id)?;
        let source = self.config.vertex_config(&edge.source())?;
        let target_config = self.config.vertex_config(&edge.target())?;

        let primitives = config.render(
            edge,
            source.coords(),
            target_config.coords(),
            target_config.renderer().style().edge_offset(),
            target,
            parent,
        );
        self.edge_primitives.insert(*edge_id, primitives);
        Some(primitives)
    }

    /// Move a vertex, its primitives and the matching end of every incident edge
    pub fn reposition_vertex(&mut self, vertex_id: &VertexId, coords: Point, target: &mut dyn RenderTarget) -> bool {
        let Some(config) = self.config.vertex_config_mut(vertex_id) else {
            return false;
        };
        config.set_coords(coords);
        if let Some(primitives) = self.vertex_primitives.get(vertex_id) {
            config.renderer().reposition(primitives, coords, target);
        }

        let incident = self.graph.vertex(vertex_id).map(|v| v.edges().to_vec()).unwrap_or_default();
        for edge_id in incident {
            let (Some((source, target_point)), Some(primitives), Some(config)) = (
                self.edge_endpoints(&edge_id),
                self.edge_primitives.get(&edge_id),
                self.config.edge_config(&edge_id),
            ) else {
                continue;
            };
            config.renderer().reposition(primitives, source, target_point, target);
        }
        true
    }

    /// Throw away all primitives and draw everything again
    pub fn redraw(&mut self, target: &mut dyn RenderTarget, parent: NodeHandle) {
        for (_, primitives) in self.vertex_primitives.drain() {
            target.remove(primitives.root);
        }
        let edge_ids: Vec<EdgeId> = self.edge_primitives.keys().copied().collect();
        for edge_id in edge_ids {
            self.erase_edge(&edge_id, target);
        }

        let vertex_ids: Vec<VertexId> = self.graph.vertices().map(Vertex::id).collect();
        for vertex_id in vertex_ids {
            self.render_vertex(&vertex_id, target, parent);
        }
        let edge_ids: Vec<EdgeId> = self.graph.edges().map(Edge::id).collect();
        for edge_id in edge_ids {
            self.render_edge(&edge_id, target, parent);
        }
    }

    pub fn vertex_coords(&self, vertex_id: &VertexId) -> Option<Point> {
        self.config.vertex_config(vertex_id).map(VertexConfig::coords)
    }

    /// Current source and target coordinates of an edge
    pub fn edge_endpoints(&self, edge_id: &EdgeId) -> Option<(Point, Point)> {
        let edge = self.graph.edge(edge_id)?;
        Some((self.vertex_coords(&edge.source())?, self.vertex_coords(&edge.target())?))
    }

    /// Topmost vertex under `point`
    pub fn vertex_at(&self, point: Point) -> Option<VertexId> {
        let vertices: Vec<&Vertex> = self.graph.vertices().collect();
        vertices.into_iter().rev().map(Vertex::id).find(|id| {
            self.config
                .vertex_config(id)
                .is_some_and(|config| config.visible && config.hit(point))
        })
    }

    /// Visible vertices whose centre lies inside `rect`, in insertion order
    pub fn vertices_in(&self, rect: Rect) -> Vec<VertexId> {
        self.graph
            .vertices()
            .map(Vertex::id)
            .filter(|id| {
                self.config
                    .vertex_config(id)
                    .is_some_and(|config| config.visible && rect.contains(&config.coords()))
            })
            .collect()
    }

    /// Declare an attribute on every current vertex
    pub async fn add_attribute(
        &self,
        name: &str,
        attribute_type: &str,
        default: Value,
    ) -> AttributeResult<AttributeBatchReport> {
        let names: Vec<String> = self.graph.vertices().map(|v| v.name().to_string()).collect();
        self.attributes.add_attribute(names, name, attribute_type, default).await
    }

    pub async fn remove_attribute(&self, name: &str) -> AttributeResult<usize> {
        self.attributes.remove_attribute(name).await
    }

    /// Attributes of a vertex; empty for unknown vertices
    pub async fn vertex_attributes(&self, vertex_id: &VertexId) -> AttributeResult<AttributeMap> {
        match self.graph.vertex(vertex_id) {
            Some(vertex) => self.attributes.vertex_attributes(vertex.name()).await,
            None => Ok(AttributeMap::new()),
        }
    }

    /// Owned attribute lookup for a vertex, `None` for unknown vertices
    pub fn fetch_vertex_attributes(&self, vertex_id: &VertexId) -> Option<AttributeFuture> {
        self.graph
            .vertex(vertex_id)
            .map(|vertex| self.attributes.fetch_vertex_attributes(vertex.name()))
    }

    /// Names queued for purging by [`remove_vertex`](Self::remove_vertex)
    pub fn pending_purges(&self) -> &[String] {
        &self.pending_purge
    }

    /// Delete the attribute values of removed vertices. Names that came back
    /// into use since the removal are left alone. Returns the number of
    /// values deleted.
    pub async fn purge_removed_attributes(&mut self) -> AttributeResult<usize> {
        let names = std::mem::take(&mut self.pending_purge);
        let mut removed = 0;
        for (position, name) in names.iter().enumerate() {
            if self.graph.vertices_named(name).next().is_some() {
                continue;
            }
            match self.attributes.remove_vertex_values(name).await {
                Ok(count) => removed += count,
                Err(e) => {
                    // keep what wasn't purged for the next attempt
                    self.pending_purge.extend(names[position..].iter().cloned());
                    return Err(e);
                }
            }
        }
        debug!(names = names.len(), removed, "attribute purge finished");
        Ok(removed)
    }

    fn erase_edge(&mut self, edge_id: &EdgeId, target: &mut dyn RenderTarget) {
        if let Some(primitives) = self.edge_primitives.remove(edge_id) {
            target.remove(primitives.line);
            if let Some(marker) = primitives.marker {
                target.remove(marker);
            }
        }
    }

    fn forget_edge(&mut self, edge_id: &EdgeId, target: &mut dyn RenderTarget) {
        self.config.remove_edge_config(edge_id);
        self.erase_edge(edge_id, target);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::InMemoryAttributeStore;
    use crate::rendering::SvgScene;
    use serde_json::json;
    use std::sync::Arc;

    /// Test Coverage
    ///
    /// ```mermaid
    /// graph TD
    ///     N[Network] --> AV[add_vertex: graph, config, render]
    ///     N --> AE[add_edge: implicit endpoints]
    ///     N --> RV[remove_vertex: cascade + purge queue]
    ///     N --> RP[reposition_vertex]
    ///     N --> AT[attributes pass-through]
    /// ```

    fn network() -> (Network, SvgScene) {
        let manager = AttributeManager::new(Arc::new(InMemoryAttributeStore::new()));
        (Network::new(manager), SvgScene::new(500.0, 500.0))
    }

    fn place(network: &mut Network, scene: &mut SvgScene, name: &str, x: f64, y: f64) -> VertexId {
        let vertex = Vertex::new(name);
        let id = vertex.id();
        let root = scene.root();
        assert!(network.add_vertex(vertex, VertexConfig::at(Point::new(x, y)), scene, root));
        id
    }

    fn join(network: &mut Network, scene: &mut SvgScene, a: VertexId, b: VertexId) -> EdgeId {
        let edge = Edge::new(a, b);
        let id = edge.id();
        let root = scene.root();
        assert!(network.add_edge(edge, EdgeConfig::default(), std::iter::empty(), scene, root));
        id
    }

    #[test]
    fn test_add_vertex_renders_once() {
        let (mut network, mut scene) = network();
        let id = place(&mut network, &mut scene, "A", 10.0, 10.0);
        let primitives = *network.vertex_primitives(&id).unwrap();
        assert!(scene.contains(primitives.root));

        // duplicate: nothing rendered, config untouched
        let root = scene.root();
        let duplicate = Vertex::with_id(id, "again");
        assert!(!network.add_vertex(duplicate, VertexConfig::at(Point::new(99.0, 99.0)), &mut scene, root));
        assert_eq!(network.vertex_coords(&id), Some(Point::new(10.0, 10.0)));
        assert_eq!(scene.find_by_attribute("network-type", "vertex").len(), 1);
    }

    #[test]
    fn test_add_edge_with_implicit_endpoints() {
        let (mut network, mut scene) = network();
        let a = Vertex::new("A");
        let b = Vertex::new("B");
        let edge = Edge::new(a.id(), b.id());
        let root = scene.root();

        assert!(network.add_edge(edge.clone(), EdgeConfig::default(), [a.clone(), b.clone()], &mut scene, root));
        assert_eq!(network.graph().number_of_vertices(), 2);
        assert!(network.config().vertex_config(&a.id()).is_some());
        assert!(network.vertex_primitives(&b.id()).is_some());
        assert!(network.edge_primitives(&edge.id()).is_some());
    }

    #[test]
    fn test_add_edge_with_unknown_endpoint_is_refused() {
        let (mut network, mut scene) = network();
        let a = place(&mut network, &mut scene, "A", 0.0, 0.0);
        let edge = Edge::new(a, VertexId::new());
        let edge_id = edge.id();
        let root = scene.root();
        assert!(!network.add_edge(edge, EdgeConfig::default(), std::iter::empty(), &mut scene, root));
        assert!(network.config().edge_config(&edge_id).is_none());
        assert!(scene.find_by_attribute("network-type", "edge").is_empty());
    }

    #[test]
    fn test_remove_vertex_cascades_everywhere() {
        let (mut network, mut scene) = network();
        let hub = place(&mut network, &mut scene, "hub", 100.0, 100.0);
        let spokes: Vec<VertexId> = (0..3)
            .map(|i| place(&mut network, &mut scene, &format!("s{i}"), 10.0 * i as f64, 0.0))
            .collect();
        let edges: Vec<EdgeId> = spokes.iter().map(|s| join(&mut network, &mut scene, hub, *s)).collect();

        assert!(network.remove_vertex(&hub, &mut scene));
        assert_eq!(network.graph().number_of_vertices(), 3);
        assert_eq!(network.graph().number_of_edges(), 0);
        for edge_id in &edges {
            assert!(network.config().edge_config(edge_id).is_none());
            assert!(network.edge_primitives(edge_id).is_none());
        }
        assert!(network.config().vertex_config(&hub).is_none());
        assert!(scene.find_by_attribute("network-type", "edge").is_empty());
        assert_eq!(network.pending_purges(), &["hub".to_string()]);

        assert!(!network.remove_vertex(&hub, &mut scene));
    }

    #[test]
    fn test_remove_edge_leaves_endpoints_in_place() {
        let (mut network, mut scene) = network();
        let a = place(&mut network, &mut scene, "a", 10.0, 10.0);
        let b = place(&mut network, &mut scene, "b", 90.0, 10.0);
        let edge = join(&mut network, &mut scene, a, b);
        let line = network.edge_primitives(&edge).unwrap().line;
        let nodes = scene.len();

        assert!(network.remove_edge(&edge, &mut scene));
        assert!(scene.len() < nodes);
        assert!(!scene.contains(line));
        assert!(network.config().edge_config(&edge).is_none());
        assert!(network.edge_primitives(&edge).is_none());
        assert!(scene.find_by_attribute("network-type", "edge").is_empty());
        assert_eq!(network.graph().degree(&a), Some(0));
        assert_eq!(network.graph().degree(&b), Some(0));
        assert_eq!(network.vertex_coords(&a), Some(Point::new(10.0, 10.0)));
        assert!(network.vertex_primitives(&b).is_some());
        assert!(network.pending_purges().is_empty());

        assert!(!network.remove_edge(&edge, &mut scene));
    }

    #[test]
    fn test_shared_name_is_not_queued_for_purge() {
        let (mut network, mut scene) = network();
        let first = place(&mut network, &mut scene, "TP53", 0.0, 0.0);
        place(&mut network, &mut scene, "TP53", 50.0, 0.0);
        network.remove_vertex(&first, &mut scene);
        assert!(network.pending_purges().is_empty());
    }

    #[test]
    fn test_reposition_moves_incident_edge_ends_only() {
        let (mut network, mut scene) = network();
        let v = place(&mut network, &mut scene, "V", 10.0, 10.0);
        let w = place(&mut network, &mut scene, "W", 200.0, 200.0);
        let x = place(&mut network, &mut scene, "X", 300.0, 50.0);
        let vw = join(&mut network, &mut scene, v, w);
        let wv = join(&mut network, &mut scene, w, v);
        let wx = join(&mut network, &mut scene, w, x);

        assert!(network.reposition_vertex(&v, Point::new(25.0, 5.0), &mut scene));

        let line = network.edge_primitives(&vw).unwrap().line;
        assert_eq!(scene.number(line, "x1"), Some(25.0));
        assert_eq!(scene.number(line, "y1"), Some(5.0));
        assert_eq!(scene.number(line, "x2"), Some(200.0));

        let line = network.edge_primitives(&wv).unwrap().line;
        assert_eq!(scene.number(line, "x2"), Some(25.0));
        assert_eq!(scene.number(line, "y2"), Some(5.0));

        let line = network.edge_primitives(&wx).unwrap().line;
        assert_eq!(scene.number(line, "x1"), Some(200.0));
        assert_eq!(scene.number(line, "x2"), Some(300.0));
    }

    #[test]
    fn test_hit_testing_and_region_query() {
        let (mut network, mut scene) = network();
        let a = place(&mut network, &mut scene, "a", 10.0, 10.0);
        let b = place(&mut network, &mut scene, "b", 50.0, 50.0);
        place(&mut network, &mut scene, "c", 200.0, 200.0);

        assert_eq!(network.vertex_at(Point::new(12.0, 8.0)), Some(a));
        assert_eq!(network.vertex_at(Point::new(120.0, 120.0)), None);
        let inside = network.vertices_in(Rect::from_corners(Point::new(0.0, 0.0), Point::new(100.0, 100.0)));
        assert_eq!(inside, vec![a, b]);
    }

    #[test]
    fn test_hidden_vertices_are_not_hit_or_enclosed() {
        let (mut network, mut scene) = network();
        let a = place(&mut network, &mut scene, "a", 10.0, 10.0);
        let b = place(&mut network, &mut scene, "b", 50.0, 50.0);
        network.config_mut().vertex_config_mut(&a).unwrap().visible = false;

        assert_eq!(network.vertex_at(Point::new(10.0, 10.0)), None);
        let inside = network.vertices_in(Rect::from_corners(Point::new(0.0, 0.0), Point::new(100.0, 100.0)));
        assert_eq!(inside, vec![b]);
    }

    #[test]
    fn test_redraw_replaces_primitives() {
        let (mut network, mut scene) = network();
        let a = place(&mut network, &mut scene, "a", 10.0, 10.0);
        let b = place(&mut network, &mut scene, "b", 50.0, 50.0);
        join(&mut network, &mut scene, a, b);
        let before = scene.len();
        let old_root = network.vertex_primitives(&a).unwrap().root;

        let root = scene.root();
        network.redraw(&mut scene, root);
        assert_eq!(scene.len(), before);
        assert!(!scene.contains(old_root));
    }

    #[tokio::test]
    async fn test_attribute_round_trip_through_facade() {
        let (mut network, mut scene) = network();
        network.attributes().open().await.unwrap();
        let v1 = place(&mut network, &mut scene, "v1", 0.0, 0.0);
        place(&mut network, &mut scene, "v2", 10.0, 0.0);

        let report = network.add_attribute("weight", "number", json!(0)).await.unwrap();
        assert_eq!(report.written, 2);
        assert_eq!(network.vertex_attributes(&v1).await.unwrap()["weight"], json!(0));

        network.remove_attribute("weight").await.unwrap();
        assert!(network.vertex_attributes(&v1).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_purge_removed_attributes() {
        let (mut network, mut scene) = network();
        network.attributes().open().await.unwrap();
        let v1 = place(&mut network, &mut scene, "v1", 0.0, 0.0);
        place(&mut network, &mut scene, "v2", 10.0, 0.0);
        network.add_attribute("weight", "number", json!(1)).await.unwrap();

        network.remove_vertex(&v1, &mut scene);
        assert_eq!(network.purge_removed_attributes().await.unwrap(), 1);
        assert!(network.pending_purges().is_empty());
        assert!(network.attributes().vertex_attributes("v1").await.unwrap().is_empty());
        assert_eq!(network.attributes().vertex_attributes("v2").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_purge_can_be_disabled() {
        let manager = AttributeManager::new(Arc::new(InMemoryAttributeStore::new()));
        manager.open().await.unwrap();
        let mut network = Network::new(manager).with_purge_on_remove(false);
        let mut scene = SvgScene::new(100.0, 100.0);
        let v = place(&mut network, &mut scene, "kept", 0.0, 0.0);
        network.add_attribute("w", "number", json!(1)).await.unwrap();

        network.remove_vertex(&v, &mut scene);
        assert_eq!(network.purge_removed_attributes().await.unwrap(), 0);
        assert_eq!(network.attributes().vertex_attributes("kept").await.unwrap().len(), 1);
    }
}
