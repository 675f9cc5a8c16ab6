//! Per-entity rendering configuration
//!
//! [`NetworkConfig`] is a plain id → descriptor store. It knows nothing about
//! the [`Graph`](crate::aggregate::Graph): keeping the two in step is the job of
//! the [`Network`](crate::aggregate::Network) facade.

use crate::components::{Edge, Vertex};
use crate::rendering::{
    Attributes, DefaultEdgeRenderer, DefaultVertexRenderer, EdgePrimitives, EdgeRenderContext,
    EdgeRenderer, NodeHandle, RenderTarget, VertexPrimitives, VertexRenderContext, VertexRenderer,
};
use crate::value_objects::{EdgeId, Point, VertexId};
use indexmap::IndexMap;
use serde_json::Value;
use std::collections::HashMap;

/// How and where a vertex is drawn
#[derive(Debug, Clone)]
pub struct VertexConfig {
    coords: Point,
    renderer: Box<dyn VertexRenderer>,
    /// Free-form kind tag, e.g. "protein" or "gene"
    pub kind: Option<String>,
    pub visible: bool,
}

impl VertexConfig {
    pub fn new(coords: Point, renderer: Box<dyn VertexRenderer>) -> Self {
        Self {
            coords,
            renderer,
            kind: None,
            visible: true,
        }
    }

    /// Default renderer at `coords`
    pub fn at(coords: Point) -> Self {
        Self::new(coords, Box::new(DefaultVertexRenderer::default()))
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub fn coords(&self) -> Point {
        self.coords
    }

    pub fn set_coords(&mut self, coords: Point) {
        self.coords = coords;
    }

    pub fn renderer(&self) -> &dyn VertexRenderer {
        self.renderer.as_ref()
    }

    pub fn renderer_mut(&mut self) -> &mut dyn VertexRenderer {
        self.renderer.as_mut()
    }

    pub fn set_renderer(&mut self, renderer: Box<dyn VertexRenderer>) {
        self.renderer = renderer;
    }

    /// Draw `vertex` at the configured coordinates
    pub fn render(&self, vertex: &Vertex, target: &mut dyn RenderTarget, parent: NodeHandle) -> VertexPrimitives {
        let primitives = self.renderer.render(
            &VertexRenderContext {
                vertex,
                coords: self.coords,
            },
            target,
            parent,
        );
        if !self.visible {
            target.set_attributes(primitives.root, Attributes::new().with("visibility", "hidden"));
        }
        primitives
    }

    /// Whether `point` lands on this vertex
    pub fn hit(&self, point: Point) -> bool {
        self.renderer.hit(self.coords, point)
    }
}

/// How an edge is drawn
#[derive(Debug, Clone)]
pub struct EdgeConfig {
    renderer: Box<dyn EdgeRenderer>,
    pub kind: Option<String>,
    pub visible: bool,
}

impl Default for EdgeConfig {
    fn default() -> Self {
        Self::new(Box::new(DefaultEdgeRenderer::default()))
    }
}

impl EdgeConfig {
    pub fn new(renderer: Box<dyn EdgeRenderer>) -> Self {
        Self {
            renderer,
            kind: None,
            visible: true,
        }
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub fn renderer(&self) -> &dyn EdgeRenderer {
        self.renderer.as_ref()
    }

    pub fn renderer_mut(&mut self) -> &mut dyn EdgeRenderer {
        self.renderer.as_mut()
    }

    pub fn set_renderer(&mut self, renderer: Box<dyn EdgeRenderer>) {
        self.renderer = renderer;
    }

    /// Draw `edge` between the given endpoint coordinates
    pub fn render(
        &self,
        edge: &Edge,
        source: Point,
        target_point: Point,
        target_offset: f64,
        target: &mut dyn RenderTarget,
        parent: NodeHandle,
    ) -> EdgePrimitives {
        let primitives = self.renderer.render(
            &EdgeRenderContext {
                edge,
                source,
                target: target_point,
                target_offset,
            },
            target,
            parent,
        );
        if !self.visible {
            target.set_attributes(primitives.line, Attributes::new().with("visibility", "hidden"));
        }
        primitives
    }
}

/// Rendering descriptors keyed by entity id, plus network-wide settings
#[derive(Debug, Clone, Default)]
pub struct NetworkConfig {
    vertices: HashMap<VertexId, VertexConfig>,
    edges: HashMap<EdgeId, EdgeConfig>,
    general: IndexMap<String, Value>,
}

impl NetworkConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the configuration of a vertex
    pub fn set_vertex_config(&mut self, vertex_id: VertexId, config: VertexConfig) {
        self.vertices.insert(vertex_id, config);
    }

    pub fn vertex_config(&self, vertex_id: &VertexId) -> Option<&VertexConfig> {
        self.vertices.get(vertex_id)
    }

    pub fn vertex_config_mut(&mut self, vertex_id: &VertexId) -> Option<&mut VertexConfig> {
        self.vertices.get_mut(vertex_id)
    }

    pub fn remove_vertex_config(&mut self, vertex_id: &VertexId) -> Option<VertexConfig> {
        self.vertices.remove(vertex_id)
    }

    pub fn set_edge_config(&mut self, edge_id: EdgeId, config: EdgeConfig) {
        self.edges.insert(edge_id, config);
    }

    pub fn edge_config(&self, edge_id: &EdgeId) -> Option<&EdgeConfig> {
        self.edges.get(edge_id)
    }

    pub fn edge_config_mut(&mut self, edge_id: &EdgeId) -> Option<&mut EdgeConfig> {
        self.edges.get_mut(edge_id)
    }

    pub fn remove_edge_config(&mut self, edge_id: &EdgeId) -> Option<EdgeConfig> {
        self.edges.remove(edge_id)
    }

    pub fn vertex_configs(&self) -> impl Iterator<Item = (&VertexId, &VertexConfig)> {
        self.vertices.iter()
    }

    pub fn number_of_vertex_configs(&self) -> usize {
        self.vertices.len()
    }

    pub fn number_of_edge_configs(&self) -> usize {
        self.edges.len()
    }

    /// Network-wide setting, e.g. a background colour chosen by the host
    pub fn general(&self, key: &str) -> Option<&Value> {
        self.general.get(key)
    }

    pub fn set_general(&mut self, key: impl Into<String>, value: Value) {
        self.general.insert(key.into(), value);
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
        self.edges.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rendering::SvgScene;
    use serde_json::json;

    #[test]
    fn test_config_does_not_check_graph_membership() {
        let mut config = NetworkConfig::new();
        let orphan = VertexId::new();
        config.set_vertex_config(orphan, VertexConfig::at(Point::new(1.0, 1.0)));
        assert!(config.vertex_config(&orphan).is_some());

        assert!(config.remove_vertex_config(&orphan).is_some());
        assert!(config.remove_vertex_config(&orphan).is_none());
    }

    #[test]
    fn test_hidden_vertex_is_rendered_hidden() {
        let mut scene = SvgScene::new(100.0, 100.0);
        let root = scene.root();
        let vertex = Vertex::new("hidden");
        let mut config = VertexConfig::at(Point::new(20.0, 20.0));
        config.visible = false;

        let primitives = config.render(&vertex, &mut scene, root);
        assert_eq!(scene.attribute(primitives.root, "visibility"), Some("hidden"));
    }

    #[test]
    fn test_general_settings() {
        let mut config = NetworkConfig::new();
        config.set_general("backgroundColor", json!("white"));
        assert_eq!(config.general("backgroundColor"), Some(&json!("white")));
        assert_eq!(config.general("missing"), None);
    }
}
