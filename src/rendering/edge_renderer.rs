//! Edge rendering capability and its default implementation

use super::target::{Attributes, NodeHandle, PrimitiveKind, RenderTarget};
use crate::components::{Edge, EdgeShape, EdgeStyle};
use crate::value_objects::{Color, Point};
use std::fmt;

/// What an edge renderer gets to draw with
#[derive(Debug, Clone, Copy)]
pub struct EdgeRenderContext<'a> {
    pub edge: &'a Edge,
    pub source: Point,
    pub target: Point,
    /// How far from the target centre the line should visually end, so the
    /// marker sits on the vertex outline
    pub target_offset: f64,
}

/// Handles of the primitives making up one drawn edge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgePrimitives {
    pub line: NodeHandle,
    pub marker: Option<NodeHandle>,
}

/// Something that knows how to draw an edge
pub trait EdgeRenderer: fmt::Debug + Send + Sync {
    /// Draw the edge below `parent`, underneath previously drawn vertices
    fn render(
        &self,
        ctx: &EdgeRenderContext<'_>,
        target: &mut dyn RenderTarget,
        parent: NodeHandle,
    ) -> EdgePrimitives;

    /// Move the endpoints of an already drawn edge
    fn reposition(
        &self,
        primitives: &EdgePrimitives,
        source: Point,
        target_point: Point,
        target: &mut dyn RenderTarget,
    );

    fn style(&self) -> &EdgeStyle;

    fn style_mut(&mut self) -> &mut EdgeStyle;

    fn clone_box(&self) -> Box<dyn EdgeRenderer>;
}

impl Clone for Box<dyn EdgeRenderer> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// Straight line with an end marker chosen by [`EdgeShape`]
#[derive(Debug, Clone, Default)]
pub struct DefaultEdgeRenderer {
    style: EdgeStyle,
}

impl DefaultEdgeRenderer {
    pub fn new(style: EdgeStyle) -> Self {
        Self { style }
    }

    fn marker_id(edge: &Edge) -> String {
        format!("arrow-{}", edge.id())
    }

    fn add_marker(&self, id: &str, offset: f64, target: &mut dyn RenderTarget, parent: NodeHandle) -> NodeHandle {
        let marker = target.create(
            PrimitiveKind::Marker,
            Attributes::new()
                .with("id", id)
                .with("orient", "auto")
                .with("style", "overflow:visible;"),
        );
        target.insert_child(parent, marker, 0);

        let color = self.style.color;
        let half = "scale(0.5) rotate(0) translate(0,0)";
        let arrow_points = format!(
            "-{o},0 {b},-6 {b},6 -{o},0",
            o = offset,
            b = -offset - 14.0
        );
        let (kind, attributes) = match self.style.shape {
            EdgeShape::Directed => (
                PrimitiveKind::Polyline,
                Attributes::new()
                    .with("transform", format!("scale({}) rotate(0) translate(0,0)", 1.0 / self.style.size))
                    .with("fill", color)
                    .with("stroke", color)
                    .with("stroke-width", self.style.size)
                    .with("points", arrow_points),
            ),
            EdgeShape::ODirected => (
                PrimitiveKind::Polyline,
                Attributes::new()
                    .with("transform", half)
                    .with("fill", color)
                    .with("stroke", Color::BLACK)
                    .with("points", arrow_points),
            ),
            EdgeShape::Inhibited => (
                PrimitiveKind::Rect,
                Attributes::new()
                    .with("transform", half)
                    .with("fill", color)
                    .with("stroke", Color::BLACK)
                    .with("x", -offset - 6.0)
                    .with("y", -6)
                    .with("width", 6)
                    .with("height", 12),
            ),
            EdgeShape::Dot | EdgeShape::ODot => (
                PrimitiveKind::Circle,
                Attributes::new()
                    .with("transform", half)
                    .with("fill", if self.style.shape == EdgeShape::Dot { color } else { Color::WHITE })
                    .with("stroke", Color::BLACK)
                    .with("cx", -offset - 6.0)
                    .with("cy", 0)
                    .with("r", 6),
            ),
        };
        target.add_child(marker, kind, attributes);
        marker
    }
}

impl EdgeRenderer for DefaultEdgeRenderer {
    fn render(
        &self,
        ctx: &EdgeRenderContext<'_>,
        target: &mut dyn RenderTarget,
        parent: NodeHandle,
    ) -> EdgePrimitives {
        let mut attributes = Attributes::new()
            .with("id", ctx.edge.id())
            .with("x1", ctx.source.x)
            .with("y1", ctx.source.y)
            .with("x2", ctx.target.x)
            .with("y2", ctx.target.y)
            .with("stroke", self.style.color)
            .with("stroke-width", self.style.size)
            .with("opacity", self.style.opacity)
            .with("cursor", "pointer")
            .with("network-type", "edge");

        let marker = if ctx.edge.is_directed() {
            let id = Self::marker_id(ctx.edge);
            attributes.set("marker-end", format!("url(#{id})"));
            Some(self.add_marker(&id, ctx.target_offset, target, parent))
        } else {
            None
        };

        let line = target.create(PrimitiveKind::Line, attributes);
        target.insert_child(parent, line, 0);
        EdgePrimitives { line, marker }
    }

    fn reposition(
        &self,
        primitives: &EdgePrimitives,
        source: Point,
        target_point: Point,
        target: &mut dyn RenderTarget,
    ) {
        target.set_attributes(
            primitives.line,
            Attributes::new()
                .with("x1", source.x)
                .with("y1", source.y)
                .with("x2", target_point.x)
                .with("y2", target_point.y),
        );
    }

    fn style(&self) -> &EdgeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut EdgeStyle {
        &mut self.style
    }

    fn clone_box(&self) -> Box<dyn EdgeRenderer> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rendering::SvgScene;
    use crate::value_objects::VertexId;

    fn draw(edge: &Edge, style: EdgeStyle) -> (SvgScene, EdgePrimitives) {
        let mut scene = SvgScene::new(100.0, 100.0);
        let root = scene.root();
        let primitives = DefaultEdgeRenderer::new(style).render(
            &EdgeRenderContext {
                edge,
                source: Point::new(1.0, 2.0),
                target: Point::new(30.0, 40.0),
                target_offset: 18.0,
            },
            &mut scene,
            root,
        );
        (scene, primitives)
    }

    #[test]
    fn test_directed_edge_gets_marker() {
        let edge = Edge::new(VertexId::new(), VertexId::new());
        let (scene, primitives) = draw(&edge, EdgeStyle::default());

        let marker = primitives.marker.expect("directed edges carry a marker");
        assert_eq!(scene.kind(marker), Some(PrimitiveKind::Marker));
        assert_eq!(
            scene.attribute(primitives.line, "marker-end"),
            Some(format!("url(#arrow-{})", edge.id()).as_str())
        );
        let arrow = scene.children(marker)[0];
        assert_eq!(scene.attribute(arrow, "points"), Some("-18,0 -32,-6 -32,6 -18,0"));
        // edges are drawn underneath everything else
        assert_eq!(scene.children(scene.root())[0], primitives.line);
    }

    #[test]
    fn test_undirected_edge_has_no_marker() {
        let edge = Edge::new(VertexId::new(), VertexId::new()).undirected();
        let (scene, primitives) = draw(&edge, EdgeStyle::default());
        assert!(primitives.marker.is_none());
        assert_eq!(scene.attribute(primitives.line, "marker-end"), None);
    }

    #[test]
    fn test_inhibited_marker_is_a_bar() {
        let edge = Edge::new(VertexId::new(), VertexId::new());
        let style = EdgeStyle {
            shape: EdgeShape::Inhibited,
            ..EdgeStyle::default()
        };
        let (scene, primitives) = draw(&edge, style);
        let bar = scene.children(primitives.marker.unwrap())[0];
        assert_eq!(scene.kind(bar), Some(PrimitiveKind::Rect));
        assert_eq!(scene.number(bar, "x"), Some(-24.0));
    }

    #[test]
    fn test_reposition_moves_endpoints() {
        let edge = Edge::new(VertexId::new(), VertexId::new());
        let (mut scene, primitives) = draw(&edge, EdgeStyle::default());
        DefaultEdgeRenderer::default().reposition(
            &primitives,
            Point::new(25.0, 5.0),
            Point::new(30.0, 40.0),
            &mut scene,
        );
        assert_eq!(scene.number(primitives.line, "x1"), Some(25.0));
        assert_eq!(scene.number(primitives.line, "y1"), Some(5.0));
    }
}
