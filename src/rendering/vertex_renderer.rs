//! Vertex rendering capability and its default implementation

use super::target::{Attributes, NodeHandle, PrimitiveKind, RenderTarget};
use crate::components::{Vertex, VertexShape, VertexStyle};
use crate::value_objects::Point;
use std::fmt;

/// What a vertex renderer gets to draw with
#[derive(Debug, Clone, Copy)]
pub struct VertexRenderContext<'a> {
    pub vertex: &'a Vertex,
    /// Centre of the vertex on the canvas
    pub coords: Point,
}

/// Handles of the primitives making up one drawn vertex
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexPrimitives {
    /// Positioned container; removing it removes the whole vertex
    pub root: NodeHandle,
    /// Group holding the shape; selection halos are inserted here
    pub group: NodeHandle,
    pub shape: NodeHandle,
    pub label: NodeHandle,
}

/// Something that knows how to draw a vertex.
///
/// Implementations are stored per vertex in its
/// [`VertexConfig`](crate::config::VertexConfig), so different shapes can be
/// mixed in one network without the graph or the facade knowing about them.
pub trait VertexRenderer: fmt::Debug + Send + Sync {
    /// Draw the vertex below `parent`
    fn render(
        &self,
        ctx: &VertexRenderContext<'_>,
        target: &mut dyn RenderTarget,
        parent: NodeHandle,
    ) -> VertexPrimitives;

    /// Move already drawn primitives so the vertex is centred on `coords`
    fn reposition(&self, primitives: &VertexPrimitives, coords: Point, target: &mut dyn RenderTarget);

    fn style(&self) -> &VertexStyle;

    fn style_mut(&mut self) -> &mut VertexStyle;

    fn clone_box(&self) -> Box<dyn VertexRenderer>;

    /// Whether `point` falls on a vertex centred at `coords`
    fn hit(&self, coords: Point, point: Point) -> bool {
        let reach = self.style().edge_offset();
        match self.style().shape {
            VertexShape::Circle => coords.distance_to(&point) <= reach,
            VertexShape::Square => (coords.x - point.x).abs() <= reach && (coords.y - point.y).abs() <= reach,
        }
    }
}

impl Clone for Box<dyn VertexRenderer> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// Circle or square with a label underneath
#[derive(Debug, Clone, Default)]
pub struct DefaultVertexRenderer {
    style: VertexStyle,
}

impl DefaultVertexRenderer {
    pub fn new(style: VertexStyle) -> Self {
        Self { style }
    }

    fn origin(&self, coords: Point) -> Point {
        let mid = self.style.footprint() / 2.0;
        coords.translated(-mid, -mid)
    }
}

impl VertexRenderer for DefaultVertexRenderer {
    fn render(
        &self,
        ctx: &VertexRenderContext<'_>,
        target: &mut dyn RenderTarget,
        parent: NodeHandle,
    ) -> VertexPrimitives {
        let style = &self.style;
        let footprint = style.footprint();
        let mid = footprint / 2.0;
        let origin = self.origin(ctx.coords);

        let root = target.add_child(
            parent,
            PrimitiveKind::Svg,
            Attributes::new()
                .with("id", ctx.vertex.id())
                .with("x", origin.x)
                .with("y", origin.y)
                .with("width", footprint)
                .with("height", footprint + style.label_size * 2.0)
                .with("overflow", "visible")
                .with("cursor", "pointer")
                .with("network-type", "vertex-svg"),
        );
        let group = target.add_child(root, PrimitiveKind::Group, Attributes::new());

        let common = Attributes::new()
            .with("stroke", style.stroke_color)
            .with("stroke-width", style.stroke_size)
            .with("fill", style.color)
            .with("opacity", style.opacity)
            .with("network-type", "vertex");
        let shape = match style.shape {
            VertexShape::Circle => {
                let mut attributes = Attributes::new()
                    .with("cx", mid)
                    .with("cy", mid)
                    .with("r", style.size / 2.0);
                attributes.merge(common);
                target.add_child(group, PrimitiveKind::Circle, attributes)
            }
            VertexShape::Square => {
                let corner = mid - style.size / 2.0;
                let mut attributes = Attributes::new()
                    .with("x", corner)
                    .with("y", corner)
                    .with("width", style.size)
                    .with("height", style.size);
                attributes.merge(common);
                target.add_child(group, PrimitiveKind::Rect, attributes)
            }
        };

        let label = target.add_child(
            root,
            PrimitiveKind::Text,
            Attributes::new()
                .with("x", 5)
                .with("y", style.label_size + footprint)
                .with("font-size", style.label_size)
                .with("fill", style.label_color)
                .with("network-type", "vertexLabel"),
        );
        target.set_text(label, ctx.vertex.name());

        VertexPrimitives {
            root,
            group,
            shape,
            label,
        }
    }

    fn reposition(&self, primitives: &VertexPrimitives, coords: Point, target: &mut dyn RenderTarget) {
        let origin = self.origin(coords);
        target.set_attributes(
            primitives.root,
            Attributes::new().with("x", origin.x).with("y", origin.y),
        );
    }

    fn style(&self) -> &VertexStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut VertexStyle {
        &mut self.style
    }

    fn clone_box(&self) -> Box<dyn VertexRenderer> {
        Box::new(self.clone())
    }
}
