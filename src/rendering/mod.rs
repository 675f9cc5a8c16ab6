//! Rendering seam
//!
//! Vertices and edges are drawn through renderer capabilities onto an
//! abstract [`RenderTarget`]. The in-memory [`SvgScene`] is the bundled
//! target.

mod edge_renderer;
mod scene;
mod target;
mod vertex_renderer;

pub use edge_renderer::{DefaultEdgeRenderer, EdgePrimitives, EdgeRenderContext, EdgeRenderer};
pub use scene::SvgScene;
pub use target::{Attributes, NodeHandle, PrimitiveKind, RenderTarget};
pub use vertex_renderer::{
    DefaultVertexRenderer, VertexPrimitives, VertexRenderContext, VertexRenderer,
};
