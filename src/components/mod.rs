//! Network components
//!
//! Plain records for the topology (vertices and edges) and the visual styles
//! attached to them through the network configuration.

pub mod edge;
pub mod vertex;
pub mod visual;

pub use edge::Edge;
pub use vertex::Vertex;
pub use visual::{DisplayAttribute, EdgeShape, EdgeStyle, VertexShape, VertexStyle};
