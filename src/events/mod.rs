//! Network events

pub mod graph_events;
pub mod layout_events;

pub use graph_events::{EdgeAdded, EdgeRemoved, GraphEvent, VertexAdded, VertexRemoved};
pub use layout_events::LayoutEvent;
