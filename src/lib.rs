//! Interactive network editor core
//!
//! A directed multigraph of named vertices, the per-entity rendering
//! configuration that draws it as SVG, an asynchronous attribute store keyed
//! by vertex name, and a pointer-driven editor with select, add, join and
//! delete modes.
//!
//! ```text
//! NetworkSvgLayout ──> Network ──┬─> Graph
//!                                ├─> NetworkConfig ─> renderers ─> RenderTarget
//!                                └─> AttributeManager ─> AttributeStore
//! ```

pub mod aggregate;
pub mod attributes;
pub mod components;
pub mod config;
pub mod events;
pub mod infrastructure;
pub mod layout;
pub mod rendering;
pub mod value_objects;

// Re-export main types
pub use aggregate::{Graph, Network};
pub use attributes::{
    AttributeBatchReport, AttributeDefinition, AttributeError, AttributeFuture, AttributeManager,
    AttributeMap, AttributeResult,
};
pub use components::{DisplayAttribute, Edge, EdgeShape, EdgeStyle, Vertex, VertexShape, VertexStyle};
pub use config::{ConfigError, EdgeConfig, EditorConfig, NetworkConfig, OverlayStyle, VertexConfig};
pub use events::{GraphEvent, LayoutEvent};
pub use infrastructure::{AttributeStore, AttributeStoreError, InMemoryAttributeStore};
pub use layout::{
    ContextMenu, ContextMenuRequest, ContextMenuState, EditMode, Gesture, MenuAction, MenuTicket,
    NetworkSvgLayout, PointerButton, PointerEvent, PointerEventKind, PointerOutcome,
};
pub use rendering::{RenderTarget, SvgScene};
pub use value_objects::{Color, EdgeId, Point, Rect, VertexId};
