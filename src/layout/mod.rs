//! Interactive layout
//!
//! Pointer-driven editing of a network drawn on a [`RenderTarget`](crate::rendering::RenderTarget):
//! mode handling, gestures, selection and the vertex context menu.

mod context_menu;
mod gesture;
mod mode;
mod svg_layout;

pub use context_menu::{ContextMenu, ContextMenuRequest, ContextMenuState, MenuAction, MenuTicket};
pub use gesture::{Gesture, PointerButton, PointerEvent, PointerEventKind, PointerOutcome};
pub use mode::{EditMode, UnknownMode};
pub use svg_layout::NetworkSvgLayout;
