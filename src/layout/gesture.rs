//! Pointer input and in-flight gesture state

use super::context_menu::ContextMenuRequest;
use crate::attributes::AttributeFuture;
use crate::value_objects::{Point, VertexId};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEventKind {
    Down(PointerButton),
    Move,
    Up(PointerButton),
    /// The pointer left the canvas
    Leave,
}

/// A pointer event in canvas coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerEventKind,
    pub position: Point,
}

impl PointerEvent {
    pub fn down(x: f64, y: f64) -> Self {
        Self::new(PointerEventKind::Down(PointerButton::Primary), x, y)
    }

    pub fn secondary_down(x: f64, y: f64) -> Self {
        Self::new(PointerEventKind::Down(PointerButton::Secondary), x, y)
    }

    pub fn moved(x: f64, y: f64) -> Self {
        Self::new(PointerEventKind::Move, x, y)
    }

    pub fn up(x: f64, y: f64) -> Self {
        Self::new(PointerEventKind::Up(PointerButton::Primary), x, y)
    }

    pub fn leave(x: f64, y: f64) -> Self {
        Self::new(PointerEventKind::Leave, x, y)
    }

    fn new(kind: PointerEventKind, x: f64, y: f64) -> Self {
        Self {
            kind,
            position: Point::new(x, y),
        }
    }
}

/// The gesture currently in progress
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Gesture {
    #[default]
    Idle,
    /// Selected vertices follow the pointer; `last` is the previous pointer position
    Dragging { last: Point },
    /// Rubber-band selection between two corners
    Marquee { origin: Point, current: Point },
    /// First endpoint of a join has been picked
    PendingJoin { source: VertexId },
}

impl Gesture {
    pub fn is_idle(&self) -> bool {
        matches!(self, Gesture::Idle)
    }
}

/// Work left to the caller after a pointer event
pub enum PointerOutcome {
    /// Nothing further to drive
    Handled,
    /// Secondary press on a vertex; pass the fetched attributes to
    /// `resolve_context_menu`
    ContextMenu(ContextMenuRequest),
    /// Select-mode click released on a vertex, matching a
    /// `LayoutEvent::VertexClicked`; the attributes are for the host to show
    VertexClicked {
        vertex_id: VertexId,
        fetch: AttributeFuture,
    },
}

impl PointerOutcome {
    pub fn is_handled(&self) -> bool {
        matches!(self, PointerOutcome::Handled)
    }

    pub fn into_context_menu(self) -> Option<ContextMenuRequest> {
        match self {
            PointerOutcome::ContextMenu(request) => Some(request),
            _ => None,
        }
    }

    /// Attribute lookup of a clicked vertex
    pub fn into_vertex_click(self) -> Option<(VertexId, AttributeFuture)> {
        match self {
            PointerOutcome::VertexClicked { vertex_id, fetch } => Some((vertex_id, fetch)),
            _ => None,
        }
    }
}

impl fmt::Debug for PointerOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PointerOutcome::Handled => f.write_str("Handled"),
            PointerOutcome::ContextMenu(request) => f.debug_tuple("ContextMenu").field(request).finish(),
            PointerOutcome::VertexClicked { vertex_id, .. } => f
                .debug_struct("VertexClicked")
                .field("vertex_id", vertex_id)
                .finish_non_exhaustive(),
        }
    }
}
