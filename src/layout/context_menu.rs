//! Vertex context menu
//!
//! Opening the menu needs the vertex attributes, which come from the async
//! attribute store. The layout hands out a [`ContextMenuRequest`] holding an
//! owned fetch future and stays in [`ContextMenuState::Loading`] until the
//! caller passes the result back. Tickets let late answers for a menu that
//! has since been dismissed or replaced be dropped.

use crate::attributes::{AttributeFuture, AttributeMap};
use crate::value_objects::{Point, VertexId};
use std::fmt;

/// Identifies one context menu request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MenuTicket(pub(crate) u64);

/// Attribute lookup the caller must drive to completion
pub struct ContextMenuRequest {
    pub ticket: MenuTicket,
    pub vertex_id: VertexId,
    pub anchor: Point,
    pub fetch: AttributeFuture,
}

impl fmt::Debug for ContextMenuRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextMenuRequest")
            .field("ticket", &self.ticket)
            .field("vertex_id", &self.vertex_id)
            .field("anchor", &self.anchor)
            .finish_non_exhaustive()
    }
}

/// Action offered by the menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    DeleteVertex,
}

/// An open menu: the vertex attributes plus the available actions
#[derive(Debug, Clone, PartialEq)]
pub struct ContextMenu {
    pub vertex_id: VertexId,
    pub anchor: Point,
    pub entries: AttributeMap,
    pub actions: Vec<MenuAction>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum ContextMenuState {
    #[default]
    Closed,
    Loading {
        ticket: MenuTicket,
        vertex_id: VertexId,
        anchor: Point,
    },
    Open(ContextMenu),
}

impl ContextMenuState {
    pub fn is_open(&self) -> bool {
        matches!(self, ContextMenuState::Open(_))
    }

    pub fn menu(&self) -> Option<&ContextMenu> {
        match self {
            ContextMenuState::Open(menu) => Some(menu),
            _ => None,
        }
    }
}
