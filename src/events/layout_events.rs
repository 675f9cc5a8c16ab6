//! Notifications emitted by the interactive layout for the surrounding UI

use crate::layout::EditMode;
use crate::value_objects::{Color, EdgeId, Point, VertexId};
use serde::{Deserialize, Serialize};

/// Something the host UI may want to react to (toolbars, side panels)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LayoutEvent {
    ModeChanged {
        from: EditMode,
        to: EditMode,
    },
    SelectionChanged {
        selected: Vec<VertexId>,
    },
    VertexCreated {
        vertex_id: VertexId,
        name: String,
        position: Point,
    },
    EdgeCreated {
        edge_id: EdgeId,
        source: VertexId,
        target: VertexId,
    },
    VertexDeleted {
        vertex_id: VertexId,
        removed_edges: usize,
    },
    /// A single edge was removed; endpoints stay in place
    EdgeDeleted {
        edge_id: EdgeId,
        source: VertexId,
        target: VertexId,
    },
    /// A vertex was released under the pointer in select mode; carries the
    /// colors the edition bar mirrors
    VertexClicked {
        vertex_id: VertexId,
        color: Color,
        stroke_color: Color,
    },
    ContextMenuOpened {
        vertex_id: VertexId,
        anchor: Point,
    },
}
