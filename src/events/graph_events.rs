//! Topology change notifications emitted by the graph

use crate::value_objects::{EdgeId, VertexId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Vertex added event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VertexAdded {
    /// The id of the new vertex
    pub vertex_id: VertexId,
    /// The vertex name at insertion time
    pub name: String,
    pub occurred_at: DateTime<Utc>,
}

/// Vertex removed event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VertexRemoved {
    /// The id of the removed vertex
    pub vertex_id: VertexId,
    /// The vertex name, needed to purge attribute values
    pub name: String,
    pub occurred_at: DateTime<Utc>,
}

/// Edge added event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeAdded {
    pub edge_id: EdgeId,
    pub source: VertexId,
    pub target: VertexId,
    pub occurred_at: DateTime<Utc>,
}

/// Edge removed event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeRemoved {
    pub edge_id: EdgeId,
    pub source: VertexId,
    pub target: VertexId,
    pub occurred_at: DateTime<Utc>,
}

/// Enum wrapper for graph events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GraphEvent {
    VertexAdded(VertexAdded),
    VertexRemoved(VertexRemoved),
    EdgeAdded(EdgeAdded),
    EdgeRemoved(EdgeRemoved),
}

impl GraphEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::VertexAdded(_) => "vertex:add",
            Self::VertexRemoved(_) => "vertex:remove",
            Self::EdgeAdded(_) => "edge:add",
            Self::EdgeRemoved(_) => "edge:remove",
        }
    }

    pub fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            Self::VertexAdded(e) => e.occurred_at,
            Self::VertexRemoved(e) => e.occurred_at,
            Self::EdgeAdded(e) => e.occurred_at,
            Self::EdgeRemoved(e) => e.occurred_at,
        }
    }
}
