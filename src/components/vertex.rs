//! Vertex record

use crate::value_objects::{EdgeId, VertexId};
use serde::{Deserialize, Serialize};

/// A vertex of the network
///
/// `name` doubles as the key under which attributes are stored, so two
/// vertices sharing a name share their attribute values. Incident edges are
/// kept as ids only; the [`Graph`](crate::aggregate::Graph) resolves them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    id: VertexId,
    name: String,
    edges: Vec<EdgeId>,
}

impl Vertex {
    /// Create a vertex with a fresh id
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_id(VertexId::new(), name)
    }

    /// Create a vertex with a caller-chosen id
    pub fn with_id(id: VertexId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            edges: Vec::new(),
        }
    }

    pub fn id(&self) -> VertexId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Ids of the incident edges, in attachment order
    pub fn edges(&self) -> &[EdgeId] {
        &self.edges
    }

    pub fn degree(&self) -> usize {
        self.edges.len()
    }

    pub(crate) fn attach_edge(&mut self, edge: EdgeId) {
        if !self.edges.contains(&edge) {
            self.edges.push(edge);
        }
    }

    pub(crate) fn detach_edge(&mut self, edge: &EdgeId) {
        if let Some(position) = self.edges.iter().position(|e| e == edge) {
            self.edges.remove(position);
        }
    }

    /// Drop all back-references; used when a detached copy is handed out
    pub(crate) fn detach_all(&mut self) {
        self.edges.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attach_is_idempotent() {
        let mut vertex = Vertex::new("BRCA2");
        let edge = EdgeId::new();
        vertex.attach_edge(edge);
        vertex.attach_edge(edge);
        assert_eq!(vertex.degree(), 1);

        vertex.detach_edge(&edge);
        assert_eq!(vertex.degree(), 0);
    }
}
