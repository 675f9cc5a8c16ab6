//! Edge record

use crate::value_objects::{EdgeId, VertexId};
use serde::{Deserialize, Serialize};

/// An edge between two vertices
///
/// Endpoints are stored as ids and never own the vertices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    id: EdgeId,
    name: Option<String>,
    source: VertexId,
    target: VertexId,
    weight: Option<f64>,
    directed: bool,
}

impl Edge {
    /// Create a directed edge with a fresh id
    pub fn new(source: VertexId, target: VertexId) -> Self {
        Self::with_id(EdgeId::new(), source, target)
    }

    /// Create a directed edge with a caller-chosen id
    pub fn with_id(id: EdgeId, source: VertexId, target: VertexId) -> Self {
        Self {
            id,
            name: None,
            source,
            target,
            weight: None,
            directed: true,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    pub fn undirected(mut self) -> Self {
        self.directed = false;
        self
    }

    pub fn id(&self) -> EdgeId {
        self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn source(&self) -> VertexId {
        self.source
    }

    pub fn target(&self) -> VertexId {
        self.target
    }

    pub fn weight(&self) -> Option<f64> {
        self.weight
    }

    pub fn is_directed(&self) -> bool {
        self.directed
    }

    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }

    /// Whether `vertex` is one of the endpoints
    pub fn touches(&self, vertex: &VertexId) -> bool {
        self.source == *vertex || self.target == *vertex
    }

    /// The endpoint opposite to `vertex`, if `vertex` is an endpoint
    pub fn opposite(&self, vertex: &VertexId) -> Option<VertexId> {
        if self.source == *vertex {
            Some(self.target)
        } else if self.target == *vertex {
            Some(self.source)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_builders() {
        let (a, b) = (VertexId::new(), VertexId::new());
        let edge = Edge::new(a, b).with_weight(0.8).with_name("binds").undirected();

        assert_eq!(edge.weight(), Some(0.8));
        assert_eq!(edge.name(), Some("binds"));
        assert!(!edge.is_directed());
        assert_eq!(edge.opposite(&a), Some(b));
        assert_eq!(edge.opposite(&VertexId::new()), None);
        assert!(edge.touches(&b));
    }
}
