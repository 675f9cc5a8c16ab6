//! Graph Aggregate
//!
//! Owns the vertex and edge records. Both live in flat slot arenas with an
//! id → slot index, so lookups are O(1) and removals leave a hole instead of
//! shifting later entries. Vertices refer to edges (and edges to vertices) by
//! id only.
//!
//! Mutators never fail loudly: every one returns `true` when it changed the
//! graph and `false` when the request was a no-op (duplicate id, unknown id,
//! unresolvable endpoint).

use crate::components::{Edge, Vertex};
use crate::events::{EdgeAdded, EdgeRemoved, GraphEvent, VertexAdded, VertexRemoved};
use crate::value_objects::{EdgeId, VertexId};
use chrono::Utc;
use std::collections::HashMap;
use tracing::debug;

/// Holes are compacted away once they outnumber live entries by this margin
const COMPACT_SLACK: usize = 64;

/// The network topology
#[derive(Debug, Default)]
pub struct Graph {
    vertices: Vec<Option<Vertex>>,
    edges: Vec<Option<Edge>>,
    vertices_index: HashMap<VertexId, usize>,
    edges_index: HashMap<EdgeId, usize>,
    number_of_vertices: usize,
    number_of_edges: usize,
    events: Vec<GraphEvent>,
}

impl Graph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    pub fn number_of_vertices(&self) -> usize {
        self.number_of_vertices
    }

    pub fn number_of_edges(&self) -> usize {
        self.number_of_edges
    }

    pub fn is_empty(&self) -> bool {
        self.number_of_vertices == 0
    }

    /// Add a vertex. Returns `false` if a vertex with the same id is already present.
    ///
    /// Edge references carried by the incoming record are dropped; edges
    /// attach themselves through [`Graph::add_edge`].
    pub fn add_vertex(&mut self, mut vertex: Vertex) -> bool {
        if self.contains_vertex(&vertex.id()) {
            debug!(vertex_id = %vertex.id(), "vertex already present");
            return false;
        }
        vertex.detach_all();

        let vertex_id = vertex.id();
        let name = vertex.name().to_string();
        self.vertices.push(Some(vertex));
        self.vertices_index.insert(vertex_id, self.vertices.len() - 1);
        self.number_of_vertices += 1;

        self.events.push(GraphEvent::VertexAdded(VertexAdded {
            vertex_id,
            name,
            occurred_at: Utc::now(),
        }));
        true
    }

    /// Add an edge whose endpoints are both already in the graph
    pub fn add_edge(&mut self, edge: Edge) -> bool {
        self.add_edge_with(edge, std::iter::empty())
    }

    /// Add an edge, first adding any endpoint that is missing from the graph.
    ///
    /// Missing endpoints are looked up by id in `endpoints`. If an endpoint is
    /// neither in the graph nor supplied, nothing is changed and `false` is
    /// returned.
    pub fn add_edge_with<I>(&mut self, edge: Edge, endpoints: I) -> bool
    where
        I: IntoIterator<Item = Vertex>,
    {
        if self.contains_edge(&edge.id()) {
            debug!(edge_id = %edge.id(), "edge already present");
            return false;
        }

        let mut supplied: Vec<Vertex> = endpoints.into_iter().collect();
        let mut missing = Vec::new();
        for endpoint in [edge.source(), edge.target()] {
            if self.contains_vertex(&endpoint) || missing.iter().any(|v: &Vertex| v.id() == endpoint) {
                continue;
            }
            match supplied.iter().position(|v| v.id() == endpoint) {
                Some(position) => missing.push(supplied.swap_remove(position)),
                None => {
                    debug!(edge_id = %edge.id(), vertex_id = %endpoint, "edge endpoint cannot be resolved");
                    return false;
                }
            }
        }
        for vertex in missing {
            self.add_vertex(vertex);
        }

        let (edge_id, source, target) = (edge.id(), edge.source(), edge.target());
        self.edges.push(Some(edge));
        self.edges_index.insert(edge_id, self.edges.len() - 1);
        if let Some(vertex) = self.vertex_slot_mut(&source) {
            vertex.attach_edge(edge_id);
        }
        if let Some(vertex) = self.vertex_slot_mut(&target) {
            vertex.attach_edge(edge_id);
        }
        self.number_of_edges += 1;

        self.events.push(GraphEvent::EdgeAdded(EdgeAdded {
            edge_id,
            source,
            target,
            occurred_at: Utc::now(),
        }));
        true
    }

    /// Remove an edge, detaching it from both endpoints
    pub fn remove_edge(&mut self, edge_id: &EdgeId) -> bool {
        let Some(edge) = self.take_edge(edge_id) else {
            return false;
        };
        for endpoint in [edge.source(), edge.target()] {
            if let Some(vertex) = self.vertex_slot_mut(&endpoint) {
                vertex.detach_edge(edge_id);
            }
        }
        self.events.push(GraphEvent::EdgeRemoved(EdgeRemoved {
            edge_id: edge.id(),
            source: edge.source(),
            target: edge.target(),
            occurred_at: Utc::now(),
        }));
        self.maybe_compact();
        true
    }

    /// Remove a vertex and, first, every edge incident to it
    pub fn remove_vertex(&mut self, vertex_id: &VertexId) -> bool {
        let Some(incident) = self.vertex(vertex_id).map(|v| v.edges().to_vec()) else {
            return false;
        };
        for edge_id in &incident {
            self.remove_edge(edge_id);
        }

        let Some(position) = self.vertices_index.remove(vertex_id) else {
            return false;
        };
        let Some(vertex) = self.vertices[position].take() else {
            return false;
        };
        self.number_of_vertices -= 1;
        debug!(vertex_id = %vertex_id, removed_edges = incident.len(), "vertex removed");

        self.events.push(GraphEvent::VertexRemoved(VertexRemoved {
            vertex_id: *vertex_id,
            name: vertex.name().to_string(),
            occurred_at: Utc::now(),
        }));
        self.maybe_compact();
        true
    }

    pub fn contains_vertex(&self, vertex_id: &VertexId) -> bool {
        self.vertices_index.contains_key(vertex_id)
    }

    pub fn contains_edge(&self, edge_id: &EdgeId) -> bool {
        self.edges_index.contains_key(edge_id)
    }

    /// Get a vertex by id
    pub fn vertex(&self, vertex_id: &VertexId) -> Option<&Vertex> {
        self.vertices_index
            .get(vertex_id)
            .and_then(|&position| self.vertices[position].as_ref())
    }

    /// Get an edge by id
    pub fn edge(&self, edge_id: &EdgeId) -> Option<&Edge> {
        self.edges_index
            .get(edge_id)
            .and_then(|&position| self.edges[position].as_ref())
    }

    /// Live vertices in insertion order
    pub fn vertices(&self) -> impl Iterator<Item = &Vertex> + '_ {
        self.vertices.iter().flatten()
    }

    /// Live edges in insertion order
    pub fn edges(&self) -> impl Iterator<Item = &Edge> + '_ {
        self.edges.iter().flatten()
    }

    /// Vertices carrying `name`
    pub fn vertices_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Vertex> + 'a {
        self.vertices().filter(move |v| v.name() == name)
    }

    pub fn degree(&self, vertex_id: &VertexId) -> Option<usize> {
        self.vertex(vertex_id).map(Vertex::degree)
    }

    /// Edges touching `vertex_id`
    pub fn incident_edges(&self, vertex_id: &VertexId) -> Vec<&Edge> {
        self.vertex(vertex_id)
            .map(|v| v.edges().iter().filter_map(|id| self.edge(id)).collect())
            .unwrap_or_default()
    }

    /// Distinct vertices adjacent to `vertex_id`
    pub fn neighbors(&self, vertex_id: &VertexId) -> Vec<VertexId> {
        let mut neighbors = Vec::new();
        for edge in self.incident_edges(vertex_id) {
            if let Some(other) = edge.opposite(vertex_id) {
                if !neighbors.contains(&other) {
                    neighbors.push(other);
                }
            }
        }
        neighbors
    }

    /// Remove everything, emitting removal events for each entity
    pub fn clear(&mut self) {
        let ids: Vec<VertexId> = self.vertices().map(Vertex::id).collect();
        for vertex_id in ids {
            self.remove_vertex(&vertex_id);
        }
        self.vertices.clear();
        self.edges.clear();
    }

    /// Drain pending change notifications
    pub fn take_events(&mut self) -> Vec<GraphEvent> {
        std::mem::take(&mut self.events)
    }

    fn vertex_slot_mut(&mut self, vertex_id: &VertexId) -> Option<&mut Vertex> {
        let position = *self.vertices_index.get(vertex_id)?;
        self.vertices[position].as_mut()
    }

    fn take_edge(&mut self, edge_id: &EdgeId) -> Option<Edge> {
        let position = self.edges_index.remove(edge_id)?;
        let edge = self.edges[position].take()?;
        self.number_of_edges -= 1;
        Some(edge)
    }

    fn maybe_compact(&mut self) {
        if self.vertices.len() > 2 * self.number_of_vertices + COMPACT_SLACK {
            self.vertices.retain(Option::is_some);
            self.vertices_index = self
                .vertices
                .iter()
                .enumerate()
                .filter_map(|(position, slot)| slot.as_ref().map(|v| (v.id(), position)))
                .collect();
        }
        if self.edges.len() > 2 * self.number_of_edges + COMPACT_SLACK {
            self.edges.retain(Option::is_some);
            self.edges_index = self
                .edges
                .iter()
                .enumerate()
                .filter_map(|(position, slot)| slot.as_ref().map(|e| (e.id(), position)))
                .collect();
        }
    }
}
