//! Directed graph over opaque vertex identifiers.
//!
//! # Overview
//!
//! [`Graph`] keeps an explicit, insertion-ordered vertex list and an
//! adjacency list per vertex. Vertex order is significant: the SCC
//! decomposition iterates vertices in stored order, so the order in which
//! terms are first seen decides component ids and member order downstream.
//!
//! Vertices are interned to dense `usize` indices on insertion. The public
//! API speaks in terms of `V`; the index form is used by the traversal code
//! in [`crate::scc`].
//!
//! Parallel edges and self-loops are stored as given. This layer never
//! deduplicates.

use std::collections::HashMap;
use std::hash::Hash;

use crate::error::CheckError;

// ---------------------------------------------------------------------------
// Graph
// ---------------------------------------------------------------------------

/// A directed graph with insertion-ordered vertices.
#[derive(Debug, Clone)]
pub struct Graph<V> {
    vertices: Vec<V>,
    index: HashMap<V, usize>,
    adjacency: Vec<Vec<usize>>,
}

impl<V: Eq + Hash + Clone> Default for Graph<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Eq + Hash + Clone> Graph<V> {
    /// Create an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            index: HashMap::new(),
            adjacency: Vec::new(),
        }
    }

    /// Create an edgeless graph over `vertices` (duplicates are ignored).
    #[must_use]
    pub fn with_vertices(vertices: impl IntoIterator<Item = V>) -> Self {
        let mut graph = Self::new();
        for v in vertices {
            graph.add_vertex(v);
        }
        graph
    }

    /// Build a graph from an ordered edge list.
    ///
    /// The first occurrence of each endpoint fixes its position in the
    /// vertex order (source before target within one edge). Repeated edges
    /// are kept.
    #[must_use]
    pub fn from_edges(edges: impl IntoIterator<Item = (V, V)>) -> Self {
        let mut graph = Self::new();
        for (u, v) in edges {
            graph.add_edge(u, v);
        }
        graph
    }

    /// Build a graph from an explicit vertex list and adjacency mapping.
    ///
    /// Vertices absent from `adjacency` get no successors.
    ///
    /// # Errors
    ///
    /// Returns [`CheckError::DanglingEdge`] if any adjacency list names a
    /// successor that is not in `vertices`.
    pub fn from_adjacency(
        vertices: impl IntoIterator<Item = V>,
        adjacency: &HashMap<V, Vec<V>>,
    ) -> Result<Self, CheckError> {
        let mut graph = Self::with_vertices(vertices);
        for u in 0..graph.vertices.len() {
            let Some(successors) = adjacency.get(&graph.vertices[u]) else {
                continue;
            };
            for v in successors {
                let Some(&vi) = graph.index.get(v) else {
                    return Err(CheckError::DanglingEdge { vertex: u });
                };
                graph.adjacency[u].push(vi);
            }
        }
        Ok(graph)
    }

    /// Insert `v` if it is new and return its index.
    pub fn add_vertex(&mut self, v: V) -> usize {
        if let Some(&idx) = self.index.get(&v) {
            return idx;
        }
        let idx = self.vertices.len();
        self.index.insert(v.clone(), idx);
        self.vertices.push(v);
        self.adjacency.push(Vec::new());
        idx
    }

    /// Append the edge `u → v`, inserting either endpoint if needed.
    pub fn add_edge(&mut self, u: V, v: V) {
        let ui = self.add_vertex(u);
        let vi = self.add_vertex(v);
        self.link(ui, vi);
    }

    /// Append the edge between two already-interned vertices.
    pub(crate) fn link(&mut self, u: usize, v: usize) {
        self.adjacency[u].push(v);
    }

    /// Vertices in stored order.
    #[must_use]
    pub fn vertices(&self) -> &[V] {
        &self.vertices
    }

    #[must_use]
    pub fn contains(&self, v: &V) -> bool {
        self.index.contains_key(v)
    }

    /// Return the dense index of `v`.
    #[must_use]
    pub fn index_of(&self, v: &V) -> Option<usize> {
        self.index.get(v).copied()
    }

    /// Successors of `v` in stored order (empty if `v` is unknown).
    pub fn successors<'a>(&'a self, v: &V) -> impl Iterator<Item = &'a V> + 'a {
        let targets: &[usize] = self
            .index
            .get(v)
            .map_or(&[], |&idx| self.adjacency[idx].as_slice());
        targets.iter().map(|&t| &self.vertices[t])
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum()
    }

    /// Flattened `(u, v)` pairs: vertices in stored order, then each
    /// vertex's successors in stored order.
    pub fn edges(&self) -> impl Iterator<Item = (&V, &V)> + '_ {
        self.adjacency.iter().enumerate().flat_map(move |(u, targets)| {
            targets
                .iter()
                .map(move |&v| (&self.vertices[u], &self.vertices[v]))
        })
    }

    pub(crate) fn adjacency_lists(&self) -> &[Vec<usize>] {
        &self.adjacency
    }

    /// Reverse adjacency over dense indices. Each list is ordered by the
    /// stored order of the original source vertex.
    pub(crate) fn reverse_adjacency(&self) -> Vec<Vec<usize>> {
        let mut reverse = vec![Vec::new(); self.vertices.len()];
        for (u, targets) in self.adjacency.iter().enumerate() {
            for &v in targets {
                reverse[v].push(u);
            }
        }
        reverse
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
