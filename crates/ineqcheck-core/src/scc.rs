//! Strongly connected components and condensation.
//!
//! # Algorithm
//!
//! Kosaraju's two-pass search:
//!
//! 1. **Forward pass.** Visit vertices in the graph's stored order and run a
//!    depth-first search along forward edges from each unvisited one,
//!    appending every vertex to a finishing list when its search returns.
//! 2. **Reverse pass.** Walk the finishing list back to front. Each
//!    still-unvisited vertex opens a new component, and every vertex reached
//!    from it along *reverse* edges joins that component.
//!
//! Component ids are assigned in reverse-finishing order, and members within
//! a component are listed in that same order. Both orders are deterministic
//! for a given vertex/edge insertion order.
//!
//! Both searches use an explicit stack of `(vertex, next successor)` frames,
//! so arbitrarily long chains do not grow the call stack. Visitation order is
//! identical to the recursive formulation.
//!
//! # Condensation
//!
//! The condensed graph has one vertex per component id (`0..n`) and one edge
//! per ordered pair of distinct components joined by at least one original
//! edge. Edges are listed in the order first discovered while scanning
//! original vertices in stored order.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use tracing::{debug, instrument};

use crate::graph::Graph;

/// Output of [`decompose`].
#[derive(Debug, Clone)]
pub struct Decomposition<V> {
    /// Component id of every vertex.
    pub component_of: HashMap<V, usize>,
    /// Members of each component, indexed by component id.
    pub components: Vec<Vec<V>>,
    /// DAG over component ids.
    pub condensed: Graph<usize>,
}

impl<V: Eq + Hash> Decomposition<V> {
    #[must_use]
    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    /// Component id of `v`, if `v` was a vertex of the decomposed graph.
    #[must_use]
    pub fn component(&self, v: &V) -> Option<usize> {
        self.component_of.get(v).copied()
    }

    /// Return `true` if both vertices are known and mutually reachable.
    #[must_use]
    pub fn same_component(&self, a: &V, b: &V) -> bool {
        matches!((self.component(a), self.component(b)), (Some(x), Some(y)) if x == y)
    }
}

/// Partition `graph` into strongly connected components.
///
/// Runs in `O(V + E)`. Self-loops and parallel edges are tolerated; an
/// edgeless graph yields one singleton component per vertex.
#[must_use]
#[instrument(skip(graph), fields(vertices = graph.vertex_count(), edges = graph.edge_count()))]
pub fn decompose<V: Eq + Hash + Clone>(graph: &Graph<V>) -> Decomposition<V> {
    let n = graph.vertex_count();
    let forward = graph.adjacency_lists();
    let reverse = graph.reverse_adjacency();

    // Forward pass: post-order finishing list.
    let mut visited = vec![false; n];
    let mut finished: Vec<usize> = Vec::with_capacity(n);
    for start in 0..n {
        if !visited[start] {
            post_order(start, forward, &mut visited, &mut finished);
        }
    }

    // Reverse pass: one component per search tree.
    visited.fill(false);
    let mut component = vec![0_usize; n];
    let mut count = 0_usize;
    let mut tree: Vec<usize> = Vec::new();
    for &root in finished.iter().rev() {
        if visited[root] {
            continue;
        }
        tree.clear();
        post_order(root, &reverse, &mut visited, &mut tree);
        for &member in &tree {
            component[member] = count;
        }
        count += 1;
    }

    let vertices = graph.vertices();

    let mut components: Vec<Vec<V>> = vec![Vec::new(); count];
    for &u in finished.iter().rev() {
        components[component[u]].push(vertices[u].clone());
    }

    let component_of: HashMap<V, usize> = vertices
        .iter()
        .enumerate()
        .map(|(u, v)| (v.clone(), component[u]))
        .collect();

    let condensed = condense(forward, &component, count);

    debug!(
        components = count,
        condensed_edges = condensed.edge_count(),
        "scc decomposition complete"
    );

    Decomposition {
        component_of,
        components,
        condensed,
    }
}

/// Iterative depth-first search from `start`, appending vertices to `out` in
/// post-order. Vertices already marked in `visited` are not entered.
fn post_order(
    start: usize,
    adjacency: &[Vec<usize>],
    visited: &mut [bool],
    out: &mut Vec<usize>,
) {
    visited[start] = true;
    let mut stack: Vec<(usize, usize)> = vec![(start, 0)];

    while let Some(frame) = stack.last_mut() {
        let (u, next) = *frame;
        if let Some(&v) = adjacency[u].get(next) {
            frame.1 += 1;
            if !visited[v] {
                visited[v] = true;
                stack.push((v, 0));
            }
        } else {
            stack.pop();
            out.push(u);
        }
    }
}

fn condense(forward: &[Vec<usize>], component: &[usize], count: usize) -> Graph<usize> {
    let mut condensed = Graph::with_vertices(0..count);
    let mut seen: HashSet<(usize, usize)> = HashSet::new();

    for (u, targets) in forward.iter().enumerate() {
        let i = component[u];
        for &v in targets {
            let j = component[v];
            if i != j && seen.insert((i, j)) {
                condensed.add_edge(i, j);
            }
        }
    }

    condensed
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
