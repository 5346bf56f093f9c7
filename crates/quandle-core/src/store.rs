//! # Edge Store
//!
//! The working vertex and edge sets of an enumeration.
//!
//! All data structures use `BTreeSet` for deterministic ordering.
//! The store only provides insertion, removal and the batch rewrite used by
//! the closure engine; it never decides which vertices must coincide.

use crate::closure::Replacement;
use crate::{Edge, Vertex};
use std::collections::{BTreeMap, BTreeSet};

/// Vertex set plus edge set, exclusively owned by one enumeration.
#[derive(Debug, Clone, Default)]
pub struct EdgeStore {
    vertices: BTreeSet<Vertex>,

    edges: BTreeSet<Edge>,

    /// Largest vertex id ever inserted. Fresh ids come from above it, so an id
    /// removed by a merge is never handed out again.
    high_water: u64,

    /// merged vertex -> survivor, recorded since the last `forget_forwarding`
    forwards: BTreeMap<Vertex, Vertex>,
}

impl EdgeStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an edge. Idempotent.
    ///
    /// Returns `true` if the edge was not present.
    pub fn add_edge(&mut self, edge: Edge) -> bool {
        self.edges.insert(edge)
    }

    /// Insert a vertex. Idempotent.
    pub fn add_vertex(&mut self, v: Vertex) -> bool {
        self.high_water = self.high_water.max(v.0);
        self.vertices.insert(v)
    }

    /// Remove a vertex from the vertex set.
    ///
    /// Edges are not touched: callers rewrite edges before removing the
    /// vertices they no longer reference.
    pub fn remove_vertex(&mut self, v: Vertex) -> bool {
        self.vertices.remove(&v)
    }

    /// The id the next interior chain vertex receives.
    #[must_use]
    pub fn next_fresh_vertex(&self) -> Vertex {
        Vertex(self.high_water.saturating_add(1))
    }

    /// Insert and return a fresh vertex.
    pub fn allocate_vertex(&mut self) -> Vertex {
        let v = self.next_fresh_vertex();
        self.add_vertex(v);
        v
    }

    #[must_use]
    pub fn contains_vertex(&self, v: Vertex) -> bool {
        self.vertices.contains(&v)
    }

    #[must_use]
    pub fn contains_edge(&self, edge: &Edge) -> bool {
        self.edges.contains(edge)
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Largest live vertex id.
    #[must_use]
    pub fn max_vertex(&self) -> Option<Vertex> {
        self.vertices.last().copied()
    }

    /// Largest vertex id ever allocated, live or not.
    #[must_use]
    pub fn allocated(&self) -> u64 {
        self.high_water
    }

    /// Live vertices in ascending order.
    pub fn vertices(&self) -> impl Iterator<Item = Vertex> + '_ {
        self.vertices.iter().copied()
    }

    /// Edges in `(source, target, label)` order.
    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.edges.iter().copied()
    }

    #[must_use]
    pub fn vertex_set(&self) -> &BTreeSet<Vertex> {
        &self.vertices
    }

    #[must_use]
    pub fn edge_set(&self) -> &BTreeSet<Edge> {
        &self.edges
    }

    /// Rewrite every edge endpoint through `replacement`, drop the duplicate
    /// triples this produces, then remove the merged vertices.
    ///
    /// Returns the number of vertices removed.
    pub fn apply_replacement(&mut self, replacement: &mut Replacement) -> usize {
        if replacement.is_empty() {
            return 0;
        }

        let edges = std::mem::take(&mut self.edges);
        self.edges = edges
            .into_iter()
            .map(|e| {
                Edge::new(
                    replacement.resolve(e.source),
                    replacement.resolve(e.target),
                    e.label,
                )
            })
            .collect();

        let merged: Vec<Vertex> = replacement.merged().collect();
        let mut removed = 0;
        for v in merged {
            let survivor = replacement.resolve(v);
            self.forwards.insert(v, survivor);
            if self.vertices.remove(&v) {
                removed += 1;
            }
        }
        removed
    }

    /// The live vertex `v` was merged into, following every recorded merge.
    /// Returns `v` itself when it was not merged.
    #[must_use]
    pub fn resolve(&self, v: Vertex) -> Vertex {
        let mut current = v;
        while let Some(&next) = self.forwards.get(&current) {
            current = next;
        }
        current
    }

    /// Drop the merge history used by [`EdgeStore::resolve`].
    pub fn forget_forwarding(&mut self) {
        self.forwards.clear();
    }
}

// =============================================================================
// TESTS
// =============================================================================
