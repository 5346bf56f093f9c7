//! # Closure Engine
//!
//! Collapses the edge store until every generator acts as a partial
//! bijection:
//!
//! - **Functionality**: two edges with the same source and label must share
//!   their target.
//! - **Injectivity**: two edges with the same target and label must share
//!   their source.
//!
//! Each pass scans the whole edge set, collects every forced identification
//! into one [`Replacement`], and only then rewrites the edges. Passes repeat
//! until a scan finds nothing to merge.
//!
//! ## Tie-break
//!
//! When two vertices are identified the smaller id survives. The survivor of
//! a class is therefore its smallest member, whatever order the merges were
//! discovered in, and the output is deterministic.

use crate::store::EdgeStore;
use crate::{Generator, Vertex};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

// =============================================================================
// REPLACEMENT (batch union-find)
// =============================================================================

/// A batch of vertex identifications.
///
/// Union-find over vertex ids where the root of a class is always its
/// smallest id. Resolution follows chains (`5 → 2`, `2 → 1` resolves `5` to
/// `1`) and compresses them as it goes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Replacement {
    /// merged vertex -> vertex it was merged into
    parent: BTreeMap<Vertex, Vertex>,
}

impl Replacement {
    /// Create an empty replacement.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Identify `a` and `b`. Returns `false` if they were already identified.
    pub fn merge(&mut self, a: Vertex, b: Vertex) -> bool {
        let ra = self.resolve(a);
        let rb = self.resolve(b);
        if ra == rb {
            return false;
        }
        let (keep, drop) = if ra < rb { (ra, rb) } else { (rb, ra) };
        self.parent.insert(drop, keep);
        true
    }

    /// The surviving vertex `v` maps to (`v` itself if it was never merged).
    pub fn resolve(&mut self, v: Vertex) -> Vertex {
        let mut root = v;
        while let Some(&next) = self.parent.get(&root) {
            root = next;
        }

        let mut current = v;
        while let Some(&next) = self.parent.get(&current) {
            if next == root {
                break;
            }
            self.parent.insert(current, root);
            current = next;
        }

        root
    }

    /// Vertices that do not survive this batch.
    pub fn merged(&self) -> impl Iterator<Item = Vertex> + '_ {
        self.parent.keys().copied()
    }

    /// Number of vertices that do not survive this batch.
    #[must_use]
    pub fn len(&self) -> usize {
        self.parent.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }
}

// =============================================================================
// CLOSURE OUTCOME
// =============================================================================

/// Result of one [`ClosureEngine::close`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClosureOutcome {
    /// Passes that merged at least one pair of vertices.
    pub passes: u64,
    /// Vertices removed across all passes.
    pub merged: usize,
    /// Whether the last scan found nothing left to merge.
    pub converged: bool,
}

// =============================================================================
// CLOSURE ENGINE
// =============================================================================

/// The ClosureEngine detects and applies forced identifications.
pub struct ClosureEngine;

impl ClosureEngine {
    /// Scan the edge set once and collect every functionality or injectivity
    /// violation into one replacement.
    ///
    /// Every edge is compared against the first edge seen with the same
    /// `(source, label)` and the same `(target, label)`; the union-find makes
    /// the pairwise identifications transitive.
    #[must_use]
    pub fn scan(store: &EdgeStore) -> Replacement {
        let mut by_source: BTreeMap<(Vertex, Generator), Vertex> = BTreeMap::new();
        let mut by_target: BTreeMap<(Vertex, Generator), Vertex> = BTreeMap::new();
        let mut replacement = Replacement::new();

        for edge in store.edges() {
            match by_source.entry((edge.source, edge.label)) {
                Entry::Vacant(slot) => {
                    slot.insert(edge.target);
                }
                Entry::Occupied(slot) => {
                    if *slot.get() != edge.target {
                        replacement.merge(*slot.get(), edge.target);
                    }
                }
            }

            match by_target.entry((edge.target, edge.label)) {
                Entry::Vacant(slot) => {
                    slot.insert(edge.source);
                }
                Entry::Occupied(slot) => {
                    if *slot.get() != edge.source {
                        replacement.merge(*slot.get(), edge.source);
                    }
                }
            }
        }

        replacement
    }

    /// Scan and merge until a fixpoint.
    ///
    /// With `max_passes = Some(n)` at most `n` merging passes run; if the
    /// edge set is still not closed after them, the outcome reports
    /// `converged: false` and the store is left in its partial state.
    pub fn close(store: &mut EdgeStore, max_passes: Option<u64>) -> ClosureOutcome {
        let mut outcome = ClosureOutcome::default();

        loop {
            let mut replacement = Self::scan(store);
            if replacement.is_empty() {
                outcome.converged = true;
                return outcome;
            }
            if max_passes.is_some_and(|limit| outcome.passes >= limit) {
                return outcome;
            }

            outcome.merged = outcome
                .merged
                .saturating_add(store.apply_replacement(&mut replacement));
            outcome.passes = outcome.passes.saturating_add(1);
        }
    }

    /// Whether the store already satisfies functionality and injectivity.
    #[must_use]
    pub fn is_closed(store: &EdgeStore) -> bool {
        Self::scan(store).is_empty()
    }
}

// =============================================================================
// TESTS
// =============================================================================
