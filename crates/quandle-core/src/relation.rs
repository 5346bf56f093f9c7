//! # Relation Applier
//!
//! Lays down the chain of edges that realises one relation word, then runs
//! the closure engine once so the new chain is folded into the existing
//! graph.

use crate::closure::{ClosureEngine, ClosureOutcome};
use crate::store::EdgeStore;
use crate::{InitialRelation, SecondaryRelation, Vertex, Word};

/// The RelationApplier realises relation words on an edge store.
pub struct RelationApplier;

impl RelationApplier {
    /// Lay the chain `start -w1-> v1 -w2-> ... -wk-> end` without closing.
    ///
    /// Every step except the last gets a fresh interior vertex; the last step
    /// connects to `end`. Backward steps add the edge in reverse. A one-step
    /// word is a single edge between `start` and `end`.
    ///
    /// Returns the number of edges laid.
    pub fn lay_chain(store: &mut EdgeStore, start: Vertex, word: &Word, end: Vertex) -> usize {
        let Some((last, interior)) = word.steps().split_last() else {
            return 0;
        };

        let mut current = start;
        for step in interior {
            let next = store.allocate_vertex();
            store.add_edge(step.edge(current, next));
            current = next;
        }
        store.add_edge(last.edge(current, end));

        word.len()
    }

    /// Realise `start^word = end` and close.
    pub fn apply_initial(
        store: &mut EdgeStore,
        relation: &InitialRelation,
        max_passes: Option<u64>,
    ) -> ClosureOutcome {
        Self::lay_chain(store, relation.start, &relation.word, relation.end);
        ClosureEngine::close(store, max_passes)
    }

    /// Realise `anchor^word = anchor` and close.
    pub fn apply_secondary(
        store: &mut EdgeStore,
        relation: &SecondaryRelation,
        anchor: Vertex,
        max_passes: Option<u64>,
    ) -> ClosureOutcome {
        Self::lay_chain(store, anchor, &relation.word, anchor);
        ClosureEngine::close(store, max_passes)
    }
}

// =============================================================================
// TESTS
// =============================================================================
