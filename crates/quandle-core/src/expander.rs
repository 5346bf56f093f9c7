//! # Presentation Expander
//!
//! Drives a whole enumeration:
//!
//! 1. Seed one vertex per generator (with a self-loop for quandles)
//! 2. Realise every initial relation, closing after each
//! 3. Apply every secondary relation at the smallest unprocessed vertex,
//!    mark it processed, forget processed ids that were merged away
//! 4. Stop when the processed set equals the live vertex set, or when the
//!    budget runs out
//!
//! The loop only terminates on its own when the presented structure is
//! finite. Progress is reported through [`ExpansionObserver`]; the core
//! itself never logs.

use crate::budget::{Budget, Exhausted, Limit};
use crate::closure::ClosureOutcome;
use crate::graph::CayleyGraph;
use crate::presentation::{Presentation, Structure};
use crate::relation::RelationApplier;
use crate::store::EdgeStore;
use crate::{Edge, QuandleError, SecondaryRelation, Vertex};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

// =============================================================================
// OBSERVER
// =============================================================================

/// Hook for progress reporting.
///
/// Implementations live in the app layer (the CLI logs through `tracing`).
/// Both methods default to doing nothing.
pub trait ExpansionObserver {
    /// Called after every vertex the outer loop finishes.
    fn vertex_processed(&mut self, _vertex: Vertex, _stats: &ExpansionStats) {}

    /// Called once when the run stops, complete or not.
    fn finished(&mut self, _outcome: &Outcome, _stats: &ExpansionStats) {}
}

/// Observer that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentObserver;

impl ExpansionObserver for SilentObserver {}

// =============================================================================
// REPORT
// =============================================================================

/// Counters of one enumeration run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpansionStats {
    /// Vertices processed by the outer loop.
    pub steps: u64,
    /// Processed vertices that are still live.
    pub processed: usize,
    pub live_vertices: usize,
    pub live_edges: usize,
    /// Largest live vertex count seen at a quiescent point.
    pub peak_vertices: usize,
    /// Largest vertex id ever allocated.
    pub allocated_vertices: u64,
    /// Merging passes over all closure runs.
    pub closure_passes: u64,
    /// Vertices removed by merges over all closure runs.
    pub merged_vertices: u64,
}

/// How an enumeration ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// The fixpoint was reached: the graph is the Cayley graph.
    Complete,
    /// A budget limit stopped the run; the graph is partial.
    Inconclusive(Exhausted),
}

/// Result of an enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpansionReport {
    pub outcome: Outcome,
    /// Final graph when complete, partial state otherwise.
    pub graph: CayleyGraph,
    pub stats: ExpansionStats,
}

impl ExpansionReport {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.outcome == Outcome::Complete
    }

    /// The graph, only if the run completed.
    #[must_use]
    pub fn into_complete(self) -> Option<CayleyGraph> {
        match self.outcome {
            Outcome::Complete => Some(self.graph),
            Outcome::Inconclusive(_) => None,
        }
    }
}

// =============================================================================
// WORKLIST
// =============================================================================

/// The set of vertices whose secondary relations have been applied.
///
/// After every step the set is intersected with the live vertex set. A
/// processed id that was merged away is forgotten, so that no id is ever
/// treated as processed unless the vertex it names right now was.
#[derive(Debug, Clone, Default)]
pub struct Worklist {
    processed: BTreeSet<Vertex>,
}

impl Worklist {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Smallest live vertex not yet processed.
    #[must_use]
    pub fn next_unprocessed(&self, store: &EdgeStore) -> Option<Vertex> {
        store.vertices().find(|v| !self.processed.contains(v))
    }

    pub fn mark(&mut self, v: Vertex) {
        self.processed.insert(v);
    }

    #[must_use]
    pub fn is_processed(&self, v: Vertex) -> bool {
        self.processed.contains(&v)
    }

    /// Drop processed ids that are no longer live.
    pub fn retain_live(&mut self, store: &EdgeStore) {
        self.processed.retain(|v| store.contains_vertex(*v));
    }

    #[must_use]
    pub fn processed_count(&self) -> usize {
        self.processed.len()
    }

    /// Whether the processed set equals the live vertex set.
    #[must_use]
    pub fn is_exhausted(&self, store: &EdgeStore) -> bool {
        self.processed.len() == store.vertex_count()
            && store.vertices().all(|v| self.processed.contains(&v))
    }
}

// =============================================================================
// EXPANDER
// =============================================================================

/// One enumeration context. Owns its edge store exclusively.
#[derive(Debug, Clone)]
pub struct Expander {
    presentation: Presentation,
    secondary: Vec<SecondaryRelation>,
    budget: Budget,
    store: EdgeStore,
    worklist: Worklist,
    stats: ExpansionStats,
}

impl Expander {
    /// Create an unbounded expander for a validated presentation.
    #[must_use]
    pub fn new(presentation: Presentation) -> Self {
        let secondary = presentation.secondary_relations();
        Self {
            presentation,
            secondary,
            budget: Budget::unbounded(),
            store: EdgeStore::new(),
            worklist: Worklist::new(),
            stats: ExpansionStats::default(),
        }
    }

    /// Bound the run.
    pub fn with_budget(mut self, budget: Budget) -> Result<Self, QuandleError> {
        budget.validate()?;
        self.budget = budget;
        Ok(self)
    }

    #[must_use]
    pub fn presentation(&self) -> &Presentation {
        &self.presentation
    }

    /// The relations applied at every vertex.
    #[must_use]
    pub fn secondary_relations(&self) -> &[SecondaryRelation] {
        &self.secondary
    }

    /// Run to the fixpoint or until the budget is exhausted.
    pub fn run(mut self, observer: &mut dyn ExpansionObserver) -> ExpansionReport {
        self.seed();

        let outcome = match self
            .realize_initial()
            .and_then(|()| self.enumerate(observer))
        {
            Ok(()) => Outcome::Complete,
            Err(exhausted) => Outcome::Inconclusive(exhausted),
        };

        // a limit can stop a step after merges but before its own cleanup
        self.worklist.retain_live(&self.store);
        self.refresh_stats();
        observer.finished(&outcome, &self.stats);

        ExpansionReport {
            outcome,
            graph: CayleyGraph::from_store(self.presentation.generator_count(), &self.store),
            stats: self.stats,
        }
    }

    fn seed(&mut self) {
        let generators: Vec<_> = self.presentation.generators().collect();
        for g in generators {
            self.store.add_vertex(g.vertex());
            if self.presentation.structure() == Structure::Quandle {
                self.store.add_edge(Edge::self_loop(g.vertex(), g));
            }
        }
        self.refresh_stats();
    }

    fn realize_initial(&mut self) -> Result<(), Exhausted> {
        let relations = self.presentation.relations().to_vec();
        for relation in &relations {
            let closure = RelationApplier::apply_initial(
                &mut self.store,
                relation,
                self.budget.max_closure_passes,
            );
            self.record(closure)?;
        }
        self.store.forget_forwarding();
        Ok(())
    }

    fn enumerate(&mut self, observer: &mut dyn ExpansionObserver) -> Result<(), Exhausted> {
        while let Some(vertex) = self.worklist.next_unprocessed(&self.store) {
            if let Some(limit) = self.budget.max_steps {
                if self.stats.steps >= limit {
                    return Err(Exhausted {
                        limit: Limit::Steps,
                        reached: self.stats.steps,
                    });
                }
            }

            self.process(vertex)?;
            self.worklist.mark(vertex);
            self.worklist.retain_live(&self.store);
            self.stats.steps = self.stats.steps.saturating_add(1);

            self.refresh_stats();
            observer.vertex_processed(vertex, &self.stats);
        }
        Ok(())
    }

    /// Apply every secondary relation at `vertex`.
    ///
    /// `vertex` may be merged into a smaller id part way through; the
    /// remaining relations are applied at its survivor.
    fn process(&mut self, vertex: Vertex) -> Result<(), Exhausted> {
        self.store.forget_forwarding();
        for index in 0..self.secondary.len() {
            let anchor = self.store.resolve(vertex);
            let closure = RelationApplier::apply_secondary(
                &mut self.store,
                &self.secondary[index],
                anchor,
                self.budget.max_closure_passes,
            );
            self.record(closure)?;
        }
        Ok(())
    }

    fn record(&mut self, closure: ClosureOutcome) -> Result<(), Exhausted> {
        self.stats.closure_passes = self.stats.closure_passes.saturating_add(closure.passes);
        self.stats.merged_vertices = self
            .stats
            .merged_vertices
            .saturating_add(closure.merged as u64);
        self.refresh_stats();

        if !closure.converged {
            return Err(Exhausted {
                limit: Limit::ClosurePasses,
                reached: closure.passes,
            });
        }
        if let Some(limit) = self.budget.max_vertices {
            if self.store.vertex_count() > limit {
                return Err(Exhausted {
                    limit: Limit::Vertices,
                    reached: self.store.vertex_count() as u64,
                });
            }
        }
        Ok(())
    }

    fn refresh_stats(&mut self) {
        self.stats.processed = self.worklist.processed_count();
        self.stats.live_vertices = self.store.vertex_count();
        self.stats.live_edges = self.store.edge_count();
        self.stats.peak_vertices = self.stats.peak_vertices.max(self.stats.live_vertices);
        self.stats.allocated_vertices = self.store.allocated();
    }
}

/// Enumerate the Cayley graph of a presentation given as flat relations,
/// without a budget.
///
/// # Errors
/// Validation errors are returned before any graph is built.
pub fn expand(
    generator_count: u32,
    relations: &[Vec<i64>],
) -> Result<ExpansionReport, QuandleError> {
    let presentation = Presentation::new(generator_count, relations)?;
    Ok(Expander::new(presentation).run(&mut SilentObserver))
}

// =============================================================================
// TESTS
// =============================================================================
