//! # Progress Logging
//!
//! [`ExpansionObserver`] implementation that reports through `tracing`.

use quandle_core::primitives::PROGRESS_INTERVAL;
use quandle_core::{ExpansionObserver, ExpansionStats, Outcome, Vertex};

/// Logs a progress line every `interval` processed vertices at `info`, and
/// every vertex at `debug`.
#[derive(Debug, Clone)]
pub struct TracingObserver {
    interval: u64,
    reports: u64,
}

impl TracingObserver {
    #[must_use]
    pub fn new() -> Self {
        Self::with_interval(PROGRESS_INTERVAL)
    }

    /// A zero interval is treated as 1.
    #[must_use]
    pub fn with_interval(interval: u64) -> Self {
        Self {
            interval: interval.max(1),
            reports: 0,
        }
    }

    /// Number of `info` progress lines emitted so far.
    #[must_use]
    pub fn reports(&self) -> u64 {
        self.reports
    }
}

impl Default for TracingObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl ExpansionObserver for TracingObserver {
    fn vertex_processed(&mut self, vertex: Vertex, stats: &ExpansionStats) {
        tracing::debug!(
            vertex = vertex.0,
            live_vertices = stats.live_vertices,
            live_edges = stats.live_edges,
            "processed vertex"
        );

        if stats.steps % self.interval == 0 {
            self.reports += 1;
            tracing::info!(
                steps = stats.steps,
                processed = stats.processed,
                live_vertices = stats.live_vertices,
                live_edges = stats.live_edges,
                allocated = stats.allocated_vertices,
                "enumeration progress"
            );
        }
    }

    fn finished(&mut self, outcome: &Outcome, stats: &ExpansionStats) {
        match outcome {
            Outcome::Complete => tracing::info!(
                steps = stats.steps,
                vertices = stats.live_vertices,
                edges = stats.live_edges,
                "enumeration complete"
            ),
            Outcome::Inconclusive(exhausted) => tracing::warn!(
                steps = stats.steps,
                vertices = stats.live_vertices,
                edges = stats.live_edges,
                "enumeration inconclusive: {}",
                exhausted
            ),
        }
    }
}
