//! # Budget
//!
//! Limits that bound an enumeration. A presentation of an infinite quandle
//! never reaches a fixpoint; with a budget the run stops and reports which
//! limit it hit instead of running forever.

use crate::QuandleError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Limits for one enumeration. `None` means unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Budget {
    /// Maximum number of vertices processed by the outer loop.
    pub max_steps: Option<u64>,
    /// Maximum number of live vertices at any quiescent point.
    pub max_vertices: Option<usize>,
    /// Maximum number of merging passes in a single closure run.
    pub max_closure_passes: Option<u64>,
}

impl Budget {
    /// No limits at all; behaves like the unguarded enumeration.
    #[must_use]
    pub const fn unbounded() -> Self {
        Self {
            max_steps: None,
            max_vertices: None,
            max_closure_passes: None,
        }
    }

    #[must_use]
    pub const fn with_max_steps(mut self, steps: u64) -> Self {
        self.max_steps = Some(steps);
        self
    }

    #[must_use]
    pub const fn with_max_vertices(mut self, vertices: usize) -> Self {
        self.max_vertices = Some(vertices);
        self
    }

    #[must_use]
    pub const fn with_max_closure_passes(mut self, passes: u64) -> Self {
        self.max_closure_passes = Some(passes);
        self
    }

    /// Whether no limit is set.
    #[must_use]
    pub const fn is_unbounded(&self) -> bool {
        self.max_steps.is_none() && self.max_vertices.is_none() && self.max_closure_passes.is_none()
    }

    /// Reject zero limits, which would stop every run before it starts.
    pub fn validate(&self) -> Result<(), QuandleError> {
        if self.max_steps == Some(0) {
            return Err(QuandleError::InvalidBudget(
                "max_steps must be positive".to_string(),
            ));
        }
        if self.max_vertices == Some(0) {
            return Err(QuandleError::InvalidBudget(
                "max_vertices must be positive".to_string(),
            ));
        }
        if self.max_closure_passes == Some(0) {
            return Err(QuandleError::InvalidBudget(
                "max_closure_passes must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// The limit an inconclusive run hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Limit {
    Steps,
    Vertices,
    ClosurePasses,
}

impl fmt::Display for Limit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Steps => "max_steps",
            Self::Vertices => "max_vertices",
            Self::ClosurePasses => "max_closure_passes",
        };
        f.write_str(name)
    }
}

/// Why an enumeration stopped before its fixpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exhausted {
    pub limit: Limit,
    /// Value of the limited quantity when the run stopped.
    pub reached: u64,
}

impl fmt::Display for Exhausted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} exceeded (reached {})", self.limit, self.reached)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_unbounded() {
        assert!(Budget::default().is_unbounded());
        assert_eq!(Budget::default(), Budget::unbounded());
        assert!(Budget::unbounded().validate().is_ok());
    }

    #[test]
    fn zero_limits_rejected() {
        let result = Budget::unbounded().with_max_steps(0).validate();
        assert!(matches!(result, Err(QuandleError::InvalidBudget(_))));

        let result = Budget::unbounded().with_max_vertices(0).validate();
        assert!(matches!(result, Err(QuandleError::InvalidBudget(_))));

        let result = Budget::unbounded().with_max_closure_passes(0).validate();
        assert!(matches!(result, Err(QuandleError::InvalidBudget(_))));
    }

    #[test]
    fn exhausted_display_names_limit() {
        let exhausted = Exhausted {
            limit: Limit::Vertices,
            reached: 1001,
        };
        assert_eq!(exhausted.to_string(), "max_vertices exceeded (reached 1001)");
    }
}
