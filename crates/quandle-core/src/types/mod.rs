//! # Core Type Definitions
//!
//! This module contains the core types of the enumeration engine:
//! - Identifiers (`Vertex`, `Generator`)
//! - Words and their steps (`Step`, `Word`)
//! - Graph edges (`Edge`)
//! - Relations (`InitialRelation`, `SecondaryRelation`)
//! - Error types (`QuandleError`)
//!
//! ## Determinism Guarantees
//!
//! All types in this module:
//! - Use integer arithmetic only (no floating-point)
//! - Implement `Ord` for deterministic ordering in `BTreeMap`/`BTreeSet`

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// =============================================================================
// IDENTIFIERS
// =============================================================================

/// Identifier of an element of the quandle under construction.
///
/// Vertex ids are positive. Ids `1..=n` are the seeded generator vertices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Vertex(pub u64);

impl fmt::Display for Vertex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One generator of a presentation, in `1..=generator_count`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Generator(pub u32);

impl Generator {
    /// The vertex seeded for this generator.
    #[must_use]
    pub const fn vertex(self) -> Vertex {
        Vertex(self.0 as u64)
    }
}

impl fmt::Display for Generator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// EDGE
// =============================================================================

/// A labeled directed edge: applying `label` to `source` yields `target`.
///
/// Field order is the sort order: `(source, target, label)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub source: Vertex,
    pub target: Vertex,
    pub label: Generator,
}

impl Edge {
    /// Create a new edge.
    #[must_use]
    pub const fn new(source: Vertex, target: Vertex, label: Generator) -> Self {
        Self {
            source,
            target,
            label,
        }
    }

    /// The self-loop `(v, v, label)`.
    #[must_use]
    pub const fn self_loop(v: Vertex, label: Generator) -> Self {
        Self::new(v, v, label)
    }
}

// =============================================================================
// STEPS & WORDS
// =============================================================================

/// One signed generator application inside a word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Step {
    pub generator: Generator,
    /// Traverse the generator's edge backwards.
    pub inverse: bool,
}

impl Step {
    /// A forward application of `generator`.
    #[must_use]
    pub const fn forward(generator: Generator) -> Self {
        Self {
            generator,
            inverse: false,
        }
    }

    /// A backward application of `generator`.
    #[must_use]
    pub const fn backward(generator: Generator) -> Self {
        Self {
            generator,
            inverse: true,
        }
    }

    /// Decode the flat signed encoding. Returns `None` for zero or for
    /// magnitudes that do not fit a generator id.
    #[must_use]
    pub fn from_signed(value: i64) -> Option<Self> {
        if value == 0 {
            return None;
        }
        let generator = Generator(u32::try_from(value.unsigned_abs()).ok()?);
        Some(if value > 0 {
            Self::forward(generator)
        } else {
            Self::backward(generator)
        })
    }

    /// The flat signed encoding.
    #[must_use]
    pub fn signed(self) -> i64 {
        let magnitude = i64::from(self.generator.0);
        if self.inverse { -magnitude } else { magnitude }
    }

    /// The opposite direction.
    #[must_use]
    pub const fn reversed(self) -> Self {
        Self {
            generator: self.generator,
            inverse: !self.inverse,
        }
    }

    /// The edge realising this step from `from` to `to`.
    ///
    /// Forward steps give `(from, to, g)`, backward steps give `(to, from, g)`.
    #[must_use]
    pub const fn edge(self, from: Vertex, to: Vertex) -> Edge {
        if self.inverse {
            Edge::new(to, from, self.generator)
        } else {
            Edge::new(from, to, self.generator)
        }
    }
}

/// An ordered sequence of steps.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Word(pub Vec<Step>);

impl Word {
    /// Create a word from steps.
    #[must_use]
    pub fn new(steps: Vec<Step>) -> Self {
        Self(steps)
    }

    /// Decode a flat signed sequence. Returns `None` if any entry is invalid.
    #[must_use]
    pub fn from_signed(values: &[i64]) -> Option<Self> {
        values
            .iter()
            .map(|&v| Step::from_signed(v))
            .collect::<Option<Vec<_>>>()
            .map(Self)
    }

    /// The flat signed encoding.
    #[must_use]
    pub fn to_signed(&self) -> Vec<i64> {
        self.0.iter().map(|s| s.signed()).collect()
    }

    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// =============================================================================
// RELATIONS
// =============================================================================

/// A relation `start^word = end` between two named vertices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitialRelation {
    pub start: Vertex,
    pub word: Word,
    pub end: Vertex,
}

impl InitialRelation {
    /// Create a new initial relation.
    #[must_use]
    pub fn new(start: Vertex, word: Word, end: Vertex) -> Self {
        Self { start, word, end }
    }

    /// The flat encoding `[start, g1, ..., gk, end]`.
    #[must_use]
    pub fn to_flat(&self) -> Vec<i64> {
        let mut flat = Vec::with_capacity(self.word.len() + 2);
        flat.push(self.start.0 as i64);
        flat.extend(self.word.to_signed());
        flat.push(self.end.0 as i64);
        flat
    }
}

/// A closed word: applied at any vertex `v`, it returns to `v`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecondaryRelation {
    pub word: Word,
}

impl SecondaryRelation {
    /// Create a new secondary relation.
    #[must_use]
    pub fn new(word: Word) -> Self {
        Self { word }
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in the enumeration system.
///
/// Budget exhaustion is not an error; it is reported as an inconclusive
/// outcome alongside the partial graph.
#[derive(Debug, Error)]
pub enum QuandleError {
    /// The presentation declares no generators.
    #[error("Presentation must declare at least one generator")]
    NoGenerators,

    /// The presentation declares more generators than supported.
    #[error("Too many generators: {0} (maximum {max})", max = crate::primitives::MAX_GENERATORS)]
    TooManyGenerators(u32),

    /// The generator order is zero or above the supported maximum.
    #[error("Invalid generator order: {0}")]
    InvalidOrder(u32),

    /// The per-generator order list does not name every generator once.
    #[error("Expected {expected} generator orders, found {found}")]
    GeneratorOrderCount { expected: u32, found: usize },

    /// A relation cannot be realised on the declared generators.
    #[error("Malformed relation #{index}: {reason}")]
    MalformedRelation { index: usize, reason: String },

    /// An extra secondary relation cannot be realised.
    #[error("Malformed secondary relation #{index}: {reason}")]
    MalformedSecondary { index: usize, reason: String },

    /// A budget limit is unusable.
    #[error("Invalid budget: {0}")]
    InvalidBudget(String),

    /// Command-line or file input does not describe a run.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// A serialization error occurred.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// A deserialization error occurred.
    #[error("Deserialization error: {0}")]
    DeserializationError(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    IoError(String),
}

// =============================================================================
// TESTS
// =============================================================================
