//! # quandle-core
//!
//! Deterministic Cayley graph enumeration for finitely presented quandles
//! and racks.
//!
//! Given generators and relations, the engine grows a directed labeled
//! graph whose vertices become the elements of the presented structure and
//! whose edges `x -g-> x^g` record the action of each generator. Growth is
//! driven by relation chains laid at every vertex; an online congruence
//! closure merges vertices until every generator acts as a bijection.
//!
//! ## Constraints
//!
//! - Deterministic: `BTreeMap`/`BTreeSet` only, smallest id first everywhere
//! - No logging, no I/O: progress goes through [`ExpansionObserver`]
//! - No async, no network dependencies (pure Rust)

// =============================================================================
// MODULES
// =============================================================================

pub mod budget;
pub mod closure;
pub mod expander;
pub mod export;
pub mod formats;
pub mod graph;
pub mod presentation;
pub mod primitives;
pub mod relation;
pub mod store;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{
    Edge, Generator, InitialRelation, QuandleError, SecondaryRelation, Step, Vertex, Word,
};

// =============================================================================
// RE-EXPORTS: Enumeration Engine
// =============================================================================

pub use budget::{Budget, Exhausted, Limit};
pub use closure::{ClosureEngine, ClosureOutcome, Replacement};
pub use expander::{
    ExpansionObserver, ExpansionReport, ExpansionStats, Expander, Outcome, SilentObserver,
    Worklist, expand,
};
pub use graph::CayleyGraph;
pub use presentation::{Presentation, Structure};
pub use relation::RelationApplier;
pub use store::EdgeStore;

// =============================================================================
// RE-EXPORTS: Export and Formats
// =============================================================================

pub use export::{
    CanonicalEdge, CanonicalGraph, CanonicalHeader, canonical_checksum, export_canonical,
    import_canonical, verify_canonical,
};
#[cfg(feature = "crypto-hash")]
pub use export::{canonical_crypto_hash, compute_blake3_hash};
pub use formats::{PersistenceHeader, report_from_bytes, report_to_bytes};
