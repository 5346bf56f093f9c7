//! # Innate Primitives
//!
//! Hardcoded constants of the enumeration engine and its file formats.
//! These are compiled into the binary and are immutable at runtime.

/// Magic bytes for the report snapshot header.
///
/// - File Header = Magic Bytes ("QNDL") + Version (u8) before payload.
pub const MAGIC_BYTES: &[u8; 4] = b"QNDL";

/// Current report snapshot format version.
///
/// Increment this when making breaking changes to the serialization format.
pub const FORMAT_VERSION: u8 = 1;

/// Default order of each generator.
///
/// Order 2 derives the secondary relation `x^{gg} = x` for every generator,
/// i.e. involutory quandles.
pub const DEFAULT_ORDER: u32 = 2;

/// Number of processed vertices between two progress reports.
pub const PROGRESS_INTERVAL: u64 = 50;

// =============================================================================
// INPUT VALIDATION LIMITS
// =============================================================================

/// Maximum number of generators in a presentation.
pub const MAX_GENERATORS: u32 = 4096;

/// Maximum number of steps in one relation word.
pub const MAX_WORD_LENGTH: usize = 10_000;

/// Maximum number of relations in one presentation.
pub const MAX_RELATIONS: usize = 10_000;

/// Maximum generator order.
pub const MAX_ORDER: u32 = 64;
