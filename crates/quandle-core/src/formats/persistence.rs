//! # Report Snapshot Format
//!
//! Binary serialization of a whole [`ExpansionReport`]: outcome, counters and
//! the (possibly partial) graph. The canonical export in [`crate::export`]
//! carries only a completed graph; a snapshot also keeps inconclusive runs.
//!
//! Format: Header (5 bytes) + postcard-serialized report.
//! - 4 bytes: Magic ("QNDL")
//! - 1 byte: Version
//!
//! Size and header are validated before the payload is parsed.

use crate::expander::ExpansionReport;
use crate::{QuandleError, primitives};

// =============================================================================
// LIMITS
// =============================================================================

/// Maximum accepted snapshot size.
///
/// Checked before deserialization so corrupted input cannot force a large
/// allocation.
pub const MAX_PERSISTENCE_PAYLOAD_SIZE: usize = 500 * 1024 * 1024; // 500 MB

const HEADER_SIZE: usize = 5;

// =============================================================================
// FILE HEADER
// =============================================================================

/// The header that precedes every snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersistenceHeader {
    pub magic: [u8; 4],
    pub version: u8,
}

impl PersistenceHeader {
    /// Create a header with the current format version.
    #[must_use]
    pub fn new() -> Self {
        Self {
            magic: *primitives::MAGIC_BYTES,
            version: primitives::FORMAT_VERSION,
        }
    }

    pub fn validate(&self) -> Result<(), QuandleError> {
        if &self.magic != primitives::MAGIC_BYTES {
            return Err(QuandleError::DeserializationError(
                "Invalid magic bytes".to_string(),
            ));
        }
        if self.version != primitives::FORMAT_VERSION {
            return Err(QuandleError::DeserializationError(format!(
                "Unsupported version: {} (expected {})",
                self.version,
                primitives::FORMAT_VERSION
            )));
        }
        Ok(())
    }

    #[must_use]
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let [m0, m1, m2, m3] = self.magic;
        [m0, m1, m2, m3, self.version]
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, QuandleError> {
        match bytes.first_chunk::<HEADER_SIZE>() {
            Some(&[m0, m1, m2, m3, version]) => Ok(Self {
                magic: [m0, m1, m2, m3],
                version,
            }),
            None => Err(QuandleError::DeserializationError(
                "Header too short".to_string(),
            )),
        }
    }
}

impl Default for PersistenceHeader {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// SERIALIZATION FUNCTIONS
// =============================================================================

/// Serialize a report to bytes (header + payload).
pub fn report_to_bytes(report: &ExpansionReport) -> Result<Vec<u8>, QuandleError> {
    let header = PersistenceHeader::new();
    let payload = postcard::to_stdvec(report)
        .map_err(|e| QuandleError::SerializationError(e.to_string()))?;

    let mut result = Vec::with_capacity(HEADER_SIZE + payload.len());
    result.extend_from_slice(&header.to_bytes());
    result.extend_from_slice(&payload);

    Ok(result)
}

/// Deserialize a report from bytes.
///
/// Rejects input that is too short, larger than
/// [`MAX_PERSISTENCE_PAYLOAD_SIZE`], or carries a foreign header, before
/// touching the payload.
pub fn report_from_bytes(bytes: &[u8]) -> Result<ExpansionReport, QuandleError> {
    if bytes.len() > MAX_PERSISTENCE_PAYLOAD_SIZE {
        return Err(QuandleError::DeserializationError(format!(
            "Data size {} bytes exceeds maximum allowed {} bytes",
            bytes.len(),
            MAX_PERSISTENCE_PAYLOAD_SIZE
        )));
    }

    let header = PersistenceHeader::from_bytes(bytes)?;
    header.validate()?;

    let payload = bytes.get(HEADER_SIZE..).unwrap_or_default();
    postcard::from_bytes(payload).map_err(|e| {
        QuandleError::DeserializationError(format!("Failed to deserialize report: {}", e))
    })
}

// =============================================================================
// TESTS
// =============================================================================
