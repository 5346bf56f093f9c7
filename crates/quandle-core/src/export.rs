//! # Canonical Export Module
//!
//! Deterministic, bit-exact serialization of a Cayley graph. This is the
//! format renderers and regression fixtures consume: the same graph always
//! produces the same bytes.
//!
//! Format:
//! ```text
//! [header_len: u32 LE] [CanonicalHeader (postcard)] [CanonicalGraph (postcard)]
//! ```

use crate::graph::CayleyGraph;
use crate::{Edge, Generator, QuandleError, Vertex};
use serde::{Deserialize, Serialize};

// =============================================================================
// CANONICAL FORMAT
// =============================================================================

/// Magic bytes for canonical export format.
pub const CANONICAL_MAGIC: [u8; 4] = *b"QNEX";

/// Current canonical format version.
pub const CANONICAL_VERSION: u8 = 1;

/// Maximum allowed vertex count in canonical imports.
///
/// This prevents memory exhaustion from malicious or corrupted data.
pub const MAX_IMPORT_VERTEX_COUNT: u64 = 10_000_000;

/// Maximum allowed edge count in canonical imports.
pub const MAX_IMPORT_EDGE_COUNT: u64 = 100_000_000;

/// Header for canonical export files.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CanonicalHeader {
    /// Magic bytes to identify the format.
    pub magic: [u8; 4],

    /// Format version for compatibility.
    pub version: u8,

    pub vertex_count: u64,

    pub edge_count: u64,

    /// Checksum of the data section.
    pub checksum: u64,
}

impl CanonicalHeader {
    /// Create a new header with the given counts.
    #[must_use]
    pub fn new(vertex_count: u64, edge_count: u64, checksum: u64) -> Self {
        Self {
            magic: CANONICAL_MAGIC,
            version: CANONICAL_VERSION,
            vertex_count,
            edge_count,
            checksum,
        }
    }

    /// Validate the header.
    pub fn validate(&self) -> Result<(), QuandleError> {
        if self.magic != CANONICAL_MAGIC {
            return Err(QuandleError::DeserializationError(
                "Invalid file format".to_string(),
            ));
        }
        if self.version != CANONICAL_VERSION {
            return Err(QuandleError::DeserializationError(
                "Unsupported file version".to_string(),
            ));
        }
        Ok(())
    }
}

/// An edge in canonical format, sorted by `(source, target, label)`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub struct CanonicalEdge {
    pub source: u64,
    pub target: u64,
    pub label: u32,
}

impl From<Edge> for CanonicalEdge {
    fn from(edge: Edge) -> Self {
        Self {
            source: edge.source.0,
            target: edge.target.0,
            label: edge.label.0,
        }
    }
}

impl From<CanonicalEdge> for Edge {
    fn from(ce: CanonicalEdge) -> Self {
        Edge::new(Vertex(ce.source), Vertex(ce.target), Generator(ce.label))
    }
}

/// A Cayley graph in canonical format for bit-exact serialization.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CanonicalGraph {
    pub generator_count: u32,

    /// Vertex ids, ascending.
    pub vertices: Vec<u64>,

    /// Edges, sorted.
    pub edges: Vec<CanonicalEdge>,
}

impl CanonicalGraph {
    /// Create a canonical graph from a Cayley graph.
    #[must_use]
    pub fn from_graph(graph: &CayleyGraph) -> Self {
        // BTreeSet iteration is already sorted
        Self {
            generator_count: graph.generator_count(),
            vertices: graph.vertices().map(|v| v.0).collect(),
            edges: graph.edges().map(CanonicalEdge::from).collect(),
        }
    }

    /// Convert back, rejecting edges that reference unknown vertices or
    /// labels outside `1..=generator_count`.
    pub fn to_graph(&self) -> Result<CayleyGraph, QuandleError> {
        let vertices = self.vertices.iter().map(|&v| Vertex(v)).collect();
        let graph_edges = self.edges.iter().map(|&ce| Edge::from(ce)).collect();
        let graph = CayleyGraph::new(self.generator_count, vertices, graph_edges);

        for edge in graph.edges() {
            if !graph.contains_vertex(edge.source) || !graph.contains_vertex(edge.target) {
                return Err(QuandleError::DeserializationError(format!(
                    "Edge {} -> {} references an unknown vertex",
                    edge.source, edge.target
                )));
            }
            if edge.label.0 == 0 || edge.label.0 > self.generator_count {
                return Err(QuandleError::DeserializationError(format!(
                    "Edge label {} outside 1..={}",
                    edge.label, self.generator_count
                )));
            }
        }

        Ok(graph)
    }

    /// Compute a deterministic checksum of the data.
    ///
    /// XOR of rotated fields: detects accidental corruption only. It is not
    /// collision resistant; use the BLAKE3 hash (`crypto-hash` feature) for
    /// that.
    #[must_use]
    pub fn checksum(&self) -> u64 {
        let mut hash: u64 = u64::from(self.generator_count).rotate_left(3);

        for v in &self.vertices {
            hash ^= v.rotate_left(13);
        }

        for edge in &self.edges {
            hash ^= edge.source.rotate_left(17);
            hash ^= edge.target.rotate_left(11);
            hash ^= u64::from(edge.label).rotate_left(5);
        }

        hash
    }
}

// =============================================================================
// EXPORT FUNCTIONS
// =============================================================================

/// Export a graph to canonical postcard format.
///
/// # Errors
///
/// Returns `QuandleError::SerializationError` if serialization fails.
pub fn export_canonical(graph: &CayleyGraph) -> Result<Vec<u8>, QuandleError> {
    let canonical = CanonicalGraph::from_graph(graph);
    let header = CanonicalHeader::new(
        canonical.vertices.len() as u64,
        canonical.edges.len() as u64,
        canonical.checksum(),
    );

    let header_bytes = postcard::to_allocvec(&header)
        .map_err(|e| QuandleError::SerializationError(format!("Header: {}", e)))?;
    let data_bytes = postcard::to_allocvec(&canonical)
        .map_err(|e| QuandleError::SerializationError(format!("Data: {}", e)))?;

    let mut result = Vec::with_capacity(4 + header_bytes.len() + data_bytes.len());
    result.extend_from_slice(&(header_bytes.len() as u32).to_le_bytes());
    result.extend_from_slice(&header_bytes);
    result.extend_from_slice(&data_bytes);

    Ok(result)
}

/// Import a graph from canonical postcard format.
///
/// # Errors
///
/// Returns `QuandleError::DeserializationError` if the data is truncated,
/// corrupted, or exceeds the import limits.
pub fn import_canonical(data: &[u8]) -> Result<CayleyGraph, QuandleError> {
    let Some((len_bytes, rest)) = data.split_first_chunk::<4>() else {
        return Err(QuandleError::DeserializationError(
            "Data too short".to_string(),
        ));
    };
    let header_len = u32::from_le_bytes(*len_bytes) as usize;

    if rest.len() < header_len {
        return Err(QuandleError::DeserializationError(
            "Data too short for header".to_string(),
        ));
    }
    let (header_bytes, body) = rest.split_at(header_len);

    let header: CanonicalHeader = postcard::from_bytes(header_bytes)
        .map_err(|e| QuandleError::DeserializationError(format!("Header: {}", e)))?;
    header.validate()?;

    // Validate size limits BEFORE deserializing the body
    if header.vertex_count > MAX_IMPORT_VERTEX_COUNT {
        return Err(QuandleError::DeserializationError(format!(
            "Vertex count {} exceeds maximum allowed {}",
            header.vertex_count, MAX_IMPORT_VERTEX_COUNT
        )));
    }
    if header.edge_count > MAX_IMPORT_EDGE_COUNT {
        return Err(QuandleError::DeserializationError(format!(
            "Edge count {} exceeds maximum allowed {}",
            header.edge_count, MAX_IMPORT_EDGE_COUNT
        )));
    }

    let canonical: CanonicalGraph = postcard::from_bytes(body)
        .map_err(|e| QuandleError::DeserializationError(format!("Data: {}", e)))?;

    let computed = canonical.checksum();
    if computed != header.checksum {
        return Err(QuandleError::DeserializationError(format!(
            "Checksum mismatch: expected {}, got {}",
            header.checksum, computed
        )));
    }
    if canonical.vertices.len() as u64 != header.vertex_count {
        return Err(QuandleError::DeserializationError(
            "Vertex count mismatch".to_string(),
        ));
    }
    if canonical.edges.len() as u64 != header.edge_count {
        return Err(QuandleError::DeserializationError(
            "Edge count mismatch".to_string(),
        ));
    }

    canonical.to_graph()
}

/// Verify that a graph matches a canonical export.
pub fn verify_canonical(graph: &CayleyGraph, canonical_data: &[u8]) -> Result<bool, QuandleError> {
    let imported = import_canonical(canonical_data)?;
    Ok(CanonicalGraph::from_graph(graph) == CanonicalGraph::from_graph(&imported))
}

/// Compute the canonical checksum of a graph.
#[must_use]
pub fn canonical_checksum(graph: &CayleyGraph) -> u64 {
    CanonicalGraph::from_graph(graph).checksum()
}

// =============================================================================
// CRYPTOGRAPHIC HASH SUPPORT
// =============================================================================

/// BLAKE3 hash of the canonical export, as a 64-character hex string.
///
/// Only available with the `crypto-hash` feature.
#[cfg(feature = "crypto-hash")]
pub fn canonical_crypto_hash(graph: &CayleyGraph) -> Result<String, QuandleError> {
    let data = export_canonical(graph)?;
    Ok(compute_blake3_hash(&data))
}

/// BLAKE3 hash of raw bytes, as a hex string.
///
/// Only available with the `crypto-hash` feature.
#[cfg(feature = "crypto-hash")]
#[must_use]
pub fn compute_blake3_hash(data: &[u8]) -> String {
    blake3::hash(data).to_hex().to_string()
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn create_test_graph() -> CayleyGraph {
        let vertices: BTreeSet<Vertex> = [Vertex(1), Vertex(2)].into_iter().collect();
        let edges: BTreeSet<Edge> = [
            Edge::new(Vertex(1), Vertex(1), Generator(1)),
            Edge::new(Vertex(1), Vertex(1), Generator(2)),
            Edge::new(Vertex(2), Vertex(2), Generator(1)),
            Edge::new(Vertex(2), Vertex(2), Generator(2)),
        ]
        .into_iter()
        .collect();
        CayleyGraph::new(2, vertices, edges)
    }

    #[test]
    fn canonical_roundtrip() {
        let graph = create_test_graph();
        let bytes = export_canonical(&graph).expect("export");
        let imported = import_canonical(&bytes).expect("import");

        assert_eq!(imported, graph);
    }

    #[test]
    fn canonical_export_deterministic() {
        let graph = create_test_graph();
        assert_eq!(
            export_canonical(&graph).expect("export"),
            export_canonical(&graph.clone()).expect("export")
        );
    }

    #[test]
    fn verify_canonical_success() {
        let graph = create_test_graph();
        let bytes = export_canonical(&graph).expect("export");
        assert!(verify_canonical(&graph, &bytes).expect("verify"));
    }

    #[test]
    fn verify_canonical_returns_false_for_different_graphs() {
        let graph = create_test_graph();
        let bytes = export_canonical(&graph).expect("export");
        let other = graph.relabeled();
        let mut edges = other.edge_set().clone();
        edges.remove(&Edge::new(Vertex(2), Vertex(2), Generator(2)));
        let other = CayleyGraph::new(2, other.vertex_set().clone(), edges);

        assert!(!verify_canonical(&other, &bytes).expect("verify"));
    }

    #[test]
    fn checksum_changes_with_data() {
        let graph = create_test_graph();
        let smaller = CayleyGraph::new(
            2,
            [Vertex(1)].into_iter().collect(),
            [Edge::new(Vertex(1), Vertex(1), Generator(1))]
                .into_iter()
                .collect(),
        );
        assert_ne!(canonical_checksum(&graph), canonical_checksum(&smaller));
    }

    #[test]
    fn corrupted_import_empty_data() {
        assert!(import_canonical(&[]).is_err());
    }

    #[test]
    fn corrupted_import_header_length_exceeds_data() {
        let mut data = 100u32.to_le_bytes().to_vec();
        data.extend_from_slice(&[0u8; 10]);
        assert!(import_canonical(&data).is_err());
    }

    #[test]
    fn corrupted_import_invalid_magic_bytes() {
        let mut header = CanonicalHeader::new(0, 0, 0);
        header.magic = *b"XXXX";
        let header_bytes = postcard::to_allocvec(&header).expect("encode");

        let mut data = (header_bytes.len() as u32).to_le_bytes().to_vec();
        data.extend_from_slice(&header_bytes);

        let err = import_canonical(&data).expect_err("must fail");
        assert!(err.to_string().contains("Invalid file format"));
    }

    #[test]
    fn corrupted_import_checksum_mismatch() {
        let graph = create_test_graph();
        let canonical = CanonicalGraph::from_graph(&graph);
        let header = CanonicalHeader::new(2, 4, canonical.checksum() ^ 1);
        let header_bytes = postcard::to_allocvec(&header).expect("encode");
        let data_bytes = postcard::to_allocvec(&canonical).expect("encode");

        let mut data = (header_bytes.len() as u32).to_le_bytes().to_vec();
        data.extend_from_slice(&header_bytes);
        data.extend_from_slice(&data_bytes);

        let err = import_canonical(&data).expect_err("must fail");
        assert!(err.to_string().contains("Checksum mismatch"));
    }

    #[test]
    fn corrupted_import_excessive_vertex_count() {
        let header = CanonicalHeader::new(MAX_IMPORT_VERTEX_COUNT + 1, 0, 0);
        let header_bytes = postcard::to_allocvec(&header).expect("encode");

        let mut data = (header_bytes.len() as u32).to_le_bytes().to_vec();
        data.extend_from_slice(&header_bytes);

        let err = import_canonical(&data).expect_err("must fail");
        assert!(err.to_string().contains("exceeds maximum"));
    }

    #[test]
    fn dangling_edge_rejected() {
        let canonical = CanonicalGraph {
            generator_count: 1,
            vertices: vec![1],
            edges: vec![CanonicalEdge {
                source: 1,
                target: 9,
                label: 1,
            }],
        };
        assert!(canonical.to_graph().is_err());
    }

    #[test]
    fn label_out_of_range_rejected() {
        let canonical = CanonicalGraph {
            generator_count: 1,
            vertices: vec![1],
            edges: vec![CanonicalEdge {
                source: 1,
                target: 1,
                label: 2,
            }],
        };
        assert!(canonical.to_graph().is_err());
    }

    #[cfg(feature = "crypto-hash")]
    #[test]
    fn crypto_hash_is_stable_hex() {
        let graph = create_test_graph();
        let hash = canonical_crypto_hash(&graph).expect("hash");

        assert_eq!(hash.len(), 64);
        assert_eq!(hash, canonical_crypto_hash(&graph).expect("hash"));
    }
}
