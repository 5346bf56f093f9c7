//! # Formats
//!
//! Byte-level formats for enumeration results. File I/O lives in the app.

pub mod persistence;

pub use persistence::{
    MAX_PERSISTENCE_PAYLOAD_SIZE, PersistenceHeader, report_from_bytes, report_to_bytes,
};
