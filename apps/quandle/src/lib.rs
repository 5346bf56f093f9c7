//! # quandle
//!
//! Library half of the `quandle` binary: presentation files, file checks,
//! progress logging and output rendering. The enumeration itself lives in
//! `quandle-core`.

pub mod config;
pub mod files;
pub mod progress;
pub mod render;
