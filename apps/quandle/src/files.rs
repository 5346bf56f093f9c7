//! # File Helpers
//!
//! Path and size checks shared by every command that touches the disk.

use quandle_core::QuandleError;
use std::path::{Path, PathBuf};

// =============================================================================
// FILE SIZE LIMITS
// =============================================================================

/// Maximum size of a presentation file (1 MB).
pub const MAX_PRESENTATION_FILE_SIZE: u64 = 1024 * 1024;

/// Maximum size of an exported graph or report snapshot (500 MB).
pub const MAX_IMPORT_FILE_SIZE: u64 = 500 * 1024 * 1024;

/// Reject files larger than `max_size` before reading them.
pub fn validate_file_size(path: &Path, max_size: u64) -> Result<(), QuandleError> {
    let metadata = std::fs::metadata(path)
        .map_err(|e| QuandleError::IoError(format!("Cannot read file metadata: {}", e)))?;

    if metadata.len() > max_size {
        return Err(QuandleError::IoError(format!(
            "File size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            max_size
        )));
    }
    Ok(())
}

/// Canonicalize an input path and make sure it names a regular file.
pub fn validate_file_path(path: &Path) -> Result<PathBuf, QuandleError> {
    let canonical = path.canonicalize().map_err(|e| {
        QuandleError::IoError(format!("Invalid file path '{}': {}", path.display(), e))
    })?;

    if !canonical.is_file() {
        return Err(QuandleError::IoError(format!(
            "Path '{}' is not a regular file",
            path.display()
        )));
    }

    Ok(canonical)
}

/// Canonicalize the parent directory of an output path.
pub fn validate_output_path(path: &Path) -> Result<PathBuf, QuandleError> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let canonical_parent = parent.canonicalize().map_err(|e| {
        QuandleError::IoError(format!(
            "Invalid output directory '{}': {}",
            parent.display(),
            e
        ))
    })?;

    if !canonical_parent.is_dir() {
        return Err(QuandleError::IoError(format!(
            "Output directory '{}' is not a valid directory",
            parent.display()
        )));
    }

    let filename = path
        .file_name()
        .ok_or_else(|| QuandleError::IoError("Output path has no filename".to_string()))?;

    Ok(canonical_parent.join(filename))
}

/// Validate `path` and read it, refusing anything above `max_size`.
pub fn read_bounded(path: &Path, max_size: u64) -> Result<Vec<u8>, QuandleError> {
    let validated = validate_file_path(path)?;
    validate_file_size(&validated, max_size)?;

    std::fs::read(&validated)
        .map_err(|e| QuandleError::IoError(format!("Read file '{}': {}", path.display(), e)))
}

/// Write `data` to a validated output path.
pub fn write_output(path: &Path, data: &[u8]) -> Result<PathBuf, QuandleError> {
    let validated = validate_output_path(path)?;
    std::fs::write(&validated, data)
        .map_err(|e| QuandleError::IoError(format!("Write file '{}': {}", path.display(), e)))?;
    Ok(validated)
}
