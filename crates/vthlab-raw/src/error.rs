//! Error types for rawfile ingestion.

use thiserror::Error;

/// Errors that can occur while reading a SPICE rawfile.
#[derive(Debug, Error)]
pub enum RawError {
    /// Underlying file could not be read.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Structurally invalid rawfile content.
    #[error("malformed rawfile (line {line}): {message}")]
    Malformed { line: usize, message: String },

    /// Valid rawfile using a feature this reader does not handle.
    #[error("unsupported rawfile: {0}")]
    Unsupported(String),
}

/// Result type for rawfile ingestion.
pub type Result<T> = std::result::Result<T, RawError>;
