//! Error types for source file I/O.
//!
//! Follows ODF-REP: Library crates use `thiserror` for explicit error enums.

use std::path::PathBuf;

use thiserror::Error;

/// Error types for reading and rewriting source files.
#[derive(Error, Debug)]
pub enum IoError {
    /// File does not exist or its metadata is unreadable.
    #[error("File not found: {0}")]
    NotFound(String),

    /// File exceeds size limit.
    #[error("File too large: {0} bytes (limit: {1})")]
    TooLarge(u64, u64),

    /// File contains binary content (NULL bytes detected).
    #[error("Binary file detected")]
    BinaryFile,

    /// Writing the rewritten content failed.
    #[error("Failed to write {path}: {source}")]
    Write {
        /// Target file.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// Low-level I/O error from std::io.
    #[error("IO error: {0}")]
    System(#[from] std::io::Error),
}
