//! Error types for the outline library.
//!
//! Classification itself never fails: an empty or heading-less document is a
//! normal outcome. Errors are reserved for malformed input records, invalid
//! configuration, and the I/O done by the batch runner.

use std::path::PathBuf;

/// Result type alias for outline library operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while assembling or classifying a document.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A text span violated its construction invariants
    #[error("Invalid text span: {0}")]
    InvalidSpan(String),

    /// Configuration values are inconsistent or out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A filter or classifier pattern failed to compile
    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding or decoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The extraction collaborator could not decode a document
    #[error("Failed to extract {path}: {reason}")]
    Extraction {
        /// Document that failed
        path: PathBuf,
        /// Reason reported by the extractor
        reason: String,
    },
}
