//! Error types for the invqc-core library.

use thiserror::Error;

/// Main error type for the invqc library.
///
/// Validation findings (missing fields, arithmetic mismatches, ...) are
/// never errors; they are data carried inside a [`crate::ValidationVerdict`].
/// This type covers systemic failures only.
#[derive(Error, Debug)]
pub enum QcError {
    /// The batch envelope itself is malformed (e.g. not a JSON array).
    #[error("malformed batch: {0}")]
    MalformedBatch(String),

    /// Duplicate index failure, surfaced when the caller queries the
    /// store directly rather than through the pipeline.
    #[error("duplicate index error: {0}")]
    Index(#[from] IndexError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors from a duplicate-index backend.
///
/// An unavailable index is distinct from "not a duplicate": the pipeline
/// maps it to a MANUAL_REVIEW verdict rather than guessing.
#[derive(Error, Debug, Clone)]
pub enum IndexError {
    /// The backing store could not be reached.
    #[error("duplicate index unavailable: {0}")]
    Unavailable(String),

    /// The backing store rejected the key or returned garbage.
    #[error("duplicate index backend failure: {0}")]
    Backend(String),
}

/// Result type for the invqc library.
pub type Result<T> = std::result::Result<T, QcError>;
