//! Error types for the core domain.

use thiserror::Error;

/// Core domain error type.
#[derive(Debug, Error)]
pub enum Error {
    /// A column path collides with a path already written in the same row.
    #[error("key path conflict in column '{key}' at segment '{segment}'")]
    KeyPathConflict { key: String, segment: String },

    /// Ingestion was stopped by its caller before the input was consumed.
    #[error("ingestion cancelled")]
    Cancelled,

    #[error("csv parse error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, Error>;
