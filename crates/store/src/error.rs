//! User store error types.

use thiserror::Error;

/// User store operation errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A row of a batch insert failed; the whole batch was rolled back.
    #[error("insert failed at row {row}: {source}")]
    Insert {
        row: usize,
        #[source]
        source: sqlx::Error,
    },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type for user store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;
