//! API error types.

use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Body returned when no CSV file is attached.
pub const MISSING_FILE_MESSAGE: &str = "No file uploaded.";

/// Body returned for every server-side failure.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal Server Error";

/// API error type.
///
/// Only [`ApiError::MissingFile`] is reported to the client as such; every
/// other variant collapses to a generic 500. The detail is for logs.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("no file uploaded")]
    MissingFile,

    #[error("{stage} timed out")]
    Timeout { stage: &'static str },

    #[error("internal error: {0}")]
    Internal(String),

    #[error("ingest error: {0}")]
    Ingest(#[from] roster_core::Error),

    #[error("store error: {0}")]
    Store(#[from] roster_store::StoreError),

    #[error("multipart error: {0}")]
    Multipart(#[from] MultipartError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ApiError {
    /// Get the error code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingFile => "missing_file",
            Self::Timeout { .. } => "timeout",
            Self::Internal(_) => "internal_error",
            Self::Ingest(roster_core::Error::Cancelled) => "ingest_cancelled",
            Self::Ingest(_) => "parse_error",
            Self::Store(roster_store::StoreError::Insert { .. }) => "persistence_error",
            Self::Store(_) => "store_error",
            Self::Multipart(_) => "multipart_error",
            Self::Io(_) => "io_error",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingFile => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Plain-text body sent to the client.
    pub fn public_message(&self) -> &'static str {
        match self {
            Self::MissingFile => MISSING_FILE_MESSAGE,
            _ => INTERNAL_ERROR_MESSAGE,
        }
    }

    /// Log the error with its code; server-side failures at `error`.
    pub fn log(&self) {
        if self.status_code().is_server_error() {
            tracing::error!(code = self.code(), error = %self, "Request failed");
        } else {
            tracing::warn!(code = self.code(), error = %self, "Request rejected");
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status_code(), self.public_message()).into_response()
    }
}

/// Result type for API handlers.
pub type ApiResult<T> = std::result::Result<T, ApiError>;
