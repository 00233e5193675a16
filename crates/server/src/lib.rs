//! HTTP service for roster.
//!
//! This crate provides the upload pipeline behind `POST /upload`:
//! - Receiving the multipart CSV into a scoped temporary file
//! - Ingesting it into nested records
//! - Persisting user rows in one transaction
//! - Logging the resulting age distribution

pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;
