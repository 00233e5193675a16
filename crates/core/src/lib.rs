//! Core domain types and shared logic for roster.
//!
//! This crate defines the data flow of one upload, independent of HTTP and
//! of the database:
//! - Configuration shared by the store and the server
//! - Dotted column paths expanded into nested records
//! - CSV ingestion
//! - Splitting records into user rows
//! - Age buckets and percentage distribution

pub mod config;
pub mod distribution;
pub mod error;
pub mod ingest;
pub mod record;
pub mod user;

pub use distribution::{AgeBucket, DistributionEntry, summarize};
pub use error::{Error, Result};
pub use ingest::{read_csv_file, read_csv_file_cancellable, read_records, read_records_cancellable};
pub use record::{NestedRecord, expand_row, flatten_record};
pub use user::UserRecord;
