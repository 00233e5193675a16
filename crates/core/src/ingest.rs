//! CSV ingestion into nested records.

use crate::error::{Error, Result};
use crate::record::{NestedRecord, expand_row};
use csv::{ReaderBuilder, Trim};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

/// Read every data row of a CSV document into nested records.
///
/// The first line is the header of dotted column paths. Fields are trimmed,
/// rows must match the header width, and the whole input is consumed before
/// returning. Any read or parse error aborts ingestion without a partial
/// result.
pub fn read_records<R: Read>(input: R) -> Result<Vec<NestedRecord>> {
    read_records_cancellable(input, &AtomicBool::new(false))
}

/// [`read_records`] that stops with [`Error::Cancelled`] once `cancel` is
/// set. The flag is checked before each row.
pub fn read_records_cancellable<R: Read>(
    input: R,
    cancel: &AtomicBool,
) -> Result<Vec<NestedRecord>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(input);

    let headers = reader.headers()?.clone();
    tracing::debug!(columns = headers.len(), "Read CSV header");

    let mut records = Vec::new();
    for row in reader.records() {
        if cancel.load(Ordering::Relaxed) {
            tracing::debug!(rows = records.len(), "CSV ingestion cancelled");
            return Err(Error::Cancelled);
        }
        let row = row?;
        let record = expand_row(headers.iter().zip(row.iter()))?;
        records.push(record);
    }

    tracing::debug!(rows = records.len(), "Parsed CSV rows");
    Ok(records)
}

/// Open `path` and ingest it with [`read_records`].
///
/// The caller owns the file; it is neither moved nor deleted here.
pub fn read_csv_file(path: &Path) -> Result<Vec<NestedRecord>> {
    read_csv_file_cancellable(path, &AtomicBool::new(false))
}

/// Open `path` and ingest it with [`read_records_cancellable`].
pub fn read_csv_file_cancellable(path: &Path, cancel: &AtomicBool) -> Result<Vec<NestedRecord>> {
    let file = File::open(path)?;
    read_records_cancellable(file, cancel)
}
