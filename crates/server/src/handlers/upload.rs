//! CSV upload endpoint.

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use axum::Json;
use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use roster_core::{NestedRecord, UserRecord};
use roster_store::UserRepo;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tempfile::NamedTempFile;
use tokio::io::AsyncWriteExt;
use tracing::instrument;
use uuid::Uuid;

/// Multipart field carrying the CSV document.
pub const UPLOAD_FIELD: &str = "file";

/// POST /upload
///
/// Ingests the uploaded CSV, stores one user row per record and responds
/// with the ingested records. The age distribution is computed afterwards
/// and only logged.
#[instrument(skip_all, fields(upload_id = %Uuid::new_v4()))]
pub async fn upload_csv(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<Vec<NestedRecord>>> {
    let result = match multipart {
        Ok(mut multipart) => process_upload(&state, &mut multipart).await,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Request is not a multipart upload");
            Err(ApiError::MissingFile)
        }
    };

    result.map(Json).inspect_err(ApiError::log)
}

async fn process_upload(
    state: &AppState,
    multipart: &mut Multipart,
) -> ApiResult<Vec<NestedRecord>> {
    let server = &state.config.server;

    // Dropping `upload` deletes the file, so every early return below cleans up.
    let upload = receive_upload(&server.upload_dir, multipart)
        .await?
        .ok_or(ApiError::MissingFile)?;
    tracing::info!(path = %upload.path().display(), "Upload received");

    let records = ingest_upload(upload.path(), server.ingest_timeout()).await?;
    tracing::info!(rows = records.len(), "CSV ingested");

    let users: Vec<UserRecord> = records.iter().map(UserRecord::from_nested).collect();
    let inserted = tokio::time::timeout(server.persist_timeout(), state.store.insert_users(&users))
        .await
        .map_err(|_| ApiError::Timeout { stage: "persist" })??;
    tracing::info!(rows = inserted, "Users persisted");

    let distribution = roster_store::age_distribution(state.store.as_ref()).await?;
    if distribution.is_empty() {
        tracing::info!("Age distribution is empty");
    }
    for entry in &distribution {
        tracing::info!(
            bucket = %entry.bucket,
            count = entry.count,
            percentage = %entry.percentage,
            "Age distribution"
        );
    }

    if let Err(e) = upload.close() {
        tracing::warn!(error = %e, "Failed to delete uploaded file");
    }

    Ok(records)
}

/// Stream the first file field named [`UPLOAD_FIELD`] into a temporary
/// file under `upload_dir`. Returns `None` if the request carries no such
/// file.
async fn receive_upload(
    upload_dir: &Path,
    multipart: &mut Multipart,
) -> ApiResult<Option<NamedTempFile>> {
    while let Some(mut field) = multipart.next_field().await? {
        if field.name() != Some(UPLOAD_FIELD) || field.file_name().is_none() {
            continue;
        }

        tokio::fs::create_dir_all(upload_dir).await?;
        let temp = tempfile::Builder::new()
            .prefix("upload-")
            .suffix(".csv")
            .tempfile_in(upload_dir)?;

        let mut file = tokio::fs::File::from_std(temp.as_file().try_clone()?);
        let mut bytes = 0usize;
        while let Some(chunk) = field.chunk().await? {
            bytes += chunk.len();
            file.write_all(&chunk).await?;
        }
        file.flush().await?;
        tracing::debug!(bytes, "Upload written to disk");

        return Ok(Some(temp));
    }

    Ok(None)
}

/// Parse the uploaded file on a blocking worker, bounded by `timeout`.
///
/// On timeout the worker is told to stop and gives up before its next row.
async fn ingest_upload(path: &Path, timeout: Duration) -> ApiResult<Vec<NestedRecord>> {
    let path = path.to_path_buf();
    let cancel = Arc::new(AtomicBool::new(false));
    let task = {
        let cancel = Arc::clone(&cancel);
        tokio::task::spawn_blocking(move || roster_core::read_csv_file_cancellable(&path, &cancel))
    };

    match tokio::time::timeout(timeout, task).await {
        Ok(joined) => {
            let records =
                joined.map_err(|e| ApiError::Internal(format!("ingest task failed: {e}")))??;
            Ok(records)
        }
        Err(_) => {
            cancel.store(true, Ordering::Relaxed);
            Err(ApiError::Timeout { stage: "ingest" })
        }
    }
}
