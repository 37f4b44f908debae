use crate::error::HttpAppError;
use crate::services::UploadOptions;
use crate::state::AppState;
use crate::utils::multipart::collect_file_parts;
use axum::{
    extract::{Multipart, Query, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Deserialize, Default)]
pub struct UploadQuery {
    /// Target bucket for every file in the request. Defaults to the
    /// configured bucket.
    pub bucket: Option<String>,
    /// Mark objects so later downloads are served as attachments.
    #[serde(default)]
    pub force_download: bool,
}

/// Accept a multipart batch of files and return one result per file.
///
/// The response is always 200 with a JSON array in request order; per-file
/// validation and storage failures are reported inside the array, never as a
/// request-level error.
#[tracing::instrument(skip(state, multipart), fields(operation = "upload_objects"))]
pub async fn upload_objects(
    State(state): State<Arc<AppState>>,
    Query(query): Query<UploadQuery>,
    multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let uploads = collect_file_parts(multipart).await?;

    tracing::debug!(
        file_count = uploads.len(),
        bucket = ?query.bucket,
        force_download = query.force_download,
        "Processing upload batch"
    );

    let options = UploadOptions {
        bucket_override: query.bucket,
        force_download: query.force_download,
    };

    let results = state.pipeline.process(uploads, &options).await;

    Ok(Json(results))
}
