use crate::error::HttpAppError;
use crate::state::AppState;
use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use filedrop_core::AppError;
use filedrop_storage::keys::{object_key, validate_bucket};
use filedrop_storage::StorageResult;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Deserialize, Default)]
pub struct ObjectQuery {
    /// Bucket the object was uploaded to, when not the default.
    pub bucket: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ObjectResponse {
    pub uuid: Uuid,
    pub size: u64,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

fn resolve_key(state: &AppState, query: &ObjectQuery, id: Uuid) -> StorageResult<String> {
    let bucket = query
        .bucket
        .as_deref()
        .unwrap_or(&state.config.default_bucket);
    // Same check the write path applies; a bad bucket is a clean 400 here.
    validate_bucket(bucket)?;
    Ok(object_key(bucket, id))
}

/// Return stored metadata for one object.
#[tracing::instrument(skip(state), fields(object_id = %id, operation = "get_object"))]
pub async fn get_object(
    Path(id): Path<Uuid>,
    Query(query): Query<ObjectQuery>,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let key = resolve_key(&state, &query, id)?;
    let info = state.storage.stat(&key).await?;

    Ok(Json(ObjectResponse {
        uuid: id,
        size: info.size,
        content_type: info.content_type,
        name: info.filename,
    }))
}

/// Serve the object body with its stored content type and disposition.
#[tracing::instrument(skip(state), fields(object_id = %id, operation = "download_object"))]
pub async fn download_object(
    Path(id): Path<Uuid>,
    Query(query): Query<ObjectQuery>,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let key = resolve_key(&state, &query, id)?;

    let info = state.storage.stat(&key).await?;
    let data = state.storage.download(&key).await?;

    let mut builder = Response::builder().status(StatusCode::OK).header(
        header::CONTENT_TYPE,
        info.content_type
            .unwrap_or_else(|| "application/octet-stream".to_string()),
    );
    if let Some(disposition) = info.content_disposition {
        builder = builder.header(header::CONTENT_DISPOSITION, disposition);
    }

    let response = builder
        .body(Body::from(data))
        .map_err(|e| AppError::Internal(format!("Failed to build response: {}", e)))?;

    Ok(response)
}

/// Delete one object. Deleting an unknown object is a no-op.
#[tracing::instrument(skip(state), fields(object_id = %id, operation = "delete_object"))]
pub async fn delete_object(
    Path(id): Path<Uuid>,
    Query(query): Query<ObjectQuery>,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let key = resolve_key(&state, &query, id)?;
    state.storage.delete(&key).await?;

    Ok(StatusCode::NO_CONTENT)
}
