//! Storage abstraction trait
//!
//! This module defines the Storage trait that all storage backends must
//! implement, and the error type shared by the backends and the writer.

use async_trait::async_trait;
use bytes::Bytes;
use filedrop_core::StorageBackend;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl StorageError {
    /// Whether a write that failed with this error is worth retrying.
    /// Malformed keys and misconfiguration never heal by themselves.
    pub fn is_retryable(&self) -> bool {
        !matches!(
            self,
            StorageError::InvalidKey(_) | StorageError::ConfigError(_) | StorageError::NotFound(_)
        )
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Attributes attached to an object at write time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObjectOptions {
    /// Declared content type of the payload.
    pub content_type: String,
    /// Original (sanitized) filename, kept as object metadata.
    pub filename: Option<String>,
    /// `Content-Disposition` value, set when the upload requested a forced
    /// download.
    pub content_disposition: Option<String>,
}

/// What `stat` reports about a stored object.
#[derive(Debug, Clone, Serialize)]
pub struct ObjectInfo {
    pub size: u64,
    pub content_type: Option<String>,
    pub filename: Option<String>,
    pub content_disposition: Option<String>,
}

/// Storage abstraction trait
///
/// All storage backends (S3, local filesystem) must implement this trait.
/// The writer and the HTTP handlers work against it without coupling to a
/// specific backend.
///
/// **Key format:** `{bucket}/{uuid}`. See the crate root documentation.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Write the full payload under `key` with the given attributes. The
    /// object is fully written and closed when this returns.
    async fn put(&self, key: &str, data: Bytes, opts: &ObjectOptions) -> StorageResult<()>;

    /// Size and attributes of a stored object.
    async fn stat(&self, key: &str) -> StorageResult<ObjectInfo>;

    /// Fetch the full payload of a stored object.
    async fn download(&self, key: &str) -> StorageResult<Vec<u8>>;

    /// Delete a stored object. Deleting an unknown key is not an error.
    async fn delete(&self, key: &str) -> StorageResult<()>;

    /// Check if an object exists.
    async fn exists(&self, key: &str) -> StorageResult<bool>;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
