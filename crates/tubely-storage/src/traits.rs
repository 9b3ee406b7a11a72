//! Storage abstraction trait
//!
//! This module defines the Storage trait that all storage backends must implement.

use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use std::pin::Pin;
use std::time::Duration;
use thiserror::Error;
use tokio::io::AsyncRead;
use tubely_core::AppError;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("File not found: {0}")]
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

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(key) => AppError::NotFound(format!("Object not found: {}", key)),
            other => AppError::PublishError(other.to_string()),
        }
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Reader handed to [`Storage::put_stream`]; consumed until EOF.
pub type ByteReader = Pin<Box<dyn AsyncRead + Send + Unpin>>;

/// Storage abstraction trait
///
/// Writes return the locator to record on the video. A later [`Storage::get`]
/// with the same key returns identical bytes.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Store an in-memory payload under `key`.
    async fn put(&self, key: &str, content_type: &str, data: Bytes) -> StorageResult<String>;

    /// Store everything `reader` yields under `key` without buffering the
    /// whole payload in memory.
    async fn put_stream(
        &self,
        key: &str,
        content_type: &str,
        reader: ByteReader,
    ) -> StorageResult<String>;

    /// Read back a stored object.
    async fn get(&self, key: &str) -> StorageResult<Bytes>;

    /// Signed GET URL for a `bucket,key` reference, valid for `expires_in`.
    ///
    /// Only object stores produce composite references; other backends return
    /// a `ConfigError`.
    async fn presigned_get_url(
        &self,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> StorageResult<String>;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}

/// Reject keys that could escape the storage root.
pub(crate) fn validate_key(key: &str) -> StorageResult<()> {
    if key.is_empty() || key.contains("..") || key.starts_with('/') {
        return Err(StorageError::InvalidKey(
            "Storage key contains invalid characters".to_string(),
        ));
    }
    Ok(())
}
