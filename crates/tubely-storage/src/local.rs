use crate::traits::{validate_key, ByteReader, Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Local filesystem storage implementation
#[derive(Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
    base_url: String,
}

impl LocalStorage {
    /// Create a new LocalStorage instance
    ///
    /// # Arguments
    /// * `base_path` - Root directory for file storage (e.g., "./assets")
    /// * `base_url` - Base URL the API serves that directory under
    ///   (e.g., "http://localhost:8091/assets")
    pub async fn new(base_path: impl Into<PathBuf>, base_url: String) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStorage {
            base_path,
            base_url,
        })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn key_to_path(&self, key: &str) -> StorageResult<PathBuf> {
        validate_key(key)?;
        Ok(self.base_path.join(key))
    }

    fn generate_url(&self, key: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), key)
    }

    async fn ensure_parent_dir(&self, path: &Path) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    async fn create_file(&self, path: &Path) -> StorageResult<fs::File> {
        self.ensure_parent_dir(path).await?;
        fs::File::create(path).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to create file {}: {}", path.display(), e))
        })
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn put(&self, key: &str, _content_type: &str, data: Bytes) -> StorageResult<String> {
        let path = self.key_to_path(key)?;
        let size = data.len();
        let start = std::time::Instant::now();

        let mut file = self.create_file(&path).await?;

        file.write_all(&data).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to write file {}: {}", path.display(), e))
        })?;

        file.sync_all().await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to sync file {}: {}", path.display(), e))
        })?;

        tracing::info!(
            path = %path.display(),
            key = %key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local upload successful"
        );

        Ok(self.generate_url(key))
    }

    async fn put_stream(
        &self,
        key: &str,
        _content_type: &str,
        mut reader: ByteReader,
    ) -> StorageResult<String> {
        let path = self.key_to_path(key)?;
        let start = std::time::Instant::now();

        let mut file = self.create_file(&path).await?;

        let size = tokio::io::copy(&mut reader, &mut file).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to write file {}: {}", path.display(), e))
        })?;

        file.sync_all().await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to sync file {}: {}", path.display(), e))
        })?;

        tracing::info!(
            path = %path.display(),
            key = %key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local stream upload successful"
        );

        Ok(self.generate_url(key))
    }

    async fn get(&self, key: &str) -> StorageResult<Bytes> {
        let path = self.key_to_path(key)?;
        match fs::read(&path).await {
            Ok(data) => Ok(Bytes::from(data)),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StorageError::NotFound(key.to_string())),
            Err(e) => Err(StorageError::DownloadFailed(format!(
                "Failed to read file {}: {}",
                path.display(),
                e
            ))),
        }
    }

    async fn presigned_get_url(
        &self,
        _bucket: &str,
        _key: &str,
        _expires_in: Duration,
    ) -> StorageResult<String> {
        Err(StorageError::ConfigError(
            "Presigned URLs are not supported by local storage".to_string(),
        ))
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn storage() -> (TempDir, LocalStorage) {
        let dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(dir.path(), "http://localhost:8091/assets/".to_string())
            .await
            .unwrap();
        (dir, storage)
    }

    #[tokio::test]
    async fn test_put_then_get_returns_same_bytes() {
        let (_dir, storage) = storage().await;
        let data = Bytes::from_static(b"\x89PNG\r\n\x1a\nfake");

        let url = storage
            .put("thumbnails/abc.png", "image/png", data.clone())
            .await
            .unwrap();

        assert_eq!(url, "http://localhost:8091/assets/thumbnails/abc.png");
        assert_eq!(storage.get("thumbnails/abc.png").await.unwrap(), data);
    }

    #[tokio::test]
    async fn test_put_stream_writes_everything() {
        let (dir, storage) = storage().await;
        let payload = vec![7u8; 256 * 1024];
        let reader: ByteReader = Box::pin(std::io::Cursor::new(payload.clone()));

        storage
            .put_stream("portrait/clip.mp4", "video/mp4", reader)
            .await
            .unwrap();

        let on_disk = std::fs::read(dir.path().join("portrait/clip.mp4")).unwrap();
        assert_eq!(on_disk, payload);
    }

    #[tokio::test]
    async fn test_traversal_keys_rejected() {
        let (_dir, storage) = storage().await;
        for key in ["../escape.png", "/etc/passwd", "a/../../b", ""] {
            let err = storage
                .put(key, "image/png", Bytes::from_static(b"x"))
                .await
                .unwrap_err();
            assert!(matches!(err, StorageError::InvalidKey(_)), "{key}");
        }
    }

    #[tokio::test]
    async fn test_missing_object() {
        let (_dir, storage) = storage().await;
        assert!(matches!(
            storage.get("thumbnails/none.png").await,
            Err(StorageError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_presign_unsupported() {
        let (_dir, storage) = storage().await;
        let result = storage
            .presigned_get_url("bucket", "key", Duration::from_secs(60))
            .await;
        assert!(matches!(result, Err(StorageError::ConfigError(_))));
        assert_eq!(storage.backend_type(), StorageBackend::Local);
    }
}
