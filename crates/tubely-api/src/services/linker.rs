//! Turns stored locators into URLs a client can fetch.
//!
//! Records keep whatever locator the storage backend returned. Composite
//! `bucket,key` locators point into a private bucket and are replaced by a
//! short-lived signed URL on the way out. Everything else is passed through.

use std::sync::Arc;
use std::time::Duration;

use tubely_core::{AppError, Locator, Video};
use tubely_storage::Storage;

#[derive(Clone)]
pub struct RecordLinker {
    storage: Arc<dyn Storage>,
    expiry: Duration,
}

impl RecordLinker {
    pub fn new(storage: Arc<dyn Storage>, expiry: Duration) -> Self {
        Self { storage, expiry }
    }

    /// Return `video` with its composite locators signed.
    ///
    /// Never writes the signed URLs back to the store.
    pub async fn link(&self, mut video: Video) -> Result<Video, AppError> {
        video.video_url = self.sign(video.video_url.take()).await?;
        video.thumbnail_url = self.sign(video.thumbnail_url.take()).await?;
        Ok(video)
    }

    pub async fn link_all(&self, videos: Vec<Video>) -> Result<Vec<Video>, AppError> {
        let mut linked = Vec::with_capacity(videos.len());
        for video in videos {
            linked.push(self.link(video).await?);
        }
        Ok(linked)
    }

    async fn sign(&self, locator: Option<String>) -> Result<Option<String>, AppError> {
        let Some(raw) = locator else {
            return Ok(None);
        };

        let signed = match Locator::parse(&raw) {
            Locator::Composite { bucket, key } => Some(
                self.storage
                    .presigned_get_url(bucket, key, self.expiry)
                    .await
                    .map_err(|e| {
                        tracing::error!(error = %e, locator = %raw, "Failed to presign locator");
                        AppError::PublishError(format!("Couldn't generate presigned URL: {}", e))
                    })?,
            ),
            Locator::Direct(_) => None,
        };

        Ok(Some(signed.unwrap_or(raw)))
    }
}
