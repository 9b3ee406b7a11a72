//! Thumbnail and video upload pipeline
//!
//! Both flows share the same front half: look up the record, check the caller
//! owns it, then pull the named file part out of the multipart body and check
//! its size and content type. The body is not touched before the ownership
//! check, and nothing is written to storage until every check passed.
//!
//! Video bodies are spooled to a private scratch directory, probed, optionally
//! rewritten for fast start, and streamed to storage from disk. The scratch
//! directory is a [`TempDir`], so it is removed on every exit path.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::extract::multipart::{Field, MultipartRejection};
use axum::extract::Multipart;
use bytes::Bytes;
use chrono::Utc;
use tempfile::TempDir;
use tokio::io::AsyncWriteExt;
use tubely_core::{AppError, Config, Video};
use tubely_db::VideoStore;
use tubely_processing::{FastStartRewriter, MediaProbe};
use tubely_storage::keys::THUMBNAIL_PREFIX;
use tubely_storage::{extension_for_content_type, random_asset_key, Storage};
use uuid::Uuid;

use crate::constants::{THUMBNAIL_FIELD, VIDEO_FIELD};
use crate::error::multipart_error;
use crate::services::RecordLinker;

const SCRATCH_PREFIX: &str = "tubely-upload-";
const SCRATCH_FILE: &str = "video.mp4";

#[derive(Clone)]
pub struct UploadPipeline {
    videos: Arc<dyn VideoStore>,
    storage: Arc<dyn Storage>,
    probe: Arc<dyn MediaProbe>,
    rewriter: Option<Arc<dyn FastStartRewriter>>,
    linker: RecordLinker,
    config: Config,
}

impl UploadPipeline {
    pub fn new(
        videos: Arc<dyn VideoStore>,
        storage: Arc<dyn Storage>,
        probe: Arc<dyn MediaProbe>,
        rewriter: Option<Arc<dyn FastStartRewriter>>,
        linker: RecordLinker,
        config: Config,
    ) -> Self {
        Self {
            videos,
            storage,
            probe,
            rewriter,
            linker,
            config,
        }
    }

    /// Load the record and make sure `user_id` may modify it.
    pub async fn authorize(&self, video_id: Uuid, user_id: Uuid) -> Result<Video, AppError> {
        let video = self
            .videos
            .get_video(video_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Couldn't find video".to_string()))?;

        if !video.is_owned_by(user_id) {
            tracing::warn!(
                video_id = %video_id,
                user_id = %user_id,
                "Upload attempted by non-owner"
            );
            return Err(AppError::Forbidden(
                "You are not the owner of this video".to_string(),
            ));
        }

        Ok(video)
    }

    #[tracing::instrument(skip(self, multipart), fields(video_id = %video_id, user_id = %user_id))]
    pub async fn upload_thumbnail(
        &self,
        video_id: Uuid,
        user_id: Uuid,
        multipart: Result<Multipart, MultipartRejection>,
    ) -> Result<Video, AppError> {
        let mut video = self.authorize(video_id, user_id).await?;
        let mut multipart = multipart.map_err(rejected_form)?;

        let (declared, data) = read_thumbnail_part(&mut multipart).await?;
        let max = self.config.max_thumbnail_size_bytes();
        if data.len() > max {
            return Err(AppError::PayloadTooLarge(format!(
                "Thumbnail exceeds the {} byte limit",
                max
            )));
        }

        let content_type = check_content_type(
            declared.as_deref(),
            self.config.thumbnail_allowed_content_types(),
        )?;

        let key = random_asset_key(THUMBNAIL_PREFIX, extension_for_content_type(&content_type));
        let size = data.len();
        let locator = self.storage.put(&key, &content_type, data).await?;

        tracing::info!(key = %key, size_bytes = size, content_type = %content_type, "Thumbnail stored");

        video.thumbnail_url = Some(locator);
        self.persist(&mut video, &key).await?;
        self.linker.link(video).await
    }

    #[tracing::instrument(skip(self, multipart), fields(video_id = %video_id, user_id = %user_id))]
    pub async fn upload_video(
        &self,
        video_id: Uuid,
        user_id: Uuid,
        multipart: Result<Multipart, MultipartRejection>,
    ) -> Result<Video, AppError> {
        let mut video = self.authorize(video_id, user_id).await?;
        let mut multipart = multipart.map_err(rejected_form)?;

        let (scratch, content_type, size) = self.spool_video_part(&mut multipart).await?;
        drop(multipart);
        let spooled = scratch.path().join(SCRATCH_FILE);

        tracing::debug!(size_bytes = size, path = %spooled.display(), "Video spooled to scratch");

        // `scratch` must outlive the upload below.
        let locator = self.publish_video(&spooled, &content_type).await?;

        video.video_url = Some(locator.locator);
        self.persist(&mut video, &locator.key).await?;
        self.linker.link(video).await
    }

    /// Find the video part, check its content type, and copy it into a fresh
    /// scratch directory. The rest of the form is read too, so the body limit
    /// applies to all of it.
    async fn spool_video_part(
        &self,
        multipart: &mut Multipart,
    ) -> Result<(TempDir, String, usize), AppError> {
        let mut spooled = None;
        while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
            if spooled.is_some() || field.name() != Some(VIDEO_FIELD) {
                continue;
            }

            let content_type = check_content_type(
                field.content_type(),
                self.config.video_allowed_content_types(),
            )?;

            let scratch = tempfile::Builder::new()
                .prefix(SCRATCH_PREFIX)
                .tempdir_in(self.config.scratch_dir())
                .map_err(|e| {
                    AppError::Internal(format!("Couldn't create scratch directory: {}", e))
                })?;

            let path = scratch.path().join(SCRATCH_FILE);
            let size = spool_field(field, &path, self.config.max_video_size_bytes()).await?;
            spooled = Some((scratch, content_type, size));
        }

        spooled.ok_or_else(|| missing_part(VIDEO_FIELD))
    }

    async fn publish_video(&self, spooled: &Path, content_type: &str) -> Result<Published, AppError> {
        let orientation = self.probe.probe_orientation(spooled).await?;

        let upload_path: PathBuf = match self.rewriter {
            Some(ref rewriter) => rewriter.rewrite(spooled).await?,
            None => spooled.to_path_buf(),
        };

        let key = random_asset_key(
            orientation.as_str(),
            extension_for_content_type(content_type),
        );

        let file = tokio::fs::File::open(&upload_path).await.map_err(|e| {
            AppError::Internal(format!("Couldn't open processed video: {}", e))
        })?;
        let locator = self
            .storage
            .put_stream(&key, content_type, Box::pin(file))
            .await?;

        tracing::info!(key = %key, orientation = %orientation, "Video stored");

        Ok(Published { key, locator })
    }

    /// Write the new locators back. The stored object is not removed if this
    /// fails.
    async fn persist(&self, video: &mut Video, key: &str) -> Result<(), AppError> {
        video.updated_at = Utc::now();
        if let Err(e) = self.videos.update_locators(video).await {
            tracing::error!(
                error = %e,
                video_id = %video.id,
                orphaned_key = %key,
                "Record update failed after publish"
            );
            return Err(e);
        }
        Ok(())
    }
}

struct Published {
    key: String,
    locator: String,
}

/// Read the whole thumbnail part along with its declared content type.
///
/// Later fields are skipped but still read, so an oversized form fails here
/// rather than after the thumbnail is published.
async fn read_thumbnail_part(
    multipart: &mut Multipart,
) -> Result<(Option<String>, Bytes), AppError> {
    let mut thumbnail = None;
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if thumbnail.is_some() || field.name() != Some(THUMBNAIL_FIELD) {
            continue;
        }

        let declared = field.content_type().map(String::from);
        let data = field.bytes().await.map_err(multipart_error)?;
        thumbnail = Some((declared, data));
    }

    thumbnail.ok_or_else(|| missing_part(THUMBNAIL_FIELD))
}

fn rejected_form(rejection: MultipartRejection) -> AppError {
    AppError::BadRequest(format!("Unable to parse form: {}", rejection.body_text()))
}

fn missing_part(name: &str) -> AppError {
    AppError::BadRequest(format!("Unable to find form file '{}'", name))
}

/// Normalise a declared content type and check it against `allowed`.
fn check_content_type(declared: Option<&str>, allowed: &[String]) -> Result<String, AppError> {
    let media_type = declared
        .and_then(|ct| ct.split(';').next())
        .map(|ct| ct.trim().to_lowercase())
        .filter(|ct| !ct.is_empty())
        .ok_or_else(|| AppError::UnsupportedMediaType("Missing Content-Type".to_string()))?;

    if !allowed.iter().any(|a| *a == media_type) {
        return Err(AppError::UnsupportedMediaType(format!(
            "Invalid file type {}, expected one of: {}",
            media_type,
            allowed.join(", ")
        )));
    }

    Ok(media_type)
}

/// Copy a file part to `path`, failing once more than `max` bytes arrive.
async fn spool_field(mut field: Field<'_>, path: &Path, max: usize) -> Result<usize, AppError> {
    let mut file = tokio::fs::File::create(path)
        .await
        .map_err(|e| AppError::Internal(format!("Couldn't create scratch file: {}", e)))?;

    let mut written = 0usize;
    while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
        written += chunk.len();
        if written > max {
            return Err(AppError::PayloadTooLarge(format!(
                "Video exceeds the {} byte limit",
                max
            )));
        }
        file.write_all(&chunk)
            .await
            .map_err(|e| AppError::Internal(format!("Couldn't write scratch file: {}", e)))?;
    }

    file.flush()
        .await
        .map_err(|e| AppError::Internal(format!("Couldn't write scratch file: {}", e)))?;

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allowed(types: &[&str]) -> Vec<String> {
        types.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_content_type_parameters_are_ignored() {
        let ct = check_content_type(
            Some("Image/PNG; charset=binary"),
            &allowed(&["image/jpeg", "image/png"]),
        )
        .unwrap();
        assert_eq!(ct, "image/png");
    }

    #[test]
    fn test_content_type_not_in_allow_list() {
        let result = check_content_type(Some("image/gif"), &allowed(&["image/jpeg", "image/png"]));
        assert!(matches!(result, Err(AppError::UnsupportedMediaType(_))));
    }

    #[test]
    fn test_missing_content_type_rejected() {
        assert!(matches!(
            check_content_type(None, &allowed(&["video/mp4"])),
            Err(AppError::UnsupportedMediaType(_))
        ));
        assert!(matches!(
            check_content_type(Some("  "), &allowed(&["video/mp4"])),
            Err(AppError::UnsupportedMediaType(_))
        ));
    }
}
