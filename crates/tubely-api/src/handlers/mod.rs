pub mod health;
pub mod thumbnail_upload;
pub mod video_upload;
pub mod videos;

use tubely_core::AppError;
use uuid::Uuid;

/// Parse the `{videoID}` path segment.
pub(crate) fn parse_video_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| AppError::InvalidIdentifier(format!("Invalid video ID: {}", raw)))
}
