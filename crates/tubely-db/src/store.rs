//! Record store abstraction
//!
//! Handlers and the upload pipeline only see this trait, so tests can swap in
//! any implementation.

use async_trait::async_trait;
use tubely_core::{AppError, Video};
use uuid::Uuid;

#[async_trait]
pub trait VideoStore: Send + Sync {
    /// Insert a new record.
    async fn create_video(&self, video: &Video) -> Result<(), AppError>;

    /// Fetch a record by id, `None` when it does not exist.
    async fn get_video(&self, id: Uuid) -> Result<Option<Video>, AppError>;

    /// All records owned by `user_id`, newest first.
    async fn list_videos_for_user(&self, user_id: Uuid) -> Result<Vec<Video>, AppError>;

    /// Persist `thumbnail_url`, `video_url` and `updated_at` of an existing record.
    ///
    /// Fails with [`AppError::PersistenceError`] when no row was updated.
    async fn update_locators(&self, video: &Video) -> Result<(), AppError>;

    /// Cheap round trip used by the health check.
    async fn ping(&self) -> Result<(), AppError>;
}
