//! Record store that loses every locator update.

use async_trait::async_trait;
use tubely_core::{AppError, Video};
use tubely_db::{VideoRepository, VideoStore};
use uuid::Uuid;

pub struct FailingUpdates(pub VideoRepository);

#[async_trait]
impl VideoStore for FailingUpdates {
    async fn create_video(&self, video: &Video) -> Result<(), AppError> {
        self.0.create_video(video).await
    }

    async fn get_video(&self, id: Uuid) -> Result<Option<Video>, AppError> {
        self.0.get_video(id).await
    }

    async fn list_videos_for_user(&self, user_id: Uuid) -> Result<Vec<Video>, AppError> {
        self.0.list_videos_for_user(user_id).await
    }

    async fn update_locators(&self, _video: &Video) -> Result<(), AppError> {
        Err(AppError::PersistenceError("database is locked".to_string()))
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.0.ping().await
    }
}
