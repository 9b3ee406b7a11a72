//! SQLite repositories

pub mod video;

pub use video::VideoRepository;

use sqlx::migrate::Migrator;
use sqlx::SqlitePool;
use tubely_core::AppError;

/// Workspace migrations, embedded at compile time.
pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// Apply pending migrations.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), AppError> {
    MIGRATOR
        .run(pool)
        .await
        .map_err(|e| AppError::PersistenceError(format!("Failed to run migrations: {}", e)))
}
