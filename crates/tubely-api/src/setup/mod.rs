//! Application setup and initialization

pub mod database;
pub mod routes;
pub mod server;
pub mod storage;

use std::sync::Arc;

use anyhow::{Context, Result};
use tubely_core::Config;
use tubely_db::VideoRepository;
use tubely_processing::{FastStartRewriter, FfmpegFastStart, FfprobeProbe, MediaProbe};

use crate::state::AppState;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    crate::telemetry::init_telemetry(config.is_production());

    tracing::info!("Configuration loaded and validated successfully");

    let pool = database::setup_database(&config).await?;
    let storage = storage::setup_storage(&config).await?;

    let probe: Arc<dyn MediaProbe> = Arc::new(
        FfprobeProbe::new(config.ffprobe_path()).context("Invalid FFPROBE_PATH")?,
    );
    let rewriter: Option<Arc<dyn FastStartRewriter>> = if config.faststart_enabled() {
        Some(Arc::new(
            FfmpegFastStart::new(config.ffmpeg_path()).context("Invalid FFMPEG_PATH")?,
        ))
    } else {
        tracing::warn!("Fast-start rewriting disabled, videos are published as uploaded");
        None
    };

    tokio::fs::create_dir_all(config.scratch_dir())
        .await
        .with_context(|| {
            format!(
                "Failed to create scratch directory {}",
                config.scratch_dir().display()
            )
        })?;

    let state = Arc::new(AppState::new(
        config.clone(),
        Arc::new(VideoRepository::new(pool)),
        storage,
        probe,
        rewriter,
    ));

    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
