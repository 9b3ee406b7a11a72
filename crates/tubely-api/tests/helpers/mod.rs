//! Test helpers: build AppState and router for integration tests.
//!
//! Each app gets its own in-memory SQLite database, a local storage root and a
//! scratch directory, all discarded when the `TestApp` is dropped. ffprobe and
//! ffmpeg are replaced by the fakes in [`media`].

#![allow(dead_code)]

pub mod auth;
pub mod media;
pub mod store;

use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use tubely_api::setup::routes;
use tubely_api::AppState;
use tubely_core::{BaseConfig, Config, Orientation, ServiceConfig, StorageBackend, Video};
use tubely_db::{run_migrations, VideoRepository, VideoStore};
use tubely_processing::FastStartRewriter;
use tubely_storage::LocalStorage;
use uuid::Uuid;

use media::{CopyingRewriter, FailingRewriter, FakeProbe};
use store::FailingUpdates;

pub const ASSETS_BASE_URL: &str = "http://localhost:8091/assets";

/// Test application: server, pool, and owned resources.
pub struct TestApp {
    pub server: TestServer,
    pub pool: SqlitePool,
    pub probe: Arc<FakeProbe>,
    pub storage_dir: TempDir,
    pub scratch_dir: TempDir,
}

/// Knobs for [`setup_test_app_with`].
pub struct TestOptions {
    pub probe: FakeProbe,
    pub faststart: bool,
    /// The fast-start rewrite fails instead of copying.
    pub rewrite_fails: bool,
    /// Locator updates fail after the object is published.
    pub updates_fail: bool,
    pub max_thumbnail_size_bytes: usize,
    pub max_video_size_bytes: usize,
}

impl Default for TestOptions {
    fn default() -> Self {
        Self {
            probe: FakeProbe::returning(Orientation::Landscape),
            faststart: true,
            rewrite_fails: false,
            updates_fail: false,
            max_thumbnail_size_bytes: 10 << 20,
            max_video_size_bytes: 1 << 20,
        }
    }
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    /// Insert a record owned by `owner` directly through the repository.
    pub async fn seed_video(&self, owner: Uuid) -> Video {
        let video = Video::new(owner, "Boots on the ground".to_string(), None);
        VideoRepository::new(self.pool.clone())
            .create_video(&video)
            .await
            .expect("Failed to seed video");
        video
    }

    pub async fn stored_video(&self, id: Uuid) -> Video {
        VideoRepository::new(self.pool.clone())
            .get_video(id)
            .await
            .expect("Failed to load video")
            .expect("Video missing")
    }

    /// Files left in the scratch directory, recursively.
    pub fn scratch_entries(&self) -> Vec<PathBuf> {
        list_files(self.scratch_dir.path())
    }

    /// Files published to local storage, recursively.
    pub fn stored_files(&self) -> Vec<PathBuf> {
        list_files(self.storage_dir.path())
    }

    /// Path on disk behind a local-storage locator.
    pub fn path_for_locator(&self, locator: &str) -> PathBuf {
        let key = locator
            .strip_prefix(ASSETS_BASE_URL)
            .and_then(|k| k.strip_prefix('/'))
            .expect("Locator is not a local asset URL");
        self.storage_dir.path().join(key)
    }
}

pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(TestOptions::default()).await
}

pub async fn setup_test_app_with(options: TestOptions) -> TestApp {
    let storage_dir = TempDir::new().expect("Failed to create storage dir");
    let scratch_dir = TempDir::new().expect("Failed to create scratch dir");

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory database");
    run_migrations(&pool)
        .await
        .expect("Failed to run migrations");

    let config = Config::new(ServiceConfig {
        base: BaseConfig {
            server_port: 8091,
            cors_origins: vec!["*".to_string()],
            db_max_connections: 1,
            jwt_secret: auth::TEST_JWT_SECRET.to_string(),
            environment: "test".to_string(),
        },
        database_url: "sqlite::memory:".to_string(),
        storage_backend: StorageBackend::Local,
        s3_bucket: None,
        s3_region: None,
        s3_endpoint: None,
        s3_public_base_url: None,
        local_storage_path: Some(storage_dir.path().to_string_lossy().into_owned()),
        local_storage_base_url: Some(ASSETS_BASE_URL.to_string()),
        ffprobe_path: "ffprobe".to_string(),
        ffmpeg_path: "ffmpeg".to_string(),
        faststart_enabled: options.faststart,
        max_thumbnail_size_bytes: options.max_thumbnail_size_bytes,
        max_video_size_bytes: options.max_video_size_bytes,
        thumbnail_allowed_content_types: vec!["image/jpeg".into(), "image/png".into()],
        video_allowed_content_types: vec!["video/mp4".into()],
        scratch_dir: scratch_dir.path().to_path_buf(),
        presign_expiry_secs: 3600,
    });

    let storage = LocalStorage::new(storage_dir.path(), ASSETS_BASE_URL.to_string())
        .await
        .expect("Failed to create local storage");

    let probe = Arc::new(options.probe);
    let rewriter: Option<Arc<dyn FastStartRewriter>> =
        match (options.faststart, options.rewrite_fails) {
            (false, _) => None,
            (true, false) => Some(Arc::new(CopyingRewriter)),
            (true, true) => Some(Arc::new(FailingRewriter)),
        };

    let repository = VideoRepository::new(pool.clone());
    let videos: Arc<dyn VideoStore> = if options.updates_fail {
        Arc::new(FailingUpdates(repository))
    } else {
        Arc::new(repository)
    };

    let state = Arc::new(AppState::new(
        config.clone(),
        videos,
        Arc::new(storage),
        probe.clone(),
        rewriter,
    ));

    let app = routes::setup_routes(&config, state).expect("Failed to build router");
    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");

    TestApp {
        server,
        pool,
        probe,
        storage_dir,
        scratch_dir,
    }
}

pub fn thumbnail_form(data: Vec<u8>, mime: &str) -> MultipartForm {
    let part = Part::bytes(data).file_name("thumb.png").mime_type(mime);
    MultipartForm::new().add_part("thumbnail", part)
}

pub fn video_form(data: Vec<u8>, mime: &str) -> MultipartForm {
    let part = Part::bytes(data).file_name("boots.mp4").mime_type(mime);
    MultipartForm::new()
        .add_text("title", "ignored")
        .add_part("video", part)
}

/// Minimal PNG signature followed by filler.
pub fn png_bytes(len: usize) -> Vec<u8> {
    let mut data = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    data.resize(len.max(data.len()), 0xAB);
    data
}

/// Bytes that look like the start of an MP4 `ftyp` box.
pub fn mp4_bytes(len: usize) -> Vec<u8> {
    let mut data = vec![
        0x00, 0x00, 0x00, 0x18, b'f', b't', b'y', b'p', b'i', b's', b'o', b'm',
    ];
    data.resize(len.max(data.len()), 0x42);
    data
}

fn list_files(root: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    let mut pending = vec![root.to_path_buf()];
    while let Some(dir) = pending.pop() {
        let Ok(entries) = std::fs::read_dir(&dir) else {
            continue;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                pending.push(path.clone());
            }
            files.push(path);
        }
    }
    files
}
