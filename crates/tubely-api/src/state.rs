//! Application state shared by every handler.

use std::sync::Arc;

use tubely_core::Config;
use tubely_db::VideoStore;
use tubely_processing::{FastStartRewriter, MediaProbe};
use tubely_storage::Storage;

use crate::auth::JwtValidator;
use crate::services::{RecordLinker, UploadPipeline};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub videos: Arc<dyn VideoStore>,
    pub storage: Arc<dyn Storage>,
    pub auth: JwtValidator,
    pub linker: RecordLinker,
    pub uploads: UploadPipeline,
}

impl AppState {
    /// Wire the services together. `rewriter` is `None` when fast-start
    /// rewriting is disabled.
    pub fn new(
        config: Config,
        videos: Arc<dyn VideoStore>,
        storage: Arc<dyn Storage>,
        probe: Arc<dyn MediaProbe>,
        rewriter: Option<Arc<dyn FastStartRewriter>>,
    ) -> Self {
        let auth = JwtValidator::new(config.jwt_secret());
        let linker = RecordLinker::new(storage.clone(), config.presign_expiry());
        let uploads = UploadPipeline::new(
            videos.clone(),
            storage.clone(),
            probe,
            rewriter,
            linker.clone(),
            config.clone(),
        );

        Self {
            config,
            videos,
            storage,
            auth,
            linker,
            uploads,
        }
    }
}
