//! Seams for the external media tools

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tubely_core::Orientation;

use crate::ProcessingError;

/// Reads stream metadata from a local, fully written media file.
#[async_trait]
pub trait MediaProbe: Send + Sync {
    async fn probe_orientation(&self, path: &Path) -> Result<Orientation, ProcessingError>;
}

/// Produces a fast-start copy of a local MP4 next to the input. The input is
/// never modified.
#[async_trait]
pub trait FastStartRewriter: Send + Sync {
    async fn rewrite(&self, path: &Path) -> Result<PathBuf, ProcessingError>;
}
