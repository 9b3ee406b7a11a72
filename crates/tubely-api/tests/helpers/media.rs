//! Stand-ins for ffprobe and ffmpeg.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tubely_core::Orientation;
use tubely_processing::{processing_output_path, FastStartRewriter, MediaProbe, ProcessingError};

/// Reports a fixed orientation, or fails like a corrupt file would.
pub struct FakeProbe {
    outcome: Option<Orientation>,
    seen: Mutex<Vec<PathBuf>>,
}

impl FakeProbe {
    pub fn returning(orientation: Orientation) -> Self {
        Self {
            outcome: Some(orientation),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            outcome: None,
            seen: Mutex::new(Vec::new()),
        }
    }

    /// Paths the probe was asked to inspect.
    pub fn seen(&self) -> Vec<PathBuf> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl MediaProbe for FakeProbe {
    async fn probe_orientation(&self, path: &Path) -> Result<Orientation, ProcessingError> {
        self.seen.lock().unwrap().push(path.to_path_buf());
        assert!(path.exists(), "probe ran on a missing file");
        self.outcome
            .ok_or_else(|| ProcessingError::Probe("moov atom not found".to_string()))
    }
}

/// Writes an unchanged copy where ffmpeg would put the fast-start file.
pub struct CopyingRewriter;

#[async_trait]
impl FastStartRewriter for CopyingRewriter {
    async fn rewrite(&self, path: &Path) -> Result<PathBuf, ProcessingError> {
        let output = processing_output_path(path);
        tokio::fs::copy(path, &output)
            .await
            .map_err(|e| ProcessingError::Transcode(e.to_string()))?;
        Ok(output)
    }
}

/// Leaves a partial output behind and fails, like ffmpeg on a broken file.
pub struct FailingRewriter;

#[async_trait]
impl FastStartRewriter for FailingRewriter {
    async fn rewrite(&self, path: &Path) -> Result<PathBuf, ProcessingError> {
        tokio::fs::write(processing_output_path(path), b"partial")
            .await
            .map_err(|e| ProcessingError::Transcode(e.to_string()))?;
        Err(ProcessingError::Transcode(
            "ffmpeg exited with status 1: Invalid data found when processing input".to_string(),
        ))
    }
}
