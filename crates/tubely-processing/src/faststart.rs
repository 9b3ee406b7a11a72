//! Fast-start rewrite backed by ffmpeg

use async_trait::async_trait;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tokio::process::Command;

use crate::command::{stderr_tail, validate_binary, validate_path};
use crate::traits::FastStartRewriter;
use crate::ProcessingError;

/// Sibling path the rewritten file is written to: `<input>.processing`.
pub fn processing_output_path(input: &Path) -> PathBuf {
    let mut name = OsString::from(input.as_os_str());
    name.push(".processing");
    PathBuf::from(name)
}

pub struct FfmpegFastStart {
    ffmpeg_path: String,
}

impl FfmpegFastStart {
    pub fn new(ffmpeg_path: impl Into<String>) -> Result<Self, ProcessingError> {
        let ffmpeg_path = ffmpeg_path.into();
        validate_binary(&ffmpeg_path)?;
        Ok(Self { ffmpeg_path })
    }
}

#[async_trait]
impl FastStartRewriter for FfmpegFastStart {
    #[tracing::instrument(skip(self), fields(
        process.executable.name = "ffmpeg",
        process.executable.path = %self.ffmpeg_path,
        ffmpeg.operation = "faststart"
    ))]
    async fn rewrite(&self, path: &Path) -> Result<PathBuf, ProcessingError> {
        let start = std::time::Instant::now();
        validate_path(path)?;
        let output_path = processing_output_path(path);

        let output = Command::new(&self.ffmpeg_path)
            .args(["-y", "-v", "error", "-i"])
            .arg(path)
            .args(["-c", "copy", "-movflags", "faststart", "-f", "mp4"])
            .arg(&output_path)
            .output()
            .await
            .map_err(|e| ProcessingError::Transcode(format!("Failed to execute ffmpeg: {}", e)))?;

        if !output.status.success() {
            return Err(ProcessingError::Transcode(format!(
                "ffmpeg exited with {}: {}",
                output.status,
                stderr_tail(&output.stderr)
            )));
        }

        tracing::info!(
            duration_ms = start.elapsed().as_millis(),
            output = %output_path.display(),
            "Fast-start rewrite completed"
        );

        Ok(output_path)
    }
}
