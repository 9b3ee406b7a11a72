//! Orientation probe backed by ffprobe

use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;
use tokio::process::Command;
use tubely_core::Orientation;

use crate::command::{stderr_tail, validate_binary, validate_path};
use crate::traits::MediaProbe;
use crate::ProcessingError;

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeStream>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    display_aspect_ratio: Option<String>,
}

/// Classify ffprobe `-show_streams` JSON by the first stream's display
/// aspect ratio. A first stream without one is `Other`; no streams at all is
/// an error.
pub fn parse_probe_output(stdout: &[u8]) -> Result<Orientation, ProcessingError> {
    let output: ProbeOutput = serde_json::from_slice(stdout)
        .map_err(|e| ProcessingError::Probe(format!("Failed to parse ffprobe output: {}", e)))?;

    let stream = output
        .streams
        .first()
        .ok_or_else(|| ProcessingError::Probe("No streams found".to_string()))?;

    Ok(stream
        .display_aspect_ratio
        .as_deref()
        .map(Orientation::from_display_aspect_ratio)
        .unwrap_or(Orientation::Other))
}

pub struct FfprobeProbe {
    ffprobe_path: String,
}

impl FfprobeProbe {
    pub fn new(ffprobe_path: impl Into<String>) -> Result<Self, ProcessingError> {
        let ffprobe_path = ffprobe_path.into();
        validate_binary(&ffprobe_path)?;
        Ok(Self { ffprobe_path })
    }
}

#[async_trait]
impl MediaProbe for FfprobeProbe {
    #[tracing::instrument(skip(self), fields(
        process.executable.name = "ffprobe",
        process.executable.path = %self.ffprobe_path,
        ffmpeg.operation = "probe"
    ))]
    async fn probe_orientation(&self, path: &Path) -> Result<Orientation, ProcessingError> {
        let start = std::time::Instant::now();
        validate_path(path)?;

        let output = Command::new(&self.ffprobe_path)
            .args(["-v", "error", "-print_format", "json", "-show_streams"])
            .arg(path)
            .output()
            .await
            .map_err(|e| ProcessingError::Probe(format!("Failed to execute ffprobe: {}", e)))?;

        if !output.status.success() {
            return Err(ProcessingError::Probe(format!(
                "ffprobe exited with {}: {}",
                output.status,
                stderr_tail(&output.stderr)
            )));
        }

        let orientation = parse_probe_output(&output.stdout)?;

        tracing::info!(
            duration_ms = start.elapsed().as_millis(),
            orientation = %orientation,
            "Video probe completed"
        );

        Ok(orientation)
    }
}
