use thiserror::Error;
use tubely_core::AppError;

#[derive(Debug, Error)]
pub enum ProcessingError {
    #[error("ffprobe failed: {0}")]
    Probe(String),

    #[error("ffmpeg failed: {0}")]
    Transcode(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),
}

impl From<ProcessingError> for AppError {
    fn from(err: ProcessingError) -> Self {
        match err {
            ProcessingError::Probe(msg) => AppError::ProbeError(msg),
            ProcessingError::Transcode(msg) => AppError::TranscodeError(msg),
            ProcessingError::InvalidPath(msg) => AppError::Internal(msg),
        }
    }
}
