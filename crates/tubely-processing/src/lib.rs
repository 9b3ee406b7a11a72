//! Tubely media processing
//!
//! Thin wrappers around the external media tools. `ffprobe` classifies a
//! video's orientation and `ffmpeg` moves the MP4 index to the front of the
//! file. Both sit behind traits so callers can substitute fakes.

pub mod command;
pub mod error;
pub mod faststart;
pub mod probe;
pub mod traits;

pub use error::ProcessingError;
pub use faststart::{processing_output_path, FfmpegFastStart};
pub use probe::{parse_probe_output, FfprobeProbe};
pub use traits::{FastStartRewriter, MediaProbe};
