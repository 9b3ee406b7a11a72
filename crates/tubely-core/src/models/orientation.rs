use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use utoipa::ToSchema;

/// Orientation of a video, derived from its display aspect ratio.
///
/// Also the storage namespace for published videos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Landscape,
    Portrait,
    Other,
}

impl Orientation {
    /// Classify an ffprobe `display_aspect_ratio` string. Only the exact
    /// ratios `16:9` and `9:16` are recognised.
    pub fn from_display_aspect_ratio(ratio: &str) -> Self {
        match ratio.trim() {
            "16:9" => Orientation::Landscape,
            "9:16" => Orientation::Portrait,
            _ => Orientation::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Orientation::Landscape => "landscape",
            Orientation::Portrait => "portrait",
            Orientation::Other => "other",
        }
    }
}

impl Display for Orientation {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}
