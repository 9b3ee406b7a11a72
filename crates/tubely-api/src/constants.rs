//! Route paths and upload form field names

pub const API_PREFIX: &str = "/api";

/// Where the local storage backend's directory is served from.
pub const ASSETS_PATH: &str = "/assets";

pub const THUMBNAIL_FIELD: &str = "thumbnail";
pub const VIDEO_FIELD: &str = "video";
