//! Storage key generation.
//!
//! Published objects get `{prefix}/{random}{ext}` keys where `random` is 32
//! bytes from the thread-local CSPRNG, URL-safe base64 without padding.
//! Prefixes are `thumbnails` for thumbnails and the orientation for videos.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use rand::RngCore;

pub const THUMBNAIL_PREFIX: &str = "thumbnails";

/// Generate a fresh key under `prefix`. `extension` includes the leading dot.
pub fn random_asset_key(prefix: &str, extension: &str) -> String {
    let mut bytes = [0u8; 32];
    rand::rng().fill_bytes(&mut bytes);
    format!("{}/{}{}", prefix, URL_SAFE_NO_PAD.encode(bytes), extension)
}

/// File extension for an allowed upload content type.
pub fn extension_for_content_type(content_type: &str) -> &'static str {
    match content_type {
        "image/jpeg" => ".jpg",
        "image/png" => ".png",
        "video/mp4" => ".mp4",
        _ => ".bin",
    }
}
