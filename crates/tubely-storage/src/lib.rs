//! Tubely Storage Library
//!
//! The object publisher: a [`Storage`] trait with local filesystem and S3
//! implementations. Every write returns a locator string that is stored on
//! the video record as-is.
//!
//! # Locators
//!
//! - **Local**: `{LOCAL_STORAGE_BASE_URL}/{key}`
//! - **S3**: `{bucket},{key}`, or `{S3_PUBLIC_BASE_URL}/{key}` when a public
//!   distribution is configured
//!
//! Keys must not contain `..` or a leading `/`.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
pub use keys::{extension_for_content_type, random_asset_key};
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{ByteReader, Storage, StorageError, StorageResult};
pub use tubely_core::StorageBackend;
