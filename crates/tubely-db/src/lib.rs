//! Tubely Database Layer
//!
//! The record store for videos: a narrow [`VideoStore`] trait and its SQLite
//! implementation.

pub mod db;
pub mod store;

pub use db::{run_migrations, VideoRepository, MIGRATOR};
pub use store::VideoStore;
