//! Tubely API Library
//!
//! HTTP handlers, the upload pipeline, and application setup.

mod api_doc;
pub mod constants;
mod handlers;
mod middleware;
pub mod setup;
mod telemetry;

// Public modules
pub mod auth;
pub mod error;
pub mod services;
pub mod state;

// Re-exports
pub use error::{ErrorResponse, HttpAppError};
pub use services::{RecordLinker, UploadPipeline};
pub use state::AppState;
