//! Business logic behind the HTTP handlers

pub mod linker;
pub mod upload;

pub use linker::RecordLinker;
pub use upload::UploadPipeline;
