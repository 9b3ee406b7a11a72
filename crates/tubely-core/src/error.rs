//! Error types module
//!
//! Every failure an upload or record request can end in is a variant of
//! [`AppError`]. Each variant maps to exactly one HTTP status through
//! [`ErrorMetadata`]; the underlying cause is kept for logging and never
//! echoed to clients for sensitive variants.
//!
//! `From<sqlx::Error>` is gated behind the `sqlx` feature.

use std::io;

#[cfg(feature = "sqlx")]
use sqlx::Error as SqlxError;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for rejected requests worth noticing
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
/// This trait allows errors to self-describe their HTTP response characteristics
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "PROBE_ERROR")
    fn error_code(&self) -> &'static str;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Whether details should be hidden from clients
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Probe error: {0}")]
    ProbeError(String),

    #[error("Transcode error: {0}")]
    TranscodeError(String),

    #[error("Publish error: {0}")]
    PublishError(String),

    #[error("Persistence error: {0}")]
    PersistenceError(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error with source")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

#[cfg(feature = "sqlx")]
impl From<SqlxError> for AppError {
    fn from(err: SqlxError) -> Self {
        AppError::PersistenceError(err.to_string())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Internal(format!("IO error: {}", err))
    }
}

impl From<uuid::Error> for AppError {
    fn from(err: uuid::Error) -> Self {
        AppError::InvalidIdentifier(format!("UUID parsing error: {}", err))
    }
}

/// Static metadata for each variant: (http_status, error_code, sensitive, log_level).
fn app_error_static_metadata(err: &AppError) -> (u16, &'static str, bool, LogLevel) {
    match err {
        AppError::InvalidIdentifier(_) => (400, "INVALID_IDENTIFIER", false, LogLevel::Debug),
        AppError::Unauthenticated(_) => (401, "UNAUTHENTICATED", false, LogLevel::Debug),
        AppError::Forbidden(_) => (403, "FORBIDDEN", false, LogLevel::Warn),
        AppError::NotFound(_) => (404, "NOT_FOUND", false, LogLevel::Debug),
        AppError::BadRequest(_) => (400, "BAD_REQUEST", false, LogLevel::Debug),
        AppError::UnsupportedMediaType(_) => {
            (400, "UNSUPPORTED_MEDIA_TYPE", false, LogLevel::Debug)
        }
        AppError::PayloadTooLarge(_) => (413, "PAYLOAD_TOO_LARGE", false, LogLevel::Warn),
        AppError::ProbeError(_) => (500, "PROBE_ERROR", true, LogLevel::Error),
        AppError::TranscodeError(_) => (500, "TRANSCODE_ERROR", true, LogLevel::Error),
        AppError::PublishError(_) => (500, "PUBLISH_ERROR", true, LogLevel::Error),
        AppError::PersistenceError(_) => (500, "PERSISTENCE_ERROR", true, LogLevel::Error),
        AppError::Internal(_) | AppError::InternalWithSource { .. } => {
            (500, "INTERNAL_ERROR", true, LogLevel::Error)
        }
    }
}

impl AppError {
    /// Variant name, used as the `error_type` log field.
    pub fn error_type(&self) -> &'static str {
        match self {
            AppError::InvalidIdentifier(_) => "InvalidIdentifier",
            AppError::Unauthenticated(_) => "Unauthenticated",
            AppError::Forbidden(_) => "Forbidden",
            AppError::NotFound(_) => "NotFound",
            AppError::BadRequest(_) => "BadRequest",
            AppError::UnsupportedMediaType(_) => "UnsupportedMediaType",
            AppError::PayloadTooLarge(_) => "PayloadTooLarge",
            AppError::ProbeError(_) => "ProbeError",
            AppError::TranscodeError(_) => "TranscodeError",
            AppError::PublishError(_) => "PublishError",
            AppError::PersistenceError(_) => "PersistenceError",
            AppError::Internal(_) => "Internal",
            AppError::InternalWithSource { .. } => "InternalWithSource",
        }
    }

    /// Get detailed error information including error chain
    pub fn detailed_message(&self) -> String {
        use std::error::Error;

        let mut details = self.to_string();

        let mut source = self.source();
        let mut depth = 0;
        while let Some(err) = source {
            depth += 1;
            if depth > 5 {
                details.push_str("\n  ... (truncated)");
                break;
            }
            details.push_str(&format!("\n  Caused by: {}", err));
            source = err.source();
        }

        details
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn is_sensitive(&self) -> bool {
        app_error_static_metadata(self).2
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).3
    }

    fn client_message(&self) -> String {
        match self {
            AppError::InvalidIdentifier(ref msg) => msg.clone(),
            AppError::Unauthenticated(ref msg) => msg.clone(),
            AppError::Forbidden(ref msg) => msg.clone(),
            AppError::NotFound(ref msg) => msg.clone(),
            AppError::BadRequest(ref msg) => msg.clone(),
            AppError::UnsupportedMediaType(ref msg) => msg.clone(),
            AppError::PayloadTooLarge(ref msg) => msg.clone(),
            AppError::ProbeError(_) => "Couldn't read video metadata".to_string(),
            AppError::TranscodeError(_) => "Couldn't process video".to_string(),
            AppError::PublishError(_) => "Couldn't store uploaded file".to_string(),
            AppError::PersistenceError(_) => "Couldn't update video".to_string(),
            AppError::Internal(_) | AppError::InternalWithSource { .. } => {
                "Internal server error".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_metadata_persistence() {
        let err = AppError::from(sqlx::Error::PoolClosed);
        assert_eq!(err.http_status_code(), 500);
        assert_eq!(err.error_code(), "PERSISTENCE_ERROR");
        assert_eq!(err.client_message(), "Couldn't update video");
        assert!(err.is_sensitive());
        assert_eq!(err.log_level(), LogLevel::Error);
    }

    #[test]
    fn test_error_metadata_not_found() {
        let err = AppError::NotFound("Couldn't find video".to_string());
        assert_eq!(err.http_status_code(), 404);
        assert_eq!(err.error_code(), "NOT_FOUND");
        assert_eq!(err.client_message(), "Couldn't find video");
        assert!(!err.is_sensitive());
        assert_eq!(err.log_level(), LogLevel::Debug);
    }

    #[test]
    fn test_request_errors_map_to_client_statuses() {
        let cases = [
            (AppError::InvalidIdentifier("x".into()), 400),
            (AppError::Unauthenticated("x".into()), 401),
            (AppError::Forbidden("x".into()), 403),
            (AppError::UnsupportedMediaType("x".into()), 400),
            (AppError::PayloadTooLarge("x".into()), 413),
        ];
        for (err, status) in cases {
            assert_eq!(err.http_status_code(), status, "{}", err.error_type());
            assert!(!err.is_sensitive());
        }
    }

    #[test]
    fn test_processing_errors_hide_cause() {
        let err = AppError::ProbeError("ffprobe: /tmp/secret/path: No such file".into());
        assert_eq!(err.http_status_code(), 500);
        assert!(err.is_sensitive());
        assert!(!err.client_message().contains("/tmp"));

        let err = AppError::TranscodeError("exit status 1".into());
        assert_eq!(err.error_code(), "TRANSCODE_ERROR");
        assert!(!err.client_message().contains("exit"));
    }

    #[test]
    fn test_uuid_error_is_invalid_identifier() {
        let err: AppError = uuid::Uuid::parse_str("not-a-uuid").unwrap_err().into();
        assert_eq!(err.error_code(), "INVALID_IDENTIFIER");
    }

    #[test]
    fn test_detailed_message_includes_source_chain() {
        let err = AppError::from(anyhow::anyhow!("disk full").context("writing scratch file"));
        let details = err.detailed_message();
        assert!(details.contains("Caused by"));
    }
}
