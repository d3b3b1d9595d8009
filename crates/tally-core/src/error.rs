//! Error types module
//!
//! This module provides the core error type used at the service boundary. Lower
//! layers (storage, repository, extraction) keep their own typed errors and are
//! re-wrapped into `AppError`, which knows how it should be presented to callers.

use std::io;

use crate::constants::messages;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues like resource limits
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
/// This trait allows errors to self-describe their HTTP response characteristics
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "AI_RESPONSE_FORMAT_ERROR")
    fn error_code(&self) -> &'static str;

    /// Whether this error is recoverable (can be retried)
    fn is_recoverable(&self) -> bool;

    /// Suggested action for the client
    fn suggested_action(&self) -> Option<&'static str>;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Whether details should be hidden in production
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("File too large: {0}")]
    PayloadTooLarge(String),

    #[error("AI response could not be parsed: {0}")]
    AiResponseFormat(String),

    #[error("AI response failed validation: {0}")]
    AiResponseContent(String),

    #[error("Receipt processing failed: {message}")]
    ProcessingFailed {
        message: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Internal(format!("IO error: {}", err))
    }
}

/// Static metadata for each variant: (http_status, error_code, recoverable, suggested_action, sensitive, log_level).
fn app_error_static_metadata(
    err: &AppError,
) -> (
    u16,
    &'static str,
    bool,
    Option<&'static str>,
    bool,
    LogLevel,
) {
    match err {
        AppError::BadRequest(_) => (
            400,
            "BAD_REQUEST",
            false,
            Some("Check request format and parameters"),
            false,
            LogLevel::Debug,
        ),
        AppError::UnsupportedMediaType(_) => (
            400,
            "UNSUPPORTED_MEDIA_TYPE",
            false,
            Some("Upload a JPEG, PNG or WEBP image"),
            false,
            LogLevel::Debug,
        ),
        AppError::NotFound(_) => (
            404,
            "NOT_FOUND",
            false,
            Some("Verify the receipt ID exists"),
            false,
            LogLevel::Debug,
        ),
        AppError::PayloadTooLarge(_) => (
            413,
            "PAYLOAD_TOO_LARGE",
            false,
            Some("Reduce file size and try again"),
            false,
            LogLevel::Warn,
        ),
        AppError::AiResponseFormat(_) => (
            500,
            "AI_RESPONSE_FORMAT_ERROR",
            false,
            Some("Try again with a clearer receipt image"),
            true,
            LogLevel::Error,
        ),
        AppError::AiResponseContent(_) => (
            500,
            "AI_RESPONSE_CONTENT_ERROR",
            false,
            Some("Try again with a clearer receipt image"),
            true,
            LogLevel::Error,
        ),
        AppError::ProcessingFailed { .. } => (
            500,
            "PROCESSING_FAILED",
            false,
            Some("Contact support if this error persists"),
            true,
            LogLevel::Error,
        ),
        AppError::Internal(_) => (
            500,
            "INTERNAL_ERROR",
            false,
            Some("Contact support if this error persists"),
            true,
            LogLevel::Error,
        ),
    }
}

impl AppError {
    /// Get the error type name for detailed error responses
    pub fn error_type(&self) -> &str {
        match self {
            AppError::BadRequest(_) => "BadRequest",
            AppError::UnsupportedMediaType(_) => "UnsupportedMediaType",
            AppError::NotFound(_) => "NotFound",
            AppError::PayloadTooLarge(_) => "PayloadTooLarge",
            AppError::AiResponseFormat(_) => "AiResponseFormat",
            AppError::AiResponseContent(_) => "AiResponseContent",
            AppError::ProcessingFailed { .. } => "ProcessingFailed",
            AppError::Internal(_) => "Internal",
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

    fn is_recoverable(&self) -> bool {
        app_error_static_metadata(self).2
    }

    fn suggested_action(&self) -> Option<&'static str> {
        app_error_static_metadata(self).3
    }

    fn is_sensitive(&self) -> bool {
        app_error_static_metadata(self).4
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).5
    }

    fn client_message(&self) -> String {
        match self {
            AppError::BadRequest(ref msg) => msg.clone(),
            AppError::UnsupportedMediaType(_) => messages::UNSUPPORTED_MEDIA_TYPE.to_string(),
            AppError::NotFound(ref msg) => msg.clone(),
            AppError::PayloadTooLarge(ref msg) => msg.clone(),
            AppError::AiResponseFormat(_) => messages::AI_RESPONSE_FORMAT.to_string(),
            AppError::AiResponseContent(_) => messages::AI_RESPONSE_CONTENT.to_string(),
            AppError::ProcessingFailed { .. } => messages::PROCESSING_FAILED.to_string(),
            AppError::Internal(_) => "Internal server error".to_string(),
        }
    }
}
