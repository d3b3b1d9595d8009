//! Upload validation
//!
//! Checks the declared content type of an upload against the image allow-list.
//! Runs before anything is written to disk or sent to the AI model.

use crate::constants::{messages, ALLOWED_IMAGE_CONTENT_TYPES};

/// The declared content type is not one of the accepted image types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message} (got '{content_type}')")]
pub struct UnsupportedMediaType {
    pub content_type: String,
    pub message: &'static str,
}

/// Normalize MIME type by stripping parameters (e.g. "image/jpeg; charset=utf-8" -> "image/jpeg").
fn normalize_mime_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .map(|s| s.trim())
        .unwrap_or(content_type)
        .to_lowercase()
}

/// Validate a declared content type against the accepted image types.
///
/// Returns the canonical MIME type to forward downstream (`image/jpg` becomes
/// `image/jpeg`).
pub fn validate_media_type(content_type: &str) -> Result<&'static str, UnsupportedMediaType> {
    let normalized = normalize_mime_type(content_type);
    if let Some(allowed) = ALLOWED_IMAGE_CONTENT_TYPES
        .iter()
        .find(|ct| **ct == normalized)
    {
        return Ok(match *allowed {
            "image/jpg" => "image/jpeg",
            other => other,
        });
    }

    Err(UnsupportedMediaType {
        content_type: content_type.to_string(),
        message: messages::UNSUPPORTED_MEDIA_TYPE,
    })
}
