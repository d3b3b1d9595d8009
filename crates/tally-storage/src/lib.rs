//! Receipt image storage
//!
//! Uploaded receipt images are written once under `<receipt_id>_<original_filename>`
//! in a single flat directory and referenced publicly as `<url_prefix>/<filename>`
//! (by default `/uploads/<filename>`). Callers only ever see that reference; the
//! backend behind it is an implementation detail of the `ImageStore` trait.

pub mod local;
pub mod traits;

pub use local::LocalStorage;
pub use traits::{ImageStore, StorageError, StorageResult};

/// Reduce an uploaded filename to a single safe path component.
///
/// Directory components are dropped and characters outside `[A-Za-z0-9._-]`
/// become `_`, so the extension survives and the result can be used verbatim in a URL.
pub fn sanitize_filename(filename: &str) -> String {
    const MAX_FILENAME_LENGTH: usize = 200;

    let last_component = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename);

    let sanitized: String = last_component
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    // Keep the tail so the extension is preserved for long names
    let char_count = sanitized.chars().count();
    let sanitized: String = if char_count > MAX_FILENAME_LENGTH {
        sanitized.chars().skip(char_count - MAX_FILENAME_LENGTH).collect()
    } else {
        sanitized
    };

    if sanitized.trim_matches('.').is_empty() {
        "upload".to_string()
    } else {
        sanitized
    }
}

/// Compose the stored filename for an upload: `<id>_<sanitized original name>`.
pub fn compose_filename(id: &str, original_filename: &str) -> String {
    format!("{}_{}", id, sanitize_filename(original_filename))
}
