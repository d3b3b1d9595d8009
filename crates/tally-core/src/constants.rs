//! Constants shared across crates.

/// Public URL prefix under which stored receipt images are served.
pub const DEFAULT_UPLOADS_URL_PREFIX: &str = "/uploads";

/// Public URL prefix under which sample receipt images are served.
pub const SAMPLES_URL_PREFIX: &str = "/samples";

/// Upload size ceiling enforced by the HTTP layer, in megabytes.
pub const DEFAULT_MAX_FILE_SIZE_MB: usize = 10;

/// Largest `MAX_FILE_SIZE_MB` accepted; the whole image is buffered in memory.
pub const MAX_FILE_SIZE_MB_CEILING: usize = 1024;

/// Multi-modal model used for extraction unless overridden by configuration.
pub const DEFAULT_VISION_MODEL: &str = "claude-sonnet-4-20250514";

/// Accepted upload content types. `image/jpg` is a non-standard alias some
/// clients send for JPEG.
pub const ALLOWED_IMAGE_CONTENT_TYPES: [&str; 4] =
    ["image/jpeg", "image/jpg", "image/png", "image/webp"];

/// Client-facing messages for the extraction error taxonomy.
pub mod messages {
    pub const UNSUPPORTED_MEDIA_TYPE: &str =
        "Invalid file type. Only JPEG, JPG, PNG and WEBP images are allowed.";
    pub const NO_FILE_UPLOADED: &str = "No file uploaded";
    pub const AI_RESPONSE_FORMAT: &str = "AI model returned invalid response format";
    pub const AI_RESPONSE_CONTENT: &str = "AI model returned incomplete or invalid data";
    pub const PROCESSING_FAILED: &str = "Failed to process receipt image";
    pub const RECEIPT_NOT_FOUND: &str = "Receipt not found";
}
