//! Route paths and HTTP-layer limits.

/// API path prefix
pub const API_PREFIX: &str = "/api";

/// Multipart field names accepted for the receipt image, in order of preference
pub const UPLOAD_FIELD_NAMES: [&str; 2] = ["receipt", "file"];

/// Slack on top of the file size limit for multipart boundaries and headers
pub const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Default server-level concurrency limit
pub const DEFAULT_HTTP_CONCURRENCY_LIMIT: usize = 10_000;
