//! Storage abstraction trait
//!
//! This module defines the ImageStore trait that all storage backends must implement.

use async_trait::async_trait;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage reference: {0}")]
    InvalidReference(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Append-only store for uploaded receipt images.
///
/// Implementations never overwrite across receipts: the stored name is derived
/// from the per-request receipt id, which is unique.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Persist `data` for the receipt `id` and return the public relative reference
    /// (e.g. `/uploads/<id>_<original_filename>`).
    async fn store(&self, data: &[u8], original_filename: &str, id: &str)
        -> StorageResult<String>;

    /// Read back a stored image by the reference returned from `store`.
    async fn load(&self, reference: &str) -> StorageResult<Vec<u8>>;
}
