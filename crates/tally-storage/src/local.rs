use crate::compose_filename;
use crate::traits::{ImageStore, StorageError, StorageResult};
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::OnceCell;

/// Local filesystem storage implementation
pub struct LocalStorage {
    base_path: PathBuf,
    base_url: String,
    dir_ready: OnceCell<()>,
}

impl LocalStorage {
    /// Create a new LocalStorage instance
    ///
    /// The directory is not touched here; it is created on the first `store`.
    ///
    /// # Arguments
    /// * `base_path` - Directory for stored images (e.g., "uploads")
    /// * `base_url` - Public URL prefix for stored images (e.g., "/uploads")
    pub fn new(base_path: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        LocalStorage {
            base_path: base_path.into(),
            base_url: base_url.into(),
            dir_ready: OnceCell::new(),
        }
    }

    pub fn base_path(&self) -> &std::path::Path {
        &self.base_path
    }

    /// Create the storage directory once per instance.
    async fn ensure_dir(&self) -> StorageResult<()> {
        self.dir_ready
            .get_or_try_init(|| async {
                fs::create_dir_all(&self.base_path).await.map_err(|e| {
                    StorageError::UploadFailed(format!(
                        "Failed to create storage directory {}: {}",
                        self.base_path.display(),
                        e
                    ))
                })?;
                tracing::debug!(path = %self.base_path.display(), "Storage directory ready");
                Ok::<(), StorageError>(())
            })
            .await
            .map(|_| ())
    }

    /// Generate public URL for file
    fn generate_url(&self, filename: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), filename)
    }

    /// Convert a public reference back to a filesystem path.
    ///
    /// Only plain filenames directly under the storage directory are accepted.
    fn reference_to_path(&self, reference: &str) -> StorageResult<PathBuf> {
        let prefix = format!("{}/", self.base_url.trim_end_matches('/'));
        let filename = reference.strip_prefix(&prefix).ok_or_else(|| {
            StorageError::InvalidReference(format!(
                "Reference '{}' is not under {}",
                reference, prefix
            ))
        })?;

        if filename.is_empty()
            || filename.contains('/')
            || filename.contains('\\')
            || filename == "."
            || filename == ".."
        {
            return Err(StorageError::InvalidReference(
                "Storage reference contains invalid characters".to_string(),
            ));
        }

        Ok(self.base_path.join(filename))
    }
}

#[async_trait]
impl ImageStore for LocalStorage {
    async fn store(
        &self,
        data: &[u8],
        original_filename: &str,
        id: &str,
    ) -> StorageResult<String> {
        self.ensure_dir().await?;

        let filename = compose_filename(id, original_filename);
        let path = self.base_path.join(&filename);
        let start = std::time::Instant::now();

        let mut file = fs::File::create(&path).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to create file {}: {}", path.display(), e))
        })?;

        file.write_all(data).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to write file {}: {}", path.display(), e))
        })?;

        file.sync_all().await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to sync file {}: {}", path.display(), e))
        })?;

        let url = self.generate_url(&filename);

        tracing::info!(
            path = %path.display(),
            receipt_id = %id,
            size_bytes = data.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage upload successful"
        );

        Ok(url)
    }

    async fn load(&self, reference: &str) -> StorageResult<Vec<u8>> {
        let path = self.reference_to_path(reference)?;

        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Err(StorageError::NotFound(reference.to_string()));
        }

        fs::read(&path).await.map_err(|e| {
            StorageError::DownloadFailed(format!("Failed to read file {}: {}", path.display(), e))
        })
    }
}
