//! Application state shared by all handlers.

use std::path::PathBuf;
use std::sync::Arc;

use tally_extraction::ReceiptExtractionService;

/// Where sample receipt images live and how they are addressed publicly.
#[derive(Debug, Clone)]
pub struct SamplesConfig {
    pub dir: PathBuf,
    pub url_prefix: String,
}

pub struct AppState {
    pub extraction: Arc<ReceiptExtractionService>,
    pub samples: SamplesConfig,
    /// Largest accepted receipt image, in bytes
    pub max_file_size_bytes: usize,
}
