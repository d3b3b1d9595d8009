//! Tally Core Library
//!
//! This crate provides the receipt models, error types, configuration, and upload
//! validation shared across all Tally components.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod validation;

// Re-export commonly used types
pub use config::{BaseConfig, Config, ExtractionConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{ExtractedReceipt, RawUpload, Receipt, ReceiptItem};
pub use validation::{validate_media_type, UnsupportedMediaType};
