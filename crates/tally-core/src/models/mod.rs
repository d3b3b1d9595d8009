//! Data models for the application

mod receipt;

pub use receipt::{ExtractedReceipt, RawUpload, Receipt, ReceiptItem};
