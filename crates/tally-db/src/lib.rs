//! Receipt persistence
//!
//! Receipts are write-once records keyed by their generated id. The
//! `ReceiptRepository` trait is the seam a durable store would plug into; the
//! only implementation today keeps everything in process memory, so records live
//! until the process restarts.

pub mod receipt;

pub use receipt::{InMemoryReceiptRepository, ReceiptRepository, RepositoryError};
