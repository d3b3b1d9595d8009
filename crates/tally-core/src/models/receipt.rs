use serde::{Deserialize, Serialize};

/// One purchased line on a receipt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiptItem {
    pub item_name: String,
    /// Per-item price before tax.
    pub item_cost: f64,
}

/// Receipt fields as produced by the AI model, after schema validation.
///
/// `date` is kept as the text the model returned (expected `YYYY-MM-DD`).
/// No arithmetic consistency between items, tax and total is implied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedReceipt {
    pub date: String,
    pub currency: String,
    pub vendor_name: String,
    pub receipt_items: Vec<ReceiptItem>,
    pub tax: f64,
    pub total: f64,
}

/// A finalized, write-once receipt record.
///
/// Serializes to the public response shape:
/// `{ id, date, currency, vendor_name, receipt_items, tax, total, image_url }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Receipt {
    pub id: String,
    pub date: String,
    pub currency: String,
    pub vendor_name: String,
    pub receipt_items: Vec<ReceiptItem>,
    pub tax: f64,
    pub total: f64,
    pub image_url: String,
}

impl Receipt {
    pub fn from_extracted(id: String, extracted: ExtractedReceipt, image_url: String) -> Self {
        Receipt {
            id,
            date: extracted.date,
            currency: extracted.currency,
            vendor_name: extracted.vendor_name,
            receipt_items: extracted.receipt_items,
            tax: extracted.tax,
            total: extracted.total,
            image_url,
        }
    }
}

/// An uploaded file as delivered by the HTTP layer, before any validation.
#[derive(Debug, Clone)]
pub struct RawUpload {
    pub data: Vec<u8>,
    pub content_type: String,
    pub original_filename: String,
}
