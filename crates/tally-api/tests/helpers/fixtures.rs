//! Test fixtures: receipt images and canned model replies.

use axum_test::multipart::{MultipartForm, Part};

pub const VALID_RECEIPT_JSON: &str = r#"{
  "date": "2024-01-15",
  "currency": "USD",
  "vendor_name": "Test Store",
  "receipt_items": [
    {"item_name": "Coffee", "item_cost": 4.5},
    {"item_name": "Bagel", "item_cost": 9.0}
  ],
  "tax": 1.35,
  "total": 14.84
}"#;

/// Minimal valid 1x1 PNG bytes.
pub fn create_minimal_png() -> Vec<u8> {
    vec![
        0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
        0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x02, 0x00, 0x00, 0x00, 0x90,
        0x77, 0x53, 0xDE, 0x00, 0x00, 0x00, 0x0C, 0x49, 0x44, 0x41, 0x54, 0x08, 0xD7, 0x63, 0xF8,
        0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x18, 0xDD, 0x8D, 0x89, 0x00, 0x00, 0x00,
        0x00, 0x49, 0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
    ]
}

/// Start of a JPEG file (SOI + APP0 marker); enough for content-type based handling.
pub fn create_jpeg_bytes() -> Vec<u8> {
    let mut data = vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10];
    data.extend_from_slice(b"JFIF\0");
    data.extend_from_slice(&[0u8; 64]);
    data
}

/// Multipart form with one file part under `field`.
pub fn receipt_form(field: &str, data: Vec<u8>, file_name: &str, mime_type: &str) -> MultipartForm {
    let part = Part::bytes(bytes::Bytes::from(data))
        .file_name(file_name.to_string())
        .mime_type(mime_type.to_string());
    MultipartForm::new().add_part(field.to_string(), part)
}
