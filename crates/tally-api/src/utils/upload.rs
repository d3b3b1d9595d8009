//! Multipart upload extraction

use axum::extract::multipart::MultipartError;
use axum::extract::Multipart;
use axum::http::StatusCode;
use tally_core::constants::messages;
use tally_core::{AppError, RawUpload};

use crate::constants::UPLOAD_FIELD_NAMES;

fn multipart_error(e: MultipartError, max_size: usize) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(format!(
            "File size exceeds maximum allowed size of {} MB",
            max_size / 1024 / 1024
        ))
    } else {
        AppError::BadRequest(format!("Failed to read multipart: {}", e.body_text()))
    }
}

/// Pull the receipt image out of a multipart body.
///
/// The image is expected in a field named `receipt` (`file` is accepted too).
/// Other fields are ignored. The declared content type is passed through as-is
/// and checked later by the extraction pipeline.
pub async fn extract_receipt_upload(
    mut multipart: Multipart,
    max_size: usize,
) -> Result<RawUpload, AppError> {
    let mut upload: Option<RawUpload> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, max_size))?
    {
        let field_name = field.name().unwrap_or_default();
        if !UPLOAD_FIELD_NAMES.contains(&field_name) {
            continue;
        }

        if upload.is_some() {
            return Err(AppError::BadRequest(
                "Multiple file fields are not allowed; send exactly one field named 'receipt'"
                    .to_string(),
            ));
        }

        let original_filename = field
            .file_name()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "unknown".to_string());
        let content_type = field
            .content_type()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "application/octet-stream".to_string());

        let data = field
            .bytes()
            .await
            .map_err(|e| multipart_error(e, max_size))?;

        validate_file_size(data.len(), max_size)?;

        upload = Some(RawUpload {
            data: data.to_vec(),
            content_type,
            original_filename,
        });
    }

    upload.ok_or_else(|| AppError::BadRequest(messages::NO_FILE_UPLOADED.to_string()))
}

/// Validate file size
pub fn validate_file_size(file_size: usize, max_size: usize) -> Result<(), AppError> {
    if file_size > max_size {
        return Err(AppError::PayloadTooLarge(format!(
            "File size exceeds maximum allowed size of {} MB",
            max_size / 1024 / 1024
        )));
    }
    Ok(())
}
