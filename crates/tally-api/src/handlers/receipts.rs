use crate::error::HttpAppError;
use crate::state::AppState;
use crate::utils::upload::extract_receipt_upload;
use axum::{
    extract::{Multipart, Path, State},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use tally_core::constants::messages;
use tally_core::AppError;

/// Upload a receipt image and return the extracted receipt.
#[tracing::instrument(skip(state, multipart), fields(operation = "extract_receipt"))]
pub async fn extract_receipt(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let upload = extract_receipt_upload(multipart, state.max_file_size_bytes).await?;
    let receipt = state.extraction.extract(upload).await?;
    Ok(Json(receipt))
}

pub async fn list_receipts(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let receipts = state.extraction.list_all().await?;
    Ok(Json(receipts))
}

#[tracing::instrument(skip(state), fields(receipt_id = %id, operation = "get_receipt"))]
pub async fn get_receipt(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let receipt = state
        .extraction
        .get_by_id(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(messages::RECEIPT_NOT_FOUND.to_string()))?;

    Ok(Json(receipt))
}
