//! Receipt extraction service
//!
//! Orchestrates one upload end to end: validate → store → prompt → infer →
//! sanitize → validate schema → persist. Each request gets its own receipt id, so
//! concurrent extractions never share a stored file or a repository key.

use std::sync::Arc;
use std::time::Instant;

use base64::Engine;
use tally_core::models::{RawUpload, Receipt};
use tally_core::validate_media_type;
use tally_db::ReceiptRepository;
use tally_storage::ImageStore;
use uuid::Uuid;

use crate::error::{ExtractionError, ExtractionStage};
use crate::gateway::AiGateway;
use crate::parser::parse_model_response;
use crate::prompt::extraction_prompt;
use crate::schema::validate_receipt;

pub struct ReceiptExtractionService {
    images: Arc<dyn ImageStore>,
    gateway: Arc<dyn AiGateway>,
    repository: Arc<dyn ReceiptRepository>,
}

impl ReceiptExtractionService {
    pub fn new(
        images: Arc<dyn ImageStore>,
        gateway: Arc<dyn AiGateway>,
        repository: Arc<dyn ReceiptRepository>,
    ) -> Self {
        Self {
            images,
            gateway,
            repository,
        }
    }

    /// Run the full pipeline for one uploaded image.
    ///
    /// A rejected content type fails before anything is written. Once the image
    /// is stored it stays stored even if a later step fails; the receipt itself is
    /// only persisted when every step succeeded.
    pub async fn extract(&self, upload: RawUpload) -> Result<Receipt, ExtractionError> {
        let start = Instant::now();

        let mime_type = validate_media_type(&upload.content_type).map_err(|e| {
            tracing::debug!(
                content_type = %upload.content_type,
                "Rejected receipt upload with unsupported content type"
            );
            e
        })?;

        let receipt_id = Uuid::new_v4().to_string();
        let receipt = self.run(receipt_id, mime_type, upload).await?;

        tracing::info!(
            receipt_id = %receipt.id,
            vendor_name = %receipt.vendor_name,
            currency = %receipt.currency,
            items = receipt.receipt_items.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Receipt extracted"
        );

        Ok(receipt)
    }

    #[tracing::instrument(skip(self, receipt_id, upload), fields(receipt_id = %receipt_id))]
    async fn run(
        &self,
        receipt_id: String,
        mime_type: &'static str,
        upload: RawUpload,
    ) -> Result<Receipt, ExtractionError> {
        tracing::info!(
            original_filename = %upload.original_filename,
            content_type = mime_type,
            size_bytes = upload.data.len(),
            "Processing receipt upload"
        );

        tracing::debug!(stage = %ExtractionStage::Storing, "Extraction stage");
        let image_url = self
            .images
            .store(&upload.data, &upload.original_filename, &receipt_id)
            .await
            .map_err(|e| fail(ExtractionStage::Storing, e))?;

        tracing::debug!(
            stage = %ExtractionStage::Prompting,
            image_url = %image_url,
            "Receipt image stored"
        );

        let prompt = extraction_prompt();
        let image_base64 = base64::engine::general_purpose::STANDARD.encode(&upload.data);

        tracing::debug!(stage = %ExtractionStage::Inferring, "Extraction stage");

        let raw = self
            .gateway
            .infer(prompt, &image_base64, mime_type)
            .await
            .map_err(|e| fail(ExtractionStage::Inferring, e))?;

        tracing::debug!(
            stage = %ExtractionStage::Sanitizing,
            response_len = raw.len(),
            "Model response received"
        );

        let value = parse_model_response(&raw).map_err(|e| {
            tracing::debug!(excerpt = %e.excerpt, error = %e, "Model response is not valid JSON");
            ExtractionError::from(e)
        })?;

        tracing::debug!(stage = %ExtractionStage::ValidatingSchema, "Extraction stage");
        let extracted = validate_receipt(&value).map_err(|e| {
            tracing::debug!(violation = %e, "Model response failed receipt schema validation");
            ExtractionError::from(e)
        })?;

        tracing::debug!(stage = %ExtractionStage::Persisting, "Extraction stage");
        let receipt = Receipt::from_extracted(receipt_id, extracted, image_url);
        self.repository
            .insert(receipt.clone())
            .await
            .map_err(|e| fail(ExtractionStage::Persisting, e))?;

        Ok(receipt)
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Option<Receipt>, ExtractionError> {
        self.repository
            .get_by_id(id)
            .await
            .map_err(|e| ExtractionError::processing(ExtractionStage::Persisting, e))
    }

    pub async fn list_all(&self) -> Result<Vec<Receipt>, ExtractionError> {
        self.repository
            .list_all()
            .await
            .map_err(|e| ExtractionError::processing(ExtractionStage::Persisting, e))
    }
}

fn fail(stage: ExtractionStage, source: impl Into<anyhow::Error>) -> ExtractionError {
    let err = ExtractionError::processing(stage, source);
    tracing::debug!(stage = %stage, error = ?err, "Receipt extraction stage failed");
    err
}
