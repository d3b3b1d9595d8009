//! HTTP error response conversion
//!
//! Handlers return `Result<impl IntoResponse, HttpAppError>`. Errors from
//! the extraction pipeline convert into `AppError` here, so
//! every failure renders with the same status, body and log line.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tally_core::{AppError, ErrorMetadata, LogLevel};
use tally_extraction::ExtractionError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    /// Machine-readable error code for programmatic handling
    pub code: String,
    /// Whether this error is recoverable (can be retried)
    pub recoverable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_action: Option<String>,
}

/// Wrapper type for AppError to implement IntoResponse
/// This is necessary because of Rust's orphan rules - we can't implement
/// IntoResponse (external trait) for AppError (external type from tally-core)
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<ExtractionError> for HttpAppError {
    fn from(err: ExtractionError) -> Self {
        let app = match err {
            ExtractionError::UnsupportedMediaType(e) => AppError::UnsupportedMediaType(e.content_type),
            ExtractionError::ResponseFormat(e) => AppError::AiResponseFormat(e.to_string()),
            ExtractionError::InvalidData(violation) => {
                AppError::AiResponseContent(violation.to_string())
            }
            ExtractionError::Processing { stage, source } => AppError::ProcessingFailed {
                message: format!("failed while {}", stage),
                source,
            },
        };
        HttpAppError(app)
    }
}

fn log_error(error: &AppError) {
    let error_type = error.error_type();
    let details = error.detailed_message();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %details, error_type = error_type, "Error occurred");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %details, error_type = error_type, "Error occurred");
        }
        LogLevel::Error => {
            tracing::error!(error = %details, error_type = error_type, "Error occurred");
        }
    }
}

fn is_production_env() -> bool {
    std::env::var("ENVIRONMENT")
        .or_else(|_| std::env::var("APP_ENV"))
        .map(|env| env.to_lowercase() == "production" || env.to_lowercase() == "prod")
        .unwrap_or(false)
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;
        let is_production = is_production_env();

        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(app_error);

        // Details only leave the process for non-sensitive errors outside production
        let (details, error_type) = if is_production || app_error.is_sensitive() {
            (None, None)
        } else {
            (
                Some(app_error.detailed_message()),
                Some(app_error.error_type().to_string()),
            )
        };

        let body = Json(ErrorResponse {
            error: app_error.client_message(),
            details,
            error_type,
            code: app_error.error_code().to_string(),
            recoverable: app_error.is_recoverable(),
            suggested_action: app_error.suggested_action().map(String::from),
        });

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_extraction::{parse_model_response, ExtractionStage, SchemaViolation};

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        serde_json::from_slice(&bytes).expect("json body")
    }

    #[test]
    fn test_from_unsupported_media_type() {
        let err = tally_core::validate_media_type("application/pdf").unwrap_err();
        let HttpAppError(app_err) = ExtractionError::from(err).into();
        match app_err {
            AppError::UnsupportedMediaType(ct) => assert_eq!(ct, "application/pdf"),
            _ => panic!("Expected UnsupportedMediaType variant"),
        }
    }

    #[test]
    fn test_from_response_format_error() {
        let err = parse_model_response("invalid json response").unwrap_err();
        let HttpAppError(app_err) = ExtractionError::from(err).into();
        assert!(matches!(app_err, AppError::AiResponseFormat(_)));
    }

    #[test]
    fn test_from_schema_violation() {
        let err = ExtractionError::from(SchemaViolation::InvalidCurrency("INVALID".to_string()));
        let HttpAppError(app_err) = err.into();
        match app_err {
            AppError::AiResponseContent(msg) => assert!(msg.contains("INVALID")),
            _ => panic!("Expected AiResponseContent variant"),
        }
    }

    #[test]
    fn test_from_processing_error_keeps_source() {
        let err = ExtractionError::processing(
            ExtractionStage::Inferring,
            anyhow::anyhow!("connection refused"),
        );
        let HttpAppError(app_err) = err.into();
        assert!(matches!(app_err, AppError::ProcessingFailed { .. }));
        assert!(app_err.detailed_message().contains("inferring"));
        assert!(app_err.detailed_message().contains("connection refused"));
    }

    #[tokio::test]
    async fn test_client_error_response_shape() {
        let response =
            HttpAppError(AppError::BadRequest("No file uploaded".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = body_json(response).await;
        assert_eq!(json["error"], "No file uploaded");
        assert_eq!(json["code"], "BAD_REQUEST");
        assert_eq!(json["recoverable"], false);
    }

    #[tokio::test]
    async fn test_sensitive_error_hides_details() {
        let response = HttpAppError(AppError::ProcessingFailed {
            message: "failed while storing".to_string(),
            source: anyhow::anyhow!("permission denied: /var/uploads"),
        })
        .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let json = body_json(response).await;
        assert_eq!(json["error"], "Failed to process receipt image");
        assert!(json.get("details").is_none());
        assert!(!json.to_string().contains("permission denied"));
    }
}
