//! Receipt extraction pipeline
//!
//! Turns an uploaded receipt image into a validated `Receipt`:
//!
//! 1. the declared content type is checked against the image allow-list,
//! 2. the image is written to the `ImageStore`,
//! 3. the fixed extraction prompt and the base64 image go to the `AiGateway`,
//! 4. the raw reply is unwrapped from any code fence and parsed as JSON,
//! 5. the JSON is checked against the receipt schema,
//! 6. the resulting record is inserted into the `ReceiptRepository`.
//!
//! Every failure is reported as one of the four `ExtractionError` kinds.

pub mod error;
pub mod gateway;
pub mod parser;
pub mod prompt;
pub mod schema;
pub mod service;

pub use error::{ExtractionError, ExtractionStage};
pub use gateway::{AiGateway, AnthropicConfig, AnthropicGateway};
pub use parser::{parse_model_response, ResponseFormatError};
pub use prompt::extraction_prompt;
pub use schema::{validate_receipt, SchemaViolation};
pub use service::ReceiptExtractionService;
