use std::fmt;

use tally_core::UnsupportedMediaType;

use crate::parser::ResponseFormatError;
use crate::schema::SchemaViolation;

/// Pipeline step an extraction was in when it failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionStage {
    Validating,
    Storing,
    Prompting,
    Inferring,
    Sanitizing,
    ValidatingSchema,
    Persisting,
}

impl ExtractionStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractionStage::Validating => "validating",
            ExtractionStage::Storing => "storing",
            ExtractionStage::Prompting => "prompting",
            ExtractionStage::Inferring => "inferring",
            ExtractionStage::Sanitizing => "sanitizing",
            ExtractionStage::ValidatingSchema => "validating_schema",
            ExtractionStage::Persisting => "persisting",
        }
    }
}

impl fmt::Display for ExtractionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every way an extraction can fail. Callers map these four kinds onto their
/// own error surface; storage, gateway and repository failures all collapse into
/// `Processing` but keep the stage and the underlying cause for logging.
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error(transparent)]
    UnsupportedMediaType(#[from] UnsupportedMediaType),

    #[error(transparent)]
    ResponseFormat(#[from] ResponseFormatError),

    #[error("model response failed validation: {0}")]
    InvalidData(#[from] SchemaViolation),

    #[error("receipt processing failed while {stage}: {source}")]
    Processing {
        stage: ExtractionStage,
        #[source]
        source: anyhow::Error,
    },
}

impl ExtractionError {
    pub fn processing(stage: ExtractionStage, source: impl Into<anyhow::Error>) -> Self {
        ExtractionError::Processing {
            stage,
            source: source.into(),
        }
    }

    /// Stage the failure happened in.
    pub fn stage(&self) -> ExtractionStage {
        match self {
            ExtractionError::UnsupportedMediaType(_) => ExtractionStage::Validating,
            ExtractionError::ResponseFormat(_) => ExtractionStage::Sanitizing,
            ExtractionError::InvalidData(_) => ExtractionStage::ValidatingSchema,
            ExtractionError::Processing { stage, .. } => *stage,
        }
    }
}
