use thiserror::Error;

use textcap_capture::CaptureError;
use textcap_ocr::OcrError;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("capture failed: {0}")]
    Capture(#[from] CaptureError),

    #[error("recognition failed: {0}")]
    Ocr(#[from] OcrError),

    #[error("invalid region: {reason}")]
    InvalidRegion { reason: String },

    #[error("stage {stage} requires {field}, which no earlier stage produced")]
    MissingInput {
        stage: &'static str,
        field: &'static str,
    },

    #[error("session field {field} was already set")]
    FieldAlreadySet { field: &'static str },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PipelineError {
    pub fn invalid_region(reason: impl Into<String>) -> Self {
        Self::InvalidRegion {
            reason: reason.into(),
        }
    }
}
