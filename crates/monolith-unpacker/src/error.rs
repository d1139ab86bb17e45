//! Error types for the bootstrap pipeline.

use monolith_payload::{FormatError, PayloadError};
use thiserror::Error;

/// Bootstrap errors.
///
/// Every variant is terminal: the pipeline never retries and never trusts a
/// payload that failed an earlier step.
#[derive(Debug, Error)]
pub enum UnpackError {
    /// Path of the running executable could not be resolved
    #[error("cannot resolve own executable: {0}")]
    SelfLocate(#[source] std::io::Error),

    /// Reading the image or writing the ephemeral directory failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Footer is structurally invalid
    #[error("invalid monolith footer: {0}")]
    Format(#[from] FormatError),

    /// Payload tag mismatch (corruption or tampering)
    #[error("invalid monolith payload auth tag")]
    Authentication,

    /// Any other payload failure
    #[error("payload error: {0}")]
    Payload(PayloadError),

    /// Archive could not be expanded
    #[error("failed to extract payload archive: {0}")]
    Extraction(String),

    /// Inner executable missing or process replacement failed
    #[error("handoff failed: {0}")]
    Handoff(String),
}

impl From<PayloadError> for UnpackError {
    fn from(err: PayloadError) -> Self {
        match err {
            PayloadError::Format(e) => Self::Format(e),
            PayloadError::Authentication => Self::Authentication,
            PayloadError::Io(e) => Self::Io(e),
            other => Self::Payload(other),
        }
    }
}
