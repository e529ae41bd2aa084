//! Errors raised by the normalizer before a [`msp_core::diagnostics::Diagnostics`]
//! collection can even be produced (i.e. the payload isn't a JSON object at all).

use thiserror::Error;

/// Errors that abort normalization outright, as opposed to issues collected
/// in [`crate::normalize::NormalizedPayload::diagnostics`].
#[derive(Debug, Error)]
pub enum IoError {
    #[error("top-level payload must be a JSON object, got: {0}")]
    NotAnObject(String),

    #[error("JSON deserialization error: {0}")]
    Json(#[from] serde_json::Error),
}
