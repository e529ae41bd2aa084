//! # msp-io: Payload Normalization and Validation
//!
//! Turns a raw wire-format job request (a JSON object whose indexed
//! parameters use stringified-tuple keys) into a validated
//! [`msp_core::MissionData`], the shared data model consumed by `msp-algo`.
//!
//! ## Pipeline
//!
//! 1. [`keys`] — parses stringified tuple/week keys (`"('plastic', 'extrude')"`)
//!    into structured components.
//! 2. [`normalize`] — builds a [`msp_core::MissionData`] from the raw JSON,
//!    collecting malformed-key issues into a
//!    [`msp_core::NormalizationDiagnostics`] rather than failing outright.
//! 3. [`validate`] — checks the normalized data's referential and numeric
//!    invariants, collecting every violation into a [`msp_core::Diagnostics`].
//!
//! [`normalize_and_validate`] runs the whole pipeline and is the entry point
//! most callers (the worker included) should use.

pub mod error;
pub mod keys;
pub mod normalize;
pub mod validate;

pub use error::IoError;
use msp_core::diagnostics::{Diagnostics, NormalizationDiagnostics};
use msp_core::MissionData;

/// Result of running the full normalize-then-validate pipeline.
#[derive(Debug)]
pub struct NormalizedPayload {
    pub mission: MissionData,
    pub normalization: NormalizationDiagnostics,
    pub validation: Diagnostics,
}

impl NormalizedPayload {
    /// True when neither stage reported an error; `msp-algo` should refuse
    /// to build a model otherwise.
    pub fn is_usable(&self) -> bool {
        !self.normalization.has_errors() && !self.validation.has_errors()
    }
}

/// Runs normalization then validation against a raw job-request payload.
pub fn normalize_and_validate(raw: &serde_json::Value) -> Result<NormalizedPayload, IoError> {
    let (mission, normalization) = normalize::normalize(raw)?;
    let validation = validate::validate(&mission);
    Ok(NormalizedPayload {
        mission,
        normalization,
        validation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_pipeline_reports_unusable_on_empty_payload() {
        let result = normalize_and_validate(&json!({})).unwrap();
        assert!(!result.is_usable());
    }

    #[test]
    fn test_pipeline_usable_on_minimal_valid_payload() {
        let raw = json!({
            "materials": ["plastic"],
            "methods": ["extrude"],
            "outputs": ["filament"],
            "items": ["spare_part"],
            "substitutes": ["printed_part"],
            "weeks": [1, 2],
        });
        let result = normalize_and_validate(&raw).unwrap();
        assert!(result.is_usable());
    }

    #[test]
    fn test_pipeline_rejects_non_object_payload() {
        assert!(normalize_and_validate(&json!([1, 2])).is_err());
    }
}
