//! Errors raised while building and solving the MILP, per the "modeling /
//! solver" bucket: no backend available is a setup failure; infeasible,
//! unbounded and numerical outcomes are still reported through
//! `solver_status` by the caller rather than treated as hard errors here,
//! but the solve call itself surfaces them as typed variants so the worker
//! can decide what to do with each.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AlgoError {
    #[error("no MILP backend available; compile with at least one of the solver-* features")]
    NoBackendAvailable,

    #[error("solver reported the model as infeasible: {0}")]
    Infeasible(String),

    #[error("solver reported the model as unbounded: {0}")]
    Unbounded(String),

    #[error("solver failed numerically: {0}")]
    Numerical(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type AlgoResult<T> = Result<T, AlgoError>;

/// good_lp's `ResolutionError` varies its exact shape by backend; we only
/// have `Debug` to go on uniformly, so classify by substring rather than
/// matching backend-specific variants.
pub fn classify_resolution_error(err: good_lp::ResolutionError) -> AlgoError {
    let message = format!("{err:?}");
    let lower = message.to_lowercase();
    if lower.contains("infeasible") {
        AlgoError::Infeasible(message)
    } else if lower.contains("unbounded") {
        AlgoError::Unbounded(message)
    } else {
        AlgoError::Numerical(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_backend_available_display() {
        let err = AlgoError::NoBackendAvailable;
        assert!(err.to_string().contains("no MILP backend"));
    }

    #[test]
    fn test_infeasible_display_includes_detail() {
        let err = AlgoError::Infeasible("primal infeasible".into());
        assert!(err.to_string().contains("primal infeasible"));
    }
}
