//! Unified error type for the mission-supply planning ecosystem.
//!
//! This module provides a common error type [`CoreError`] that domain-specific
//! error types (payload normalization, model building, solving) can be
//! converted into for uniform handling at crate boundaries.
//!
//! # Example
//!
//! ```ignore
//! use msp_core::{CoreError, CoreResult};
//!
//! fn process_mission(path: &str) -> CoreResult<()> {
//!     let mission = load_mission(path)?;
//!     solve(&mission)?;
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// Unified error type for all mission-supply planning operations.
///
/// This enum provides a common error representation, allowing errors from
/// I/O, parsing, solving, and validation to be handled uniformly at the
/// boundary between the worker, the model builder, and the I/O layer.
#[derive(Error, Debug)]
pub enum CoreError {
    /// I/O errors (file access, queue connections, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Parsing/deserialization errors
    #[error("Parse error: {0}")]
    Parse(String),

    /// Data validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Solver/model-building errors
    #[error("Solver error: {0}")]
    Solver(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic errors (for wrapping external errors)
    #[error("{0}")]
    Other(String),
}

/// Convenience type alias for Results using CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// Conversion from anyhow::Error
impl From<anyhow::Error> for CoreError {
    fn from(err: anyhow::Error) -> Self {
        CoreError::Other(err.to_string())
    }
}

// Conversion from string-like types for convenience
impl From<String> for CoreError {
    fn from(s: String) -> Self {
        CoreError::Other(s)
    }
}

impl From<&str> for CoreError {
    fn from(s: &str) -> Self {
        CoreError::Other(s.to_string())
    }
}

// JSON parsing errors
impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::Parse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::Solver("infeasible".into());
        assert!(err.to_string().contains("Solver error"));
        assert!(err.to_string().contains("infeasible"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let core_err: CoreError = io_err.into();
        assert!(matches!(core_err, CoreError::Io(_)));
    }

    #[test]
    fn test_result_type_alias() {
        fn example_fn() -> CoreResult<i32> {
            Ok(42)
        }
        assert_eq!(example_fn().unwrap(), 42);
    }

    #[test]
    fn test_question_mark_operator() {
        fn inner() -> CoreResult<()> {
            Err(CoreError::Validation("test".into()))
        }

        fn outer() -> CoreResult<()> {
            inner()?;
            Ok(())
        }

        assert!(outer().is_err());
    }
}
