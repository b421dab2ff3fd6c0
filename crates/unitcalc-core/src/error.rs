//! Error types
//!
//! Every failure in unitcalc is an authoring-time problem in a formula or
//! in the input data. Nothing is retried or repaired: the error travels back
//! to the caller, which is expected to stop the computation.
//!
//! ```rust
//! use unitcalc_core::{Quantity, QuantityError};
//!
//! let load = Quantity::parse("1 lb").unwrap();
//! let span = Quantity::parse("1 ft").unwrap();
//! let err = load.try_gt(&span).unwrap_err();
//! assert_eq!(err.error_code(), "DIMENSION_MISMATCH");
//! ```

use serde::Serialize;
use thiserror::Error;

/// Result type alias for unitcalc operations
pub type QuantityResult<T> = Result<T, QuantityError>;

#[derive(Error, Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum QuantityError {
    /// The numeric prefix or the unit expression of a literal is malformed
    #[error("Cannot parse quantity '{literal}': {reason}")]
    Parse { literal: String, reason: String },

    /// Operands carry incompatible dimensions, or a dimensioned value was
    /// used where a plain scalar is required
    #[error("Dimension mismatch: {reason}")]
    DimensionMismatch { reason: String },

    /// The operation is undefined for these operands (non-integer power,
    /// division by zero, non-finite result)
    #[error("Invalid operation: {reason}")]
    InvalidOperation { reason: String },

    /// A calculator line could not be parsed
    #[error("Syntax error in '{input}': {reason}")]
    Syntax { input: String, reason: String },

    #[error("Unknown variable: {name}")]
    UnknownVariable { name: String },

    /// Required parameters were absent from a parameter document
    #[error("Missing parameters: {}", names.join(", "))]
    MissingParameters { names: Vec<String> },

    /// A parameter exists but holds the wrong kind of value
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    /// One or more entries of a parameter document failed validation
    #[error("Invalid parameter document:\n{}", problems.join("\n"))]
    InvalidParameters { problems: Vec<String> },

    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },
}

impl QuantityError {
    pub fn parse(literal: impl Into<String>, reason: impl Into<String>) -> Self {
        QuantityError::Parse {
            literal: literal.into(),
            reason: reason.into(),
        }
    }

    pub fn dimension_mismatch(reason: impl Into<String>) -> Self {
        QuantityError::DimensionMismatch {
            reason: reason.into(),
        }
    }

    pub fn invalid_operation(reason: impl Into<String>) -> Self {
        QuantityError::InvalidOperation {
            reason: reason.into(),
        }
    }

    pub fn syntax(input: impl Into<String>, reason: impl Into<String>) -> Self {
        QuantityError::Syntax {
            input: input.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_parameter(name: impl Into<String>, reason: impl Into<String>) -> Self {
        QuantityError::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }

    pub fn file_error(
        operation: impl Into<String>,
        path: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        QuantityError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            QuantityError::Parse { .. } => "PARSE_ERROR",
            QuantityError::DimensionMismatch { .. } => "DIMENSION_MISMATCH",
            QuantityError::InvalidOperation { .. } => "INVALID_OPERATION",
            QuantityError::Syntax { .. } => "SYNTAX_ERROR",
            QuantityError::UnknownVariable { .. } => "UNKNOWN_VARIABLE",
            QuantityError::MissingParameters { .. } => "MISSING_PARAMETERS",
            QuantityError::InvalidParameter { .. } => "INVALID_PARAMETER",
            QuantityError::InvalidParameters { .. } => "INVALID_PARAMETERS",
            QuantityError::FileError { .. } => "FILE_ERROR",
            QuantityError::SerializationError { .. } => "SERIALIZATION_ERROR",
        }
    }
}
