//! Error types for LTI operations.

use bf_core::CoreError;
use thiserror::Error;

/// Result type for LTI operations.
pub type LtiResult<T> = Result<T, LtiError>;

/// Errors raised while building or combining LTI objects.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LtiError {
    /// Coefficients do not describe a usable transfer function.
    #[error("Invalid transfer function: {what}")]
    InvalidTransferFunction { what: &'static str },

    /// Filter design arguments are out of range or the fit is singular.
    #[error("Invalid filter design: {what}")]
    InvalidDesign { what: &'static str },

    /// Division by a transfer function whose numerator is identically zero.
    #[error("Division by a zero transfer function")]
    DivisionByZero,

    #[error(transparent)]
    Core(#[from] CoreError),
}
