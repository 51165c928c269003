//! Error types for block operations.

use bf_lti::LtiError;
use thiserror::Error;

/// Result type for block operations.
pub type BlockResult<T> = Result<T, BlockError>;

/// Errors that can occur while configuring or executing a block.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum BlockError {
    /// Invalid parameter provided to a block constructor.
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    /// A fusion block received a different number of inputs than it fuses.
    #[error("Fusion input mismatch: expected {expected} inputs, got {actual}")]
    FusionInputMismatch { expected: usize, actual: usize },

    /// Transfer function or state-space configuration is unusable.
    #[error("Invalid configuration: {0}")]
    Lti(#[from] LtiError),
}
