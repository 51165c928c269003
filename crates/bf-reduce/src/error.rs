//! Error types for reduction.

use bf_core::NodeId;
use bf_lti::LtiError;
use thiserror::Error;

/// Errors raised while reducing a graph.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReduceError {
    /// Start or end node does not exist.
    #[error("Node {node} does not exist")]
    UnknownNode { node: NodeId },

    /// A path or loop step has no gain between adjacent nodes.
    #[error("No edge from {from} to {to} in the signal-flow graph")]
    EdgeNotFound { from: NodeId, to: NodeId },

    #[error("Transfer function algebra failed: {0}")]
    Lti(#[from] LtiError),
}

pub type ReduceResult<T> = Result<T, ReduceError>;
