//! Graph-specific error types.

use bf_blocks::BlockKind;
use bf_core::NodeId;
use thiserror::Error;

/// Result type for graph operations.
pub type GraphResult<T> = Result<T, GraphError>;

/// Graph construction and validation errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// An operation referred to a node that doesn't exist.
    #[error("Node {node} does not exist")]
    UnknownNode { node: NodeId },

    /// An edge endpoint refers to a node that doesn't exist.
    #[error("Edge {from} -> {to} refers to a non-existent node")]
    DanglingEdge { from: NodeId, to: NodeId },

    /// Two nodes share a name.
    #[error("Duplicate node name '{name}'")]
    DuplicateName { name: String },

    /// A sign was registered on a node that is not a summing junction.
    #[error("Node '{name}' ({node}) is a {kind}, not a Sum")]
    NotASum {
        node: NodeId,
        name: String,
        kind: BlockKind,
    },

    /// More than one continuous plant in a graph that is about to be simulated.
    #[error("Graph has {count} continuous plants (at most one is supported)")]
    MultiplePlants { count: usize },

    /// A single-input node has more than one incoming edge.
    #[error("{kind} '{name}' ({node}) has {in_degree} inputs (at most one allowed)")]
    FanIn {
        kind: BlockKind,
        node: NodeId,
        name: String,
        in_degree: usize,
    },
}
