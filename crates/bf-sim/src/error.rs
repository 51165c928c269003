//! Error types for simulation operations.

use bf_blocks::BlockError;
use bf_core::NodeId;
use bf_graph::GraphError;
use thiserror::Error;

/// Errors encountered while scheduling or stepping a graph.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("Invalid option: {what}")]
    InvalidOption { what: &'static str },

    /// Nodes left over after topological ordering form a cycle that does
    /// not pass through the continuous plant.
    #[error("Cycle detected among nodes: {}", unscheduled.join(", "))]
    CycleDetected { unscheduled: Vec<String> },

    #[error("Graph validation failed: {0}")]
    Graph(#[from] GraphError),

    #[error("Node '{name}' ({node}) failed: {source}")]
    Block {
        node: NodeId,
        name: String,
        #[source]
        source: BlockError,
    },

    #[error("Simulation has not been started; call run before resume")]
    NotStarted,
}

pub type SimResult<T> = Result<T, SimError>;
