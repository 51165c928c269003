//! Incremental graph builder.

use bf_blocks::{Block, Sign};
use bf_core::NodeId;

use crate::error::{GraphError, GraphResult};
use crate::graph::{Edge, Graph, Node};
use crate::validate;

/// Builder for constructing a graph incrementally.
///
/// Use `add_node` and `connect` to build up the graph, then call `build()`
/// to validate the structure and freeze the topology.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

impl GraphBuilder {
    /// Create a new empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node to the graph and return its ID.
    pub fn add_node(&mut self, name: impl Into<String>, block: impl Into<Block>) -> NodeId {
        let id = NodeId::from_index(self.nodes.len() as u32);
        self.nodes.push(Node {
            id,
            name: name.into(),
            block: block.into(),
        });
        id
    }

    /// Add a directed edge. Endpoints are checked by `build()`.
    pub fn connect(&mut self, from: NodeId, to: NodeId) -> &mut Self {
        self.edges.push(Edge::new(from, to));
        self
    }

    /// Register the sign a summing junction applies to one of its sources.
    pub fn set_sign(&mut self, sum: NodeId, source: NodeId, sign: Sign) -> GraphResult<()> {
        let node = self
            .nodes
            .get_mut(sum.slot())
            .ok_or(GraphError::UnknownNode { node: sum })?;
        match &mut node.block {
            Block::Sum(s) => {
                s.set_sign(source, sign);
                Ok(())
            }
            other => Err(GraphError::NotASum {
                node: sum,
                name: node.name.clone(),
                kind: other.kind(),
            }),
        }
    }

    /// Build and validate the graph.
    ///
    /// Checks that every edge endpoint exists and node names are unique,
    /// then computes degree tables.
    pub fn build(self) -> GraphResult<Graph> {
        let names = validate::validate_structure(&self.nodes, &self.edges)?;

        let mut in_degree = vec![0; self.nodes.len()];
        let mut out_degree = vec![0; self.nodes.len()];
        for edge in &self.edges {
            out_degree[edge.from.slot()] += 1;
            in_degree[edge.to.slot()] += 1;
        }

        Ok(Graph {
            nodes: self.nodes,
            edges: self.edges,
            in_degree,
            out_degree,
            names,
        })
    }
}
