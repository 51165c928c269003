//! Core graph data structures.

use std::collections::HashMap;

use bf_blocks::Block;
use bf_core::NodeId;

/// A named block in the diagram.
#[derive(Debug, Clone)]
pub struct Node {
    pub id: NodeId,
    pub name: String,
    pub block: Block,
}

/// A directed connection carrying the output of `from` into `to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Edge {
    pub from: NodeId,
    pub to: NodeId,
}

impl Edge {
    pub fn new(from: NodeId, to: NodeId) -> Self {
        Self { from, to }
    }
}

/// The graph: a validated collection of nodes and ordered edges.
///
/// Nodes live in an arena indexed by their id. Edges hold ids only, so the
/// scheduler borrows blocks by lookup. Topology is fixed after
/// [`GraphBuilder::build`](crate::GraphBuilder::build); block state is not.
#[derive(Debug, Clone)]
pub struct Graph {
    pub(crate) nodes: Vec<Node>,
    pub(crate) edges: Vec<Edge>,
    pub(crate) in_degree: Vec<usize>,
    pub(crate) out_degree: Vec<usize>,
    pub(crate) names: HashMap<String, NodeId>,
}

impl Graph {
    /// Return all nodes in insertion order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Return all edges in insertion order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Iterate node ids in insertion order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.iter().map(|n| n.id)
    }

    /// Check whether an id refers to a node of this graph.
    pub fn contains(&self, id: NodeId) -> bool {
        id.slot() < self.nodes.len()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.slot())
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.slot())
    }

    pub fn block(&self, id: NodeId) -> Option<&Block> {
        self.node(id).map(|n| &n.block)
    }

    pub fn block_mut(&mut self, id: NodeId) -> Option<&mut Block> {
        self.node_mut(id).map(|n| &mut n.block)
    }

    /// Mutable access to every block, in insertion order.
    pub fn blocks_mut(&mut self) -> impl Iterator<Item = &mut Block> + '_ {
        self.nodes.iter_mut().map(|n| &mut n.block)
    }

    /// Look up a node id by name.
    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.names.get(name).copied()
    }

    /// Name of a node, or `"?"` for an unknown id.
    pub fn name(&self, id: NodeId) -> &str {
        self.node(id).map_or("?", |n| n.name.as_str())
    }

    pub fn in_degree(&self, id: NodeId) -> usize {
        self.in_degree.get(id.slot()).copied().unwrap_or(0)
    }

    pub fn out_degree(&self, id: NodeId) -> usize {
        self.out_degree.get(id.slot()).copied().unwrap_or(0)
    }

    /// Sources of the edges entering `id`, in edge order.
    ///
    /// A node connected twice appears twice.
    pub fn predecessors(&self, id: NodeId) -> Vec<NodeId> {
        self.edges
            .iter()
            .filter(|e| e.to == id)
            .map(|e| e.from)
            .collect()
    }

    /// Targets of the edges leaving `id`, in edge order.
    pub fn successors(&self, id: NodeId) -> Vec<NodeId> {
        self.edges
            .iter()
            .filter(|e| e.from == id)
            .map(|e| e.to)
            .collect()
    }

    /// Nodes holding a continuous plant.
    pub fn plants(&self) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|n| n.block.is_plant())
            .map(|n| n.id)
            .collect()
    }
}
