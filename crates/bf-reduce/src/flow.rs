//! Signal-flow graph construction.

use std::collections::BTreeMap;

use bf_blocks::Sign;
use bf_core::NodeId;
use bf_lti::TransferFunction;

use crate::error::{ReduceError, ReduceResult};
use crate::fusion::FusedGraph;

/// Weighted directed graph whose edge gains are transfer functions.
///
/// At most one edge exists per ordered node pair; parallel edges of the
/// source diagram are merged by adding their gains.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalFlowGraph {
    nodes: Vec<NodeId>,
    gains: BTreeMap<(NodeId, NodeId), TransferFunction>,
    successors: BTreeMap<NodeId, Vec<NodeId>>,
}

impl SignalFlowGraph {
    /// Build from a fused topology.
    ///
    /// Each edge carries the transfer function of its source block, or unity
    /// for non-dynamic sources. An edge into a summing junction is negated
    /// when the junction subtracts the edge's original source.
    pub fn from_fused(fused: &FusedGraph) -> Self {
        let mut nodes: Vec<NodeId> = fused.nodes.iter().map(|n| n.id).collect();
        nodes.sort();

        let mut gains: BTreeMap<(NodeId, NodeId), TransferFunction> = BTreeMap::new();
        let mut successors: BTreeMap<NodeId, Vec<NodeId>> = BTreeMap::new();

        for edge in &fused.edges {
            let source = fused.node(edge.from);
            let mut gain = source
                .and_then(|n| n.tf.clone())
                .unwrap_or_else(TransferFunction::unity);

            let sign = fused
                .node(edge.to)
                .and_then(|n| n.signs.as_ref())
                .and_then(|signs| signs.get(&edge.origin).copied())
                .unwrap_or_default();
            if sign == Sign::Minus {
                gain = gain.scale(-1.0);
            }

            match gains.get_mut(&(edge.from, edge.to)) {
                Some(existing) => *existing = existing.add(&gain),
                None => {
                    gains.insert((edge.from, edge.to), gain);
                    successors.entry(edge.from).or_default().push(edge.to);
                }
            }
        }

        Self {
            nodes,
            gains,
            successors,
        }
    }

    /// Flow nodes in ascending id order.
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.binary_search(&id).is_ok()
    }

    /// Distinct successors of `id`, in first-edge order.
    pub fn successors(&self, id: NodeId) -> &[NodeId] {
        self.successors.get(&id).map_or(&[], Vec::as_slice)
    }

    /// Gain of the edge `from -> to`.
    pub fn gain(&self, from: NodeId, to: NodeId) -> ReduceResult<&TransferFunction> {
        self.gains
            .get(&(from, to))
            .ok_or(ReduceError::EdgeNotFound { from, to })
    }

    /// Product of edge gains along consecutive nodes of `nodes`.
    ///
    /// With `closed` set, the edge from the last node back to the first is
    /// included (loop gain).
    pub fn chain_gain(&self, nodes: &[NodeId], closed: bool) -> ReduceResult<TransferFunction> {
        let mut gain = TransferFunction::unity();
        for pair in nodes.windows(2) {
            gain = gain.multiply(self.gain(pair[0], pair[1])?);
        }
        if closed {
            if let (Some(&last), Some(&first)) = (nodes.last(), nodes.first()) {
                gain = gain.multiply(self.gain(last, first)?);
            }
        }
        Ok(gain)
    }
}
