//! Cascade fusion of serial dynamic blocks.

use std::collections::BTreeMap;

use bf_blocks::{Block, Sign};
use bf_core::NodeId;
use bf_graph::Graph;
use bf_lti::TransferFunction;
use tracing::debug;

/// A block of the reduction copy.
#[derive(Debug, Clone, PartialEq)]
pub struct FusedNode {
    pub id: NodeId,
    /// Transfer function of a dynamic block, `None` otherwise.
    pub tf: Option<TransferFunction>,
    /// Signs of a summing junction keyed by original source node.
    pub signs: Option<BTreeMap<NodeId, Sign>>,
    /// Original nodes folded into this one, in series order.
    pub members: Vec<NodeId>,
}

/// Edge of the reduction copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FusedEdge {
    pub from: NodeId,
    pub to: NodeId,
    /// Original source node, kept across fusion for sign lookup.
    pub origin: NodeId,
}

/// Topology copy on which cascade fusion has been performed.
#[derive(Debug, Clone, PartialEq)]
pub struct FusedGraph {
    pub nodes: Vec<FusedNode>,
    pub edges: Vec<FusedEdge>,
}

impl FusedGraph {
    /// Copy the topology and transfer functions of `graph`.
    pub fn from_graph(graph: &Graph) -> Self {
        let nodes = graph
            .nodes()
            .iter()
            .map(|n| FusedNode {
                id: n.id,
                tf: n.block.transfer_function().cloned(),
                signs: match &n.block {
                    Block::Sum(sum) => Some(sum.signs().clone()),
                    _ => None,
                },
                members: vec![n.id],
            })
            .collect();
        let edges = graph
            .edges()
            .iter()
            .map(|e| FusedEdge {
                from: e.from,
                to: e.to,
                origin: e.from,
            })
            .collect();
        Self { nodes, edges }
    }

    pub fn node(&self, id: NodeId) -> Option<&FusedNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn out_degree(&self, id: NodeId) -> usize {
        self.edges.iter().filter(|e| e.from == id).count()
    }

    pub fn in_degree(&self, id: NodeId) -> usize {
        self.edges.iter().filter(|e| e.to == id).count()
    }

    fn is_dynamic(&self, id: NodeId) -> bool {
        self.node(id).is_some_and(|n| n.tf.is_some())
    }

    /// Repeatedly fuse serial dynamic pairs until none remain.
    ///
    /// A pair `A -> B` fuses when both are dynamic, `A` has exactly one
    /// outgoing edge, `B` has exactly one incoming edge, and neither is one
    /// of `protected` (the reduction's start and end). The fused block gets
    /// a fresh id above every existing one.
    pub fn fuse_cascades(&mut self, protected: &[NodeId]) -> usize {
        let mut next_index = self
            .nodes
            .iter()
            .map(|n| n.id.index() + 1)
            .max()
            .unwrap_or(0);
        let mut fused = 0;

        while let Some(pos) = self.edges.iter().position(|e| self.can_fuse(e, protected)) {
            let edge = self.edges.remove(pos);
            let (Some(a), Some(b)) = (self.take(edge.from), self.take(edge.to)) else {
                break;
            };
            let (Some(tf_a), Some(tf_b)) = (&a.tf, &b.tf) else {
                break;
            };

            let id = NodeId::from_index(next_index);
            next_index += 1;
            debug!(a = %a.id, b = %b.id, fused = %id, "fusing cascade");

            let tf = tf_a.multiply(tf_b);
            let mut members = a.members;
            members.extend(b.members);
            self.nodes.push(FusedNode {
                id,
                tf: Some(tf),
                signs: None,
                members,
            });
            for e in &mut self.edges {
                if e.from == a.id || e.from == b.id {
                    e.from = id;
                }
                if e.to == a.id || e.to == b.id {
                    e.to = id;
                }
            }
            fused += 1;
        }
        fused
    }

    fn can_fuse(&self, e: &FusedEdge, protected: &[NodeId]) -> bool {
        e.from != e.to
            && !protected.contains(&e.from)
            && !protected.contains(&e.to)
            && self.is_dynamic(e.from)
            && self.is_dynamic(e.to)
            && self.out_degree(e.from) == 1
            && self.in_degree(e.to) == 1
    }

    fn take(&mut self, id: NodeId) -> Option<FusedNode> {
        let pos = self.nodes.iter().position(|n| n.id == id)?;
        Some(self.nodes.remove(pos))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bf_blocks::{DigitalFilter, Junction};
    use bf_core::Tolerances;
    use bf_graph::GraphBuilder;

    fn filt(k: f64) -> DigitalFilter {
        DigitalFilter::new(vec![k], vec![1.0, 0.5]).unwrap()
    }

    #[test]
    fn serial_filters_fuse() {
        let mut b = GraphBuilder::new();
        let s = b.add_node("s", Junction);
        let f1 = b.add_node("f1", filt(2.0));
        let f2 = b.add_node("f2", filt(3.0));
        let e = b.add_node("e", Junction);
        b.connect(s, f1).connect(f1, f2).connect(f2, e);
        let graph = b.build().unwrap();

        let mut fg = FusedGraph::from_graph(&graph);
        assert_eq!(fg.fuse_cascades(&[s, e]), 1);
        assert_eq!(fg.nodes.len(), 3);
        assert_eq!(fg.edges.len(), 2);

        let fused = fg.nodes.last().unwrap();
        assert_eq!(fused.id.index(), 4);
        assert_eq!(fused.members, vec![f1, f2]);
        let expected = filt(2.0)
            .transfer_function()
            .multiply(filt(3.0).transfer_function());
        assert!(fused.tf.as_ref().unwrap().is_equivalent(&expected, Tolerances::default()));
        assert_eq!(fg.edges[0].to, fused.id);
        assert_eq!(fg.edges[1].from, fused.id);
        assert_eq!(fg.edges[1].origin, f2);
    }

    #[test]
    fn protected_nodes_are_not_fused() {
        let mut b = GraphBuilder::new();
        let f1 = b.add_node("f1", filt(2.0));
        let f2 = b.add_node("f2", filt(3.0));
        b.connect(f1, f2);
        let graph = b.build().unwrap();

        let mut fg = FusedGraph::from_graph(&graph);
        assert_eq!(fg.fuse_cascades(&[f1, f2]), 0);
        assert_eq!(fg.nodes.len(), 2);
    }

    #[test]
    fn branching_blocks_fusion() {
        // f1 feeds two blocks, so it cannot fuse forward.
        let mut b = GraphBuilder::new();
        let f1 = b.add_node("f1", filt(1.0));
        let f2 = b.add_node("f2", filt(1.0));
        let j = b.add_node("j", Junction);
        b.connect(f1, f2).connect(f1, j);
        let graph = b.build().unwrap();

        let mut fg = FusedGraph::from_graph(&graph);
        assert_eq!(fg.fuse_cascades(&[]), 0);
    }

    #[test]
    fn two_block_ring_becomes_self_loop() {
        let mut b = GraphBuilder::new();
        let s = b.add_node("s", Junction);
        let f1 = b.add_node("f1", filt(1.0));
        let f2 = b.add_node("f2", filt(1.0));
        b.connect(s, f1).connect(f1, f2).connect(f2, f1);
        let graph = b.build().unwrap();

        let mut fg = FusedGraph::from_graph(&graph);
        // f1 has in-degree 2, but f2 -> f1 is not needed: f1 -> f2 fuses.
        assert_eq!(fg.fuse_cascades(&[s]), 1);
        let fused = fg.nodes.last().unwrap().id;
        assert!(fg.edges.iter().any(|e| e.from == fused && e.to == fused));
    }
}
