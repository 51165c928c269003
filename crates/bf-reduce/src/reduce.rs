//! Mason's gain formula driver.

use std::fmt;

use bf_core::NodeId;
use bf_graph::Graph;
use bf_lti::TransferFunction;
use tracing::{debug, info};

use crate::delta::{Loop, determinant, touches};
use crate::error::{ReduceError, ReduceResult};
use crate::flow::SignalFlowGraph;
use crate::fusion::FusedGraph;
use crate::paths::{elementary_loops, forward_paths};

/// A forward path with its gain and cofactor.
#[derive(Debug, Clone, PartialEq)]
pub struct PathGain {
    pub nodes: Vec<NodeId>,
    pub gain: TransferFunction,
    /// `Δk`: determinant over loops that touch no node of this path.
    pub cofactor: TransferFunction,
}

/// Full account of one reduction.
#[derive(Debug, Clone, PartialEq)]
pub struct Reduction {
    pub start: NodeId,
    pub end: NodeId,
    /// Number of cascade fusions performed.
    pub fusions: usize,
    /// Node count of the fused signal-flow graph.
    pub flow_nodes: usize,
    pub paths: Vec<PathGain>,
    pub loops: Vec<Loop>,
    pub delta: TransferFunction,
    pub transfer_function: TransferFunction,
}

/// Reduce the subsystem between `start` and `end` to one transfer function.
///
/// The graph itself is left untouched.
pub fn reduce(graph: &Graph, start: NodeId, end: NodeId) -> ReduceResult<Reduction> {
    for node in [start, end] {
        if !graph.contains(node) {
            return Err(ReduceError::UnknownNode { node });
        }
    }

    let mut fused = FusedGraph::from_graph(graph);
    let fusions = fused.fuse_cascades(&[start, end]);
    let sfg = SignalFlowGraph::from_fused(&fused);
    debug!(
        fusions,
        nodes = sfg.nodes().len(),
        "signal-flow graph built"
    );

    let loops = elementary_loops(&sfg)
        .into_iter()
        .map(|nodes| {
            let gain = sfg.chain_gain(&nodes, true)?;
            Ok(Loop { nodes, gain })
        })
        .collect::<ReduceResult<Vec<_>>>()?;

    let mut paths = Vec::new();
    for nodes in forward_paths(&sfg, start, end) {
        let gain = sfg.chain_gain(&nodes, false)?;
        let untouched: Vec<Loop> = loops
            .iter()
            .filter(|l| !touches(&l.nodes, &nodes))
            .cloned()
            .collect();
        let cofactor = determinant(&untouched);
        paths.push(PathGain {
            nodes,
            gain,
            cofactor,
        });
    }
    debug!(paths = paths.len(), loops = loops.len(), "enumeration done");

    let delta = determinant(&loops);
    let numerator = paths
        .iter()
        .map(|p| p.gain.multiply(&p.cofactor))
        .reduce(|acc, term| acc.add(&term))
        .unwrap_or_else(TransferFunction::zero);
    let transfer_function = numerator.divide(&delta)?;
    info!(%transfer_function, "reduction complete");

    Ok(Reduction {
        start,
        end,
        fusions,
        flow_nodes: sfg.nodes().len(),
        paths,
        loops,
        delta,
        transfer_function,
    })
}

/// Closed-form transfer function from `start` to `end`.
pub fn transfer_function(graph: &Graph, start: NodeId, end: NodeId) -> ReduceResult<TransferFunction> {
    reduce(graph, start, end).map(|r| r.transfer_function)
}

fn write_nodes(f: &mut fmt::Formatter<'_>, nodes: &[NodeId]) -> fmt::Result {
    let joined: Vec<String> = nodes.iter().map(|n| n.to_string()).collect();
    write!(f, "{}", joined.join(" -> "))
}

impl fmt::Display for Reduction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Reduction {} -> {}", self.start, self.end)?;
        writeln!(
            f,
            "  fused cascades: {}, flow nodes: {}",
            self.fusions, self.flow_nodes
        )?;
        writeln!(f, "  forward paths: {}", self.paths.len())?;
        for p in &self.paths {
            write!(f, "    ")?;
            write_nodes(f, &p.nodes)?;
            writeln!(f, "  P = {}  Δk = {}", p.gain, p.cofactor)?;
        }
        writeln!(f, "  loops: {}", self.loops.len())?;
        for l in &self.loops {
            write!(f, "    ")?;
            write_nodes(f, &l.nodes)?;
            writeln!(f, "  L = {}", l.gain)?;
        }
        writeln!(f, "  Δ = {}", self.delta)?;
        write!(f, "  T = {}", self.transfer_function)
    }
}
