//! Execution ordering.

use std::collections::VecDeque;

use bf_core::NodeId;
use bf_graph::Graph;
use tracing::debug;

use crate::error::{SimError, SimResult};

/// Compute the order in which nodes execute within one step.
///
/// Kahn's algorithm with two kinds of dependency. Edges leaving a continuous
/// plant are soft: the plant already delays its output by one step, so a
/// consumer may run before it and read the previous step's value. Soft
/// edges are honored while possible and only relaxed when the queue runs
/// dry. The node released then is one that feeds the plant through hard
/// edges, so it closes the loop; consumers outside the loop still wait for
/// the plant. Every other edge is hard. Ties resolve in node insertion
/// order.
pub fn schedule(graph: &Graph) -> SimResult<Vec<NodeId>> {
    let n = graph.nodes().len();
    let mut adj: Vec<Vec<(NodeId, bool)>> = vec![Vec::new(); n];
    let mut hard = vec![0usize; n];
    let mut soft = vec![0usize; n];

    for edge in graph.edges() {
        let from_plant = graph.block(edge.from).is_some_and(|b| b.is_plant());
        adj[edge.from.slot()].push((edge.to, from_plant));
        if from_plant {
            soft[edge.to.slot()] += 1;
        } else {
            hard[edge.to.slot()] += 1;
        }
    }

    let feeds_plant = hard_ancestors_of_plants(graph, &adj);

    let mut queued = vec![false; n];
    let mut queue: VecDeque<NodeId> = VecDeque::new();
    for id in graph.node_ids() {
        if hard[id.slot()] == 0 && soft[id.slot()] == 0 {
            queued[id.slot()] = true;
            queue.push_back(id);
        }
    }

    let mut order = Vec::with_capacity(n);
    while order.len() < n {
        let Some(id) = queue.pop_front() else {
            // Break the loop at the first node held back only by plant edges
            // that also drives the plant.
            let relaxed = graph.node_ids().find(|id| {
                !queued[id.slot()] && hard[id.slot()] == 0 && feeds_plant[id.slot()]
            });
            match relaxed {
                Some(id) => {
                    debug!(node = graph.name(id), "relaxing plant edge to break loop");
                    queued[id.slot()] = true;
                    queue.push_back(id);
                    continue;
                }
                None => break,
            }
        };

        order.push(id);
        for &(next, from_plant) in &adj[id.slot()] {
            let deg = if from_plant {
                &mut soft[next.slot()]
            } else {
                &mut hard[next.slot()]
            };
            *deg = deg.saturating_sub(1);
            if !queued[next.slot()] && hard[next.slot()] == 0 && soft[next.slot()] == 0 {
                queued[next.slot()] = true;
                queue.push_back(next);
            }
        }
    }

    if order.len() != n {
        let unscheduled: Vec<String> = graph
            .node_ids()
            .filter(|id| !queued[id.slot()])
            .map(|id| graph.name(id).to_string())
            .collect();
        return Err(SimError::CycleDetected { unscheduled });
    }

    debug!(
        order = ?order.iter().map(|id| graph.name(*id)).collect::<Vec<_>>(),
        "execution order computed"
    );
    Ok(order)
}

/// Nodes with a path of hard edges into a plant, plants included.
fn hard_ancestors_of_plants(graph: &Graph, adj: &[Vec<(NodeId, bool)>]) -> Vec<bool> {
    let n = graph.nodes().len();
    let mut parents: Vec<Vec<NodeId>> = vec![Vec::new(); n];
    for (from, targets) in adj.iter().enumerate() {
        for &(to, from_plant) in targets {
            if !from_plant {
                parents[to.slot()].push(NodeId::from_index(from as u32));
            }
        }
    }

    let mut marked = vec![false; n];
    let mut stack = graph.plants();
    for id in &stack {
        marked[id.slot()] = true;
    }
    while let Some(id) = stack.pop() {
        for &parent in &parents[id.slot()] {
            if !marked[parent.slot()] {
                marked[parent.slot()] = true;
                stack.push(parent);
            }
        }
    }
    marked
}
