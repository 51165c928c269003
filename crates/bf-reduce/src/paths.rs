//! Forward path and loop enumeration.

use std::collections::BTreeSet;

use bf_core::NodeId;

use crate::flow::SignalFlowGraph;

/// All simple paths from `start` to `end`, found by depth-first search.
///
/// A path never revisits a node. When `start == end` the single-node path
/// is returned.
pub fn forward_paths(sfg: &SignalFlowGraph, start: NodeId, end: NodeId) -> Vec<Vec<NodeId>> {
    let mut paths = Vec::new();
    let mut stack = vec![start];
    if start == end {
        paths.push(stack);
        return paths;
    }
    walk_paths(sfg, end, &mut stack, &mut paths);
    paths
}

fn walk_paths(
    sfg: &SignalFlowGraph,
    end: NodeId,
    stack: &mut Vec<NodeId>,
    paths: &mut Vec<Vec<NodeId>>,
) {
    let Some(&current) = stack.last() else {
        return;
    };
    for &next in sfg.successors(current) {
        if next == end {
            let mut path = stack.clone();
            path.push(end);
            paths.push(path);
        } else if !stack.contains(&next) {
            stack.push(next);
            walk_paths(sfg, end, stack, paths);
            stack.pop();
        }
    }
}

/// All elementary cycles, each rotated to start at its smallest id.
///
/// Cycles are searched from every node; rotations found from different
/// starting points collapse onto the same canonical key.
pub fn elementary_loops(sfg: &SignalFlowGraph) -> Vec<Vec<NodeId>> {
    let mut seen: BTreeSet<Vec<NodeId>> = BTreeSet::new();
    let mut loops = Vec::new();
    for &origin in sfg.nodes() {
        let mut stack = vec![origin];
        walk_loops(sfg, origin, &mut stack, &mut |cycle| {
            let key = canonical(cycle);
            if seen.insert(key.clone()) {
                loops.push(key);
            }
        });
    }
    loops
}

fn walk_loops(
    sfg: &SignalFlowGraph,
    origin: NodeId,
    stack: &mut Vec<NodeId>,
    found: &mut dyn FnMut(&[NodeId]),
) {
    let Some(&current) = stack.last() else {
        return;
    };
    for &next in sfg.successors(current) {
        if next == origin {
            found(stack);
        } else if !stack.contains(&next) {
            stack.push(next);
            walk_loops(sfg, origin, stack, found);
            stack.pop();
        }
    }
}

/// Rotate a cycle so its smallest id comes first.
fn canonical(cycle: &[NodeId]) -> Vec<NodeId> {
    let pivot = cycle
        .iter()
        .enumerate()
        .min_by_key(|(_, id)| **id)
        .map_or(0, |(i, _)| i);
    let mut key = cycle.to_vec();
    key.rotate_left(pivot);
    key
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fusion::FusedGraph;
    use bf_blocks::Junction;
    use bf_graph::GraphBuilder;

    fn sfg(n: usize, edges: &[(u32, u32)]) -> (SignalFlowGraph, Vec<NodeId>) {
        let mut b = GraphBuilder::new();
        let ids: Vec<NodeId> = (0..n).map(|i| b.add_node(format!("n{i}"), Junction)).collect();
        for &(from, to) in edges {
            b.connect(ids[from as usize], ids[to as usize]);
        }
        let graph = b.build().unwrap();
        (SignalFlowGraph::from_fused(&FusedGraph::from_graph(&graph)), ids)
    }

    #[test]
    fn diamond_has_two_paths() {
        let (g, ids) = sfg(4, &[(0, 1), (0, 2), (1, 3), (2, 3)]);
        let paths = forward_paths(&g, ids[0], ids[3]);
        assert_eq!(
            paths,
            vec![vec![ids[0], ids[1], ids[3]], vec![ids[0], ids[2], ids[3]]]
        );
        assert!(elementary_loops(&g).is_empty());
    }

    #[test]
    fn paths_do_not_revisit_nodes() {
        let (g, ids) = sfg(3, &[(0, 1), (1, 0), (1, 2)]);
        assert_eq!(forward_paths(&g, ids[0], ids[2]), vec![vec![ids[0], ids[1], ids[2]]]);
    }

    #[test]
    fn loops_are_canonical_and_deduplicated() {
        // Two loops sharing node 1: 1->2->1 and 0->1->3->0, plus a self-loop on 3.
        let (g, ids) = sfg(4, &[(0, 1), (1, 2), (2, 1), (1, 3), (3, 0), (3, 3)]);
        let loops = elementary_loops(&g);
        assert_eq!(loops.len(), 3);
        assert!(loops.contains(&vec![ids[1], ids[2]]));
        assert!(loops.contains(&vec![ids[0], ids[1], ids[3]]));
        assert!(loops.contains(&vec![ids[3]]));
    }

    #[test]
    fn canonical_rotation() {
        let ids: Vec<NodeId> = (0..3).map(NodeId::from_index).collect();
        assert_eq!(canonical(&[ids[2], ids[0], ids[1]]), ids);
    }
}
