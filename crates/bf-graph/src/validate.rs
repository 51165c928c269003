//! Graph validation logic.

use std::collections::HashMap;

use bf_blocks::BlockKind;
use bf_core::NodeId;

use crate::error::{GraphError, GraphResult};
use crate::graph::{Edge, Graph, Node};

/// Validate the graph structure: edge endpoints exist and names are unique.
///
/// Returns the name index on success.
pub(crate) fn validate_structure(
    nodes: &[Node],
    edges: &[Edge],
) -> GraphResult<HashMap<String, NodeId>> {
    for edge in edges {
        if edge.from.slot() >= nodes.len() || edge.to.slot() >= nodes.len() {
            return Err(GraphError::DanglingEdge {
                from: edge.from,
                to: edge.to,
            });
        }
    }

    let mut names = HashMap::with_capacity(nodes.len());
    for node in nodes {
        if names.insert(node.name.clone(), node.id).is_some() {
            return Err(GraphError::DuplicateName {
                name: node.name.clone(),
            });
        }
    }
    Ok(names)
}

/// Check the rules a graph must satisfy before it can be simulated.
///
/// - At most one `ContinuousPlant`
/// - Every `Sink` and `DiscretePID` has at most one incoming edge
pub fn validate_for_simulation(graph: &Graph) -> GraphResult<()> {
    let plants = graph.plants();
    if plants.len() > 1 {
        return Err(GraphError::MultiplePlants {
            count: plants.len(),
        });
    }

    for node in graph.nodes() {
        let kind = node.block.kind();
        if !matches!(kind, BlockKind::Sink | BlockKind::DiscretePid) {
            continue;
        }
        let in_degree = graph.in_degree(node.id);
        if in_degree > 1 {
            return Err(GraphError::FanIn {
                kind,
                node: node.id,
                name: node.name.clone(),
                in_degree,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GraphBuilder;
    use bf_blocks::{ContinuousPlant, DiscretePid, Generator, Sink};

    #[test]
    fn dangling_edge_rejected() {
        let mut builder = GraphBuilder::new();
        let a = builder.add_node("a", Generator::new(1.0));
        let ghost = NodeId::from_index(5);
        builder.connect(a, ghost);
        assert_eq!(
            builder.build().unwrap_err(),
            GraphError::DanglingEdge { from: a, to: ghost }
        );
    }

    #[test]
    fn duplicate_name_rejected() {
        let mut builder = GraphBuilder::new();
        builder.add_node("x", Generator::new(1.0));
        builder.add_node("x", Sink::new());
        assert!(matches!(
            builder.build(),
            Err(GraphError::DuplicateName { name }) if name == "x"
        ));
    }

    #[test]
    fn two_plants_rejected() {
        let mut builder = GraphBuilder::new();
        builder.add_node("p1", ContinuousPlant::new(vec![1.0], vec![1.0, 1.0]).unwrap());
        builder.add_node("p2", ContinuousPlant::new(vec![1.0], vec![1.0, 2.0]).unwrap());
        let graph = builder.build().unwrap();
        assert_eq!(
            validate_for_simulation(&graph),
            Err(GraphError::MultiplePlants { count: 2 })
        );
    }

    #[test]
    fn pid_fan_in_rejected() {
        let mut builder = GraphBuilder::new();
        let a = builder.add_node("a", Generator::new(1.0));
        let b = builder.add_node("b", Generator::new(2.0));
        let pid = builder.add_node("pid", DiscretePid::default());
        builder.connect(a, pid).connect(b, pid);
        let graph = builder.build().unwrap();

        let err = validate_for_simulation(&graph).unwrap_err();
        assert_eq!(
            err.to_string(),
            "DiscretePID 'pid' (2) has 2 inputs (at most one allowed)"
        );
    }

    #[test]
    fn single_input_sink_ok() {
        let mut builder = GraphBuilder::new();
        let a = builder.add_node("a", Generator::new(1.0));
        let s = builder.add_node("s", Sink::new());
        builder.connect(a, s);
        let graph = builder.build().unwrap();
        assert!(validate_for_simulation(&graph).is_ok());
    }
}
