//! Diagram to graph conversion.

use std::collections::BTreeMap;

use bf_blocks::{
    Block, BlockError, ContinuousPlant, DigitalFilter, DiscretePid, Generator, Junction,
    Marzullo, NoiseInjector, Sink, Sum, WeightedAverage,
};
use bf_core::NodeId;
use bf_graph::{Graph, GraphBuilder};

use crate::schema::{Diagram, NodeKind};
use crate::validate::{ValidationError, validate_diagram};
use crate::{ProjectError, ProjectResult};

/// Map from diagram node id to graph node id.
pub type NodeIndex = BTreeMap<String, NodeId>;

impl Diagram {
    /// Build a simulation/reduction graph.
    ///
    /// Graph node names are the diagram node ids.
    pub fn to_graph(&self) -> ProjectResult<(Graph, NodeIndex)> {
        validate_diagram(self)?;

        let mut builder = GraphBuilder::new();
        let mut index = NodeIndex::new();
        for node in &self.nodes {
            let block = build_block(&node.kind).map_err(|source| ProjectError::Block {
                id: node.id.clone(),
                source,
            })?;
            let id = builder.add_node(node.id.clone(), block);
            index.insert(node.id.clone(), id);
        }

        for edge in &self.edges {
            builder.connect(lookup(&index, &edge.from)?, lookup(&index, &edge.to)?);
        }

        for node in &self.nodes {
            if let NodeKind::Sum { signs } = &node.kind {
                for (source, sign) in signs {
                    builder.set_sign(lookup(&index, &node.id)?, lookup(&index, source)?, *sign)?;
                }
            }
        }

        Ok((builder.build()?, index))
    }
}

fn lookup(index: &NodeIndex, id: &str) -> ProjectResult<NodeId> {
    index.get(id).copied().ok_or_else(|| {
        ValidationError::MissingReference {
            id: id.to_string(),
            context: "graph construction".to_string(),
        }
        .into()
    })
}

fn build_block(kind: &NodeKind) -> Result<Block, BlockError> {
    let block: Block = match kind {
        NodeKind::Generator { value } => Generator::new(*value).into(),
        NodeKind::Sum { .. } => Sum::new().into(),
        NodeKind::DiscretePid {
            kp,
            ki,
            kd,
            ts,
            integral_min,
            integral_max,
        } => DiscretePid::new(*kp, *ki, *kd, *ts)?
            .with_integral_limits(*integral_min, *integral_max)?
            .into(),
        NodeKind::DigitalFilter { num, den } => DigitalFilter::new(num.clone(), den.clone())?.into(),
        NodeKind::ContinuousPlant { num, den, dt } => {
            let plant = ContinuousPlant::new(num.clone(), den.clone())?;
            match dt {
                Some(dt) => plant.with_dt(*dt)?.into(),
                None => plant.into(),
            }
        }
        NodeKind::NoiseInjector { mean, std } => NoiseInjector::new(*mean, *std)?.into(),
        NodeKind::Sink => Sink::new().into(),
        NodeKind::Junction => Junction.into(),
        NodeKind::WeightedAverage { weights } => WeightedAverage::new(weights.clone())?.into(),
        NodeKind::Marzullo { valid_range } => Marzullo::new(*valid_range)?.into(),
    };
    Ok(block)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{EdgeDef, NodeDef};
    use bf_blocks::{BlockKind, Sign};

    #[test]
    fn builds_graph_with_signs() {
        let mut signs = BTreeMap::new();
        signs.insert("fb".to_string(), Sign::Minus);
        let diagram = Diagram {
            version: 1,
            name: "signs".to_string(),
            nodes: vec![
                NodeDef {
                    id: "fb".to_string(),
                    kind: NodeKind::Generator { value: 1.0 },
                },
                NodeDef {
                    id: "sum".to_string(),
                    kind: NodeKind::Sum { signs },
                },
            ],
            edges: vec![EdgeDef {
                from: "fb".to_string(),
                to: "sum".to_string(),
            }],
            simulation: None,
            reduction: None,
        };

        let (graph, index) = diagram.to_graph().unwrap();
        assert_eq!(graph.nodes().len(), 2);
        assert_eq!(graph.find("sum"), Some(index["sum"]));
        match graph.block(index["sum"]) {
            Some(Block::Sum(sum)) => assert_eq!(sum.sign_for(index["fb"]), Sign::Minus),
            other => panic!("expected sum, got {other:?}"),
        }
    }

    #[test]
    fn block_errors_name_the_node() {
        let diagram = Diagram {
            version: 1,
            name: "bad".to_string(),
            nodes: vec![NodeDef {
                id: "avg".to_string(),
                kind: NodeKind::WeightedAverage { weights: vec![] },
            }],
            edges: vec![],
            simulation: None,
            reduction: None,
        };
        let err = diagram.to_graph().unwrap_err();
        assert!(matches!(err, ProjectError::Block { ref id, .. } if id == "avg"));
    }

    #[test]
    fn every_kind_builds() {
        let kinds = [
            (NodeKind::Generator { value: 1.0 }, BlockKind::Generator),
            (
                NodeKind::DiscretePid {
                    kp: 1.0,
                    ki: 0.0,
                    kd: 0.0,
                    ts: 0.1,
                    integral_min: -2.0,
                    integral_max: 2.0,
                },
                BlockKind::DiscretePid,
            ),
            (
                NodeKind::ContinuousPlant {
                    num: vec![1.0],
                    den: vec![1.0, 1.0],
                    dt: Some(0.001),
                },
                BlockKind::ContinuousPlant,
            ),
            (NodeKind::Marzullo { valid_range: 1.0 }, BlockKind::Marzullo),
            (NodeKind::Junction, BlockKind::Junction),
        ];
        for (kind, expected) in kinds {
            assert_eq!(build_block(&kind).unwrap().kind(), expected);
        }
    }
}
