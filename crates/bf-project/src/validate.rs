//! Diagram validation logic.

use std::collections::HashSet;

use crate::schema::{Diagram, LATEST_VERSION, NodeKind};

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Duplicate ID: {id} in {context}")]
    DuplicateId { id: String, context: String },

    #[error("Missing reference: {id} in {context}")]
    MissingReference { id: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

pub fn validate_diagram(diagram: &Diagram) -> Result<(), ValidationError> {
    if diagram.version == 0 || diagram.version > LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: diagram.version,
        });
    }

    let mut node_ids = HashSet::new();
    for node in &diagram.nodes {
        if !node_ids.insert(node.id.as_str()) {
            return Err(ValidationError::DuplicateId {
                id: node.id.clone(),
                context: "nodes".to_string(),
            });
        }
    }

    for edge in &diagram.edges {
        for (id, end) in [(&edge.from, "from"), (&edge.to, "to")] {
            if !node_ids.contains(id.as_str()) {
                return Err(ValidationError::MissingReference {
                    id: id.clone(),
                    context: format!("edge {}", end),
                });
            }
        }
    }

    for node in &diagram.nodes {
        if let NodeKind::Sum { signs } = &node.kind {
            for source in signs.keys() {
                if !node_ids.contains(source.as_str()) {
                    return Err(ValidationError::MissingReference {
                        id: source.clone(),
                        context: format!("signs of sum '{}'", node.id),
                    });
                }
            }
        }
    }

    if let Some(sim) = &diagram.simulation {
        if !(sim.ts.is_finite() && sim.ts > 0.0) {
            return Err(ValidationError::InvalidValue {
                field: "simulation.ts".to_string(),
                value: sim.ts.to_string(),
                reason: "must be positive".to_string(),
            });
        }
        if sim.steps == 0 {
            return Err(ValidationError::InvalidValue {
                field: "simulation.steps".to_string(),
                value: "0".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
    }

    if let Some(red) = &diagram.reduction {
        for (id, end) in [(&red.start, "start"), (&red.end, "end")] {
            if !node_ids.contains(id.as_str()) {
                return Err(ValidationError::MissingReference {
                    id: id.clone(),
                    context: format!("reduction {}", end),
                });
            }
        }
    }

    Ok(())
}
