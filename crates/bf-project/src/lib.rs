//! bf-project: diagram file format, validation and graph construction.

pub mod convert;
pub mod schema;
pub mod validate;

pub use convert::NodeIndex;
pub use schema::*;
pub use validate::{ValidationError, validate_diagram};

use bf_blocks::BlockError;
use bf_graph::GraphError;

pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Node '{id}': {source}")]
    Block {
        id: String,
        #[source]
        source: BlockError,
    },

    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn load_yaml(path: &std::path::Path) -> ProjectResult<Diagram> {
    let content = std::fs::read_to_string(path)?;
    let diagram: Diagram = serde_yaml::from_str(&content)?;
    validate_diagram(&diagram)?;
    Ok(diagram)
}

pub fn save_yaml(path: &std::path::Path, diagram: &Diagram) -> ProjectResult<()> {
    validate_diagram(diagram)?;
    let content = serde_yaml::to_string(diagram)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_json(path: &std::path::Path) -> ProjectResult<Diagram> {
    let content = std::fs::read_to_string(path)?;
    let diagram: Diagram = serde_json::from_str(&content)?;
    validate_diagram(&diagram)?;
    Ok(diagram)
}

pub fn save_json(path: &std::path::Path, diagram: &Diagram) -> ProjectResult<()> {
    validate_diagram(diagram)?;
    let content = serde_json::to_string_pretty(diagram)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Load a diagram, choosing the format from the file extension.
///
/// `.json` is read as JSON; anything else as YAML.
pub fn load(path: &std::path::Path) -> ProjectResult<Diagram> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => load_json(path),
        _ => load_yaml(path),
    }
}
