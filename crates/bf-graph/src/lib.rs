//! bf-graph: graph/model layer for blockflow.
//!
//! Provides:
//! - An arena of named [`Block`](bf_blocks::Block) nodes keyed by `NodeId`
//! - An ordered list of directed edges with degree bookkeeping
//! - Incremental graph builder with structural validation
//! - Pre-simulation validation rules
//!
//! # Example
//!
//! ```
//! use bf_blocks::{Generator, Sink};
//! use bf_graph::GraphBuilder;
//!
//! let mut builder = GraphBuilder::new();
//! let src = builder.add_node("src", Generator::new(1.0));
//! let out = builder.add_node("out", Sink::new());
//! builder.connect(src, out);
//! let graph = builder.build().unwrap();
//!
//! assert_eq!(graph.nodes().len(), 2);
//! assert_eq!(graph.in_degree(out), 1);
//! ```

pub mod builder;
pub mod error;
pub mod graph;
pub mod validate;

pub use builder::GraphBuilder;
pub use error::{GraphError, GraphResult};
pub use graph::{Edge, Graph, Node};
pub use validate::validate_for_simulation;
