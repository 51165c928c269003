//! Diagram file schema.
//!
//! ```yaml
//! version: 1
//! name: Closed loop
//! nodes:
//!   - id: ref
//!     kind: { type: Generator, value: 2.0 }
//!   - id: err
//!     kind: { type: Sum, signs: { plant: "-" } }
//! edges:
//!   - { from: ref, to: err }
//! simulation: { ts: 0.01, steps: 100 }
//! reduction: { start: ref, end: plant }
//! ```

use std::collections::BTreeMap;

use bf_blocks::Sign;
use serde::{Deserialize, Serialize};

/// Newest diagram format version understood by this crate.
pub const LATEST_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Diagram {
    pub version: u32,
    pub name: String,
    #[serde(default)]
    pub nodes: Vec<NodeDef>,
    #[serde(default)]
    pub edges: Vec<EdgeDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub simulation: Option<SimulationDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reduction: Option<ReductionDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NodeDef {
    pub id: String,
    pub kind: NodeKind,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum NodeKind {
    Generator {
        value: f64,
    },
    Sum {
        /// Source node id -> `"+"` or `"-"`. Unlisted sources add.
        #[serde(default)]
        signs: BTreeMap<String, Sign>,
    },
    #[serde(rename = "DiscretePID", alias = "DiscretePid")]
    DiscretePid {
        kp: f64,
        ki: f64,
        kd: f64,
        ts: f64,
        #[serde(default = "default_integral_min")]
        integral_min: f64,
        #[serde(default = "default_integral_max")]
        integral_max: f64,
    },
    DigitalFilter {
        num: Vec<f64>,
        den: Vec<f64>,
    },
    ContinuousPlant {
        num: Vec<f64>,
        den: Vec<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        dt: Option<f64>,
    },
    NoiseInjector {
        mean: f64,
        std: f64,
    },
    Sink,
    Junction,
    WeightedAverage {
        weights: Vec<f64>,
    },
    Marzullo {
        valid_range: f64,
    },
}

fn default_integral_min() -> f64 {
    -1.0
}

fn default_integral_max() -> f64 {
    1.0
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EdgeDef {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimulationDef {
    #[serde(default = "default_ts")]
    pub ts: f64,
    #[serde(default = "default_steps")]
    pub steps: usize,
    #[serde(default)]
    pub seed: u64,
}

impl Default for SimulationDef {
    fn default() -> Self {
        Self {
            ts: default_ts(),
            steps: default_steps(),
            seed: 0,
        }
    }
}

fn default_ts() -> f64 {
    0.01
}

fn default_steps() -> usize {
    100
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReductionDef {
    pub start: String,
    pub end: String,
}
