//! Signal combinators: signed summation and passthrough junctions.

use std::collections::BTreeMap;
use std::fmt;

use bf_core::NodeId;
use serde::{Deserialize, Serialize};

use crate::context::RunContext;
use crate::signal::{Signal, first_time};

/// Sign applied to one summing-junction input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sign {
    #[default]
    #[serde(rename = "+")]
    Plus,
    #[serde(rename = "-")]
    Minus,
}

impl Sign {
    pub fn factor(self) -> f64 {
        match self {
            Sign::Plus => 1.0,
            Sign::Minus => -1.0,
        }
    }
}

impl fmt::Display for Sign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sign::Plus => write!(f, "+"),
            Sign::Minus => write!(f, "-"),
        }
    }
}

/// Summing junction.
///
/// Inputs are weighted by the sign registered for the node that produced
/// them. Unregistered sources count as [`Sign::Plus`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sum {
    signs: BTreeMap<NodeId, Sign>,
}

impl Sum {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sign(mut self, source: NodeId, sign: Sign) -> Self {
        self.set_sign(source, sign);
        self
    }

    pub fn set_sign(&mut self, source: NodeId, sign: Sign) {
        self.signs.insert(source, sign);
    }

    pub fn sign_for(&self, source: NodeId) -> Sign {
        self.signs.get(&source).copied().unwrap_or_default()
    }

    pub fn signs(&self) -> &BTreeMap<NodeId, Sign> {
        &self.signs
    }

    pub fn execute(&mut self, inputs: &[Signal], ctx: &mut RunContext) -> Signal {
        let total: f64 = inputs
            .iter()
            .map(|s| {
                let sign = s.source.map_or(Sign::Plus, |id| self.sign_for(id));
                sign.factor() * s.value
            })
            .sum();
        ctx.emit(total, Some(first_time(inputs)))
    }
}

/// Passthrough node used to branch or merge wiring.
///
/// The forwarded value and time are those of the first input, but the
/// output is stamped with the junction's own id so downstream sums key
/// their signs on the junction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Junction;

impl Junction {
    pub fn execute(&mut self, inputs: &[Signal], ctx: &mut RunContext) -> Signal {
        match inputs.first() {
            Some(first) => ctx.emit(first.value, first.time),
            None => Signal::zero(),
        }
    }
}
