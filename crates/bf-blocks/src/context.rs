//! Run-scoped execution context.

use bf_core::NodeId;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::signal::Signal;

/// State shared by all blocks for the duration of one run.
///
/// The scheduler owns one context per run and points it at each node before
/// executing it, so blocks can stamp their output with their own id.
#[derive(Debug, Clone)]
pub struct RunContext {
    rng: ChaCha8Rng,
    node: Option<NodeId>,
}

impl RunContext {
    /// Create a context with a deterministic random stream.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            node: None,
        }
    }

    /// Point the context at the node about to execute.
    pub fn enter(&mut self, node: NodeId) {
        self.node = Some(node);
    }

    /// Node currently executing, if any.
    pub fn node(&self) -> Option<NodeId> {
        self.node
    }

    /// Build an output signal stamped with the executing node.
    pub fn emit(&self, value: f64, time: Option<f64>) -> Signal {
        Signal::new(value, time, self.node)
    }

    /// Uniform draw from the open interval (0, 1).
    pub fn uniform_open(&mut self) -> f64 {
        self.rng.gen_range(f64::MIN_POSITIVE..1.0)
    }
}

impl Default for RunContext {
    fn default() -> Self {
        Self::seeded(0)
    }
}
