//! Run parameters.

use crate::error::{SimError, SimResult};

/// Options for one simulation run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimOptions {
    /// Step period handed to every block (seconds)
    pub ts: f64,
    /// Number of steps to execute
    pub steps: usize,
    /// Seed for the run's random stream
    pub seed: u64,
}

impl Default for SimOptions {
    fn default() -> Self {
        Self {
            ts: 0.01,
            steps: 100,
            seed: 0,
        }
    }
}

impl SimOptions {
    pub fn validate(&self) -> SimResult<()> {
        if !(self.ts.is_finite() && self.ts > 0.0) {
            return Err(SimError::InvalidOption {
                what: "ts must be positive and finite",
            });
        }
        if self.steps == 0 {
            return Err(SimError::InvalidOption {
                what: "steps must be at least 1",
            });
        }
        Ok(())
    }
}
