//! Signal values exchanged between blocks.

use bf_core::NodeId;

/// One timestamped scalar produced by a block during a simulation step.
///
/// Signals are plain values: once produced they are copied, never mutated.
/// A `time` of `None` marks a signal that does not take part in time
/// bookkeeping (constant sources).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Signal {
    /// Scalar value.
    pub value: f64,
    /// Simulation time the value belongs to, in seconds.
    pub time: Option<f64>,
    /// Node that produced the signal.
    pub source: Option<NodeId>,
}

impl Signal {
    /// Create a signal.
    pub fn new(value: f64, time: Option<f64>, source: Option<NodeId>) -> Self {
        Self {
            value,
            time,
            source,
        }
    }

    /// Zero-valued signal at time zero with no source.
    pub fn zero() -> Self {
        Self::new(0.0, Some(0.0), None)
    }

    /// Time of this signal, treating an untimed signal as `t = 0`.
    pub fn time_or_zero(&self) -> f64 {
        self.time.unwrap_or(0.0)
    }
}

impl Default for Signal {
    fn default() -> Self {
        Self::zero()
    }
}

/// Value of the first input, or 0 when there is none.
pub(crate) fn first_value(inputs: &[Signal]) -> f64 {
    inputs.first().map_or(0.0, |s| s.value)
}

/// Time of the first input, or 0 when there is none or it is untimed.
pub(crate) fn first_time(inputs: &[Signal]) -> f64 {
    inputs.first().map_or(0.0, Signal::time_or_zero)
}
