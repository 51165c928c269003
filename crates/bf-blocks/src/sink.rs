//! Recording block.

use bf_core::round_centi;

use crate::context::RunContext;
use crate::signal::Signal;

/// Records every timed input as a `(time, value)` pair.
///
/// Times are rounded to the nearest hundredth of a second so traces line up
/// across nodes. Untimed inputs are ignored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sink {
    trace: Vec<(f64, f64)>,
}

impl Sink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trace(&self) -> &[(f64, f64)] {
        &self.trace
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.trace.iter().map(|(_, v)| *v)
    }

    pub fn execute(&mut self, inputs: &[Signal], ctx: &mut RunContext) -> Signal {
        for input in inputs {
            if let Some(t) = input.time {
                self.trace.push((round_centi(t), input.value));
            }
        }
        ctx.emit(0.0, Some(0.0))
    }

    pub fn init(&mut self) {
        self.trace.clear();
    }
}
