//! Signal sources.

use crate::context::RunContext;
use crate::signal::Signal;

/// Constant source. Its output carries no time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Generator {
    pub value: f64,
}

impl Generator {
    pub fn new(value: f64) -> Self {
        Self { value }
    }

    pub fn execute(&mut self, _inputs: &[Signal], ctx: &mut RunContext) -> Signal {
        ctx.emit(self.value, None)
    }
}
