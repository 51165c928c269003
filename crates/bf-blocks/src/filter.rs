//! Discrete filter block.

use bf_lti::{DifferenceEquation, TransferFunction};

use crate::context::RunContext;
use crate::error::BlockResult;
use crate::signal::{Signal, first_time, first_value};

/// Direct-form filter driven by one input sample per step.
#[derive(Debug, Clone, PartialEq)]
pub struct DigitalFilter {
    tf: TransferFunction,
    equation: DifferenceEquation,
}

impl DigitalFilter {
    pub fn new(num: Vec<f64>, den: Vec<f64>) -> BlockResult<Self> {
        Self::from_transfer_function(TransferFunction::new(num, den)?)
    }

    pub fn from_transfer_function(tf: TransferFunction) -> BlockResult<Self> {
        let equation = DifferenceEquation::from_transfer_function(&tf)?;
        Ok(Self { tf, equation })
    }

    pub fn transfer_function(&self) -> &TransferFunction {
        &self.tf
    }

    pub fn equation(&self) -> &DifferenceEquation {
        &self.equation
    }

    pub fn execute(&mut self, inputs: &[Signal], ctx: &mut RunContext) -> Signal {
        let y = self.equation.step(first_value(inputs));
        ctx.emit(y, Some(first_time(inputs)))
    }

    pub fn init(&mut self) {
        self.equation.reset();
    }
}
