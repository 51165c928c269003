//! Direct-form difference equations.
//!
//! ```text
//! y[n] = sum_i num[i] x[n-i] - sum_{i>=1} den[i] y[n-i]
//! ```
//!
//! `den[0]` is assumed to be 1 and is never applied.

use crate::error::{LtiError, LtiResult};
use crate::transfer::TransferFunction;

/// Stateful difference equation with fixed-size delay lines.
#[derive(Debug, Clone, PartialEq)]
pub struct DifferenceEquation {
    num: Vec<f64>,
    den: Vec<f64>,
    /// Most recent input first; length `num.len()`.
    x_history: Vec<f64>,
    /// Most recent output first; length `den.len() - 1`.
    y_history: Vec<f64>,
}

impl DifferenceEquation {
    /// Create a difference equation with zeroed delay lines.
    ///
    /// # Errors
    ///
    /// Fails if `den` is empty.
    pub fn new(num: Vec<f64>, den: Vec<f64>) -> LtiResult<Self> {
        if den.is_empty() {
            return Err(LtiError::InvalidTransferFunction {
                what: "filter denominator must not be empty",
            });
        }
        let x_history = vec![0.0; num.len()];
        let y_history = vec![0.0; den.len() - 1];
        Ok(Self {
            num,
            den,
            x_history,
            y_history,
        })
    }

    /// Build from a transfer function in `z`.
    pub fn from_transfer_function(tf: &TransferFunction) -> LtiResult<Self> {
        Self::new(tf.num().to_vec(), tf.den().to_vec())
    }

    pub fn num(&self) -> &[f64] {
        &self.num
    }

    pub fn den(&self) -> &[f64] {
        &self.den
    }

    pub fn x_history(&self) -> &[f64] {
        &self.x_history
    }

    pub fn y_history(&self) -> &[f64] {
        &self.y_history
    }

    /// Zero both delay lines.
    pub fn reset(&mut self) {
        self.x_history.iter_mut().for_each(|v| *v = 0.0);
        self.y_history.iter_mut().for_each(|v| *v = 0.0);
    }

    /// Push one input sample and return the new output.
    pub fn step(&mut self, input: f64) -> f64 {
        shift_in(&mut self.x_history, input);

        let x_term: f64 = self
            .num
            .iter()
            .zip(&self.x_history)
            .map(|(b, x)| b * x)
            .sum();
        let y_term: f64 = self
            .den
            .iter()
            .skip(1)
            .zip(&self.y_history)
            .map(|(a, y)| a * y)
            .sum();
        let output = x_term - y_term;

        shift_in(&mut self.y_history, output);
        output
    }
}

fn shift_in(line: &mut [f64], value: f64) {
    if line.is_empty() {
        return;
    }
    line.rotate_right(1);
    line[0] = value;
}

/// Run a whole sequence through a fresh difference equation.
pub fn filter(signal: &[f64], tf: &TransferFunction) -> LtiResult<Vec<f64>> {
    let mut eq = DifferenceEquation::from_transfer_function(tf)?;
    Ok(signal.iter().map(|&x| eq.step(x)).collect())
}

/// Response to a unit impulse followed by `size` zeros.
pub fn impulse_response(tf: &TransferFunction, size: usize) -> LtiResult<Vec<f64>> {
    let mut impulse = vec![0.0; size + 1];
    impulse[0] = 1.0;
    filter(&impulse, tf)
}
