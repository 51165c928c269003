//! Sensor fusion blocks.
//!
//! Both blocks fuse all of their inputs in one step into a single estimate.
//! The output time follows the first input.

use std::cmp::Ordering;

use crate::context::RunContext;
use crate::error::{BlockError, BlockResult};
use crate::signal::{Signal, first_time};

/// Weighted mean of N inputs with weights normalized to sum to 1.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedAverage {
    weights: Vec<f64>,
}

impl WeightedAverage {
    /// # Errors
    ///
    /// Fails on empty or negative weights, or when the weights sum to zero.
    pub fn new(weights: Vec<f64>) -> BlockResult<Self> {
        Ok(Self {
            weights: normalize_weights(weights)?,
        })
    }

    pub fn set_weights(&mut self, weights: Vec<f64>) -> BlockResult<()> {
        self.weights = normalize_weights(weights)?;
        Ok(())
    }

    /// Normalized weights.
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Fuse raw values in input order.
    pub fn fuse(&self, values: &[f64]) -> BlockResult<f64> {
        if values.len() != self.weights.len() {
            return Err(BlockError::FusionInputMismatch {
                expected: self.weights.len(),
                actual: values.len(),
            });
        }
        Ok(values.iter().zip(&self.weights).map(|(x, w)| x * w).sum())
    }

    pub fn execute(&mut self, inputs: &[Signal], ctx: &mut RunContext) -> BlockResult<Signal> {
        let values: Vec<f64> = inputs.iter().map(|s| s.value).collect();
        let fused = self.fuse(&values)?;
        Ok(ctx.emit(fused, Some(first_time(inputs))))
    }
}

fn normalize_weights(weights: Vec<f64>) -> BlockResult<Vec<f64>> {
    if weights.is_empty() {
        return Err(BlockError::InvalidArg {
            what: "weights must not be empty",
        });
    }
    if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
        return Err(BlockError::InvalidArg {
            what: "weights must be finite and non-negative",
        });
    }
    let sum: f64 = weights.iter().sum();
    if sum == 0.0 {
        return Err(BlockError::InvalidArg {
            what: "weights must not sum to zero",
        });
    }
    Ok(weights.into_iter().map(|w| w / sum).collect())
}

/// Marzullo's interval-intersection estimate.
///
/// Every reading `x` is widened to `[x - r/2, x + r/2]` where `r` is the
/// sensor valid range. The estimate is the midpoint of the first region
/// covered by the largest number of intervals.
#[derive(Debug, Clone, PartialEq)]
pub struct Marzullo {
    valid_range: f64,
}

#[derive(Debug, Clone, Copy)]
enum Edge {
    Start,
    End,
}

impl Marzullo {
    pub fn new(valid_range: f64) -> BlockResult<Self> {
        if !(valid_range.is_finite() && valid_range >= 0.0) {
            return Err(BlockError::InvalidArg {
                what: "sensor valid range must be non-negative",
            });
        }
        Ok(Self { valid_range })
    }

    pub fn valid_range(&self) -> f64 {
        self.valid_range
    }

    /// Best estimate for a set of readings, or `None` with no readings.
    pub fn estimate(&self, readings: &[f64]) -> Option<f64> {
        if readings.is_empty() {
            return None;
        }
        let half = self.valid_range / 2.0;
        let mut edges: Vec<(f64, Edge)> = readings
            .iter()
            .flat_map(|x| [(x - half, Edge::Start), (x + half, Edge::End)])
            .collect();
        // Starts sort before ends at the same offset so touching intervals overlap.
        edges.sort_by(|a, b| {
            a.0.partial_cmp(&b.0)
                .unwrap_or(Ordering::Equal)
                .then_with(|| edge_rank(a.1).cmp(&edge_rank(b.1)))
        });

        let mut best = 0usize;
        let mut count = 0usize;
        let mut region = (0.0, 0.0);
        for pair in edges.windows(2) {
            let (offset, edge) = pair[0];
            match edge {
                Edge::Start => count += 1,
                Edge::End => count = count.saturating_sub(1),
            }
            if count > best {
                best = count;
                region = (offset, pair[1].0);
            }
        }
        Some((region.0 + region.1) / 2.0)
    }

    pub fn execute(&mut self, inputs: &[Signal], ctx: &mut RunContext) -> Signal {
        let readings: Vec<f64> = inputs.iter().map(|s| s.value).collect();
        let value = self.estimate(&readings).unwrap_or(0.0);
        ctx.emit(value, Some(first_time(inputs)))
    }
}

fn edge_rank(edge: Edge) -> u8 {
    match edge {
        Edge::Start => 0,
        Edge::End => 1,
    }
}
