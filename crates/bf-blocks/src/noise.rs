//! Additive Gaussian noise.

use std::f64::consts::PI;

use crate::context::RunContext;
use crate::error::{BlockError, BlockResult};
use crate::signal::{Signal, first_time, first_value};

/// Box-Muller transform of two uniforms in (0, 1) into one normal sample.
pub fn box_muller(u1: f64, u2: f64, mean: f64, std: f64) -> f64 {
    let theta = 2.0 * PI * u1;
    let r = (-2.0 * u2.ln()).sqrt();
    r * theta.cos() * std + mean
}

/// Adds `N(mean, std^2)` noise to its input.
#[derive(Debug, Clone, PartialEq)]
pub struct NoiseInjector {
    pub mean: f64,
    pub std: f64,
}

impl NoiseInjector {
    pub fn new(mean: f64, std: f64) -> BlockResult<Self> {
        if !mean.is_finite() || !(std.is_finite() && std >= 0.0) {
            return Err(BlockError::InvalidArg {
                what: "noise mean must be finite and std non-negative",
            });
        }
        Ok(Self { mean, std })
    }

    pub fn execute(&mut self, inputs: &[Signal], ctx: &mut RunContext) -> Signal {
        let u1 = ctx.uniform_open();
        let u2 = ctx.uniform_open();
        let noise = box_muller(u1, u2, self.mean, self.std);
        ctx.emit(first_value(inputs) + noise, Some(first_time(inputs)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn box_muller_known_point() {
        // theta = 0, r = sqrt(-2 ln e^-0.5) = 1
        let v = box_muller(0.0, (-0.5f64).exp(), 3.0, 2.0);
        assert!((v - 5.0).abs() < 1e-12);
    }

    #[test]
    fn zero_std_is_pure_offset() {
        let mut n = NoiseInjector::new(0.25, 0.0).unwrap();
        let mut ctx = RunContext::seeded(9);
        let out = n.execute(&[Signal::new(1.0, Some(0.3), None)], &mut ctx);
        assert!((out.value - 1.25).abs() < 1e-12);
        assert_eq!(out.time, Some(0.3));
    }

    #[test]
    fn seeded_runs_repeat() {
        let mut n = NoiseInjector::new(0.0, 1.0).unwrap();
        let mut a = RunContext::seeded(1);
        let mut b = RunContext::seeded(1);
        for _ in 0..16 {
            let x = n.execute(&[], &mut a).value;
            let y = n.execute(&[], &mut b).value;
            assert!(x.is_finite());
            assert_eq!(x, y);
        }
    }

    #[test]
    fn sample_statistics() {
        let mut n = NoiseInjector::new(1.0, 0.5).unwrap();
        let mut ctx = RunContext::seeded(2024);
        let samples: Vec<f64> = (0..20_000).map(|_| n.execute(&[], &mut ctx).value).collect();
        let mean = samples.iter().sum::<f64>() / samples.len() as f64;
        let var = samples.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / samples.len() as f64;
        assert!((mean - 1.0).abs() < 0.03);
        assert!((var.sqrt() - 0.5).abs() < 0.03);
    }

    #[test]
    fn rejects_negative_std() {
        assert!(NoiseInjector::new(0.0, -1.0).is_err());
    }
}
