//! Discrete PID controller block.
//!
//! The controller treats its single input as the error signal (the upstream
//! summing junction forms `setpoint - measurement`) and runs at a fixed
//! sample period `ts`:
//!
//! ```text
//! integral   = clamp(integral + e * ts, integral_min, integral_max)
//! derivative = (e - e_prev) / ts
//! u          = kp * e + ki * integral + kd * derivative
//! ```
//!
//! Anti-windup is integral clamping only; the output itself is never
//! saturated or back-calculated.

use crate::context::RunContext;
use crate::error::{BlockError, BlockResult};
use crate::signal::{Signal, first_time, first_value};

/// Discrete PID controller configuration and state.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscretePid {
    /// Proportional gain.
    pub kp: f64,
    /// Integral gain.
    pub ki: f64,
    /// Derivative gain.
    pub kd: f64,
    /// Sample period (seconds).
    pub ts: f64,
    /// Lower bound of the integral accumulator.
    pub integral_min: f64,
    /// Upper bound of the integral accumulator.
    pub integral_max: f64,
    state: DiscretePidState,
}

impl DiscretePid {
    /// Create a PID controller with integral limits `[-1, 1]`.
    ///
    /// # Arguments
    ///
    /// * `kp` - Proportional gain
    /// * `ki` - Integral gain
    /// * `kd` - Derivative gain
    /// * `ts` - Sample period (seconds)
    pub fn new(kp: f64, ki: f64, kd: f64, ts: f64) -> BlockResult<Self> {
        if !(kp.is_finite() && ki.is_finite() && kd.is_finite()) {
            return Err(BlockError::InvalidArg {
                what: "PID gains must be finite",
            });
        }
        validate_period(ts)?;
        Ok(Self {
            kp,
            ki,
            kd,
            ts,
            integral_min: -1.0,
            integral_max: 1.0,
            state: DiscretePidState::default(),
        })
    }

    /// Set the integral clamping range.
    pub fn with_integral_limits(mut self, min: f64, max: f64) -> BlockResult<Self> {
        if min.is_nan() || max.is_nan() || min > max {
            return Err(BlockError::InvalidArg {
                what: "integral_min must not exceed integral_max",
            });
        }
        self.integral_min = min;
        self.integral_max = max;
        Ok(self)
    }

    /// Current integral accumulator and previous error.
    pub fn state(&self) -> &DiscretePidState {
        &self.state
    }

    /// Compute controller output for one sample.
    ///
    /// # Returns
    ///
    /// Updated state and output value.
    pub fn update(&self, state: &DiscretePidState, error: f64) -> (DiscretePidState, f64) {
        let integral = (state.integral + error * self.ts).clamp(self.integral_min, self.integral_max);
        let derivative = (error - state.last_error) / self.ts;

        let p_term = self.kp * error;
        let i_term = self.ki * integral;
        let d_term = self.kd * derivative;

        let new_state = DiscretePidState {
            integral,
            last_error: error,
        };
        (new_state, p_term + i_term + d_term)
    }

    pub fn execute(&mut self, inputs: &[Signal], ctx: &mut RunContext) -> Signal {
        let (state, output) = self.update(&self.state, first_value(inputs));
        self.state = state;
        ctx.emit(output, Some(first_time(inputs)))
    }

    pub fn init(&mut self) {
        self.state = DiscretePidState::default();
    }

    pub fn set_sampling_period(&mut self, ts: f64) {
        self.ts = ts;
    }
}

impl Default for DiscretePid {
    fn default() -> Self {
        Self {
            kp: 2.0,
            ki: 1.0,
            kd: 0.01,
            ts: 0.01,
            integral_min: -1.0,
            integral_max: 1.0,
            state: DiscretePidState::default(),
        }
    }
}

/// PID controller state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiscretePidState {
    /// Integral accumulator.
    pub integral: f64,
    /// Error seen on the previous sample.
    pub last_error: f64,
}

pub(crate) fn validate_period(ts: f64) -> BlockResult<()> {
    if !(ts.is_finite() && ts > 0.0) {
        return Err(BlockError::InvalidArg {
            what: "sample period must be positive and finite",
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn error_signal(e: f64) -> Signal {
        Signal::new(e, Some(0.0), None)
    }

    #[test]
    fn pid_creation() {
        let pid = DiscretePid::new(2.0, 1.0, 0.01, 0.01).unwrap();
        assert_eq!(pid.kp, 2.0);
        assert_eq!(pid.integral_max, 1.0);
        assert_eq!(pid.state(), &DiscretePidState::default());
    }

    #[test]
    fn proportional_only() {
        let pid = DiscretePid::new(3.0, 0.0, 0.0, 0.1).unwrap();
        let (_, output) = pid.update(&DiscretePidState::default(), 0.5);
        assert!((output - 1.5).abs() < 1e-12);
    }

    #[test]
    fn first_sample_includes_integral_and_derivative() {
        let pid = DiscretePid::new(2.0, 1.0, 0.01, 0.01).unwrap();
        let (state, output) = pid.update(&DiscretePidState::default(), 2.0);
        // P = 4, I = 1 * 0.02, D = 0.01 * 200
        assert!((state.integral - 0.02).abs() < 1e-12);
        assert_eq!(state.last_error, 2.0);
        assert!((output - 6.02).abs() < 1e-9);
    }

    #[test]
    fn integral_clamps_exactly_at_max() {
        let mut pid = DiscretePid::new(0.0, 1.0, 0.0, 0.1)
            .unwrap()
            .with_integral_limits(-0.5, 0.5)
            .unwrap();
        let mut ctx = RunContext::default();
        for _ in 0..100 {
            pid.execute(&[error_signal(1.0)], &mut ctx);
            assert!(pid.state().integral <= 0.5);
        }
        assert_eq!(pid.state().integral, 0.5);
        let out = pid.execute(&[error_signal(1.0)], &mut ctx);
        assert_eq!(out.value, 0.5);
    }

    #[test]
    fn integral_clamps_at_min() {
        let mut pid = DiscretePid::default();
        let mut ctx = RunContext::default();
        for _ in 0..1000 {
            pid.execute(&[error_signal(-3.0)], &mut ctx);
        }
        assert_eq!(pid.state().integral, -1.0);
    }

    #[test]
    fn missing_input_reads_as_zero_error() {
        let mut pid = DiscretePid::default();
        let mut ctx = RunContext::default();
        let out = pid.execute(&[], &mut ctx);
        assert_eq!(out.value, 0.0);
        assert_eq!(out.time, Some(0.0));
    }

    #[test]
    fn init_resets_state() {
        let mut pid = DiscretePid::default();
        let mut ctx = RunContext::default();
        pid.execute(&[error_signal(1.0)], &mut ctx);
        assert_ne!(pid.state(), &DiscretePidState::default());
        pid.init();
        assert_eq!(pid.state(), &DiscretePidState::default());
    }

    #[test]
    fn invalid_params() {
        assert!(DiscretePid::new(1.0, 1.0, 0.0, 0.0).is_err());
        assert!(DiscretePid::new(f64::NAN, 1.0, 0.0, 0.1).is_err());
        assert!(
            DiscretePid::default()
                .with_integral_limits(1.0, -1.0)
                .is_err()
        );
    }
}
