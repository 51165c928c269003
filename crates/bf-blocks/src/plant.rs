//! Continuous-time plant integrated with forward-Euler micro-steps.

use bf_lti::{StateSpace, TransferFunction};
use nalgebra::DVector;

use crate::context::RunContext;
use crate::controller::validate_period;
use crate::error::BlockResult;
use crate::signal::{Signal, first_value};

/// Continuous plant `num(s) / den(s)` realized in controllable canonical form.
///
/// Each call to [`execute`](ContinuousPlant::execute) holds the input
/// constant over one sampling period and integrates it in
/// `round(sampling_period / dt)` Euler micro-steps.
#[derive(Debug, Clone)]
pub struct ContinuousPlant {
    tf: TransferFunction,
    ss: StateSpace,
    dt: f64,
    sampling_period: f64,
    steps_per_sample: usize,
    x: DVector<f64>,
    t: f64,
    outputs: Vec<f64>,
    sampled_outputs: Vec<f64>,
}

impl ContinuousPlant {
    /// Create a plant with `dt = sampling_period = 0.01`.
    ///
    /// # Errors
    ///
    /// Fails if the transfer function has no state-space realization
    /// (empty numerator, or a denominator of fewer than two coefficients).
    pub fn new(num: Vec<f64>, den: Vec<f64>) -> BlockResult<Self> {
        let tf = TransferFunction::new(num, den)?;
        Self::from_transfer_function(tf)
    }

    pub fn from_transfer_function(tf: TransferFunction) -> BlockResult<Self> {
        let ss = tf.to_state_space()?;
        let x = ss.zero_state();
        Ok(Self {
            tf,
            ss,
            dt: 0.01,
            sampling_period: 0.01,
            steps_per_sample: 1,
            x,
            t: 0.0,
            outputs: vec![0.0],
            sampled_outputs: Vec::new(),
        })
    }

    /// Override the integration step.
    pub fn with_dt(mut self, dt: f64) -> BlockResult<Self> {
        validate_period(dt)?;
        self.dt = dt;
        self.steps_per_sample = steps_between(self.sampling_period, dt);
        Ok(self)
    }

    pub fn transfer_function(&self) -> &TransferFunction {
        &self.tf
    }

    pub fn state_space(&self) -> &StateSpace {
        &self.ss
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    pub fn sampling_period(&self) -> f64 {
        self.sampling_period
    }

    pub fn steps_per_sample(&self) -> usize {
        self.steps_per_sample
    }

    /// Integration time reached so far.
    pub fn time(&self) -> f64 {
        self.t
    }

    /// State vector.
    pub fn state(&self) -> &DVector<f64> {
        &self.x
    }

    /// Every micro-step output, starting with the zero initial sample.
    pub fn outputs(&self) -> &[f64] {
        &self.outputs
    }

    /// Outputs recorded on sampling-period boundaries.
    pub fn sampled_outputs(&self) -> &[f64] {
        &self.sampled_outputs
    }

    pub fn execute(&mut self, inputs: &[Signal], ctx: &mut RunContext) -> Signal {
        let u = first_value(inputs);
        for _ in 0..self.steps_per_sample {
            let y = self.ss.output(&self.x, u);
            self.outputs.push(y);
            if self.outputs.len() % self.steps_per_sample == 0 {
                self.sampled_outputs.push(y);
            }
            let x_dot = self.ss.derivative(&self.x, u);
            self.x += x_dot * self.dt;
            self.t += self.dt;
        }

        let last = self.outputs.last().copied().unwrap_or(0.0);
        ctx.emit(last, Some(self.t))
    }

    pub fn init(&mut self) {
        self.x = self.ss.zero_state();
        self.t = 0.0;
        self.outputs.clear();
        self.outputs.push(0.0);
        self.sampled_outputs.clear();
    }

    pub fn set_sampling_period(&mut self, ts: f64) {
        self.sampling_period = ts;
        self.steps_per_sample = steps_between(ts, self.dt);
    }
}

fn steps_between(period: f64, dt: f64) -> usize {
    ((period / dt).round() as usize).max(1)
}
