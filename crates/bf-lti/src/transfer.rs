//! Rational transfer function algebra.
//!
//! A [`TransferFunction`] is a ratio of two polynomials in descending powers
//! of `s` (continuous) or `z` (discrete); the algebra does not care which.
//! Composition never cancels common factors, so degrees grow with every
//! operation. Compare results with [`TransferFunction::is_equivalent`], not
//! by coefficient equality.

use std::fmt;
use std::ops::{Add, Div, Mul};

use bf_core::{Tolerances, ensure_all_finite};

use crate::error::{LtiError, LtiResult};
use crate::poly::{add_aligned, convolve, horner, is_zero};
use crate::state_space::StateSpace;

/// Rational transfer function `num / den`.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferFunction {
    num: Vec<f64>,
    den: Vec<f64>,
}

impl TransferFunction {
    /// Create a transfer function.
    ///
    /// # Errors
    ///
    /// Fails if `den` is empty or identically zero, or if any coefficient is
    /// not finite.
    pub fn new(num: Vec<f64>, den: Vec<f64>) -> LtiResult<Self> {
        if den.is_empty() {
            return Err(LtiError::InvalidTransferFunction {
                what: "denominator must not be empty",
            });
        }
        if is_zero(&den) {
            return Err(LtiError::InvalidTransferFunction {
                what: "denominator must not be identically zero",
            });
        }
        ensure_all_finite(&num, "numerator coefficient")?;
        ensure_all_finite(&den, "denominator coefficient")?;
        Ok(Self { num, den })
    }

    /// Unity gain `1/1`.
    pub fn unity() -> Self {
        Self::gain(1.0)
    }

    /// Zero gain `0/1`.
    pub fn zero() -> Self {
        Self::gain(0.0)
    }

    /// Static gain `k/1`.
    pub fn gain(k: f64) -> Self {
        Self {
            num: vec![k],
            den: vec![1.0],
        }
    }

    /// Numerator coefficients, descending powers.
    pub fn num(&self) -> &[f64] {
        &self.num
    }

    /// Denominator coefficients, descending powers.
    pub fn den(&self) -> &[f64] {
        &self.den
    }

    /// Product of two transfer functions (series connection).
    pub fn multiply(&self, other: &Self) -> Self {
        Self {
            num: convolve(&self.num, &other.num),
            den: convolve(&self.den, &other.den),
        }
    }

    /// Sum of two transfer functions (parallel connection).
    pub fn add(&self, other: &Self) -> Self {
        let lhs = convolve(&self.num, &other.den);
        let rhs = convolve(&other.num, &self.den);
        Self {
            num: add_aligned(&lhs, &rhs),
            den: convolve(&self.den, &other.den),
        }
    }

    /// Quotient `self / other`.
    ///
    /// # Errors
    ///
    /// Fails with [`LtiError::DivisionByZero`] when `other` has an
    /// identically zero numerator.
    pub fn divide(&self, other: &Self) -> LtiResult<Self> {
        if is_zero(&other.num) {
            return Err(LtiError::DivisionByZero);
        }
        Ok(Self {
            num: convolve(&self.num, &other.den),
            den: convolve(&self.den, &other.num),
        })
    }

    /// Scale the numerator by `k`.
    pub fn scale(&self, k: f64) -> Self {
        Self {
            num: self.num.iter().map(|c| c * k).collect(),
            den: self.den.clone(),
        }
    }

    /// Divide numerator and denominator by the leading denominator term.
    ///
    /// # Errors
    ///
    /// Fails if `den[0]` is zero.
    pub fn normalized(&self) -> LtiResult<Self> {
        let lead = self.den[0];
        if lead == 0.0 {
            return Err(LtiError::InvalidTransferFunction {
                what: "leading denominator coefficient is zero",
            });
        }
        if lead == 1.0 {
            return Ok(self.clone());
        }
        Ok(Self {
            num: self.num.iter().map(|c| c / lead).collect(),
            den: self.den.iter().map(|c| c / lead).collect(),
        })
    }

    /// Evaluate at a real point `x`.
    pub fn eval(&self, x: f64) -> f64 {
        horner(&self.num, x) / horner(&self.den, x)
    }

    /// DC gain of a continuous-time transfer function (`s = 0`).
    pub fn dc_gain(&self) -> f64 {
        self.eval(0.0)
    }

    /// Rational equivalence: `a.num * b.den == b.num * a.den` coefficient-wise.
    ///
    /// The absolute tolerance is scaled by the largest coefficient magnitude
    /// so long composition chains can still be compared.
    pub fn is_equivalent(&self, other: &Self, tol: Tolerances) -> bool {
        let lhs = convolve(&self.num, &other.den);
        let rhs = convolve(&other.num, &self.den);
        let diff = add_aligned(&lhs, &rhs.iter().map(|c| -c).collect::<Vec<_>>());
        let magnitude = lhs
            .iter()
            .chain(rhs.iter())
            .fold(0.0_f64, |m, c| m.max(c.abs()));
        diff.iter()
            .all(|d| d.abs() <= tol.abs + tol.rel * magnitude)
    }

    /// Controllable canonical state-space realization.
    pub fn to_state_space(&self) -> LtiResult<StateSpace> {
        StateSpace::from_coefficients(&self.num, &self.den)
    }
}

impl Default for TransferFunction {
    fn default() -> Self {
        Self::unity()
    }
}

impl Mul for &TransferFunction {
    type Output = TransferFunction;

    fn mul(self, rhs: &TransferFunction) -> TransferFunction {
        self.multiply(rhs)
    }
}

impl Add for &TransferFunction {
    type Output = TransferFunction;

    fn add(self, rhs: &TransferFunction) -> TransferFunction {
        TransferFunction::add(self, rhs)
    }
}

impl Div for &TransferFunction {
    type Output = LtiResult<TransferFunction>;

    fn div(self, rhs: &TransferFunction) -> LtiResult<TransferFunction> {
        self.divide(rhs)
    }
}

fn write_poly(f: &mut fmt::Formatter<'_>, coeffs: &[f64]) -> fmt::Result {
    write!(f, "[")?;
    for (i, c) in coeffs.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{c}")?;
    }
    write!(f, "]")
}

impl fmt::Display for TransferFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_poly(f, &self.num)?;
        write!(f, " / ")?;
        write_poly(f, &self.den)
    }
}
