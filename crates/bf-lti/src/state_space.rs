//! Transfer function to state-space conversion.
//!
//! The realization is the controllable canonical form used by the
//! continuous plant block:
//!
//! ```text
//! dx/dt = A x + B u
//! y     = C x + D u
//! ```
//!
//! with `A` holding ones on the superdiagonal and the negated, reversed
//! denominator tail in its last row, `B = [0 .. 0 num[0]]^T`,
//! `C = [num[0] .. num[N-1]]` (zero-padded) and `D = 0`.

use nalgebra::{DMatrix, DVector};

use crate::error::{LtiError, LtiResult};

/// Single-input single-output state-space model.
#[derive(Debug, Clone, PartialEq)]
pub struct StateSpace {
    /// State matrix (N x N).
    pub a: DMatrix<f64>,
    /// Input matrix (N x 1).
    pub b: DMatrix<f64>,
    /// Output matrix (1 x N).
    pub c: DMatrix<f64>,
    /// Direct feedthrough.
    pub d: f64,
}

impl StateSpace {
    /// Build the controllable canonical realization of `num / den`.
    ///
    /// Both polynomials are divided by `den[0]` first when it is not 1.
    ///
    /// # Errors
    ///
    /// Fails if `num` is empty, `den` has fewer than two coefficients, or
    /// `den[0]` is zero.
    pub fn from_coefficients(num: &[f64], den: &[f64]) -> LtiResult<Self> {
        if num.is_empty() || den.len() < 2 {
            return Err(LtiError::InvalidTransferFunction {
                what: "state-space conversion needs a numerator and at least two denominator terms",
            });
        }
        let lead = den[0];
        if lead == 0.0 {
            return Err(LtiError::InvalidTransferFunction {
                what: "leading denominator coefficient is zero",
            });
        }
        let num: Vec<f64> = num.iter().map(|c| c / lead).collect();
        let den: Vec<f64> = den.iter().map(|c| c / lead).collect();

        let n = den.len() - 1;

        let mut a = DMatrix::<f64>::zeros(n, n);
        for col in 0..n {
            if col > 0 {
                a[(col - 1, col)] = 1.0;
            }
            a[(n - 1, col)] = -den[n - col];
        }

        let mut b = DMatrix::<f64>::zeros(n, 1);
        b[(n - 1, 0)] = num[0];

        let mut c = DMatrix::<f64>::zeros(1, n);
        for (i, coeff) in num.iter().take(n).enumerate() {
            c[(0, i)] = *coeff;
        }

        Ok(Self { a, b, c, d: 0.0 })
    }

    /// Number of states.
    pub fn order(&self) -> usize {
        self.a.nrows()
    }

    /// Zero initial state of matching dimension.
    pub fn zero_state(&self) -> DVector<f64> {
        DVector::zeros(self.order())
    }

    /// Output equation `y = C x + D u`.
    pub fn output(&self, x: &DVector<f64>, u: f64) -> f64 {
        (&self.c * x)[0] + self.d * u
    }

    /// State derivative `A x + B u`.
    pub fn derivative(&self, x: &DVector<f64>, u: f64) -> DVector<f64> {
        &self.a * x + self.b.column(0) * u
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_order_realization() {
        let ss = StateSpace::from_coefficients(&[2.0, 5.0], &[1.0, 3.0, 2.0]).unwrap();
        assert_eq!(ss.order(), 2);
        assert_eq!(ss.a, DMatrix::from_row_slice(2, 2, &[0.0, 1.0, -2.0, -3.0]));
        assert_eq!(ss.b, DMatrix::from_row_slice(2, 1, &[0.0, 2.0]));
        assert_eq!(ss.c, DMatrix::from_row_slice(1, 2, &[2.0, 5.0]));
        assert_eq!(ss.d, 0.0);
    }

    #[test]
    fn normalizes_leading_coefficient() {
        let ss = StateSpace::from_coefficients(&[4.0, 10.0], &[2.0, 6.0, 4.0]).unwrap();
        assert_eq!(ss.a, DMatrix::from_row_slice(2, 2, &[0.0, 1.0, -2.0, -3.0]));
        assert_eq!(ss.c, DMatrix::from_row_slice(1, 2, &[2.0, 5.0]));
    }

    #[test]
    fn first_order_realization() {
        let ss = StateSpace::from_coefficients(&[1.0], &[1.0, 4.0]).unwrap();
        assert_eq!(ss.a, DMatrix::from_row_slice(1, 1, &[-4.0]));
        assert_eq!(ss.b, DMatrix::from_row_slice(1, 1, &[1.0]));
        assert_eq!(ss.c, DMatrix::from_row_slice(1, 1, &[1.0]));
    }

    #[test]
    fn rejects_degenerate_coefficients() {
        assert!(StateSpace::from_coefficients(&[], &[1.0, 2.0]).is_err());
        assert!(StateSpace::from_coefficients(&[1.0], &[1.0]).is_err());
        assert!(StateSpace::from_coefficients(&[1.0], &[0.0, 1.0]).is_err());
    }

    #[test]
    fn derivative_and_output() {
        let ss = StateSpace::from_coefficients(&[2.0, 5.0], &[1.0, 3.0, 2.0]).unwrap();
        let x = DVector::from_vec(vec![1.0, -1.0]);
        let dx = ss.derivative(&x, 0.5);
        assert_eq!(dx, DVector::from_vec(vec![-1.0, 2.0]));
        assert_eq!(ss.output(&x, 0.5), -3.0);
    }
}
