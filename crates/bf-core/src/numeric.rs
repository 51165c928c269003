use crate::{CoreError, CoreResult};

/// Floating point type used throughout system
pub type Real = f64;

/// One tolerance for everything
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

impl Tolerances {
    /// Looser tolerance for values that went through long convolution chains.
    pub fn loose() -> Self {
        Self {
            abs: 1e-9,
            rel: 1e-6,
        }
    }
}

pub fn ensure_finite(v: Real, what: &'static str) -> CoreResult<Real> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(CoreError::NonFinite { what, value: v })
    }
}

/// Check every element of a coefficient slice is finite.
pub fn ensure_all_finite(values: &[Real], what: &'static str) -> CoreResult<()> {
    for &v in values {
        ensure_finite(v, what)?;
    }
    Ok(())
}

/// Round to two decimals, the resolution used for recorded trace times.
pub fn round_centi(v: Real) -> Real {
    (v * 100.0).round() / 100.0
}
