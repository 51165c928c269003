//! Polynomial helpers.
//!
//! Coefficients are stored in descending powers: `[1.0, 3.0, 2.0]` is
//! `x^2 + 3x + 2`.

/// Polynomial multiplication by discrete convolution.
///
/// The result has `a.len() + b.len() - 1` coefficients. An empty operand
/// yields an empty product.
pub fn convolve(a: &[f64], b: &[f64]) -> Vec<f64> {
    if a.is_empty() || b.is_empty() {
        return Vec::new();
    }
    let mut out = vec![0.0; a.len() + b.len() - 1];
    for (i, &ai) in a.iter().enumerate() {
        for (j, &bj) in b.iter().enumerate() {
            out[i + j] += ai * bj;
        }
    }
    out
}

/// Add two polynomials of possibly different degree.
///
/// The shorter operand is zero-padded on the high-power side so that constant
/// terms line up.
pub fn add_aligned(a: &[f64], b: &[f64]) -> Vec<f64> {
    let len = a.len().max(b.len());
    let mut out = vec![0.0; len];
    for (k, &v) in a.iter().enumerate() {
        out[len - a.len() + k] += v;
    }
    for (k, &v) in b.iter().enumerate() {
        out[len - b.len() + k] += v;
    }
    out
}

/// Evaluate a polynomial at `x` using Horner's scheme.
pub fn horner(coeffs: &[f64], x: f64) -> f64 {
    coeffs.iter().fold(0.0, |acc, &c| acc * x + c)
}

/// True when every coefficient is exactly zero (or there are none).
pub fn is_zero(coeffs: &[f64]) -> bool {
    coeffs.iter().all(|&c| c == 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn convolve_scalars() {
        assert_eq!(convolve(&[3.0], &[4.0]), vec![12.0]);
    }

    #[test]
    fn convolve_binomials() {
        // (x + 1)(x + 2) = x^2 + 3x + 2
        assert_eq!(convolve(&[1.0, 1.0], &[1.0, 2.0]), vec![1.0, 3.0, 2.0]);
    }

    #[test]
    fn convolve_empty_operand() {
        assert!(convolve(&[], &[1.0, 2.0]).is_empty());
    }

    #[test]
    fn add_aligned_pads_high_powers() {
        // (x + 1) + 1 = x + 2
        assert_eq!(add_aligned(&[1.0, 1.0], &[1.0]), vec![1.0, 2.0]);
        assert_eq!(add_aligned(&[2.0], &[1.0, 0.0, 3.0]), vec![1.0, 0.0, 5.0]);
    }

    #[test]
    fn horner_matches_expansion() {
        // 2x^2 - x + 5 at x = 3
        assert_eq!(horner(&[2.0, -1.0, 5.0], 3.0), 20.0);
        assert_eq!(horner(&[], 3.0), 0.0);
    }
}
