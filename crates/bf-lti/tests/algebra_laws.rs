//! Property tests for polynomial and transfer-function algebra.

use bf_core::Tolerances;
use bf_lti::{TransferFunction, convolve};
use proptest::prelude::*;

fn coeffs(max_len: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(-10.0_f64..10.0, 1..=max_len)
}

fn close(a: &[f64], b: &[f64]) -> bool {
    a.len() == b.len()
        && a
            .iter()
            .zip(b)
            .all(|(x, y)| (x - y).abs() <= 1e-9 * (1.0 + x.abs().max(y.abs())))
}

proptest! {
    #[test]
    fn convolution_length(a in coeffs(6), b in coeffs(6)) {
        prop_assert_eq!(convolve(&a, &b).len(), a.len() + b.len() - 1);
    }

    #[test]
    fn convolution_commutes(a in coeffs(6), b in coeffs(6)) {
        prop_assert!(close(&convolve(&a, &b), &convolve(&b, &a)));
    }

    #[test]
    fn convolution_associates(a in coeffs(4), b in coeffs(4), c in coeffs(4)) {
        let left = convolve(&convolve(&a, &b), &c);
        let right = convolve(&a, &convolve(&b, &c));
        prop_assert!(close(&left, &right));
    }

    #[test]
    fn divide_then_multiply_round_trips(
        an in coeffs(3),
        bn in coeffs(3),
        a_tail in coeffs(3),
        b_tail in coeffs(3),
    ) {
        prop_assume!(bn.iter().any(|c| c.abs() > 1e-3));
        let mut ad = vec![1.0];
        ad.extend(a_tail);
        let mut bd = vec![1.0];
        bd.extend(b_tail);
        let a = TransferFunction::new(an, ad).unwrap();
        let b = TransferFunction::new(bn, bd).unwrap();
        let round_trip = a.divide(&b).unwrap().multiply(&b);
        prop_assert!(round_trip.is_equivalent(&a, Tolerances::loose()));
    }
}

#[test]
fn scalar_convolution() {
    assert_eq!(convolve(&[3.0], &[-2.0]), vec![-6.0]);
}
