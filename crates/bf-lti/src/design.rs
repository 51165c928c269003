//! Digital filter design.
//!
//! FIR filters come from windowing an ideal impulse response or from a
//! weighted least-squares fit of a linear-phase response. IIR filters start
//! from an analog Butterworth or Chebyshev type I prototype and are mapped
//! to the `z` domain with the bilinear transform (`s = 2 (z - 1) / (z + 1)`).
//!
//! Digital cutoffs are in radians per sample, in `(0, π)`. Band edges for
//! the least-squares design are fractions of Nyquist, in `[0, 1]`.

use std::f64::consts::PI;

use nalgebra::{Complex, DMatrix, DVector};

use crate::error::{LtiError, LtiResult};
use crate::poly::{add_aligned, convolve};
use crate::transfer::TransferFunction;

/// Frequency grid size used by [`least_squares_fir`].
const LS_GRID: usize = 4098;

/// Bilinear transform constant (`2 / T` with `T = 1`).
const BILINEAR_K: f64 = 2.0;

/// Tapering window applied to an ideal impulse response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Window {
    Rectangular,
    Bartlett,
    Hann,
    Hamming,
}

impl Window {
    /// `m` window coefficients. Windows shorter than two samples are all ones.
    pub fn coefficients(self, m: usize) -> Vec<f64> {
        if m < 2 {
            return vec![1.0; m];
        }
        let span = (m - 1) as f64;
        (0..m)
            .map(|i| {
                let i = i as f64;
                match self {
                    Window::Rectangular => 1.0,
                    Window::Bartlett => 1.0 - 2.0 * (i - span / 2.0).abs() / span,
                    Window::Hann => 0.5 * (1.0 - (2.0 * PI * i / span).cos()),
                    Window::Hamming => 0.54 - 0.46 * (2.0 * PI * i / span).cos(),
                }
            })
            .collect()
    }
}

/// Ideal frequency response shape for windowed FIR design.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FirBand {
    Lowpass(f64),
    Highpass(f64),
    Bandpass(f64, f64),
    Bandstop(f64, f64),
}

impl FirBand {
    fn validate(self) -> LtiResult<()> {
        let in_range = |w: f64| w.is_finite() && w > 0.0 && w < PI;
        let ok = match self {
            FirBand::Lowpass(w) | FirBand::Highpass(w) => in_range(w),
            FirBand::Bandpass(lo, hi) | FirBand::Bandstop(lo, hi) => {
                in_range(lo) && in_range(hi) && lo < hi
            }
        };
        if ok {
            Ok(())
        } else {
            Err(LtiError::InvalidDesign {
                what: "cutoffs must lie in (0, pi) and band edges must increase",
            })
        }
    }

    /// Truncated ideal impulse response, `taps` samples centred on `taps / 2`.
    pub fn ideal_response(self, taps: usize) -> Vec<f64> {
        match self {
            FirBand::Lowpass(w) => lowpass_impulse_response(w, taps),
            FirBand::Highpass(w) => bandpass_impulse_response(w, PI, taps),
            FirBand::Bandpass(lo, hi) => bandpass_impulse_response(lo, hi, taps),
            FirBand::Bandstop(lo, hi) => lowpass_impulse_response(lo, taps)
                .iter()
                .zip(bandpass_impulse_response(hi, PI, taps))
                .map(|(a, b)| a + b)
                .collect(),
        }
    }
}

/// Ideal lowpass impulse response `sin(wc k) / (π k)`.
pub fn lowpass_impulse_response(cutoff: f64, taps: usize) -> Vec<f64> {
    let mid = (taps / 2) as f64;
    (0..taps)
        .map(|i| {
            let k = i as f64 - mid;
            if k == 0.0 {
                cutoff / PI
            } else {
                (cutoff * k).sin() / (PI * k)
            }
        })
        .collect()
}

/// Ideal bandpass impulse response between `low` and `high`.
pub fn bandpass_impulse_response(low: f64, high: f64, taps: usize) -> Vec<f64> {
    let mid = (taps / 2) as f64;
    (0..taps)
        .map(|i| {
            let k = i as f64 - mid;
            if k == 0.0 {
                (high - low) / PI
            } else {
                ((high * k).sin() - (low * k).sin()) / (PI * k)
            }
        })
        .collect()
}

/// FIR taps by the window method.
///
/// # Errors
///
/// Fails when `taps` is zero or a cutoff is outside `(0, π)`.
pub fn windowed_fir(band: FirBand, window: Window, taps: usize) -> LtiResult<Vec<f64>> {
    if taps == 0 {
        return Err(LtiError::InvalidDesign {
            what: "filter needs at least one tap",
        });
    }
    band.validate()?;
    Ok(band
        .ideal_response(taps)
        .iter()
        .zip(window.coefficients(taps))
        .map(|(h, w)| h * w)
        .collect())
}

/// Linear-phase FIR fitted to a piecewise-linear response in the weighted
/// least-squares sense.
///
/// `bands` holds pairs of edges `[f1, f2, f3, f4, ...]` as fractions of
/// Nyquist, `amplitudes` the desired gain at each edge, and `weights` one
/// weight per band. Grid points between bands are fitted to zero with the
/// weight of the following band.
///
/// # Errors
///
/// Fails on an even or zero tap count, malformed bands, or a singular
/// normal matrix.
pub fn least_squares_fir(
    bands: &[f64],
    amplitudes: &[f64],
    weights: &[f64],
    taps: usize,
) -> LtiResult<Vec<f64>> {
    if taps % 2 == 0 {
        return Err(LtiError::InvalidDesign {
            what: "least-squares design needs an odd tap count",
        });
    }
    if bands.is_empty() || bands.len() % 2 != 0 || amplitudes.len() != bands.len() {
        return Err(LtiError::InvalidDesign {
            what: "bands must come in pairs with one amplitude per edge",
        });
    }
    if weights.len() != bands.len() / 2 || weights.iter().any(|w| !(*w >= 0.0)) {
        return Err(LtiError::InvalidDesign {
            what: "one non-negative weight per band is required",
        });
    }
    if bands.iter().any(|f| !(0.0..=1.0).contains(f)) || bands.windows(2).any(|w| w[1] < w[0]) {
        return Err(LtiError::InvalidDesign {
            what: "band edges must be non-decreasing within [0, 1]",
        });
    }

    let m = (taps - 1) / 2;
    let freq = |i: usize| i as f64 / LS_GRID as f64;

    let mut desired = vec![0.0; LS_GRID + 1];
    for pair in 0..bands.len() / 2 {
        let (f1, f2) = (bands[2 * pair], bands[2 * pair + 1]);
        let (a1, a2) = (amplitudes[2 * pair], amplitudes[2 * pair + 1]);
        for (i, d) in desired.iter_mut().enumerate() {
            let f = freq(i);
            if f >= f1 && f <= f2 {
                *d = if f2 > f1 {
                    a1 + (a2 - a1) * (f - f1) / (f2 - f1)
                } else {
                    a1
                };
            }
        }
    }

    let mut grid_weights = Vec::with_capacity(LS_GRID + 1);
    let mut band = 0;
    for i in 0..=LS_GRID {
        while band + 1 < weights.len() && freq(i) > bands[2 * band + 1] {
            band += 1;
        }
        grid_weights.push(weights[band]);
    }

    let c = DMatrix::from_fn(LS_GRID + 1, m + 1, |i, k| (PI * freq(i) * k as f64).cos());
    let wc = DMatrix::from_fn(LS_GRID + 1, m + 1, |i, k| c[(i, k)] * grid_weights[i]);
    let wd = DVector::from_fn(LS_GRID + 1, |i, _| desired[i] * grid_weights[i]);
    let ct = c.transpose();

    let normal = (&ct * wc)
        .pseudo_inverse(1e-12)
        .map_err(|what| LtiError::InvalidDesign { what })?;
    let a = normal * (&ct * wd);

    let mut h = vec![0.0; taps];
    h[m] = a[0];
    for k in 1..=m {
        h[m - k] = a[k] / 2.0;
        h[m + k] = a[k] / 2.0;
    }
    Ok(h)
}

/// Left-half-plane poles of an analog Butterworth lowpass.
pub fn butterworth_poles(order: usize, cutoff: f64) -> Vec<Complex<f64>> {
    let n = order as f64;
    (0..2 * order)
        .map(|k| PI / (2.0 * n) * (n + 2.0 * k as f64 - 1.0))
        .map(|angle| Complex::from_polar(cutoff, angle))
        .filter(|p| p.re < 0.0)
        .collect()
}

/// Poles of an analog Chebyshev type I lowpass with passband ripple
/// parameter `epsilon`.
pub fn chebyshev1_poles(order: usize, cutoff: f64, epsilon: f64) -> Vec<Complex<f64>> {
    let n = order as f64;
    let beta = (1.0 / epsilon).asinh() / n;
    let (sigma, omega) = (beta.sinh(), beta.cosh());
    (1..=order)
        .map(|k| {
            let theta = PI * (2.0 * k as f64 - 1.0) / (2.0 * n);
            Complex::new(-sigma * theta.sin(), omega * theta.cos()) * cutoff
        })
        .collect()
}

/// Monic real polynomial with the given roots. Conjugate pairs cancel the
/// imaginary parts, which are dropped.
fn real_poly_from_roots(roots: &[Complex<f64>]) -> Vec<f64> {
    let mut coeffs = vec![Complex::new(1.0, 0.0)];
    for &r in roots {
        let mut next = vec![Complex::new(0.0, 0.0); coeffs.len() + 1];
        for (i, &c) in coeffs.iter().enumerate() {
            next[i] += c;
            next[i + 1] -= c * r;
        }
        coeffs = next;
    }
    coeffs.iter().map(|c| c.re).collect()
}

/// Analog lowpass `H(s) = K / Π(s - p)` with unity DC gain.
///
/// # Errors
///
/// Fails when `poles` is empty.
pub fn analog_lowpass(poles: &[Complex<f64>]) -> LtiResult<TransferFunction> {
    if poles.is_empty() {
        return Err(LtiError::InvalidDesign {
            what: "filter order must be at least 1",
        });
    }
    let den = real_poly_from_roots(poles);
    let gain = den.last().copied().unwrap_or(1.0);
    TransferFunction::new(vec![gain], den)
}

/// Analog highpass obtained from lowpass poles by `s -> wc^2 / s`, with
/// unity gain at infinite frequency.
///
/// # Errors
///
/// Fails when `poles` is empty.
pub fn analog_highpass(poles: &[Complex<f64>], cutoff: f64) -> LtiResult<TransferFunction> {
    if poles.is_empty() {
        return Err(LtiError::InvalidDesign {
            what: "filter order must be at least 1",
        });
    }
    let mapped: Vec<Complex<f64>> = poles
        .iter()
        .map(|p| p.conj() * (cutoff * cutoff / p.norm_sqr()))
        .collect();
    let mut num = vec![0.0; poles.len() + 1];
    num[0] = 1.0;
    TransferFunction::new(num, real_poly_from_roots(&mapped))
}

/// Map an analog transfer function to the `z` domain.
///
/// Each `s^i` term of an order-`N` function becomes
/// `K^i (z - 1)^i (z + 1)^(N - i)`. The result is normalized so `den[0] = 1`.
///
/// # Errors
///
/// Fails when the mapped denominator has a zero leading coefficient.
pub fn bilinear(tf: &TransferFunction) -> LtiResult<TransferFunction> {
    let order = tf.num().len().max(tf.den().len()) - 1;
    let map = |coeffs: &[f64]| {
        coeffs
            .iter()
            .rev()
            .enumerate()
            .fold(vec![0.0; order + 1], |acc, (i, &c)| {
                let mut term = vec![c * BILINEAR_K.powi(i as i32)];
                for _ in 0..i {
                    term = convolve(&term, &[1.0, -1.0]);
                }
                for _ in i..order {
                    term = convolve(&term, &[1.0, 1.0]);
                }
                add_aligned(&acc, &term)
            })
    };
    TransferFunction::new(map(tf.num()), map(tf.den()))?.normalized()
}

/// Which side of the cutoff an IIR design passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Response {
    Lowpass,
    Highpass,
}

fn iir_from_poles(
    poles: &[Complex<f64>],
    warped: f64,
    response: Response,
) -> LtiResult<TransferFunction> {
    let analog = match response {
        Response::Lowpass => analog_lowpass(poles)?,
        Response::Highpass => analog_highpass(poles, warped)?,
    };
    bilinear(&analog)
}

fn prewarp(order: usize, cutoff: f64) -> LtiResult<f64> {
    if order == 0 {
        return Err(LtiError::InvalidDesign {
            what: "filter order must be at least 1",
        });
    }
    if !(cutoff.is_finite() && cutoff > 0.0 && cutoff < PI) {
        return Err(LtiError::InvalidDesign {
            what: "cutoff must lie in (0, pi)",
        });
    }
    Ok(BILINEAR_K * (cutoff / 2.0).tan())
}

/// Digital Butterworth filter with cutoff `cutoff` rad/sample.
///
/// The analog cutoff is prewarped so the -3 dB point lands on `cutoff`
/// after the bilinear transform.
pub fn butterworth(order: usize, cutoff: f64, response: Response) -> LtiResult<TransferFunction> {
    let warped = prewarp(order, cutoff)?;
    iir_from_poles(&butterworth_poles(order, warped), warped, response)
}

/// Digital Chebyshev type I filter with ripple parameter `epsilon`.
pub fn chebyshev1(
    order: usize,
    cutoff: f64,
    epsilon: f64,
    response: Response,
) -> LtiResult<TransferFunction> {
    if !(epsilon.is_finite() && epsilon > 0.0) {
        return Err(LtiError::InvalidDesign {
            what: "ripple parameter must be positive",
        });
    }
    let warped = prewarp(order, cutoff)?;
    iir_from_poles(&chebyshev1_poles(order, warped, epsilon), warped, response)
}
