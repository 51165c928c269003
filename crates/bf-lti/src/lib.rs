//! Linear time-invariant primitives for blockflow.
//!
//! This crate holds the numeric building blocks shared by simulation and
//! analytic reduction:
//!
//! - **Polynomials**: coefficient vectors in descending powers, combined by
//!   convolution
//! - **Transfer functions**: rational `num/den` algebra without common-factor
//!   cancellation
//! - **State space**: controllable canonical realization of a transfer
//!   function, stored as `nalgebra` matrices
//! - **Difference equations**: direct-form filtering, one sample at a time or
//!   over a whole sequence
//! - **Filter design**: windowed and least-squares FIR taps, Butterworth and
//!   Chebyshev IIR filters through the bilinear transform

pub mod combinatorics;
pub mod design;
pub mod error;
pub mod filter;
pub mod poly;
pub mod state_space;
pub mod transfer;

pub use combinatorics::combinations;
pub use design::{
    FirBand, Response, Window, bilinear, butterworth, chebyshev1, least_squares_fir,
    windowed_fir,
};
pub use error::{LtiError, LtiResult};
pub use filter::{DifferenceEquation, filter, impulse_response};
pub use poly::{add_aligned, convolve, horner};
pub use state_space::StateSpace;
pub use transfer::TransferFunction;
