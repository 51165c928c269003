//! Discrete simulation scheduler for blockflow graphs.
//!
//! Provides:
//! - Loop-tolerant topological scheduling: edges leaving the continuous
//!   plant are relaxed when they close a loop, which gives every feedback
//!   loop through the plant a one-step delay
//! - A stepping driver that carries the latest signal of every node across
//!   steps and records per-node histories
//! - Phase progress reporting and "continue simulation" via
//!   [`Simulator::resume`]

pub mod error;
pub mod options;
pub mod progress;
pub mod schedule;
pub mod simulator;

pub use error::{SimError, SimResult};
pub use options::SimOptions;
pub use progress::{SimPhase, SimProgress};
pub use schedule::schedule;
pub use simulator::{SimOutcome, Simulator, simulate};
