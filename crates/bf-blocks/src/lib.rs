//! Node dynamics library for blockflow diagrams.
//!
//! Every node in a block diagram is a [`Block`]: a closed set of variants that
//! each own their evolving state and expose the same three hooks:
//!
//! - `execute`: consume the predecessor signals of one step, produce one signal
//! - `init`: reset internal state before an independent run
//! - `set_sampling_period`: adopt the scheduler's step period
//!
//! # Block families
//!
//! - **Sources**: [`Generator`]
//! - **Combinators**: [`Sum`], [`Junction`], [`WeightedAverage`], [`Marzullo`]
//! - **Discrete dynamics**: [`DiscretePid`], [`DigitalFilter`]
//! - **Continuous dynamics**: [`ContinuousPlant`] (forward-Euler micro-steps)
//! - **Disturbances**: [`NoiseInjector`]
//! - **Recorders**: [`Sink`]
//!
//! Run-scoped state that is not owned by a node (the random number generator
//! and the id of the node being executed) lives in a [`RunContext`] passed
//! explicitly into `execute`.

pub mod block;
pub mod context;
pub mod controller;
pub mod error;
pub mod filter;
pub mod fusion;
pub mod noise;
pub mod plant;
pub mod routing;
pub mod signal;
pub mod sink;
pub mod sources;

pub use block::{Block, BlockKind};
pub use context::RunContext;
pub use controller::{DiscretePid, DiscretePidState};
pub use error::{BlockError, BlockResult};
pub use filter::DigitalFilter;
pub use fusion::{Marzullo, WeightedAverage};
pub use noise::{NoiseInjector, box_muller};
pub use plant::ContinuousPlant;
pub use routing::{Junction, Sign, Sum};
pub use signal::Signal;
pub use sink::Sink;
pub use sources::Generator;
