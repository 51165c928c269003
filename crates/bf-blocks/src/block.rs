//! Block enum and dispatch.

use std::fmt;

use bf_lti::TransferFunction;

use crate::context::RunContext;
use crate::controller::DiscretePid;
use crate::error::BlockResult;
use crate::filter::DigitalFilter;
use crate::fusion::{Marzullo, WeightedAverage};
use crate::noise::NoiseInjector;
use crate::plant::ContinuousPlant;
use crate::routing::{Junction, Sum};
use crate::signal::Signal;
use crate::sink::Sink;
use crate::sources::Generator;

/// A node in a block diagram together with its evolving state.
#[derive(Debug, Clone)]
pub enum Block {
    Generator(Generator),
    Sum(Sum),
    DiscretePid(DiscretePid),
    DigitalFilter(DigitalFilter),
    ContinuousPlant(ContinuousPlant),
    NoiseInjector(NoiseInjector),
    Sink(Sink),
    Junction(Junction),
    WeightedAverage(WeightedAverage),
    Marzullo(Marzullo),
}

impl Block {
    /// Variant tag of this block.
    pub fn kind(&self) -> BlockKind {
        match self {
            Block::Generator(_) => BlockKind::Generator,
            Block::Sum(_) => BlockKind::Sum,
            Block::DiscretePid(_) => BlockKind::DiscretePid,
            Block::DigitalFilter(_) => BlockKind::DigitalFilter,
            Block::ContinuousPlant(_) => BlockKind::ContinuousPlant,
            Block::NoiseInjector(_) => BlockKind::NoiseInjector,
            Block::Sink(_) => BlockKind::Sink,
            Block::Junction(_) => BlockKind::Junction,
            Block::WeightedAverage(_) => BlockKind::WeightedAverage,
            Block::Marzullo(_) => BlockKind::Marzullo,
        }
    }

    /// Check if this block carries a transfer function.
    pub fn is_dynamic(&self) -> bool {
        matches!(self, Block::DigitalFilter(_) | Block::ContinuousPlant(_))
    }

    /// Check if this block breaks algebraic loops in the scheduler.
    pub fn is_plant(&self) -> bool {
        matches!(self, Block::ContinuousPlant(_))
    }

    /// Transfer function of a dynamic block, `None` for every other block.
    pub fn transfer_function(&self) -> Option<&TransferFunction> {
        match self {
            Block::DigitalFilter(f) => Some(f.transfer_function()),
            Block::ContinuousPlant(p) => Some(p.transfer_function()),
            _ => None,
        }
    }

    /// Sink recordings, if this is a sink.
    pub fn trace(&self) -> Option<&[(f64, f64)]> {
        match self {
            Block::Sink(s) => Some(s.trace()),
            _ => None,
        }
    }

    /// Consume one step's predecessor signals and produce this block's output.
    ///
    /// The context must already point at this block's node.
    pub fn execute(&mut self, inputs: &[Signal], ctx: &mut RunContext) -> BlockResult<Signal> {
        let out = match self {
            Block::Generator(b) => b.execute(inputs, ctx),
            Block::Sum(b) => b.execute(inputs, ctx),
            Block::DiscretePid(b) => b.execute(inputs, ctx),
            Block::DigitalFilter(b) => b.execute(inputs, ctx),
            Block::ContinuousPlant(b) => b.execute(inputs, ctx),
            Block::NoiseInjector(b) => b.execute(inputs, ctx),
            Block::Sink(b) => b.execute(inputs, ctx),
            Block::Junction(b) => b.execute(inputs, ctx),
            Block::WeightedAverage(b) => b.execute(inputs, ctx)?,
            Block::Marzullo(b) => b.execute(inputs, ctx),
        };
        Ok(out)
    }

    /// Reset internal state before a run.
    pub fn init(&mut self) {
        match self {
            Block::DiscretePid(b) => b.init(),
            Block::DigitalFilter(b) => b.init(),
            Block::ContinuousPlant(b) => b.init(),
            Block::Sink(b) => b.init(),
            _ => {}
        }
    }

    /// Adopt the scheduler's step period. Stateless blocks ignore it.
    pub fn set_sampling_period(&mut self, ts: f64) {
        match self {
            Block::DiscretePid(b) => b.set_sampling_period(ts),
            Block::ContinuousPlant(b) => b.set_sampling_period(ts),
            _ => {}
        }
    }
}

macro_rules! impl_from_block {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for Block {
                fn from(b: $variant) -> Self {
                    Block::$variant(b)
                }
            }
        )*
    };
}

impl_from_block!(
    Generator,
    Sum,
    DiscretePid,
    DigitalFilter,
    ContinuousPlant,
    NoiseInjector,
    Sink,
    Junction,
    WeightedAverage,
    Marzullo,
);

/// Fieldless tag for [`Block`] variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    Generator,
    Sum,
    DiscretePid,
    DigitalFilter,
    ContinuousPlant,
    NoiseInjector,
    Sink,
    Junction,
    WeightedAverage,
    Marzullo,
}

impl BlockKind {
    pub fn name(self) -> &'static str {
        match self {
            BlockKind::Generator => "Generator",
            BlockKind::Sum => "Sum",
            BlockKind::DiscretePid => "DiscretePID",
            BlockKind::DigitalFilter => "DigitalFilter",
            BlockKind::ContinuousPlant => "ContinuousPlant",
            BlockKind::NoiseInjector => "NoiseInjector",
            BlockKind::Sink => "Sink",
            BlockKind::Junction => "Junction",
            BlockKind::WeightedAverage => "WeightedAverage",
            BlockKind::Marzullo => "Marzullo",
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
