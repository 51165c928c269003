//! Analytic reduction of block diagrams by Mason's gain formula.
//!
//! The pipeline works on a private copy of the graph topology:
//!
//! 1. **Cascade fusion**: serial pairs of dynamic blocks collapse into one
//!    block whose transfer function is the product of both
//! 2. **Signal-flow graph**: each edge carries its source block's transfer
//!    function, signed by the target summing junction
//! 3. **Enumeration**: forward paths from start to end, elementary loops
//! 4. **Determinants**: `Δ` over all loops, `Δk` over the loops untouched by
//!    path `k`
//! 5. **Result**: `Σ Pk Δk / Δ`
//!
//! No common factors are cancelled, so results are compared by rational
//! equivalence rather than by coefficients.

pub mod delta;
pub mod error;
pub mod flow;
pub mod fusion;
pub mod paths;
pub mod reduce;

pub use delta::{Loop, determinant, touches};
pub use error::{ReduceError, ReduceResult};
pub use flow::SignalFlowGraph;
pub use fusion::{FusedGraph, FusedNode};
pub use paths::{elementary_loops, forward_paths};
pub use reduce::{PathGain, Reduction, reduce, transfer_function};
