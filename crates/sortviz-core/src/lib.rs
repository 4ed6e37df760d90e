#![forbid(unsafe_code)]

//! Shared data contracts for the sortviz replay engine.
//!
//! The external solver computes, for one input array and one algorithm, an
//! ordered list of [`Step`]s describing how the array mutates over time, a
//! final [`Metrics`] summary, and (for divide-and-conquer algorithms) a
//! static [`RecursionTreeNode`] tree. This crate defines those types as
//! they appear on the wire, plus the defensive validation the playback
//! runtime applies before trusting them.
//!
//! Nothing here owns a timer or mutates shared state; the types are plain
//! data consumed by `sortviz-runtime` and `sortviz-tree`.

pub mod algorithm;
pub mod step;
pub mod trace;
pub mod tree;

pub use algorithm::{AlgorithmKind, SpeedHint};
pub use step::{Complexity, Metrics, Step, StepKind};
pub use trace::{MalformedStepError, Trace};
pub use tree::{NodePhase, RecursionTreeNode, TreeShapeError, validate_tree};
