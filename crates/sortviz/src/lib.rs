#![forbid(unsafe_code)]

//! sortviz public facade crate.
//!
//! Re-exports the stable surface of the replay engine: the data contracts,
//! the step sequencer, the recursion tree resolver, and (behind the
//! `solver` feature) the transport client for the external trace solver.

// --- Core re-exports -------------------------------------------------------

pub use sortviz_core::{
    AlgorithmKind, Complexity, MalformedStepError, Metrics, NodePhase, RecursionTreeNode,
    SpeedHint, Step, StepKind, Trace, TreeShapeError, validate_tree,
};

// --- Tree re-exports -------------------------------------------------------

pub use sortviz_tree::{HighlightContext, NodeState, node_state, resolve_tree_states};

// --- Runtime re-exports ----------------------------------------------------

pub use sortviz_runtime::{
    InvalidTraceError, PlaybackPlan, PlaybackSink, Player, TickSnapshot,
};

// --- Solver re-exports -----------------------------------------------------

#[cfg(feature = "solver")]
pub use sortviz_solver::{FetchFailed, SolverClient, SortRequest, SortResponse};

// --- Prelude ---------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        AlgorithmKind, Metrics, NodeState, PlaybackPlan, PlaybackSink, Player, StepKind,
        TickSnapshot, Trace, resolve_tree_states,
    };

    #[cfg(feature = "solver")]
    pub use crate::{SolverClient, SortRequest};

    pub use crate::{core, runtime, tree};
}

pub use sortviz_core as core;
pub use sortviz_runtime as runtime;
#[cfg(feature = "solver")]
pub use sortviz_solver as solver;
pub use sortviz_tree as tree;
