#![forbid(unsafe_code)]

//! The per-tick publication unit and the inputs of one playback session.

use sortviz_core::{AlgorithmKind, Metrics, RecursionTreeNode, Step, StepKind, Trace};

/// Everything one playback session replays.
///
/// The trace and tree are owned exclusively by the session for its whole
/// lifetime; they are discarded when a new sort request replaces them.
#[derive(Debug, Clone)]
pub struct PlaybackPlan {
    /// The ordered steps to replay.
    pub trace: Trace,
    /// Final summary published at completion, overriding any in-flight
    /// running counters.
    pub final_metrics: Metrics,
    /// Static recursion tree, present for divide-and-conquer runs only.
    pub tree: Option<RecursionTreeNode>,
    /// Algorithm that produced the trace.
    pub algorithm: AlgorithmKind,
}

impl PlaybackPlan {
    pub fn new(trace: Trace, final_metrics: Metrics, algorithm: AlgorithmKind) -> Self {
        Self {
            trace,
            final_metrics,
            tree: None,
            algorithm,
        }
    }

    pub fn with_tree(mut self, tree: RecursionTreeNode) -> Self {
        self.tree = Some(tree);
        self
    }
}

/// One immutable visual state, published atomically per tick.
///
/// Collapsing the array, highlight, phase, and metrics into a single
/// record means a consumer can never observe a partially applied tick.
#[derive(Debug, Clone, PartialEq)]
pub struct TickSnapshot {
    /// Position of this step in the trace; `trace.len()` for the
    /// terminal snapshot.
    pub cursor: usize,
    /// Full element sequence at this step.
    pub array: Vec<i64>,
    /// Indices the step highlights.
    pub highlighted: Vec<usize>,
    /// Phase tag controlling emphasis downstream.
    pub kind: StepKind,
    /// Human-readable label.
    pub description: String,
    /// Running metrics echo, present only when the step carries counters
    /// (`execution_time_ms` stays 0 until completion); always present on
    /// the terminal snapshot, holding the session's final metrics.
    pub metrics: Option<Metrics>,
}

impl TickSnapshot {
    pub(crate) fn for_step(cursor: usize, step: &Step) -> Self {
        Self {
            cursor,
            array: step.array.clone(),
            highlighted: step.indices.clone(),
            kind: step.kind,
            description: step.description.clone(),
            metrics: step.running_metrics(),
        }
    }

    pub(crate) fn terminal(trace: &Trace, final_metrics: Metrics) -> Self {
        Self {
            cursor: trace.len(),
            array: trace
                .get(trace.len().wrapping_sub(1))
                .map(|step| step.array.clone())
                .unwrap_or_default(),
            highlighted: Vec::new(),
            kind: StepKind::Finished,
            description: "Sorting Complete!".to_string(),
            metrics: Some(final_metrics),
        }
    }
}
