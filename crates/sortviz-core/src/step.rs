#![forbid(unsafe_code)]

//! One recorded event of an algorithm execution.
//!
//! A [`Step`] is the atomic unit of a trace: the full array state after the
//! event, the indices the event touched, a [`StepKind`] tag driving
//! element and tree-node emphasis downstream, and a human-readable label.
//! Steps optionally echo the producer's running comparison/swap counters
//! for live metrics display.

use serde::{Deserialize, Serialize};

/// Tag identifying which sub-operation a step records.
///
/// The wire strings are the producer's: `snake_case`, e.g. `merge_start`.
/// Four of these (`comparison`, `swap`, `overwrite`, `finished`) describe
/// element-level events; the rest are phase markers emitted by the
/// divide-and-conquer producers and consumed by the tree resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    /// The untouched input array, always the producer's first step.
    Initial,
    /// Two elements were compared.
    Comparison,
    /// Two elements exchanged positions.
    Swap,
    /// A single position was overwritten with a value (merge writes).
    Overwrite,
    /// A divide-and-conquer range was entered.
    Divide,
    /// A divided range is about to be recombined.
    Conquer,
    /// A merge over a range began.
    MergeStart,
    /// A merge over a range completed.
    MergeEnd,
    /// A range finished partitioning around its pivot.
    Partition,
    /// A pivot element was selected.
    Pivot,
    /// Terminal marker: the array is fully sorted.
    Finished,
}

impl StepKind {
    /// Whether this kind marks a merge boundary (start or end).
    pub fn is_merge_boundary(self) -> bool {
        matches!(self, Self::MergeStart | Self::MergeEnd)
    }
}

/// One entry of a trace: the array state after an event, plus what the
/// event was.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    /// Full element sequence at this point in execution.
    pub array: Vec<i64>,
    /// Positions relevant to this step; zero, one, or two entries
    /// depending on the step kind.
    #[serde(default)]
    pub indices: Vec<usize>,
    /// What happened.
    #[serde(rename = "type")]
    pub kind: StepKind,
    /// Human-readable label for this step.
    #[serde(default)]
    pub description: String,
    /// Running comparison counter at this point, if the producer echoed it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comparisons: Option<u64>,
    /// Running swap counter at this point, if the producer echoed it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swaps: Option<u64>,
}

impl Step {
    /// Running metrics echoed by this step, if present.
    ///
    /// The counters are advisory progress echoes, not the final summary;
    /// `execution_time_ms` is held at zero until playback completes and
    /// the session's final [`Metrics`] take over. A step that defines
    /// `comparisons` but omits `swaps` is treated as zero swaps.
    pub fn running_metrics(&self) -> Option<Metrics> {
        self.comparisons.map(|comparisons| Metrics {
            comparisons,
            swaps: self.swaps.unwrap_or(0),
            execution_time_ms: 0.0,
        })
    }
}

/// Final (or running) operation counts for one execution.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Metrics {
    pub comparisons: u64,
    pub swaps: u64,
    /// Wall-clock duration the solver measured, in milliseconds.
    pub execution_time_ms: f64,
}

/// Asymptotic complexity labels reported by the solver, passed through to
/// the presentation layer unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Complexity {
    pub time: String,
    pub space: String,
}
