#![forbid(unsafe_code)]

//! Algorithm selection and the qualitative speed hint of a sort request.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Which algorithm the solver was asked to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlgorithmKind {
    Bubble,
    Selection,
    Insertion,
    Merge,
    Quick,
    Heap,
}

impl AlgorithmKind {
    /// Whether the solver produces a recursion tree for this algorithm.
    pub fn is_divide_and_conquer(self) -> bool {
        matches!(self, Self::Merge | Self::Quick)
    }

    /// Whether the algorithm partitions around a pivot. Gates the
    /// pivot resolver rule.
    pub fn is_partition_based(self) -> bool {
        matches!(self, Self::Quick)
    }

    /// Display label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Bubble => "Bubble Sort",
            Self::Selection => "Selection Sort",
            Self::Insertion => "Insertion Sort",
            Self::Merge => "Merge Sort",
            Self::Quick => "Quick Sort",
            Self::Heap => "Heap Sort",
        }
    }
}

/// Qualitative pacing hint carried in the sort request.
///
/// The solver may use it to bound trace size; playback pacing itself is
/// the interval handed to the sequencer, for which
/// [`suggested_interval`](Self::suggested_interval) is the conventional
/// mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeedHint {
    Slow,
    Medium,
    Fast,
}

impl SpeedHint {
    pub fn suggested_interval(self) -> Duration {
        match self {
            Self::Slow => Duration::from_millis(500),
            Self::Medium => Duration::from_millis(200),
            Self::Fast => Duration::from_millis(50),
        }
    }
}

impl Default for SpeedHint {
    fn default() -> Self {
        Self::Medium
    }
}
