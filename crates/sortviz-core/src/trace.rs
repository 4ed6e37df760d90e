#![forbid(unsafe_code)]

//! An immutable, ordered sequence of steps describing one full execution.
//!
//! A [`Trace`] is produced once per sort request and never mutated
//! afterwards; playback owns it exclusively for the lifetime of one
//! session. Validation here enforces the two structural invariants the
//! runtime relies on before applying a tick:
//!
//! 1. Every index in `step.indices` lies within `[0, step.array.len())`.
//! 2. `step.array.len()` is constant across the whole trace (elements are
//!    reordered or overwritten, never added or removed).
//!
//! # Failure Modes
//!
//! - Out-of-bounds index: the producer referenced a position past the end
//!   of the array it shipped with the same step.
//! - Length drift: a step's array grew or shrank relative to step 0.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::step::Step;

/// A step that violates the trace invariants.
///
/// Detected defensively before the runtime applies a tick; a malformed
/// step halts playback rather than being skipped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedStepError {
    /// `indices` referenced a position outside the step's own array.
    #[error("step {step}: index {index} out of bounds for array of length {len}")]
    IndexOutOfBounds { step: usize, index: usize, len: usize },
    /// The array length changed relative to the first step.
    #[error("step {step}: array length drifted from {expected} to {actual}")]
    LengthDrift {
        step: usize,
        expected: usize,
        actual: usize,
    },
}

/// An ordered, finite sequence of [`Step`]s, indexed `0..len()`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Trace {
    steps: Vec<Step>,
}

impl Trace {
    /// Wrap a solver-produced step list.
    pub fn from_steps(steps: Vec<Step>) -> Self {
        Self { steps }
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn get(&self, cursor: usize) -> Option<&Step> {
        self.steps.get(cursor)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Step> {
        self.steps.iter()
    }

    /// Array length shared by every step, taken from step 0.
    ///
    /// `None` for an empty trace.
    pub fn element_count(&self) -> Option<usize> {
        self.steps.first().map(|s| s.array.len())
    }

    /// Check one step against the trace invariants.
    ///
    /// `expected_len` is the array length established by step 0; the
    /// runtime calls this per tick as its defensive pre-apply check.
    pub fn check_step(cursor: usize, step: &Step, expected_len: usize) -> Result<(), MalformedStepError> {
        if step.array.len() != expected_len {
            return Err(MalformedStepError::LengthDrift {
                step: cursor,
                expected: expected_len,
                actual: step.array.len(),
            });
        }
        for &index in &step.indices {
            if index >= step.array.len() {
                return Err(MalformedStepError::IndexOutOfBounds {
                    step: cursor,
                    index,
                    len: step.array.len(),
                });
            }
        }
        Ok(())
    }

    /// Validate the whole trace, returning the first violation.
    pub fn validate(&self) -> Result<(), MalformedStepError> {
        let Some(expected_len) = self.element_count() else {
            return Ok(());
        };
        for (cursor, step) in self.steps.iter().enumerate() {
            Self::check_step(cursor, step, expected_len)?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Trace {
    type Item = &'a Step;
    type IntoIter = std::slice::Iter<'a, Step>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}
