#![forbid(unsafe_code)]

//! The consumer-facing callback surface of a playback session.

use std::collections::BTreeMap;

use sortviz_core::MalformedStepError;
use sortviz_tree::NodeState;

use crate::snapshot::TickSnapshot;

/// Receives the sequencer's publications.
///
/// All methods are invoked on the playback worker thread, strictly in
/// trace order, one tick fully delivered before the next is scheduled.
/// Implementations must not block for long (they stall the replay clock)
/// and may call [`Player::cancel`](crate::Player::cancel) re-entrantly to
/// stop playback from inside a callback.
pub trait PlaybackSink: Send + Sync {
    /// One step was applied. Called exactly once per step, in order.
    fn on_tick(&self, snapshot: &TickSnapshot);

    /// The trace was replayed end-to-end. `final_state` carries
    /// `kind = finished`, no highlights, and the session's final metrics.
    /// Called exactly once, after the last tick; never after a cancel.
    fn on_complete(&self, final_state: &TickSnapshot);

    /// Display states for every recursion tree node, re-resolved from the
    /// snapshot published by the same tick. Only called when the session
    /// has a tree.
    fn on_tree_state(&self, states: &BTreeMap<String, NodeState>) {
        let _ = states;
    }

    /// A step failed the defensive pre-apply check. Playback halts; no
    /// further callbacks follow for this session.
    fn on_error(&self, error: &MalformedStepError) {
        let _ = error;
    }
}
