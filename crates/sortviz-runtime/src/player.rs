#![forbid(unsafe_code)]

//! The step sequencer: replays one trace end-to-end on a worker thread.
//!
//! # How it works
//!
//! 1. [`Player::start`] admits at most one session, spawns a worker, and
//!    hands it the plan plus a fresh session epoch.
//! 2. The worker publishes one [`TickSnapshot`] per step through the
//!    sink, re-resolves tree states from the same snapshot, then parks on
//!    the cancel token for the current interval (read fresh each time, so
//!    a speed change affects only the next delay).
//! 3. After the final delay it publishes the terminal snapshot through
//!    [`PlaybackSink::on_complete`] and marks the session inactive.
//!
//! # Invariants
//!
//! 1. Playback order is exactly trace order; no step skipped, repeated,
//!    or reordered; exactly one pending delay at any instant.
//! 2. A trace of length N produces exactly N `on_tick` calls followed by
//!    one `on_complete`, unless cancelled or a step is malformed.
//! 3. No sink call happens after [`Player::cancel`] returns. The cancel
//!    path bumps the session epoch, wakes the pending delay, and joins
//!    the worker; the worker re-checks the epoch before every publish,
//!    so a stale wake-up can never resurrect old state.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use thiserror::Error;

use sortviz_core::Trace;
use sortviz_tree::resolve_tree_states;

use crate::cancel::{CancelSource, CancelToken};
use crate::sink::PlaybackSink;
use crate::snapshot::{PlaybackPlan, TickSnapshot};

/// Rejected `start` request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidTraceError {
    /// At most one concurrent playback is permitted.
    #[error("a playback session is already active")]
    SessionActive,
    /// An empty trace has nothing to replay; the caller should report
    /// "already sorted" instead.
    #[error("trace contains no steps")]
    EmptyTrace,
}

/// State shared between the control side and the worker.
struct SessionShared {
    /// Bumped on every start and cancel. The worker captured the value
    /// current at its start; a mismatch before a publish means the
    /// session was torn down and the effect must be dropped.
    epoch: AtomicU64,
    /// Inter-tick delay in milliseconds, read fresh before each wait.
    interval_ms: AtomicU64,
    active: AtomicBool,
}

/// Control handles of the running (or most recent) worker.
struct SessionControl {
    cancel: CancelSource,
    worker: thread::JoinHandle<()>,
}

/// Replays traces one step per tick at an operator-configurable interval.
///
/// Owns at most one playback session at a time; the trace, cursor, and
/// published snapshots belong exclusively to that session.
pub struct Player {
    sink: Arc<dyn PlaybackSink>,
    shared: Arc<SessionShared>,
    control: Mutex<Option<SessionControl>>,
}

impl Player {
    pub fn new(sink: Arc<dyn PlaybackSink>) -> Self {
        Self {
            sink,
            shared: Arc::new(SessionShared {
                epoch: AtomicU64::new(0),
                interval_ms: AtomicU64::new(0),
                active: AtomicBool::new(false),
            }),
            control: Mutex::new(None),
        }
    }

    /// Begin replaying `plan` from cursor 0.
    ///
    /// Fails if a session is already active or the trace is empty; on
    /// failure the existing session (if any) is untouched.
    pub fn start(&self, plan: PlaybackPlan, interval: Duration) -> Result<(), InvalidTraceError> {
        let mut control = self.control.lock().unwrap_or_else(|e| e.into_inner());
        if self.shared.active.load(Ordering::Acquire) {
            return Err(InvalidTraceError::SessionActive);
        }
        if plan.trace.is_empty() {
            return Err(InvalidTraceError::EmptyTrace);
        }
        // Reap a worker left over from a completed or cancelled session.
        if let Some(stale) = control.take() {
            let _ = stale.worker.join();
        }

        self.shared
            .interval_ms
            .store(interval.as_millis() as u64, Ordering::Release);
        let epoch = self.shared.epoch.fetch_add(1, Ordering::AcqRel) + 1;
        self.shared.active.store(true, Ordering::Release);

        let cancel = CancelSource::new();
        let token = cancel.token();
        let shared = Arc::clone(&self.shared);
        let sink = Arc::clone(&self.sink);
        tracing::debug!(
            steps = plan.trace.len(),
            algorithm = ?plan.algorithm,
            interval_ms = interval.as_millis() as u64,
            "playback session started"
        );
        let worker = thread::spawn(move || run_session(plan, epoch, shared, token, sink));
        *control = Some(SessionControl { cancel, worker });
        Ok(())
    }

    /// Halt the active session, if any. Idempotent; a no-op when nothing
    /// is playing.
    ///
    /// Guarantees that no sink callback happens after this returns, even
    /// if an inter-tick delay was already pending: the pending wait is
    /// woken and the worker joined. When invoked from inside a sink
    /// callback (the worker thread itself) the join is skipped; the
    /// epoch bump already suppresses every later publish on that thread.
    pub fn cancel(&self) {
        // Epoch bump and signal happen under the control lock so a
        // concurrent `start` cannot interleave and have its fresh
        // session invalidated; the join happens after release so a sink
        // callback calling back into `cancel` cannot deadlock.
        let control = {
            let mut guard = self.control.lock().unwrap_or_else(|e| e.into_inner());
            let Some(control) = guard.take() else {
                return;
            };
            self.shared.epoch.fetch_add(1, Ordering::AcqRel);
            control.cancel.cancel();
            self.shared.active.store(false, Ordering::Release);
            control
        };
        if control.worker.thread().id() != thread::current().id() {
            let _ = control.worker.join();
        }
        tracing::debug!("playback session cancelled");
    }

    /// Change the inter-tick delay. Takes effect for the next scheduled
    /// delay; a delay already pending keeps its old duration.
    pub fn set_interval(&self, interval: Duration) {
        self.shared
            .interval_ms
            .store(interval.as_millis() as u64, Ordering::Release);
    }

    /// Whether a session is currently replaying.
    pub fn is_active(&self) -> bool {
        self.shared.active.load(Ordering::Acquire)
    }
}

impl Drop for Player {
    fn drop(&mut self) {
        // Teardown must invalidate any pending delay, but dropping should
        // not block on a join the way an explicit cancel does.
        let control = {
            let mut guard = self.control.lock().unwrap_or_else(|e| e.into_inner());
            guard.take()
        };
        if let Some(control) = control {
            self.shared.epoch.fetch_add(1, Ordering::AcqRel);
            control.cancel.cancel();
            self.shared.active.store(false, Ordering::Release);
        }
    }
}

fn epoch_is_current(shared: &SessionShared, epoch: u64) -> bool {
    shared.epoch.load(Ordering::Acquire) == epoch
}

fn run_session(
    plan: PlaybackPlan,
    epoch: u64,
    shared: Arc<SessionShared>,
    token: CancelToken,
    sink: Arc<dyn PlaybackSink>,
) {
    // Non-empty guaranteed by `start`.
    let expected_len = plan.trace.element_count().unwrap_or(0);

    for (cursor, step) in plan.trace.iter().enumerate() {
        if let Err(error) = Trace::check_step(cursor, step, expected_len) {
            tracing::warn!(%error, cursor, "malformed step, halting playback");
            shared.active.store(false, Ordering::Release);
            if epoch_is_current(&shared, epoch) {
                sink.on_error(&error);
            }
            return;
        }
        if token.is_cancelled() || !epoch_is_current(&shared, epoch) {
            return;
        }
        let snapshot = TickSnapshot::for_step(cursor, step);
        sink.on_tick(&snapshot);
        if let Some(tree) = plan.tree.as_ref() {
            let states =
                resolve_tree_states(tree, &snapshot.highlighted, snapshot.kind, plan.algorithm);
            sink.on_tree_state(&states);
        }
        let interval = Duration::from_millis(shared.interval_ms.load(Ordering::Acquire));
        if token.wait_timeout(interval) {
            return;
        }
    }

    if !epoch_is_current(&shared, epoch) {
        return;
    }
    // Flip the flag before publishing so a caller reacting to
    // `on_complete` can start the next session immediately; `start`
    // joins this worker before spawning the replacement.
    shared.active.store(false, Ordering::Release);
    let final_state = TickSnapshot::terminal(&plan.trace, plan.final_metrics);
    sink.on_complete(&final_state);
    tracing::debug!(steps = plan.trace.len(), "playback session complete");
}
