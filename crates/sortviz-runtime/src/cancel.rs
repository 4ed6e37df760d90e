#![forbid(unsafe_code)]

//! Cooperative cancellation for the playback worker.
//!
//! A [`CancelSource`] is held by the control side; the worker thread holds
//! a [`CancelToken`] and parks on it between ticks. Cancelling wakes any
//! pending wait immediately, so a long inter-tick delay never outlives the
//! session that scheduled it.
//!
//! Cancellation here is best-effort wake-up only; the no-stale-update
//! guarantee additionally relies on the session epoch checked before each
//! publish (see `player`), since a token can be observed uncancelled a
//! moment before the control side trips it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::time::Duration;

struct CancelInner {
    cancelled: AtomicBool,
    notify: (Mutex<()>, Condvar),
}

/// Control-side handle that triggers cancellation.
///
/// Dropping the source does not cancel outstanding tokens; cancellation
/// is always an explicit call.
pub struct CancelSource {
    inner: Arc<CancelInner>,
}

/// Worker-side view of a [`CancelSource`].
#[derive(Clone)]
pub struct CancelToken {
    inner: Arc<CancelInner>,
}

impl CancelSource {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(CancelInner {
                cancelled: AtomicBool::new(false),
                notify: (Mutex::new(()), Condvar::new()),
            }),
        }
    }

    /// Obtain a token observing this source.
    pub fn token(&self) -> CancelToken {
        CancelToken {
            inner: Arc::clone(&self.inner),
        }
    }

    /// Trip the token and wake every pending [`CancelToken::wait_timeout`].
    pub fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::Release);
        let (lock, cvar) = &self.inner.notify;
        let _guard = lock.lock().unwrap_or_else(|e| e.into_inner());
        cvar.notify_all();
    }
}

impl Default for CancelSource {
    fn default() -> Self {
        Self::new()
    }
}

impl CancelToken {
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::Acquire)
    }

    /// Park for up to `duration`, waking early on cancellation.
    ///
    /// Returns `true` if cancelled, `false` if the full delay elapsed.
    pub fn wait_timeout(&self, duration: Duration) -> bool {
        if self.is_cancelled() {
            return true;
        }
        let (lock, cvar) = &self.inner.notify;
        let mut guard = lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut remaining = duration;
        let deadline = std::time::Instant::now() + duration;
        // Condvar wakes can be spurious; keep waiting out the remainder.
        loop {
            if self.is_cancelled() {
                return true;
            }
            let (next, timed_out) = match cvar.wait_timeout(guard, remaining) {
                Ok((g, result)) => (g, result.timed_out()),
                Err(poisoned) => {
                    let (g, result) = poisoned.into_inner();
                    (g, result.timed_out())
                }
            };
            guard = next;
            if self.is_cancelled() {
                return true;
            }
            if timed_out {
                return false;
            }
            match deadline.checked_duration_since(std::time::Instant::now()) {
                Some(left) if !left.is_zero() => remaining = left,
                _ => return false,
            }
        }
    }
}
