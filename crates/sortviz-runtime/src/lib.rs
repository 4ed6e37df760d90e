#![forbid(unsafe_code)]

//! Cooperative, cancellable replay of sorting-algorithm traces.
//!
//! The [`Player`] owns a cursor into an immutable [`Trace`](sortviz_core::Trace),
//! advances it one step per tick on a worker thread, and publishes one
//! immutable [`TickSnapshot`] per tick through a caller-supplied
//! [`PlaybackSink`]. When the session carries a recursion tree, per-node
//! display states are re-resolved from each tick's snapshot and published
//! alongside it.
//!
//! Scheduling is single-session and timer-driven: the only suspension
//! point is the inter-tick delay, all derivation is synchronous, and
//! cancellation is epoch-checked so a stale wake-up can never resurrect
//! old state.

pub mod cancel;
pub mod player;
pub mod sink;
pub mod snapshot;

pub use cancel::{CancelSource, CancelToken};
pub use player::{InvalidTraceError, Player};
pub use sink::PlaybackSink;
pub use snapshot::{PlaybackPlan, TickSnapshot};
