#![forbid(unsafe_code)]

//! E2E: cancellation semantics and the single-session rule.
//!
//! Covers:
//! 1. Cancel with a long inter-tick delay pending wakes the delay and
//!    returns promptly; no publication follows.
//! 2. Cancel is idempotent and safe when no session is active.
//! 3. Starting while a session is active is rejected without disturbing
//!    the running session.
//! 4. A new session can start after a cancel and replays from cursor 0.
//! 5. Cancel invoked from inside a sink callback stops the session
//!    without deadlocking.
//!
//! Run:
//!   cargo test -p sortviz-runtime --test e2e_playback_cancellation

use std::sync::mpsc;
use std::sync::{Arc, Mutex, Weak};
use std::time::{Duration, Instant};

use sortviz_core::{AlgorithmKind, Metrics, Step, StepKind, Trace};
use sortviz_runtime::{InvalidTraceError, PlaybackPlan, PlaybackSink, Player, TickSnapshot};

#[derive(Debug, Clone, PartialEq)]
enum Event {
    Tick(usize),
    Complete,
}

struct RecordingSink {
    events: Mutex<mpsc::Sender<Event>>,
}

impl RecordingSink {
    fn new() -> (Arc<Self>, mpsc::Receiver<Event>) {
        let (tx, rx) = mpsc::channel();
        (
            Arc::new(Self {
                events: Mutex::new(tx),
            }),
            rx,
        )
    }
}

impl PlaybackSink for RecordingSink {
    fn on_tick(&self, snapshot: &TickSnapshot) {
        let _ = self
            .events
            .lock()
            .unwrap()
            .send(Event::Tick(snapshot.cursor));
    }

    fn on_complete(&self, _final_state: &TickSnapshot) {
        let _ = self.events.lock().unwrap().send(Event::Complete);
    }
}

fn plan_of(n: usize) -> PlaybackPlan {
    let steps: Vec<Step> = (0..n)
        .map(|_| Step {
            array: vec![2, 1],
            indices: vec![0, 1],
            kind: StepKind::Comparison,
            description: "compare".into(),
            comparisons: None,
            swaps: None,
        })
        .collect();
    PlaybackPlan::new(
        Trace::from_steps(steps),
        Metrics::default(),
        AlgorithmKind::Bubble,
    )
}

#[test]
fn cancel_wakes_a_pending_delay_and_suppresses_all_later_publications() {
    let (sink, rx) = RecordingSink::new();
    let player = Player::new(sink);
    player.start(plan_of(4), Duration::from_secs(30)).unwrap();
    assert_eq!(
        rx.recv_timeout(Duration::from_secs(5)).unwrap(),
        Event::Tick(0)
    );

    // The worker is now parked on a 30s delay.
    let before = Instant::now();
    player.cancel();
    assert!(
        before.elapsed() < Duration::from_secs(2),
        "cancel should wake the pending delay, not wait it out"
    );
    assert!(!player.is_active());
    assert!(
        rx.recv_timeout(Duration::from_millis(200)).is_err(),
        "no tick or completion may follow a cancel"
    );
}

#[test]
fn cancel_is_idempotent_and_safe_when_inactive() {
    let (sink, rx) = RecordingSink::new();
    let player = Player::new(sink);
    player.cancel();
    player.start(plan_of(2), Duration::from_secs(30)).unwrap();
    assert!(rx.recv_timeout(Duration::from_secs(5)).is_ok());
    player.cancel();
    player.cancel();
    assert!(!player.is_active());
    assert!(rx.recv_timeout(Duration::from_millis(100)).is_err());
}

#[test]
fn start_while_active_is_rejected_and_leaves_the_session_running() {
    let (sink, rx) = RecordingSink::new();
    let player = Player::new(sink);
    player.start(plan_of(3), Duration::from_millis(20)).unwrap();
    assert_eq!(
        player.start(plan_of(3), Duration::from_millis(20)),
        Err(InvalidTraceError::SessionActive)
    );

    // The original session replays untouched: 3 ticks, one completion.
    let mut events = Vec::new();
    loop {
        let event = rx.recv_timeout(Duration::from_secs(10)).expect("stalled");
        let done = event == Event::Complete;
        events.push(event);
        if done {
            break;
        }
    }
    assert_eq!(
        events,
        vec![
            Event::Tick(0),
            Event::Tick(1),
            Event::Tick(2),
            Event::Complete
        ]
    );
}

#[test]
fn session_restarts_from_cursor_zero_after_cancel() {
    let (sink, rx) = RecordingSink::new();
    let player = Player::new(sink);
    player.start(plan_of(5), Duration::from_secs(30)).unwrap();
    assert_eq!(
        rx.recv_timeout(Duration::from_secs(5)).unwrap(),
        Event::Tick(0)
    );
    player.cancel();

    player.start(plan_of(2), Duration::from_millis(1)).unwrap();
    let mut events = Vec::new();
    loop {
        let event = rx.recv_timeout(Duration::from_secs(10)).expect("stalled");
        let done = event == Event::Complete;
        events.push(event);
        if done {
            break;
        }
    }
    assert_eq!(
        events,
        vec![Event::Tick(0), Event::Tick(1), Event::Complete]
    );
}

/// Cancels its own player from the first tick callback.
struct SelfCancellingSink {
    player: Mutex<Weak<Player>>,
    events: Mutex<mpsc::Sender<Event>>,
}

impl PlaybackSink for SelfCancellingSink {
    fn on_tick(&self, snapshot: &TickSnapshot) {
        let _ = self
            .events
            .lock()
            .unwrap()
            .send(Event::Tick(snapshot.cursor));
        if let Some(player) = self.player.lock().unwrap().upgrade() {
            player.cancel();
        }
    }

    fn on_complete(&self, _final_state: &TickSnapshot) {
        let _ = self.events.lock().unwrap().send(Event::Complete);
    }
}

#[test]
fn cancel_from_inside_a_sink_callback_stops_playback_without_deadlock() {
    let (tx, rx) = mpsc::channel();
    let sink = Arc::new(SelfCancellingSink {
        player: Mutex::new(Weak::new()),
        events: Mutex::new(tx),
    });
    let player = Arc::new(Player::new(sink.clone()));
    *sink.player.lock().unwrap() = Arc::downgrade(&player);

    player.start(plan_of(4), Duration::from_millis(5)).unwrap();
    assert_eq!(
        rx.recv_timeout(Duration::from_secs(5)).unwrap(),
        Event::Tick(0)
    );
    assert!(
        rx.recv_timeout(Duration::from_millis(200)).is_err(),
        "the re-entrant cancel must stop the session after one tick"
    );
    assert!(!player.is_active());
}
