//! Lifecycle events emitted by launches, scopes and work units.
//!
//! The [`EventKind`] enum classifies event types across three categories:
//! - **Lifecycle events**: task flow (launched, finished, failed, cancelled)
//! - **Interception events**: a failure consumed somewhere other than the
//!   task itself (supervisor, caller's join-site catch, local fallback)
//! - **Control events**: cancellation fan-out, runaway heartbeats and
//!   detection
//!
//! The [`Event`] struct carries additional metadata such as timestamps, task
//! name, reasons, and wait durations.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases
//! monotonically. When two children fail close together, `seq` is the
//! tie-break that makes "first-observed failure" well defined.
//!
//! ## Example
//! ```
//! use scopevisor::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::TaskFailed)
//!     .with_task("faulty")
//!     .with_reason("invalid input: rejected");
//!
//! assert_eq!(ev.kind, EventKind::TaskFailed);
//! assert_eq!(ev.task.as_deref(), Some("faulty"));
//! ```

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Task lifecycle ===
    /// A task was launched (published at the spawn site, so the stream
    /// reflects launch order).
    ///
    /// Sets:
    /// - `task`: task name
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    TaskLaunched,

    /// A task reached `Completed`.
    ///
    /// Sets:
    /// - `task`: task name
    /// - `at`, `seq`
    TaskFinished,

    /// A task reached `Failed` and nothing intercepted the failure.
    ///
    /// Sets:
    /// - `task`: task name
    /// - `reason`: failure message
    /// - `at`, `seq`
    TaskFailed,

    /// A task reached `Cancelled` (its wait was aborted and the work let the
    /// signal through).
    ///
    /// Sets:
    /// - `task`: task name
    /// - `at`, `seq`
    TaskCancelled,

    // === Failure interception ===
    /// A supervisor consumed a child failure; siblings keep running.
    ///
    /// Sets:
    /// - `task`: failing task name
    /// - `reason`: failure message
    /// - `at`, `seq`
    FailureSuppressed,

    /// The caller's catch at a scope join site fired.
    ///
    /// Sets:
    /// - `reason`: the error that was caught
    /// - `at`, `seq`
    FailureCaught,

    /// A work unit caught its own error (or a cancellation mid-wait) and
    /// substituted a fallback value.
    ///
    /// Sets:
    /// - `task`: task name
    /// - `reason`: what was caught
    /// - `at`, `seq`
    FallbackApplied,

    // === Control ===
    /// A cancellation signal was issued (root teardown or fail-fast fan-out).
    ///
    /// Sets:
    /// - `reason`: origin of the request
    /// - `at`, `seq`
    CancelRequested,

    /// Heartbeat from a loop that never reaches a suspension point.
    ///
    /// Sets:
    /// - `task`: task name
    /// - `at`, `seq`
    Tic,

    /// A task did not reach a terminal state within the configured grace and
    /// is presumed stuck.
    ///
    /// Sets:
    /// - `task`: task name
    /// - `waited_ms`: how long the runner waited
    /// - `reason`: names of tasks still alive
    /// - `at`, `seq`
    RunawayDetected,
}

/// Runtime event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Debug, Clone)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,
    /// Name of the task, if applicable.
    pub task: Option<Arc<str>>,
    /// Human-readable reason (errors, fallback detail, cancellation origin).
    pub reason: Option<Arc<str>>,
    /// Wait duration in milliseconds (compact), for `RunawayDetected`.
    pub waited_ms: Option<u32>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next
    /// sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            task: None,
            reason: None,
            waited_ms: None,
        }
    }

    /// Attaches a task name.
    #[inline]
    pub fn with_task(mut self, task: impl Into<Arc<str>>) -> Self {
        self.task = Some(task.into());
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches a wait duration (stored as milliseconds).
    #[inline]
    pub fn with_waited(mut self, d: Duration) -> Self {
        let ms = d.as_millis().min(u128::from(u32::MAX)) as u32;
        self.waited_ms = Some(ms);
        self
    }

    /// True if this event marks a terminal task state.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(
            self.kind,
            EventKind::TaskFinished
                | EventKind::TaskFailed
                | EventKind::TaskCancelled
                | EventKind::FailureSuppressed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seq_is_monotonic() {
        let a = Event::new(EventKind::TaskLaunched);
        let b = Event::new(EventKind::TaskLaunched);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn test_builders_set_fields() {
        let ev = Event::new(EventKind::RunawayDetected)
            .with_task("runaway")
            .with_reason("still alive")
            .with_waited(Duration::from_millis(1500));
        assert_eq!(ev.task.as_deref(), Some("runaway"));
        assert_eq!(ev.reason.as_deref(), Some("still alive"));
        assert_eq!(ev.waited_ms, Some(1500));
    }

    #[test]
    fn test_terminal_kinds() {
        assert!(Event::new(EventKind::TaskFinished).is_terminal());
        assert!(Event::new(EventKind::FailureSuppressed).is_terminal());
        assert!(!Event::new(EventKind::TaskLaunched).is_terminal());
        assert!(!Event::new(EventKind::Tic).is_terminal());
    }
}
