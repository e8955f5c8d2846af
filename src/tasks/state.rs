//! Task state machine.
//!
//! [`TaskState`] models the lifecycle of one task:
//!
//! ```text
//! Pending ──► Running ──► Completed
//!                     ├─► Failed
//!                     └─► Cancelled
//! ```
//!
//! The three right-hand states are terminal: once a task reaches one of
//! them, its state never changes again. The guard lives in
//! [`advance`], which every transition in the crate goes through.

use tokio::sync::watch;

/// Lifecycle state of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    /// Created but not yet polled.
    Pending,
    /// The work function is executing.
    Running,
    /// The work returned a value.
    Completed,
    /// The work returned an error (supervised or not).
    Failed,
    /// The work's wait was aborted by cancellation.
    Cancelled,
}

impl TaskState {
    /// True for `Completed`, `Failed`, and `Cancelled`.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TaskState::Completed | TaskState::Failed | TaskState::Cancelled
        )
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            TaskState::Pending => "pending",
            TaskState::Running => "running",
            TaskState::Completed => "completed",
            TaskState::Failed => "failed",
            TaskState::Cancelled => "cancelled",
        }
    }
}

/// Advances the state behind `tx`, refusing to leave a terminal state.
///
/// Returns `true` if the transition was applied.
pub(crate) fn advance(tx: &watch::Sender<TaskState>, next: TaskState) -> bool {
    tx.send_if_modified(|cur| {
        if cur.is_terminal() || *cur == next {
            false
        } else {
            *cur = next;
            true
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_through_lifecycle() {
        let (tx, rx) = watch::channel(TaskState::Pending);
        assert!(advance(&tx, TaskState::Running));
        assert!(advance(&tx, TaskState::Completed));
        assert_eq!(*rx.borrow(), TaskState::Completed);
    }

    #[test]
    fn test_terminal_state_is_immutable() {
        let (tx, rx) = watch::channel(TaskState::Running);
        assert!(advance(&tx, TaskState::Failed));
        assert!(!advance(&tx, TaskState::Cancelled));
        assert!(!advance(&tx, TaskState::Running));
        assert_eq!(*rx.borrow(), TaskState::Failed);
    }

    #[test]
    fn test_same_state_is_not_a_transition() {
        let (tx, _rx) = watch::channel(TaskState::Running);
        assert!(!advance(&tx, TaskState::Running));
    }
}
