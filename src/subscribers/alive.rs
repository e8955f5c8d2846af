//! Stateful subscriber that tracks task liveness.
//!
//! [`AliveTracker`] maintains an in-memory map of task states by listening
//! to lifecycle events. The runner consults it when a task exceeds the
//! runaway grace (the `RunawayDetected` event carries its snapshot), and
//! callers can poll it to observe that a cancellation-resistant task is
//! still alive after teardown was requested.
//!
//! A task counts as alive once `TaskLaunched` is seen and until one of the
//! terminal events (`TaskFinished`, `TaskFailed`, `FailureSuppressed`,
//! `TaskCancelled`) arrives for its name.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::subscribers::subscribe::Subscribe;
use crate::tasks::TaskState;

/// Tracks which tasks are currently alive (launched, not yet terminal).
///
/// Snapshot methods are synchronous so they can be called from any context.
#[derive(Default)]
pub struct AliveTracker {
    inner: RwLock<HashMap<String, TaskState>>,
}

impl AliveTracker {
    /// Creates a new, empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// True if `name` has launched and not yet reached a terminal state.
    pub fn is_alive(&self, name: &str) -> bool {
        let map = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        map.get(name).is_some_and(|s| !s.is_terminal())
    }

    /// Last observed state of `name`, if it ever launched.
    pub fn state_of(&self, name: &str) -> Option<TaskState> {
        let map = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        map.get(name).copied()
    }

    /// Sorted names of currently alive tasks.
    pub fn snapshot(&self) -> Vec<String> {
        let map = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        let mut alive: Vec<String> = map
            .iter()
            .filter(|(_, s)| !s.is_terminal())
            .map(|(n, _)| n.clone())
            .collect();
        alive.sort();
        alive
    }

    fn record(&self, name: &str, state: TaskState) {
        let mut map = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        map.insert(name.to_string(), state);
    }
}

#[async_trait]
impl Subscribe for AliveTracker {
    async fn on_event(&self, event: &Event) {
        let Some(name) = event.task.as_deref() else {
            return;
        };
        match event.kind {
            EventKind::TaskLaunched => self.record(name, TaskState::Running),
            EventKind::TaskFinished => self.record(name, TaskState::Completed),
            EventKind::TaskFailed | EventKind::FailureSuppressed => {
                self.record(name, TaskState::Failed)
            }
            EventKind::TaskCancelled => self.record(name, TaskState::Cancelled),
            _ => {}
        }
    }

    fn name(&self) -> &'static str {
        "alive_tracker"
    }
}
