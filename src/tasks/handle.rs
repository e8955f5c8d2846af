//! Handles to launched tasks.
//!
//! Two handle flavours exist, mirroring tokio's `JoinHandle`/`AbortHandle`
//! split:
//!
//! - [`TaskHandle`] — returned by a detached (independently rooted) launch.
//!   Owns the result: [`TaskHandle::join`] consumes the handle and yields
//!   `Ok(value)` or the task's error. [`TaskHandle::wait_terminal`] merely
//!   observes the terminal state without surfacing the error — this is the
//!   reason a detached failure never fires a caller's catch block.
//! - [`ChildHandle`] — returned by [`Scope::launch`](crate::Scope::launch).
//!   Observation only; results flow through
//!   [`Scope::join_all`](crate::Scope::join_all).

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::error::TaskError;
use crate::tasks::state::TaskState;

/// Global counter backing [`TaskId::next`].
static TASK_SEQ: AtomicU64 = AtomicU64::new(0);

/// Monotonic identifier assigned to every launched task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(u64);

impl TaskId {
    pub(crate) fn next() -> Self {
        TaskId(TASK_SEQ.fetch_add(1, AtomicOrdering::Relaxed))
    }

    /// Raw numeric value.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Handle to a detached (independently rooted) task.
pub struct TaskHandle<T> {
    pub(crate) id: TaskId,
    pub(crate) name: Arc<str>,
    pub(crate) token: CancellationToken,
    pub(crate) state: watch::Receiver<TaskState>,
    pub(crate) join: JoinHandle<Result<T, TaskError>>,
}

impl<T> TaskHandle<T> {
    /// Identifier assigned at launch.
    pub fn id(&self) -> TaskId {
        self.id
    }

    /// Task name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current lifecycle state.
    pub fn state(&self) -> TaskState {
        *self.state.borrow()
    }

    /// True once the task reached a terminal state.
    pub fn is_terminal(&self) -> bool {
        self.state().is_terminal()
    }

    /// Requests cancellation of this task (and of any nested launches that
    /// derived their token from it). Idempotent.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Waits until the task reaches a terminal state and returns it.
    ///
    /// Unlike [`TaskHandle::join`], this never surfaces the task's error —
    /// observing a `Failed` sibling this way leaves the failure unhandled.
    pub async fn wait_terminal(&mut self) -> TaskState {
        loop {
            let current = *self.state.borrow_and_update();
            if current.is_terminal() {
                return current;
            }
            if self.state.changed().await.is_err() {
                return *self.state.borrow();
            }
        }
    }

    /// Consumes the handle and returns the task's result.
    ///
    /// A contained panic in the work function surfaces as
    /// [`TaskError::Fail`].
    pub async fn join(self) -> Result<T, TaskError> {
        match self.join.await {
            Ok(res) => res,
            Err(join_err) => Err(TaskError::fail(format!(
                "task '{}' aborted: {join_err}",
                self.name
            ))),
        }
    }
}

/// Observation handle to a scope child.
///
/// The child's result is owned by its [`Scope`](crate::Scope) and surfaces
/// from `join_all` in launch order.
pub struct ChildHandle {
    pub(crate) id: TaskId,
    pub(crate) name: Arc<str>,
    pub(crate) token: CancellationToken,
    pub(crate) state: watch::Receiver<TaskState>,
}

impl ChildHandle {
    /// Identifier assigned at launch.
    pub fn id(&self) -> TaskId {
        self.id
    }

    /// Task name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current lifecycle state.
    pub fn state(&self) -> TaskState {
        *self.state.borrow()
    }

    /// True once the task reached a terminal state.
    pub fn is_terminal(&self) -> bool {
        self.state().is_terminal()
    }

    /// Requests cancellation of this child only. Idempotent.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Waits until the child reaches a terminal state and returns it.
    pub async fn wait_terminal(&mut self) -> TaskState {
        loop {
            let current = *self.state.borrow_and_update();
            if current.is_terminal() {
                return current;
            }
            if self.state.changed().await.is_err() {
                return *self.state.borrow();
            }
        }
    }
}
