//! Launch layer: runs one unit of work to its terminal state.
//!
//! Both launch paths — detached spawns and scope children — funnel through
//! [`run_to_terminal`], which owns the terminal bookkeeping:
//!
//! - **Publish exactly one terminal event**: `TaskFinished`, `TaskFailed`,
//!   `TaskCancelled`, or `FailureSuppressed` (when a supervisor covers the
//!   launch).
//! - **Deliver supervised failures exactly once**, before the state flips to
//!   `Failed`. The supervisor observes; it never resumes or retries.
//! - **Advance the state watch last**, so an observer that sees a terminal
//!   state can already find the matching event on the bus.
//!
//! `TaskLaunched` is published at the spawn *site* (not inside the spawned
//! future), so the event stream reflects launch order deterministically.

use std::sync::Arc;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::clock::ClockRef;
use crate::error::TaskError;
use crate::events::{Bus, Event, EventKind};
use crate::scope::SupervisorRef;
use crate::tasks::context::TaskContext;
use crate::tasks::handle::{TaskHandle, TaskId};
use crate::tasks::state::{self, TaskState};
use crate::tasks::work::WorkRef;

/// Spawns `work` as an independently rooted task.
///
/// The task's token is a child of `parent`, so a root teardown still reaches
/// it, but no join boundary ties its outcome to the caller: a failure here
/// escapes asynchronously and never surfaces through the caller's `Result`.
pub(crate) fn spawn_detached<T: Send + 'static>(
    bus: &Bus,
    clock: &ClockRef,
    parent: &CancellationToken,
    supervisor: Option<SupervisorRef>,
    work: WorkRef<T>,
) -> TaskHandle<T> {
    let id = TaskId::next();
    let name: Arc<str> = Arc::from(work.name());
    let token = parent.child_token();
    let (state_tx, state_rx) = watch::channel(TaskState::Pending);

    bus.publish(Event::new(EventKind::TaskLaunched).with_task(name.clone()));

    let ctx = TaskContext::new(name.clone(), token.clone(), clock.clone(), bus.clone());
    let join = tokio::spawn(run_to_terminal(work, ctx, state_tx, supervisor));

    TaskHandle {
        id,
        name,
        token,
        state: state_rx,
        join,
    }
}

/// Executes one unit of work and applies its terminal transition.
///
/// Returns the work's own result unchanged; interception affects event
/// routing and sibling propagation, never the stored result.
pub(crate) async fn run_to_terminal<T: Send + 'static>(
    work: WorkRef<T>,
    ctx: TaskContext,
    state: watch::Sender<TaskState>,
    supervisor: Option<SupervisorRef>,
) -> Result<T, TaskError> {
    state::advance(&state, TaskState::Running);

    let res = work.run(ctx.clone()).await;
    let bus = ctx.bus();

    match &res {
        Ok(_) => {
            bus.publish(Event::new(EventKind::TaskFinished).with_task(ctx.name()));
            state::advance(&state, TaskState::Completed);
        }
        Err(TaskError::Cancelled) => {
            bus.publish(Event::new(EventKind::TaskCancelled).with_task(ctx.name()));
            state::advance(&state, TaskState::Cancelled);
        }
        Err(err) => {
            match &supervisor {
                Some(sup) => {
                    sup.on_failure(ctx.name(), err).await;
                    bus.publish(
                        Event::new(EventKind::FailureSuppressed)
                            .with_task(ctx.name())
                            .with_reason(err.to_string()),
                    );
                }
                None => {
                    bus.publish(
                        Event::new(EventKind::TaskFailed)
                            .with_task(ctx.name())
                            .with_reason(err.to_string()),
                    );
                }
            }
            state::advance(&state, TaskState::Failed);
        }
    }

    res
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::TokioClock;
    use crate::tasks::work_fn::WorkFn;
    use std::time::Duration;

    fn env() -> (Bus, ClockRef, CancellationToken) {
        (Bus::new(64), Arc::new(TokioClock), CancellationToken::new())
    }

    #[tokio::test]
    async fn test_detached_success_reaches_completed() {
        let (bus, clock, root) = env();
        let mut rx = bus.subscribe();
        let work = WorkFn::arc("ok", |_ctx: TaskContext| async move { Ok::<_, TaskError>(5) });
        let handle = spawn_detached(&bus, &clock, &root, None, work);

        assert_eq!(handle.join().await, Ok(5));
        assert_eq!(rx.recv().await.expect("launch").kind, EventKind::TaskLaunched);
        assert_eq!(rx.recv().await.expect("finish").kind, EventKind::TaskFinished);
    }

    #[tokio::test]
    async fn test_detached_failure_publishes_task_failed() {
        let (bus, clock, root) = env();
        let mut rx = bus.subscribe();
        let work = WorkFn::arc("bad", |_ctx: TaskContext| async move {
            Err::<i64, _>(TaskError::invalid_input("nope"))
        });
        let mut handle = spawn_detached(&bus, &clock, &root, None, work);

        assert_eq!(handle.wait_terminal().await, TaskState::Failed);
        assert_eq!(rx.recv().await.expect("launch").kind, EventKind::TaskLaunched);
        let failed = rx.recv().await.expect("failed");
        assert_eq!(failed.kind, EventKind::TaskFailed);
        assert_eq!(failed.task.as_deref(), Some("bad"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_detached_cancellation_reaches_cancelled() {
        let (bus, clock, root) = env();
        let work = WorkFn::arc("waits", |ctx: TaskContext| async move {
            ctx.sleep(Duration::from_secs(60)).await?;
            Ok::<_, TaskError>(0)
        });
        let mut handle = spawn_detached(&bus, &clock, &root, None, work);
        tokio::time::sleep(Duration::from_millis(10)).await;
        handle.cancel();
        assert_eq!(handle.wait_terminal().await, TaskState::Cancelled);
    }
}
