//! Fail-fast scope: ordered children, one shared cancellation signal.
//!
//! [`Scope::join_all`] returns only after every child reached a terminal
//! state, whatever the outcome. The first unhandled failure wins: it cancels
//! the shared token, the remaining children drain to `Cancelled`, and the
//! failure is returned to the caller as
//! [`ScopeError::ChildFailed`](crate::ScopeError::ChildFailed). Failures
//! observed after cancellation began are discarded.
//!
//! "First" is the arrival order of terminal events at the join loop; the
//! global event sequence number is the documented tie-break when two
//! children fail back to back.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::clock::ClockRef;
use crate::error::{ScopeError, TaskError};
use crate::events::{Bus, Event, EventKind};
use crate::scope::supervisor::SupervisorRef;
use crate::tasks::launch::run_to_terminal;
use crate::tasks::{ChildHandle, TaskContext, TaskId, TaskState, WorkRef};

struct Child {
    name: Arc<str>,
    supervised: bool,
}

/// Structured-concurrency boundary owning a set of child tasks.
///
/// Children launched through a scope share its cancellation token (each gets
/// a child token of it) and are joined together by [`Scope::join_all`].
/// Launch order determines the order of aggregated results.
pub struct Scope<T> {
    token: CancellationToken,
    clock: ClockRef,
    bus: Bus,
    supervisor: Option<SupervisorRef>,
    children: Vec<Child>,
    set: JoinSet<(usize, Result<T, TaskError>)>,
}

impl<T: Send + 'static> Scope<T> {
    /// Creates a scope whose cancellation signal is a child of `parent`:
    /// cancelling the parent tears down this scope and everything in it.
    pub fn new(parent: &CancellationToken, clock: ClockRef, bus: Bus) -> Self {
        Self {
            token: parent.child_token(),
            clock,
            bus,
            supervisor: None,
            children: Vec::new(),
            set: JoinSet::new(),
        }
    }

    /// Attaches a scope-wide failure handler.
    ///
    /// Every uncaught child failure is delivered to the handler instead of
    /// triggering fail-fast cancellation; siblings run to natural
    /// completion.
    pub fn with_supervisor(mut self, supervisor: SupervisorRef) -> Self {
        self.supervisor = Some(supervisor);
        self
    }

    /// Launches a child under this scope's cancellation signal.
    pub fn launch(&mut self, work: WorkRef<T>) -> ChildHandle {
        self.launch_with(work, None)
    }

    /// Launches a child with a handler covering only this launch.
    ///
    /// Failures of this child are delivered to `supervisor`; failures of
    /// uncovered siblings still trigger the fail-fast fan-out (including
    /// cancelling this child).
    pub fn launch_supervised(&mut self, work: WorkRef<T>, supervisor: SupervisorRef) -> ChildHandle {
        self.launch_with(work, Some(supervisor))
    }

    fn launch_with(&mut self, work: WorkRef<T>, supervisor: Option<SupervisorRef>) -> ChildHandle {
        let idx = self.children.len();
        let id = TaskId::next();
        let name: Arc<str> = Arc::from(work.name());
        let token = self.token.child_token();
        let (state_tx, state_rx) = watch::channel(TaskState::Pending);

        self.bus
            .publish(Event::new(EventKind::TaskLaunched).with_task(name.clone()));

        let effective = supervisor.or_else(|| self.supervisor.clone());
        let supervised = effective.is_some();
        let ctx = TaskContext::new(
            name.clone(),
            token.clone(),
            self.clock.clone(),
            self.bus.clone(),
        );
        self.set.spawn(async move {
            let res = run_to_terminal(work, ctx, state_tx, effective).await;
            (idx, res)
        });

        self.children.push(Child {
            name: name.clone(),
            supervised,
        });
        ChildHandle {
            id,
            name,
            token,
            state: state_rx,
        }
    }

    /// Number of children launched so far.
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// True when no child has been launched.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Cancels every child in this scope (current and future). Idempotent.
    pub fn cancel(&self) {
        if !self.token.is_cancelled() {
            self.bus
                .publish(Event::new(EventKind::CancelRequested).with_reason("scope cancel"));
            self.token.cancel();
        }
    }

    /// Joins every child, applying the fail-fast policy.
    ///
    /// Returns:
    /// - `Ok(values)` — all (unsupervised) children completed; values in
    ///   launch order. Children whose failure a supervisor consumed simply
    ///   contribute no value.
    /// - `Err(ScopeError::ChildFailed)` — an unhandled failure occurred; all
    ///   siblings were driven to a terminal state before returning, and the
    ///   error carries the first-observed failure.
    /// - `Err(ScopeError::Cancelled)` — the scope was cancelled from
    ///   outside before every child completed.
    pub async fn join_all(mut self) -> Result<Vec<T>, ScopeError> {
        let mut slots: Vec<Option<T>> = Vec::with_capacity(self.children.len());
        slots.resize_with(self.children.len(), || None);

        let mut first_failure: Option<(Arc<str>, TaskError)> = None;
        let mut cancelled_children = 0usize;

        while let Some(next) = self.set.join_next().await {
            let (idx, res) = match next {
                Ok(pair) => pair,
                Err(join_err) => {
                    // A child future died outside the work contract (panic
                    // or runtime abort); fan out like any unhandled failure.
                    if first_failure.is_none() {
                        first_failure =
                            Some((Arc::from("aborted-child"), TaskError::fail(join_err.to_string())));
                        self.fan_out_cancel();
                    }
                    continue;
                }
            };

            match res {
                Ok(value) => slots[idx] = Some(value),
                Err(TaskError::Cancelled) => cancelled_children += 1,
                Err(err) => {
                    if self.children[idx].supervised {
                        // Already delivered to its handler by the launch
                        // layer; siblings keep running.
                    } else if first_failure.is_none() {
                        first_failure = Some((self.children[idx].name.clone(), err));
                        self.fan_out_cancel();
                    }
                    // Failures observed once cancellation began are
                    // discarded; only the first propagates.
                }
            }
        }

        if let Some((task, source)) = first_failure {
            return Err(ScopeError::ChildFailed {
                task: task.to_string(),
                source,
            });
        }
        if cancelled_children > 0 {
            return Err(ScopeError::Cancelled);
        }
        Ok(slots.into_iter().flatten().collect())
    }

    fn fan_out_cancel(&self) {
        self.bus
            .publish(Event::new(EventKind::CancelRequested).with_reason("sibling failure"));
        self.token.cancel();
    }
}

/// Runs `body` with a fresh launch capability, then joins every child.
///
/// This is the structured entry point: all tasks launched by `body` are
/// guaranteed terminal by the time this returns, and an unhandled child
/// failure surfaces here — synchronously — as the scope's error.
///
/// # Example
/// ```no_run
/// use std::sync::Arc;
/// use tokio_util::sync::CancellationToken;
/// use scopevisor::{with_scope, Bus, Scope, TaskContext, TaskError, TokioClock, WorkFn};
///
/// # async fn demo() -> Result<(), scopevisor::ScopeError> {
/// let root = CancellationToken::new();
/// let scope = Scope::new(&root, Arc::new(TokioClock), Bus::new(64));
/// let values = with_scope(scope, |s| {
///     s.launch(WorkFn::arc("one", |_ctx: TaskContext| async { Ok::<_, TaskError>(1) }));
///     s.launch(WorkFn::arc("two", |_ctx: TaskContext| async { Ok::<_, TaskError>(2) }));
/// })
/// .await?;
/// assert_eq!(values, vec![1, 2]);
/// # Ok(())
/// # }
/// ```
pub async fn with_scope<T, F>(scope: Scope<T>, body: F) -> Result<Vec<T>, ScopeError>
where
    T: Send + 'static,
    F: FnOnce(&mut Scope<T>),
{
    let mut scope = scope;
    body(&mut scope);
    scope.join_all().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::TokioClock;
    use crate::scope::supervisor::FailureLog;
    use crate::tasks::WorkFn;
    use std::time::Duration;

    fn fixture() -> (Bus, Scope<i64>) {
        let bus = Bus::new(256);
        let scope = Scope::new(&CancellationToken::new(), Arc::new(TokioClock), bus.clone());
        (bus, scope)
    }

    fn sleepy(name: &'static str, secs: u64, value: i64) -> WorkRef<i64> {
        WorkFn::arc(name, move |ctx: TaskContext| async move {
            ctx.sleep(Duration::from_secs(secs)).await?;
            Ok(value)
        })
    }

    fn faulty(name: &'static str, secs: u64) -> WorkRef<i64> {
        WorkFn::arc(name, move |ctx: TaskContext| async move {
            ctx.sleep(Duration::from_secs(secs)).await?;
            Err::<i64, _>(TaskError::invalid_input("rejected"))
        })
    }

    #[tokio::test(start_paused = true)]
    async fn test_join_all_preserves_launch_order() {
        let (_bus, mut scope) = fixture();
        // The slower child is launched first; completion order is reversed,
        // aggregation order is not.
        scope.launch(sleepy("slower", 3, 1));
        scope.launch(sleepy("faster", 1, 2));
        assert_eq!(scope.join_all().await, Ok(vec![1, 2]));
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_scope_joins_immediately() {
        let (_bus, scope) = fixture();
        assert_eq!(scope.join_all().await, Ok(vec![]));
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_failure_cancels_siblings() {
        let (bus, mut scope) = fixture();
        let mut rx = bus.subscribe();
        scope.launch(sleepy("slow", 10, 1));
        scope.launch(faulty("faulty", 1));

        let err = scope.join_all().await.expect_err("must fail");
        match err {
            ScopeError::ChildFailed { task, source } => {
                assert_eq!(task, "faulty");
                assert_eq!(source, TaskError::invalid_input("rejected"));
            }
            other => panic!("unexpected error: {other:?}"),
        }

        // Exactly children-1 cancelled transitions follow the failure.
        let mut cancelled = 0;
        while let Ok(ev) = rx.try_recv() {
            if ev.kind == EventKind::TaskCancelled {
                cancelled += 1;
            }
        }
        assert_eq!(cancelled, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_scope_supervisor_keeps_siblings_running() {
        let (_bus, scope) = fixture();
        let sup = Arc::new(FailureLog::new());
        let mut scope = scope.with_supervisor(sup.clone());
        scope.launch(faulty("faulty", 1));
        scope.launch(sleepy("slow", 3, 2));

        let started = tokio::time::Instant::now();
        assert_eq!(scope.join_all().await, Ok(vec![2]));
        // The surviving sibling ran to natural completion.
        assert!(started.elapsed() >= Duration::from_secs(3));
        assert_eq!(sup.count().await, 1);
        assert_eq!(sup.entries().await[0].0, "faulty");
    }

    #[tokio::test(start_paused = true)]
    async fn test_launch_supervised_covers_only_that_launch() {
        let (_bus, mut scope) = fixture();
        let sup = Arc::new(FailureLog::new());
        scope.launch_supervised(faulty("covered", 1), sup.clone());
        scope.launch(faulty("uncovered", 2));
        scope.launch(sleepy("slow", 10, 3));

        let err = scope.join_all().await.expect_err("must fail");
        match err {
            ScopeError::ChildFailed { task, .. } => assert_eq!(task, "uncovered"),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(sup.count().await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_external_cancel_drains_to_cancelled() {
        let (_bus, mut scope) = fixture();
        scope.launch(sleepy("slow", 10, 1));
        scope.cancel();
        scope.cancel(); // idempotent
        assert_eq!(scope.join_all().await, Err(ScopeError::Cancelled));
    }

    #[tokio::test(start_paused = true)]
    async fn test_with_scope_joins_on_body_return() {
        let bus = Bus::new(64);
        let scope: Scope<i64> =
            Scope::new(&CancellationToken::new(), Arc::new(TokioClock), bus);
        let values = with_scope(scope, |s| {
            s.launch(sleepy("one", 1, 10));
            s.launch(sleepy("two", 2, 20));
        })
        .await
        .expect("join");
        assert_eq!(values, vec![10, 20]);
    }
}
