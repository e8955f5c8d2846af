//! Simulated work units and the combinators the scenarios compose them with.
//!
//! - [`SlowUnit`] — waits, then completes with its value; behavior on a
//!   cancellation mid-wait is configurable via [`CancelBehavior`].
//! - [`FaultyUnit`] — waits, then fails with a fixed invalid-input error.
//! - [`Fallback`] — wraps a unit in a local catch that substitutes a value.
//! - [`Redirect`] — re-dispatches a unit through a nested detached task;
//!   explicitly *not* a join boundary.
//! - [`RunawayUnit`] — a loop on a dedicated OS thread that never reaches a
//!   suspension point; the cancellation signal is accepted but never
//!   observed.

use std::borrow::Cow;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::TaskError;
use crate::events::{Event, EventKind};
use crate::tasks::launch::spawn_detached;
use crate::tasks::{TaskContext, Work, WorkRef};

/// What a [`SlowUnit`] does when its wait is aborted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelBehavior {
    /// Catch the cancellation, publish `FallbackApplied`, and complete with
    /// the unit's value anyway.
    Substitute,
    /// Let the cancellation through; the task transitions to `Cancelled`.
    Propagate,
}

/// Simulated long-running unit.
///
/// Waits `delay`, then completes with `value`. The wait is the unit's only
/// suspension point.
pub struct SlowUnit {
    name: Cow<'static, str>,
    delay: Duration,
    value: i64,
    on_cancel: CancelBehavior,
}

impl SlowUnit {
    /// Creates a slow unit.
    pub fn new(
        name: impl Into<Cow<'static, str>>,
        delay: Duration,
        value: i64,
        on_cancel: CancelBehavior,
    ) -> Self {
        Self {
            name: name.into(),
            delay,
            value,
            on_cancel,
        }
    }
}

#[async_trait]
impl Work for SlowUnit {
    type Output = i64;

    fn name(&self) -> &str {
        &self.name
    }

    async fn run(&self, ctx: TaskContext) -> Result<i64, TaskError> {
        match ctx.sleep(self.delay).await {
            Ok(()) => Ok(self.value),
            Err(TaskError::Cancelled) => match self.on_cancel {
                CancelBehavior::Substitute => {
                    ctx.bus().publish(
                        Event::new(EventKind::FallbackApplied)
                            .with_task(ctx.name())
                            .with_reason("caught cancellation mid-wait"),
                    );
                    Ok(self.value)
                }
                CancelBehavior::Propagate => Err(TaskError::Cancelled),
            },
            Err(other) => Err(other),
        }
    }
}

/// Simulated flaky unit: waits, then fails with a fixed invalid-input error.
pub struct FaultyUnit {
    name: Cow<'static, str>,
    delay: Duration,
    message: String,
}

impl FaultyUnit {
    /// Creates a faulty unit with the given rejection message.
    pub fn new(
        name: impl Into<Cow<'static, str>>,
        delay: Duration,
        message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            delay,
            message: message.into(),
        }
    }
}

#[async_trait]
impl Work for FaultyUnit {
    type Output = i64;

    fn name(&self) -> &str {
        &self.name
    }

    async fn run(&self, ctx: TaskContext) -> Result<i64, TaskError> {
        ctx.sleep(self.delay).await?;
        Err(TaskError::invalid_input(self.message.clone()))
    }
}

/// Local-catch combinator: runs the inner unit in the same task and
/// substitutes `value` for any error — including a cancellation caught
/// mid-wait, which is an intentional, legitimate override.
///
/// Because the catch is local to the task, no failure can escape to a
/// sibling or to the launch site.
pub struct Fallback<T> {
    inner: WorkRef<T>,
    value: T,
}

impl<T: Clone + Send + Sync + 'static> Fallback<T> {
    /// Wraps `inner`, substituting `value` on any error.
    pub fn new(inner: WorkRef<T>, value: T) -> Self {
        Self { inner, value }
    }

    /// Convenience: wraps and returns a shared handle.
    pub fn arc(inner: WorkRef<T>, value: T) -> Arc<Self> {
        Arc::new(Self::new(inner, value))
    }
}

#[async_trait]
impl<T: Clone + Send + Sync + 'static> Work for Fallback<T> {
    type Output = T;

    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn run(&self, ctx: TaskContext) -> Result<T, TaskError> {
        match self.inner.run(ctx.clone()).await {
            Ok(v) => Ok(v),
            Err(err) => {
                ctx.bus().publish(
                    Event::new(EventKind::FallbackApplied)
                        .with_task(ctx.name())
                        .with_reason(err.to_string()),
                );
                Ok(self.value.clone())
            }
        }
    }
}

/// Dispatch-redirection combinator.
///
/// Re-spawns the inner unit as a nested detached task (token derived from
/// this task's own) and relays its result unchanged. The hop checkpoints at
/// entry and exit — those are its only suspension points — and creates no
/// join boundary: an inner failure becomes this task's failure and escapes
/// exactly as it would have without the hop.
pub struct Redirect<T> {
    name: Cow<'static, str>,
    hop: WorkRef<T>,
}

impl<T: Send + 'static> Redirect<T> {
    /// Wraps `inner`; the nested task is named `<inner>-hop`.
    pub fn new(inner: WorkRef<T>) -> Self {
        let name: Cow<'static, str> = Cow::Owned(inner.name().to_string());
        let hop: WorkRef<T> = Arc::new(Renamed {
            name: format!("{}-hop", inner.name()),
            inner,
        });
        Self { name, hop }
    }

    /// Convenience: wraps and returns a shared handle.
    pub fn arc(inner: WorkRef<T>) -> Arc<Self> {
        Arc::new(Self::new(inner))
    }
}

#[async_trait]
impl<T: Send + 'static> Work for Redirect<T> {
    type Output = T;

    fn name(&self) -> &str {
        &self.name
    }

    async fn run(&self, ctx: TaskContext) -> Result<T, TaskError> {
        ctx.checkpoint()?;
        let handle = spawn_detached(ctx.bus(), ctx.clock(), ctx.token(), None, self.hop.clone());
        let res = handle.join().await;
        ctx.checkpoint()?;
        res
    }
}

/// Renames a unit so the nested hop is distinguishable in the event stream.
struct Renamed<T> {
    name: String,
    inner: WorkRef<T>,
}

#[async_trait]
impl<T: Send + 'static> Work for Renamed<T> {
    type Output = T;

    fn name(&self) -> &str {
        &self.name
    }

    async fn run(&self, ctx: TaskContext) -> Result<T, TaskError> {
        self.inner.run(ctx).await
    }
}

/// Cancellation-resistant loop.
///
/// Starts a dedicated OS thread that sleeps and publishes a `Tic` forever,
/// then parks the async task on a future that never resolves. Neither side
/// ever reaches a suspension point that observes the cancellation token, so
/// a teardown request is accepted but has no effect: the loop leaks until
/// process exit. This is the documented failure mode of omitting a
/// cooperative cancellation check, preserved on purpose.
pub struct RunawayUnit {
    name: Cow<'static, str>,
    tic: Duration,
}

impl RunawayUnit {
    /// Creates a runaway unit ticking every `tic`.
    pub fn new(name: impl Into<Cow<'static, str>>, tic: Duration) -> Self {
        Self {
            name: name.into(),
            tic,
        }
    }
}

#[async_trait]
impl Work for RunawayUnit {
    type Output = i64;

    fn name(&self) -> &str {
        &self.name
    }

    async fn run(&self, ctx: TaskContext) -> Result<i64, TaskError> {
        let bus = ctx.bus().clone();
        let name: Arc<str> = Arc::from(ctx.name());
        let tic = self.tic;
        let spawned = std::thread::Builder::new()
            .name(format!("{name}-loop"))
            .spawn(move || loop {
                std::thread::sleep(tic);
                bus.publish(Event::new(EventKind::Tic).with_task(name.clone()));
            });
        if let Err(err) = spawned {
            return Err(TaskError::fail(format!("loop thread failed to start: {err}")));
        }
        std::future::pending().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::TokioClock;
    use crate::events::Bus;
    use tokio_util::sync::CancellationToken;

    fn ctx(bus: &Bus, token: CancellationToken) -> TaskContext {
        TaskContext::new(Arc::from("unit"), token, Arc::new(TokioClock), bus.clone())
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_unit_completes_with_value() {
        let bus = Bus::new(16);
        let unit = SlowUnit::new(
            "slow",
            Duration::from_secs(5),
            1,
            CancelBehavior::Propagate,
        );
        assert_eq!(unit.run(ctx(&bus, CancellationToken::new())).await, Ok(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_unit_substitutes_on_cancel() {
        let bus = Bus::new(16);
        let mut rx = bus.subscribe();
        let token = CancellationToken::new();
        let unit = SlowUnit::new(
            "slow",
            Duration::from_secs(5),
            1,
            CancelBehavior::Substitute,
        );
        let c = ctx(&bus, token.clone());
        let run = tokio::spawn(async move { unit.run(c).await });
        tokio::time::sleep(Duration::from_millis(10)).await;
        token.cancel();
        assert_eq!(run.await.expect("join"), Ok(1));
        let ev = rx.recv().await.expect("event");
        assert_eq!(ev.kind, EventKind::FallbackApplied);
    }

    #[tokio::test(start_paused = true)]
    async fn test_faulty_unit_fails_after_delay() {
        let bus = Bus::new(16);
        let unit = FaultyUnit::new("faulty", Duration::from_secs(2), "rejected");
        let res = unit.run(ctx(&bus, CancellationToken::new())).await;
        assert_eq!(res, Err(TaskError::invalid_input("rejected")));
    }

    #[tokio::test(start_paused = true)]
    async fn test_fallback_substitutes_on_failure() {
        let bus = Bus::new(16);
        let inner: WorkRef<i64> =
            Arc::new(FaultyUnit::new("faulty", Duration::from_secs(2), "rejected"));
        let unit = Fallback::new(inner, 0);
        assert_eq!(unit.run(ctx(&bus, CancellationToken::new())).await, Ok(0));
    }
}
