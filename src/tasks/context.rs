//! Per-task context: the capabilities handed to every unit of work.
//!
//! [`TaskContext`] bundles the task's name, its cancellation token, the
//! shared [`Clock`](crate::Clock) and the event [`Bus`]. It is created by
//! the launch layer and passed to [`Work::run`](crate::Work::run) — there is
//! no ambient global state.
//!
//! ## Suspension points
//! Cancellation is cooperative and takes effect only where the task
//! voluntarily suspends or polls:
//! - [`TaskContext::sleep`] — the simulated-delay primitive; aborts early
//!   with [`TaskError::Cancelled`] when the token fires mid-wait;
//! - [`TaskContext::checkpoint`] — an explicit poll, used at the entry and
//!   exit of a dispatch redirection.
//!
//! A loop that calls neither is not preemptible; that property is load-
//! bearing for the runaway scenario and must not be "fixed" here.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::clock::ClockRef;
use crate::error::TaskError;
use crate::events::Bus;

/// Context object passed to every launch call.
///
/// Cheap to clone; all fields are shared handles.
#[derive(Clone)]
pub struct TaskContext {
    name: Arc<str>,
    token: CancellationToken,
    clock: ClockRef,
    bus: Bus,
}

impl TaskContext {
    pub(crate) fn new(name: Arc<str>, token: CancellationToken, clock: ClockRef, bus: Bus) -> Self {
        Self {
            name,
            token,
            clock,
            bus,
        }
    }

    /// Name of the task this context belongs to.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The event bus, for work units that publish their own events.
    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    /// True once the shared cancellation signal has fired.
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Explicit cancellation poll.
    ///
    /// Returns `Err(TaskError::Cancelled)` once the signal has fired. This
    /// is a suspension point in the cooperative model even though it does
    /// not await.
    pub fn checkpoint(&self) -> Result<(), TaskError> {
        if self.token.is_cancelled() {
            Err(TaskError::Cancelled)
        } else {
            Ok(())
        }
    }

    /// Cancellable simulated delay — the primary suspension point.
    ///
    /// Completes with `Ok(())` after `dur`, or aborts early with
    /// `Err(TaskError::Cancelled)` when the cancellation signal fires
    /// mid-wait. The work function may catch that error and substitute a
    /// fallback value; by default it propagates and the task transitions to
    /// `Cancelled`.
    pub async fn sleep(&self, dur: Duration) -> Result<(), TaskError> {
        tokio::select! {
            _ = self.token.cancelled() => Err(TaskError::Cancelled),
            _ = self.clock.sleep(dur) => Ok(()),
        }
    }

    pub(crate) fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub(crate) fn clock(&self) -> &ClockRef {
        &self.clock
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::TokioClock;

    fn ctx(token: CancellationToken) -> TaskContext {
        TaskContext::new(
            Arc::from("test"),
            token,
            Arc::new(TokioClock),
            Bus::new(8),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_sleep_completes_when_not_cancelled() {
        let c = ctx(CancellationToken::new());
        assert_eq!(c.sleep(Duration::from_secs(5)).await, Ok(()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_sleep_aborts_on_cancellation() {
        let token = CancellationToken::new();
        let c = ctx(token.clone());
        let waiter = tokio::spawn(async move { c.sleep(Duration::from_secs(60)).await });
        tokio::time::sleep(Duration::from_millis(10)).await;
        token.cancel();
        let res = waiter.await.expect("join");
        assert_eq!(res, Err(TaskError::Cancelled));
    }

    #[tokio::test]
    async fn test_checkpoint_reflects_token() {
        let token = CancellationToken::new();
        let c = ctx(token.clone());
        assert!(c.checkpoint().is_ok());
        token.cancel();
        assert_eq!(c.checkpoint(), Err(TaskError::Cancelled));
        assert!(c.is_cancelled());
    }
}
