//! Time source used by simulated work units.
//!
//! [`Clock`] abstracts the delay primitive so that work units never call
//! `tokio::time::sleep` directly. The cancellable variant of the wait lives
//! in [`TaskContext::sleep`](crate::TaskContext::sleep), which races the
//! clock against the task's cancellation token.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

/// Source of delays for simulated work.
///
/// Implementations must be cheap to share (`Arc<dyn Clock>`) and must
/// suspend cooperatively so a pending wait can be abandoned mid-flight.
#[async_trait]
pub trait Clock: Send + Sync + 'static {
    /// Suspends the caller for `dur`.
    async fn sleep(&self, dur: Duration);
}

/// Shared reference to a clock.
pub type ClockRef = Arc<dyn Clock>;

/// Default clock backed by the tokio timer wheel.
///
/// Under `tokio::time::pause` (test-util), waits on this clock advance on
/// virtual time, which is how the multi-second simulated delays stay fast in
/// tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioClock;

#[async_trait]
impl Clock for TokioClock {
    async fn sleep(&self, dur: Duration) {
        tokio::time::sleep(dur).await;
    }
}
