//! Failure-interception handlers.
//!
//! A [`Supervise`] implementation attached to a scope (or to one launch)
//! receives every uncaught child failure in its coverage instead of letting
//! the failure cancel siblings or propagate to the scope's caller.
//!
//! ## Contract
//! - The handler **observes** the failure exactly once; the launch layer is
//!   the single delivery site.
//! - The handler never resumes or retries the failed task — after delivery
//!   the task is terminally `Failed`, it just no longer propagates.
//!
//! ## Example
//! ```
//! use async_trait::async_trait;
//! use scopevisor::{Supervise, TaskError};
//!
//! struct Shrug;
//!
//! #[async_trait]
//! impl Supervise for Shrug {
//!     async fn on_failure(&self, task: &str, error: &TaskError) {
//!         eprintln!("{task} failed: {error}");
//!     }
//! }
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::TaskError;

/// Contract for failure handlers.
///
/// Called from the failing task's own execution path; implementations should
/// avoid blocking the runtime.
#[async_trait]
pub trait Supervise: Send + Sync + 'static {
    /// Observes a single intercepted failure.
    async fn on_failure(&self, task: &str, error: &TaskError);

    /// Human-readable name (for logs/metrics).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Shared reference to a failure handler.
pub type SupervisorRef = Arc<dyn Supervise>;

/// Recording supervisor: keeps every intercepted `(task, error)` pair.
///
/// Useful both as a reference implementation and for asserting the
/// exactly-once delivery guarantee.
#[derive(Default)]
pub struct FailureLog {
    seen: Mutex<Vec<(String, TaskError)>>,
}

impl FailureLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of failures delivered so far.
    pub async fn count(&self) -> usize {
        self.seen.lock().await.len()
    }

    /// Snapshot of the delivered failures, in delivery order.
    pub async fn entries(&self) -> Vec<(String, TaskError)> {
        self.seen.lock().await.clone()
    }
}

#[async_trait]
impl Supervise for FailureLog {
    async fn on_failure(&self, task: &str, error: &TaskError) {
        self.seen.lock().await.push((task.to_string(), error.clone()));
    }

    fn name(&self) -> &'static str {
        "failure_log"
    }
}
