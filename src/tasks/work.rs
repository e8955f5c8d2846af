//! Work abstraction: an async, cancellable unit producing a value.
//!
//! A `Work` has a stable [`name`](Work::name) and an async
//! [`run`](Work::run) method that receives a [`TaskContext`]. Implementors
//! should suspend only through the context's primitives so that cancellation
//! can take effect; see the context docs for the list of suspension points.
//!
//! # Example
//! ```
//! use async_trait::async_trait;
//! use scopevisor::{TaskContext, TaskError, Work};
//!
//! struct Answer;
//!
//! #[async_trait]
//! impl Work for Answer {
//!     type Output = i64;
//!
//!     fn name(&self) -> &str { "answer" }
//!
//!     async fn run(&self, ctx: TaskContext) -> Result<i64, TaskError> {
//!         ctx.checkpoint()?;
//!         Ok(42)
//!     }
//! }
//! ```

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::TaskError;
use crate::tasks::context::TaskContext;

/// Asynchronous, cancellable unit of work producing a value.
#[async_trait]
pub trait Work: Send + Sync + 'static {
    /// Value produced on success.
    type Output: Send + 'static;

    /// Returns a stable, human-readable task name.
    fn name(&self) -> &str;

    /// Executes the work until completion, failure, or cancellation.
    ///
    /// Returning `Err(TaskError::Cancelled)` transitions the task to
    /// `Cancelled`; any other error transitions it to `Failed`.
    async fn run(&self, ctx: TaskContext) -> Result<Self::Output, TaskError>;
}

/// Shared reference to a work unit.
pub type WorkRef<T> = Arc<dyn Work<Output = T>>;
