//! Function-backed work (`WorkFn`).
//!
//! [`WorkFn`] wraps a closure `F: Fn(TaskContext) -> Fut`, producing a fresh
//! future per launch. No shared mutable state is required; if a closure
//! needs shared state, capture an explicit `Arc<...>`.
//!
//! ## Example
//! ```
//! use scopevisor::{TaskContext, TaskError, WorkFn, WorkRef};
//!
//! let w: WorkRef<i64> = WorkFn::arc("worker", |ctx: TaskContext| async move {
//!     ctx.checkpoint()?;
//!     Ok::<_, TaskError>(7)
//! });
//!
//! assert_eq!(w.name(), "worker");
//! ```

use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::TaskError;
use crate::tasks::context::TaskContext;
use crate::tasks::work::Work;

/// Function-backed work implementation.
///
/// Wraps a closure that *creates* a new future per launch.
#[derive(Debug)]
pub struct WorkFn<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F> WorkFn<F> {
    /// Creates a new function-backed work unit.
    ///
    /// Prefer [`WorkFn::arc`] when you immediately need a
    /// [`WorkRef`](crate::WorkRef).
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }

    /// Creates the work unit and returns it as a shared handle.
    pub fn arc(name: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

#[async_trait]
impl<F, Fut, T> Work for WorkFn<F>
where
    F: Fn(TaskContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, TaskError>> + Send + 'static,
    T: Send + 'static,
{
    type Output = T;

    fn name(&self) -> &str {
        &self.name
    }

    async fn run(&self, ctx: TaskContext) -> Result<T, TaskError> {
        (self.f)(ctx).await
    }
}
