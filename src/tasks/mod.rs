//! Task abstractions: work units, handles, and the launch layer.
//!
//! This module provides the core task-related types:
//! - [`TaskState`] — the `Pending → Running → terminal` state machine
//! - [`TaskContext`] — the context object handed to every unit of work
//! - [`Work`] — trait for implementing async cancellable work
//! - [`WorkFn`] — function-backed work implementation
//! - [`WorkRef`] — shared reference to a work unit (`Arc<dyn Work>`)
//! - [`TaskHandle`], [`ChildHandle`] — observation/consumption handles
//!
//! ## Lifecycle
//! ```text
//! spawn site                      spawned future
//! ──────────                      ──────────────
//! publish TaskLaunched            state: Pending → Running
//! return handle                   work.run(ctx).await
//!                                 publish exactly one terminal event
//!                                 state: Running → Completed|Failed|Cancelled
//! ```
//!
//! The terminal event is published *before* the state flips, so an observer
//! that sees a terminal state can already find the matching event on the bus.

mod context;
mod handle;
pub(crate) mod launch;
mod state;
mod work;
mod work_fn;

pub use context::TaskContext;
pub use handle::{ChildHandle, TaskHandle, TaskId};
pub use state::TaskState;
pub use work::{Work, WorkRef};
pub use work_fn::WorkFn;
