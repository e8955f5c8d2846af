//! # scopevisor
//!
//! **Scopevisor** is a structured-concurrency supervision library for Rust.
//!
//! It provides primitives to launch groups of concurrent child tasks under a
//! parent, propagate failures and cancellation between them according to
//! configurable supervision policies, and observe deterministic outcomes for
//! each policy. The crate is designed as a study harness for the classic
//! supervision patterns rather than as a general-purpose executor.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │   SlowUnit   │   │  FaultyUnit  │   │ RunawayUnit  │
//!     │  (work: A)   │   │  (work: B)   │   │ (no suspend) │
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            ▼                  ▼                  ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  ScenarioRunner (session orchestrator)                            │
//! │  - Bus (broadcast events, global seq)                             │
//! │  - SubscriberSet (fans out to user subscribers)                   │
//! │  - AliveTracker (tracks task liveness)                            │
//! │  - root CancellationToken (cancel_all boundary)                   │
//! └──────┬──────────────────────────┬─────────────────────────────────┘
//!        ▼                          ▼
//!  detached launches          Scope (fail-fast join)
//!  (independently rooted)     - children in launch order
//!  TaskHandle: join /         - shared child token
//!  wait_terminal              - optional Supervise handler
//!        │                          │
//!        ▼                          ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │                     Bus (broadcast channel)                       │
//! │  TaskLaunched │ TaskFinished │ TaskFailed │ TaskCancelled │ Tic   │
//! │  FailureSuppressed │ FailureCaught │ FallbackApplied │ ...        │
//! └───────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ### Supervision rules
//! ```text
//! detached launch ── failure ──► escapes asynchronously
//!                                 (caller's catch never fires)
//!
//! Scope::join_all ── failure ──► no handler:
//!                                   cancel shared token
//!                                   drain siblings to terminal
//!                                   return ScopeError::ChildFailed
//!                                handler attached (scope or launch):
//!                                   deliver to handler exactly once
//!                                   siblings run to completion
//!
//! cancellation ──► one-way, idempotent, top-down (child tokens);
//!                  observed only at suspension points — a loop that
//!                  never suspends is not preemptible, by contract
//! ```
//!
//! ## Features
//! | Area              | Description                                                   | Key types / traits                     |
//! |-------------------|---------------------------------------------------------------|----------------------------------------|
//! | **Tasks**         | Cancellable async work with a terminal state machine.         | [`Work`], [`WorkFn`], [`TaskHandle`]   |
//! | **Scopes**        | Fail-fast join-all with shared cancellation.                  | [`Scope`], [`with_scope`]              |
//! | **Supervision**   | Failure interception, scope-wide or per launch.               | [`Supervise`], [`FailureLog`]          |
//! | **Scenarios**     | The six canonical patterns with verifiable outcomes.          | [`ScenarioRunner`], [`ScenarioOutcome`]|
//! | **Events**        | Globally sequenced lifecycle stream.                          | [`Bus`], [`Event`], [`Subscribe`]      |
//! | **Errors**        | Typed task/scope errors with stable labels.                   | [`TaskError`], [`ScopeError`]          |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference only)_.
//!
//! ## Example
//! ```no_run
//! use scopevisor::{Config, Scenario, ScenarioOutcome, ScenarioRunner};
//!
//! #[tokio::main(flavor = "multi_thread")]
//! async fn main() {
//!     let runner = ScenarioRunner::new(Config::default(), Vec::new());
//!
//!     // Each sibling catches its own failure: the sum uses the fallback 0.
//!     let outcome = runner.run(Scenario::LocalFallback).await;
//!     assert_eq!(outcome, ScenarioOutcome::Sum(1));
//!
//!     // Teardown is advisory for tasks that never suspend.
//!     runner.cancel_all();
//! }
//! ```

mod clock;
mod config;
mod error;
mod events;
mod scenarios;
mod scope;
mod subscribers;
mod tasks;

// ---- Public re-exports ----

pub use clock::{Clock, ClockRef, TokioClock};
pub use config::Config;
pub use error::{ScopeError, TaskError};
pub use events::{Bus, Event, EventKind};
pub use scenarios::{
    CancelBehavior, CaughtBy, Fallback, FaultyUnit, Redirect, RunawayUnit, Scenario,
    ScenarioOutcome, ScenarioRunner, SlowUnit, UnknownScenario,
};
pub use scope::{with_scope, FailureLog, Scope, Supervise, SupervisorRef};
pub use subscribers::{AliveTracker, Subscribe, SubscriberSet};
pub use tasks::{ChildHandle, TaskContext, TaskHandle, TaskId, TaskState, Work, WorkFn, WorkRef};

// Optional: expose a simple built-in logger subscriber (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
