//! Structured-concurrency scopes and failure supervision.
//!
//! A [`Scope`] owns an ordered set of child tasks and one shared
//! cancellation token. Its [`join_all`](Scope::join_all) implements the
//! fail-fast policy:
//!
//! ```text
//! launch children (launch order = aggregation order)
//!        │
//!        ▼
//! wait for the first terminal event among all children
//!        │
//!        ├─ Completed ──► keep the value, keep waiting
//!        ├─ Failed, supervised ──► handler notified, siblings unaffected
//!        ├─ Failed, unhandled ──► cancel the shared token, drain siblings
//!        │                        to terminal, return the first failure
//!        └─ Cancelled (external) ──► drain, return ScopeError::Cancelled
//! ```
//!
//! A [`Supervise`] handler can be attached scope-wide or to an individual
//! launch; covered failures are delivered to the handler instead of
//! triggering the fan-out.

mod scope;
mod supervisor;

pub use scope::{with_scope, Scope};
pub use supervisor::{FailureLog, Supervise, SupervisorRef};
