//! Runtime events: types and broadcast bus.
//!
//! This module groups the event **data model** and the **bus** used to
//! publish/subscribe to lifecycle events emitted by launches, scopes, work
//! units and the scenario runner.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] — event classification and payload metadata
//! - [`Bus`] — thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: the launch layer (lifecycle events), `Scope` (fan-out
//!   cancellation), the work units (`Tic`, fallback substitution), and
//!   `ScenarioRunner` (caller-side catches, runaway detection).
//! - **Consumers**: the runner's subscriber listener (fans out to the
//!   [`SubscriberSet`](crate::SubscriberSet)) and any direct
//!   [`Bus::subscribe`] receiver — tests assert against the sequenced stream.

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
