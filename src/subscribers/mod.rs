//! Event subscribers.
//!
//! This module provides the [`Subscribe`] trait and built-in implementations
//! for handling lifecycle events broadcast through the
//! [`Bus`](crate::events::Bus).
//!
//! ## Architecture
//! ```text
//! launch layer / scopes / units ── publish(Event) ──► Bus
//!                                                      │
//!                                                 subscribe()
//!                                                      │
//!                                                      ▼
//!                                         runner listener ──► SubscriberSet
//!                                                      │            │
//!                                                      │      ┌─────┴─────┐
//!                                                      │      ▼           ▼
//!                                                      │  AliveTracker  LogWriter / custom
//!                                                      ▼
//!                                         direct receivers (tests)
//! ```
//!
//! Delivery through the set is sequential and in publish order, which keeps
//! assertions against the stream deterministic.

mod alive;
#[cfg(feature = "logging")]
mod log;
mod set;
mod subscribe;

pub use alive::AliveTracker;
#[cfg(feature = "logging")]
pub use log::LogWriter;
pub use set::SubscriberSet;
pub use subscribe::Subscribe;
