//! Core subscriber trait.
//!
//! `Subscribe` is the extension point for plugging custom event handlers —
//! logging, metrics, assertion recorders — into the runner's event pipeline.
//! This realizes the injected log-sink of the external contract: lifecycle
//! points arrive as [`EventKind`](crate::EventKind) values rather than bare
//! strings.

use async_trait::async_trait;

use crate::events::Event;

/// Contract for event subscribers.
///
/// Called from the runner's listener task in publish order. Implementations
/// should avoid blocking the async runtime.
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Handles a single event.
    async fn on_event(&self, event: &Event);

    /// Human-readable name (for logs/metrics).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
