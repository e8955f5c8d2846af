//! Event bus for broadcasting lifecycle events.
//!
//! [`Bus`] is a thin wrapper around [`tokio::sync::broadcast`] that provides
//! non-blocking publishing from multiple sources (launches, scopes, work
//! units, the runner).
//!
//! ## Rules
//! - **Non-blocking publish**: `publish()` never blocks or awaits.
//! - **Bounded capacity**: a single ring buffer stores recent events for all
//!   receivers; slow receivers observe `RecvError::Lagged(n)`.
//! - **No persistence**: events published while no receiver exists are
//!   dropped.

use tokio::sync::broadcast;

use super::event::Event;

/// Broadcast channel for lifecycle events.
///
/// Cheap to clone (internally holds an `Arc`-backed sender); every publisher
/// in the runtime carries its own `Bus` clone.
#[derive(Clone, Debug)]
pub struct Bus {
    tx: broadcast::Sender<Event>,
}

impl Bus {
    /// Creates a new bus with the given channel capacity (clamped to >= 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (tx, _rx) = broadcast::channel::<Event>(capacity);
        Self { tx }
    }

    /// Publishes an event to all active subscribers.
    ///
    /// If there are no receivers the event is dropped; publishing still
    /// returns immediately.
    pub fn publish(&self, ev: Event) {
        let _ = self.tx.send(ev);
    }

    /// Creates a new receiver that observes events published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;

    #[tokio::test]
    async fn test_publish_reaches_subscriber() {
        let bus = Bus::new(8);
        let mut rx = bus.subscribe();
        bus.publish(Event::new(EventKind::TaskLaunched).with_task("t"));
        let ev = rx.recv().await.expect("event");
        assert_eq!(ev.kind, EventKind::TaskLaunched);
        assert_eq!(ev.task.as_deref(), Some("t"));
    }

    #[tokio::test]
    async fn test_publish_without_receiver_is_dropped() {
        let bus = Bus::new(8);
        bus.publish(Event::new(EventKind::Tic));
        let mut rx = bus.subscribe();
        bus.publish(Event::new(EventKind::TaskFinished));
        let ev = rx.recv().await.expect("event");
        // The receiver only sees events published after it subscribed.
        assert_eq!(ev.kind, EventKind::TaskFinished);
    }
}
