//! Fan-out set for subscribers.
//!
//! [`SubscriberSet`] delivers each event to every subscriber sequentially,
//! in registration order. One listener task (owned by the runner) drains the
//! bus and calls [`SubscriberSet::emit`]; subscribers therefore observe the
//! same globally sequenced stream that direct bus receivers do.

use std::sync::Arc;

use crate::events::Event;
use crate::subscribers::subscribe::Subscribe;

/// Ordered collection of subscribers sharing one event stream.
pub struct SubscriberSet {
    subs: Vec<Arc<dyn Subscribe>>,
}

impl SubscriberSet {
    /// Creates a set from the given subscribers (registration order is
    /// delivery order).
    pub fn new(subs: Vec<Arc<dyn Subscribe>>) -> Self {
        Self { subs }
    }

    /// Number of registered subscribers.
    pub fn len(&self) -> usize {
        self.subs.len()
    }

    /// True when no subscriber is registered.
    pub fn is_empty(&self) -> bool {
        self.subs.is_empty()
    }

    /// Delivers one event to every subscriber, awaiting each in turn.
    pub async fn emit(&self, event: &Event) {
        for sub in &self.subs {
            sub.on_event(event).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counter(AtomicUsize);

    #[async_trait]
    impl Subscribe for Counter {
        async fn on_event(&self, _event: &Event) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn test_emit_reaches_every_subscriber() {
        let a = Arc::new(Counter(AtomicUsize::new(0)));
        let b = Arc::new(Counter(AtomicUsize::new(0)));
        let set = SubscriberSet::new(vec![a.clone(), b.clone()]);
        set.emit(&Event::new(EventKind::Tic)).await;
        set.emit(&Event::new(EventKind::Tic)).await;
        assert_eq!(a.0.load(Ordering::SeqCst), 2);
        assert_eq!(b.0.load(Ordering::SeqCst), 2);
    }
}
