//! src/eventbus/mod.rs
//!
//! In-process event bus with guaranteed delivery to multiple subscribers via
//! bounded MPSC queues. The detection layer publishes fired channel events
//! here; the dispatch service consumes them.

use std::sync::Arc;
use tokio::sync::{Mutex, mpsc, watch};

use herald_common::models::event::ChannelEvent;

/// Each subscriber gets its own `mpsc::Sender<ChannelEvent>`.
///
/// - If a subscriber's buffer fills, `publish` awaits until there is space
///   (backpressure).
/// - If a subscriber has dropped its `Receiver`, sending to it fails and the
///   event is simply not delivered there.
#[derive(Clone)]
pub struct EventBus {
    subscribers: Arc<Mutex<Vec<mpsc::Sender<ChannelEvent>>>>,
    shutdown_tx: watch::Sender<bool>,
    pub shutdown_rx: watch::Receiver<bool>,
}

/// Default size for each subscriber's buffer.
const DEFAULT_BUFFER_SIZE: usize = 1000;

impl EventBus {
    pub fn new() -> Self {
        let (tx, rx) = watch::channel(false);
        Self {
            subscribers: Arc::new(Mutex::new(vec![])),
            shutdown_tx: tx,
            shutdown_rx: rx,
        }
    }

    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(true);
    }

    pub fn is_shutdown(&self) -> bool {
        *self.shutdown_rx.borrow()
    }

    /// Returns a receiver on which events will be delivered.
    pub async fn subscribe(&self, buffer_size: Option<usize>) -> mpsc::Receiver<ChannelEvent> {
        let size = buffer_size.unwrap_or(DEFAULT_BUFFER_SIZE);
        let (tx, rx) = mpsc::channel(size);
        let mut subs = self.subscribers.lock().await;
        subs.push(tx);
        rx
    }

    /// Publish an event to all subscribers.
    pub async fn publish(&self, event: ChannelEvent) {
        let senders = {
            let subs = self.subscribers.lock().await;
            subs.clone()
        };
        for s in senders {
            let _ = s.send(event.clone()).await;
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use herald_common::models::platform::{EventKind, Platform};
    use tokio::time::{Duration, sleep, timeout};

    fn live_event(url: &str) -> ChannelEvent {
        ChannelEvent::new(Platform::YouTube, EventKind::Live, "UC1", url)
    }

    #[tokio::test]
    async fn all_subscribers_receive_a_published_event() {
        let bus = EventBus::new();

        let mut rx1 = bus.subscribe(Some(5)).await;
        let mut rx2 = bus.subscribe(Some(5)).await;

        bus.publish(live_event("https://youtu.be/a")).await;

        let evt1 = rx1.recv().await.expect("rx1 should get event");
        let evt2 = rx2.recv().await.expect("rx2 should get event");
        assert_eq!(evt1.url, "https://youtu.be/a");
        assert_eq!(evt2.url, "https://youtu.be/a");
    }

    #[tokio::test]
    async fn publish_applies_backpressure_instead_of_dropping() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe(Some(1)).await;

        // Fill the single-slot queue.
        bus.publish(live_event("https://youtu.be/first")).await;

        // Reader drains both messages after a short delay.
        let handle = tokio::spawn(async move {
            sleep(Duration::from_millis(50)).await;
            let first = rx.recv().await.expect("expected first event");
            let second = rx.recv().await.expect("expected second event");
            (first, second)
        });

        // This publish must wait for the reader rather than drop the event.
        let second_publish = bus.publish(live_event("https://youtu.be/second"));
        let result = timeout(Duration::from_millis(500), second_publish).await;
        assert!(result.is_ok(), "publish should eventually unblock");

        let (evt1, evt2) = handle.await.unwrap();
        assert_eq!(evt1.url, "https://youtu.be/first");
        assert_eq!(evt2.url, "https://youtu.be/second");
    }

    #[tokio::test]
    async fn shutdown_flag_is_visible_to_all_clones() {
        let bus = EventBus::new();
        let clone = bus.clone();
        assert!(!clone.is_shutdown());
        bus.shutdown();
        assert!(clone.is_shutdown());
    }
}
