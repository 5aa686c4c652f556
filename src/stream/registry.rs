//! Session registry for push-mode subscribers.
//!
//! Tracks the open output channels the broadcast timer fans out to.
//! Insertion and removal are the only mutations; a subscriber lives from
//! registration until its transport reports closure.

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{info, warn};

use crate::types::StreamEvent;

/// Bounded per-subscriber channel. There is no backpressure handling: a
/// full channel drops the event, a closed one removes the subscriber.
const SUBSCRIBER_CHANNEL_CAPACITY: usize = 32;

/// One registered push subscriber.
#[derive(Debug)]
struct Subscriber {
    id: u64,
    tx: mpsc::Sender<StreamEvent>,
}

/// Owns the collection of active push subscribers.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    next_id: u64,
    subscribers: Vec<Subscriber>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new subscriber and hand back its id, a sender clone for
    /// closure watching, and the receiving half for the transport.
    pub fn register(&mut self) -> (u64, mpsc::Sender<StreamEvent>, mpsc::Receiver<StreamEvent>) {
        let (tx, rx) = mpsc::channel(SUBSCRIBER_CHANNEL_CAPACITY);
        self.next_id += 1;
        let id = self.next_id;
        self.subscribers.push(Subscriber { id, tx: tx.clone() });
        (id, tx, rx)
    }

    /// Remove a subscriber by id. Returns whether it was still registered.
    pub fn remove(&mut self, id: u64) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|sub| sub.id != id);
        self.subscribers.len() != before
    }

    pub fn count(&self) -> usize {
        self.subscribers.len()
    }

    /// Best-effort fan-out of one event to every subscriber.
    ///
    /// A failed send never aborts the broadcast: full channels drop the
    /// event with a log line, closed transports are reaped on the spot.
    pub fn broadcast(&mut self, event: &StreamEvent) {
        self.subscribers.retain(|sub| match sub.tx.try_send(event.clone()) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                warn!(subscriber = sub.id, "Subscriber channel full, dropping event");
                true
            }
            Err(TrySendError::Closed(_)) => {
                info!(subscriber = sub.id, "Subscriber transport closed, removing");
                false
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stopped() -> StreamEvent {
        StreamEvent::Stopped {
            message: "Simulation stopped".to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_assigns_monotonic_ids() {
        let mut registry = SessionRegistry::new();
        let (a, _tx_a, _rx_a) = registry.register();
        let (b, _tx_b, _rx_b) = registry.register();
        assert!(b > a);
        assert_eq!(registry.count(), 2);
    }

    #[tokio::test]
    async fn test_broadcast_reaches_all_subscribers() {
        let mut registry = SessionRegistry::new();
        let (_a, _tx_a, mut rx_a) = registry.register();
        let (_b, _tx_b, mut rx_b) = registry.register();

        registry.broadcast(&stopped());

        assert!(matches!(rx_a.try_recv(), Ok(StreamEvent::Stopped { .. })));
        assert!(matches!(rx_b.try_recv(), Ok(StreamEvent::Stopped { .. })));
    }

    #[tokio::test]
    async fn test_closed_subscriber_is_reaped_without_aborting_broadcast() {
        let mut registry = SessionRegistry::new();
        let (_dead, _tx_dead, rx_dead) = registry.register();
        let (_live, _tx_live, mut rx_live) = registry.register();
        drop(rx_dead);

        registry.broadcast(&stopped());

        assert_eq!(registry.count(), 1);
        assert!(rx_live.try_recv().is_ok());
    }

    #[tokio::test]
    async fn test_remove_is_idempotent() {
        let mut registry = SessionRegistry::new();
        let (id, _tx, _rx) = registry.register();
        assert!(registry.remove(id));
        assert!(!registry.remove(id));
        assert_eq!(registry.count(), 0);
    }

    #[tokio::test]
    async fn test_full_channel_drops_event_but_keeps_subscriber() {
        let mut registry = SessionRegistry::new();
        let (_id, _tx, mut rx) = registry.register();

        for _ in 0..SUBSCRIBER_CHANNEL_CAPACITY + 5 {
            registry.broadcast(&stopped());
        }
        assert_eq!(registry.count(), 1);

        // Drain: exactly capacity events made it through.
        let mut received = 0;
        while rx.try_recv().is_ok() {
            received += 1;
        }
        assert_eq!(received, SUBSCRIBER_CHANNEL_CAPACITY);
    }
}
