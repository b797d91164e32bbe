//! The outbound seam: where relay events leave this component.
//!
//! The real transport (actor/RPC framing, request-response correlation)
//! lives elsewhere; it plugs in behind [`EventSink`]. [`BroadcastSink`] is
//! the provided implementation for in-process consumers: a non-blocking
//! tokio broadcast channel where slow receivers lag out rather than ever
//! blocking the relay's synchronous callbacks.

use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::broadcast;
use wsmon_core::events::RelayEvent;

/// Default broadcast channel capacity.
const DEFAULT_CAPACITY: usize = 1024;

/// Synchronous event emission. Infallible at this layer: delivery problems
/// are the transport's concern, never the relay's.
pub trait EventSink: Send + Sync {
    /// Emit one event. Must not block.
    fn emit(&self, event: RelayEvent);
}

/// Broadcast-based sink for in-process subscribers.
pub struct BroadcastSink {
    tx: broadcast::Sender<RelayEvent>,
    emit_count: AtomicU64,
}

impl BroadcastSink {
    /// Create a sink with the default channel capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create a sink with a custom channel capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self {
            tx,
            emit_count: AtomicU64::new(0),
        }
    }

    /// Subscribe to events emitted after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<RelayEvent> {
        self.tx.subscribe()
    }

    /// Number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Total number of events emitted.
    pub fn emit_count(&self) -> u64 {
        self.emit_count.load(Ordering::Relaxed)
    }
}

impl EventSink for BroadcastSink {
    fn emit(&self, event: RelayEvent) {
        let _ = self.emit_count.fetch_add(1, Ordering::Relaxed);
        // send only fails with zero subscribers; emitting into the void is
        // fine (the consumer detects absence, not errors).
        let _ = self.tx.send(event);
    }
}

impl Default for BroadcastSink {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wsmon_core::ids::ChannelId;

    fn opened(channel: &str) -> RelayEvent {
        RelayEvent::WebSocketOpened {
            channel_id: ChannelId::from(channel),
            effective_uri: "wss://example.com".into(),
            protocols: vec![],
            extensions: String::new(),
        }
    }

    #[test]
    fn emit_with_no_subscribers() {
        let sink = BroadcastSink::new();
        sink.emit(opened("c1"));
        assert_eq!(sink.emit_count(), 1);
        assert_eq!(sink.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn emit_and_receive() {
        let sink = BroadcastSink::new();
        let mut rx = sink.subscribe();

        sink.emit(opened("c1"));

        let received = rx.recv().await.unwrap();
        assert_eq!(received.event_type(), "serverWebSocketOpened");
        assert_eq!(received.channel_id(), Some(&ChannelId::from("c1")));
    }

    #[tokio::test]
    async fn multiple_subscribers_each_receive() {
        let sink = BroadcastSink::new();
        let mut rx1 = sink.subscribe();
        let mut rx2 = sink.subscribe();
        assert_eq!(sink.subscriber_count(), 2);

        sink.emit(opened("c1"));

        assert!(rx1.recv().await.is_ok());
        assert!(rx2.recv().await.is_ok());
    }

    #[tokio::test]
    async fn slow_receiver_lags_out() {
        let sink = BroadcastSink::with_capacity(2);
        let mut rx = sink.subscribe();

        sink.emit(opened("c1"));
        sink.emit(opened("c2"));
        sink.emit(opened("c3"));

        assert!(rx.recv().await.is_err());
    }

    #[test]
    fn subscriber_count_tracks_drops() {
        let sink = BroadcastSink::new();
        let rx1 = sink.subscribe();
        let rx2 = sink.subscribe();
        assert_eq!(sink.subscriber_count(), 2);
        drop(rx1);
        assert_eq!(sink.subscriber_count(), 1);
        drop(rx2);
        assert_eq!(sink.subscriber_count(), 0);
    }
}
