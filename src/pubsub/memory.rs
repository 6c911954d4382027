use std::sync::atomic::{AtomicBool, Ordering};

use futures::future::BoxFuture;
use tokio::sync::broadcast;

use crate::pubsub::{DeliveryLevel, PubSubTransport, TransportError};

/// One published message as seen by in-process subscribers.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Topic the message was published on.
    pub topic: String,
    /// Serialized envelope bytes.
    pub payload: Vec<u8>,
}

/// In-process broadcast transport.
///
/// Fans every published frame out to all current subscribers over one Tokio
/// broadcast channel, which preserves publish order per topic. Backs the SSE
/// bridge and the service tests; a broker-backed transport slots in behind
/// the same trait.
pub struct BroadcastTransport {
    sender: broadcast::Sender<Frame>,
    closed: AtomicBool,
}

impl BroadcastTransport {
    /// Create a transport whose channel buffers up to `capacity` frames per
    /// lagging subscriber.
    pub fn new(capacity: usize) -> Self {
        let (sender, _receiver) = broadcast::channel(capacity);
        Self {
            sender,
            closed: AtomicBool::new(false),
        }
    }

    /// Register a subscriber receiving every frame published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Frame> {
        self.sender.subscribe()
    }
}

impl PubSubTransport for BroadcastTransport {
    fn publish(
        &self,
        topic: String,
        payload: Vec<u8>,
        _level: DeliveryLevel,
    ) -> BoxFuture<'static, Result<(), TransportError>> {
        if self.closed.load(Ordering::Acquire) {
            return Box::pin(async { Err(TransportError::Disconnected) });
        }

        // A send error only means nobody is subscribed right now; the
        // publish itself still succeeded.
        let _ = self.sender.send(Frame { topic, payload });
        Box::pin(async { Ok(()) })
    }

    fn close(&self) -> BoxFuture<'static, ()> {
        self.closed.store(true, Ordering::Release);
        Box::pin(async {})
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_receive_frames_in_publish_order() {
        let transport = BroadcastTransport::new(8);
        let mut receiver = transport.subscribe();

        for index in 0..3u8 {
            transport
                .publish("match/42/updates".into(), vec![index], DeliveryLevel::ExactlyOnce)
                .await
                .unwrap();
        }

        for index in 0..3u8 {
            let frame = receiver.recv().await.unwrap();
            assert_eq!(frame.topic, "match/42/updates");
            assert_eq!(frame.payload, vec![index]);
        }
    }

    #[tokio::test]
    async fn publish_without_subscribers_is_not_an_error() {
        let transport = BroadcastTransport::new(8);
        transport
            .publish("matches/brasilia".into(), b"{}".to_vec(), DeliveryLevel::AtLeastOnce)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn closed_transport_rejects_publishes() {
        let transport = BroadcastTransport::new(8);
        transport.close().await;
        let err = transport
            .publish("matches/brasilia".into(), vec![], DeliveryLevel::AtMostOnce)
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::Disconnected));
    }
}
