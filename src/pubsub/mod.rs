//! Live pub/sub transport seam.
//!
//! The lifecycle services publish ordered event envelopes onto topics; what
//! carries them to subscribers is swappable behind [`PubSubTransport`]. The
//! transport is an explicitly owned, injectable instance with an
//! open-on-construction / [`close`](PubSubTransport::close) lifecycle, held
//! in an [`AppState`](crate::state::AppState) slot rather than read from
//! process-wide globals.

pub mod memory;

use futures::future::BoxFuture;
use thiserror::Error;

/// Delivery guarantee requested for one published message.
///
/// Mirrors the quality-of-service ladder of MQTT-style brokers. In-process
/// transports deliver synchronously and may ignore the level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryLevel {
    /// Fire and forget.
    AtMostOnce,
    /// Broker acknowledges receipt; duplicates possible.
    AtLeastOnce,
    /// Broker deduplicates; highest cost, used for low-frequency
    /// high-value messages.
    ExactlyOnce,
}

/// Error raised by a transport. Always non-fatal to the operation that
/// triggered the publish; callers log and carry on.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The transport connection is closed or was never established.
    #[error("transport disconnected")]
    Disconnected,
    /// The message was rejected on its way out.
    #[error("publish to `{topic}` failed: {message}")]
    Publish {
        /// Topic the message was addressed to.
        topic: String,
        /// Backend-specific failure description.
        message: String,
    },
}

/// Capability interface over a topic-based publish transport.
///
/// Contract for implementations: `publish` returns promptly (internal
/// queueing, bounded connection timeouts) and preserves per-topic ordering
/// for messages published by one process. It must never block a state
/// transition on broker availability; broker-backed implementations bound
/// their connection attempts and surface outages as
/// [`TransportError::Disconnected`] rather than waiting.
pub trait PubSubTransport: Send + Sync {
    /// Publish an opaque payload onto `topic` at the requested delivery
    /// level.
    fn publish(
        &self,
        topic: String,
        payload: Vec<u8>,
        level: DeliveryLevel,
    ) -> BoxFuture<'static, Result<(), TransportError>>;

    /// Tear the transport down; subsequent publishes fail with
    /// [`TransportError::Disconnected`].
    fn close(&self) -> BoxFuture<'static, ()>;
}
