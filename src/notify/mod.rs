//! Push notification provider seam.
//!
//! The dispatcher hands a deduplicated token batch to a [`PushProvider`];
//! the provider reports per-token outcomes so one bad token never poisons
//! the rest of the batch.

pub mod fcm;

use std::collections::HashMap;

use futures::future::BoxFuture;
use thiserror::Error;
use tracing::warn;

/// Errors raised while talking to a push provider. Never escalated past the
/// dispatcher; the triggering state transition already succeeded.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// Credentials file missing or malformed.
    #[error("push credentials error: {0}")]
    Credentials(String),
    /// The HTTP request never completed.
    #[error("push request error: {0}")]
    Request(String),
}

/// Outcome of one multicast batch, per the provider's own accounting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MulticastSummary {
    /// Number of tokens the provider accepted.
    pub success_count: usize,
    /// Number of tokens the provider rejected.
    pub failure_count: usize,
    /// The rejected tokens, in batch order.
    pub failed_tokens: Vec<String>,
}

impl MulticastSummary {
    /// Summary for a batch that had nothing to send.
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Capability interface over a push-notification provider.
pub trait PushProvider: Send + Sync {
    /// Deliver the same notification to every token in `tokens`, recording
    /// per-token outcomes. A rejected token must not abort the batch.
    fn send_multicast(
        &self,
        tokens: Vec<String>,
        title: String,
        body: String,
        data: HashMap<String, String>,
    ) -> BoxFuture<'static, Result<MulticastSummary, NotifyError>>;
}

/// Provider installed when no push credentials are configured. Reports every
/// batch as skipped instead of failing the dispatcher.
pub struct DisabledPushProvider;

impl PushProvider for DisabledPushProvider {
    fn send_multicast(
        &self,
        tokens: Vec<String>,
        _title: String,
        _body: String,
        _data: HashMap<String, String>,
    ) -> BoxFuture<'static, Result<MulticastSummary, NotifyError>> {
        Box::pin(async move {
            warn!(
                targets = tokens.len(),
                "push notifications disabled; batch skipped"
            );
            Ok(MulticastSummary::empty())
        })
    }
}
