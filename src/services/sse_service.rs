//! Bridge from the in-process live transport to SSE responses.
//!
//! Browser clients that cannot speak to the broker directly subscribe here
//! and observe the exact envelopes, in the exact per-topic order, that the
//! publisher emitted.

use std::{convert::Infallible, time::Duration};

use axum::response::sse::{Event, KeepAlive, Sse};
use futures::Stream;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::info;

use crate::{pubsub::memory::BroadcastTransport, state::SharedState};

/// Selects which published frames a stream forwards.
#[derive(Clone, Debug)]
pub enum TopicFilter {
    /// Forward frames published on exactly this topic.
    Exact(String),
    /// Forward frames whose topic starts with this prefix (used for the two
    /// per-match feeds).
    Prefix(String),
}

impl TopicFilter {
    fn accepts(&self, topic: &str) -> bool {
        match self {
            TopicFilter::Exact(wanted) => topic == wanted,
            TopicFilter::Prefix(prefix) => topic.starts_with(prefix.as_str()),
        }
    }
}

/// Subscribe to the in-process hub and forward matching frames as SSE
/// events until the client disconnects.
pub fn stream_topic(
    state: &SharedState,
    filter: TopicFilter,
) -> Sse<impl Stream<Item = Result<Event, Infallible>> + use<>> {
    let hub: std::sync::Arc<BroadcastTransport> = state.hub();
    let mut receiver = hub.subscribe();

    // small bounded channel between forwarder and response
    let (tx, rx) = mpsc::channel::<Result<Event, Infallible>>(8);

    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = tx.closed() => break,
                recv_result = receiver.recv() => {
                    match recv_result {
                        Ok(frame) => {
                            if !filter.accepts(&frame.topic) {
                                continue;
                            }

                            let data = String::from_utf8_lossy(&frame.payload).into_owned();
                            if tx.send(Ok(Event::default().data(data))).await.is_err() {
                                break;
                            }
                        }
                        Err(RecvError::Closed) => break,
                        Err(RecvError::Lagged(_)) => {
                            // Skip lagged frames but keep the stream alive.
                            continue;
                        }
                    }
                }
            }
        }

        info!(?filter, "live SSE stream disconnected");
    });

    let stream = ReceiverStream::new(rx);
    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_filter_matches_only_its_topic() {
        let filter = TopicFilter::Exact("matches/brasilia".into());
        assert!(filter.accepts("matches/brasilia"));
        assert!(!filter.accepts("matches/brasilia-norte"));
        assert!(!filter.accepts("matches/goiania"));
    }

    #[test]
    fn prefix_filter_spans_both_match_feeds() {
        let filter = TopicFilter::Prefix("match/42/".into());
        assert!(filter.accepts("match/42/updates"));
        assert!(filter.accepts("match/42/live_updates"));
        assert!(!filter.accepts("match/421/updates"));
    }
}
