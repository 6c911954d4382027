//! Push notification dispatch.
//!
//! State transitions never send pushes inline: they submit a [`PushJob`]
//! onto a bounded queue and return. A worker task spawned at startup drains
//! the queue, resolves recipients to device tokens, deduplicates them and
//! hands the batch to the configured [`PushProvider`]. Per-token failures
//! are summarized and logged; nothing here ever fails the transition that
//! queued the job.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    notify::{MulticastSummary, PushProvider},
    state::SharedState,
};

/// One unit of push work: a recipient set plus the notification content.
#[derive(Debug)]
pub struct PushJob {
    /// Users to notify; resolved to device tokens at dispatch time.
    pub recipients: Vec<Uuid>,
    /// User excluded from token resolution (typically the actor).
    pub exclude: Option<Uuid>,
    /// Notification title.
    pub title: String,
    /// Notification body.
    pub body: String,
    /// Application data payload; carries the identifiers clients deep-link
    /// on (`matchId` at minimum).
    pub data: HashMap<String, String>,
}

/// Sending half of the dispatch queue, held by [`AppState`](crate::state::AppState).
#[derive(Clone)]
pub struct PushDispatcher {
    tx: mpsc::Sender<PushJob>,
}

/// Receiving half of the dispatch queue, consumed by [`run_dispatcher`].
pub struct PushQueue {
    pub(crate) rx: mpsc::Receiver<PushJob>,
}

/// Create the bounded dispatch queue.
pub fn channel(capacity: usize) -> (PushDispatcher, PushQueue) {
    let (tx, rx) = mpsc::channel(capacity);
    (PushDispatcher { tx }, PushQueue { rx })
}

impl PushDispatcher {
    /// Enqueue a job without blocking. A full queue sheds the batch with a
    /// warning rather than back-pressuring the request path.
    pub fn submit(&self, job: PushJob) {
        match self.tx.try_send(job) {
            Ok(()) => {}
            Err(TrySendError::Full(job)) => {
                warn!(
                    recipients = job.recipients.len(),
                    title = %job.title,
                    "push queue full; batch dropped"
                );
            }
            Err(TrySendError::Closed(job)) => {
                warn!(
                    recipients = job.recipients.len(),
                    "push dispatcher stopped; batch dropped"
                );
            }
        }
    }
}

/// Drain the dispatch queue until every [`PushDispatcher`] handle is gone.
/// Spawned once at startup; outlives any individual request.
pub async fn run_dispatcher(
    state: SharedState,
    mut queue: PushQueue,
    provider: Arc<dyn PushProvider>,
) {
    while let Some(job) = queue.rx.recv().await {
        dispatch(&state, provider.as_ref(), job).await;
    }
    info!("push dispatcher stopped");
}

/// Resolve, deduplicate and deliver one job, returning the provider's
/// accounting. An empty target set is a normal outcome and never reaches the
/// provider.
pub async fn dispatch(
    state: &SharedState,
    provider: &dyn PushProvider,
    job: PushJob,
) -> MulticastSummary {
    let Some(store) = state.match_store().await else {
        warn!("record store unavailable; push batch dropped");
        return MulticastSummary::empty();
    };

    let tokens = match store.device_tokens_excluding(job.recipients, job.exclude).await {
        Ok(tokens) => tokens,
        Err(err) => {
            warn!(error = %err, "failed to resolve push targets");
            return MulticastSummary::empty();
        }
    };

    let targets = dedup_tokens(tokens);
    if targets.is_empty() {
        debug!("no push targets to notify");
        return MulticastSummary::empty();
    }

    let batch_size = targets.len();
    match provider
        .send_multicast(targets, job.title, job.body, job.data)
        .await
    {
        Ok(summary) => {
            info!(
                targets = batch_size,
                success = summary.success_count,
                failure = summary.failure_count,
                "push batch dispatched"
            );
            if summary.failure_count > 0 {
                warn!(failed = ?summary.failed_tokens, "some push targets failed");
            }
            summary
        }
        Err(err) => {
            warn!(error = %err, targets = batch_size, "push multicast failed");
            MulticastSummary::empty()
        }
    }
}

/// Drop duplicate tokens while preserving first-seen order, so a shared
/// device never receives the same notification twice.
fn dedup_tokens(tokens: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    tokens
        .into_iter()
        .filter(|token| seen.insert(token.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::time::SystemTime;

    use futures::future::BoxFuture;

    use super::*;
    use crate::dao::match_store::MatchStore;
    use crate::dao::match_store::memory::MemoryStore;
    use crate::dao::models::UserEntity;
    use crate::notify::NotifyError;
    use crate::state::{AppState, SharedState};

    /// Provider double that records each batch and rejects scripted tokens.
    struct ScriptedProvider {
        reject: Vec<String>,
        calls: Mutex<Vec<Vec<String>>>,
    }

    impl ScriptedProvider {
        fn new(reject: &[&str]) -> Self {
            Self {
                reject: reject.iter().map(|token| token.to_string()).collect(),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn batches(&self) -> Vec<Vec<String>> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl PushProvider for ScriptedProvider {
        fn send_multicast(
            &self,
            tokens: Vec<String>,
            _title: String,
            _body: String,
            _data: HashMap<String, String>,
        ) -> BoxFuture<'static, Result<MulticastSummary, NotifyError>> {
            self.calls.lock().unwrap().push(tokens.clone());
            let mut summary = MulticastSummary::empty();
            for token in tokens {
                if self.reject.contains(&token) {
                    summary.failure_count += 1;
                    summary.failed_tokens.push(token);
                } else {
                    summary.success_count += 1;
                }
            }
            Box::pin(async move { Ok(summary) })
        }
    }

    async fn state_with_users(users: &[(&str, Option<&str>)]) -> (SharedState, Vec<Uuid>) {
        let (dispatcher, _queue) = channel(8);
        let state = AppState::new(dispatcher, 8);
        let store = MemoryStore::new();
        let mut ids = Vec::new();
        for (name, token) in users {
            let id = Uuid::new_v4();
            store
                .insert_user(UserEntity {
                    id,
                    name: (*name).into(),
                    email: format!("{name}@example.com"),
                    phone: None,
                    device_token: token.map(Into::into),
                    created_at: SystemTime::now(),
                    updated_at: SystemTime::now(),
                })
                .await
                .unwrap();
            ids.push(id);
        }
        state.install_match_store(std::sync::Arc::new(store)).await;
        (state, ids)
    }

    fn job(recipients: Vec<Uuid>) -> PushJob {
        PushJob {
            recipients,
            exclude: None,
            title: "New match in your area!".into(),
            body: "Tap to view".into(),
            data: HashMap::from([("matchId".to_string(), "42".to_string())]),
        }
    }

    #[tokio::test]
    async fn empty_target_set_never_invokes_the_provider() {
        let (state, ids) = state_with_users(&[("ana", None), ("bruno", None)]).await;
        let provider = ScriptedProvider::new(&[]);

        let summary = dispatch(&state, &provider, job(ids)).await;

        assert_eq!(summary.success_count, 0);
        assert_eq!(summary.failure_count, 0);
        assert!(provider.batches().is_empty());
    }

    #[tokio::test]
    async fn partial_failure_is_summarized_per_token() {
        let (state, ids) = state_with_users(&[
            ("ana", Some("tok-a")),
            ("bruno", Some("tok-b")),
            ("carla", Some("tok-c")),
        ])
        .await;
        let provider = ScriptedProvider::new(&["tok-b"]);

        let summary = dispatch(&state, &provider, job(ids)).await;

        assert_eq!(summary.success_count, 2);
        assert_eq!(summary.failure_count, 1);
        assert_eq!(summary.failed_tokens, vec!["tok-b".to_string()]);
    }

    #[tokio::test]
    async fn shared_tokens_collapse_into_one_send() {
        let (state, ids) = state_with_users(&[
            ("ana", Some("family-tablet")),
            ("bruno", Some("family-tablet")),
            ("carla", Some("tok-c")),
        ])
        .await;
        let provider = ScriptedProvider::new(&[]);

        let summary = dispatch(&state, &provider, job(ids)).await;

        assert_eq!(summary.success_count, 2);
        let batches = provider.batches();
        assert_eq!(batches.len(), 1);
        assert_eq!(
            batches[0],
            vec!["family-tablet".to_string(), "tok-c".to_string()]
        );
    }

    #[tokio::test]
    async fn excluded_actor_is_never_targeted() {
        let (state, ids) = state_with_users(&[("ana", Some("tok-a")), ("bruno", Some("tok-b"))]).await;
        let provider = ScriptedProvider::new(&[]);

        let mut push = job(ids.clone());
        push.exclude = Some(ids[0]);
        let summary = dispatch(&state, &provider, push).await;

        assert_eq!(summary.success_count, 1);
        assert_eq!(provider.batches()[0], vec!["tok-b".to_string()]);
    }

    #[tokio::test]
    async fn full_queue_sheds_batches_without_blocking() {
        let (dispatcher, mut queue) = channel(1);

        dispatcher.submit(job(vec![Uuid::new_v4()]));
        // The queue holds one job; this one is shed with a warning.
        dispatcher.submit(job(vec![Uuid::new_v4()]));

        let first = queue.rx.try_recv();
        assert!(first.is_ok());
        assert!(queue.rx.try_recv().is_err());
    }
}
