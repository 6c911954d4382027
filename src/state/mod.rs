pub mod lifecycle;

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, RwLock, watch};
use uuid::Uuid;

use crate::{
    dao::match_store::MatchStore,
    error::ServiceError,
    pubsub::{PubSubTransport, memory::BroadcastTransport},
    services::push_service::PushDispatcher,
};

/// Cheaply clonable handle to the shared application state.
pub type SharedState = Arc<AppState>;

/// Central application state: the record-store and transport slots, the
/// in-process live hub, the push dispatcher handle, and the per-match join
/// gates.
pub struct AppState {
    match_store: RwLock<Option<Arc<dyn MatchStore>>>,
    transport: RwLock<Option<Arc<dyn PubSubTransport>>>,
    hub: Arc<BroadcastTransport>,
    dispatcher: PushDispatcher,
    degraded: watch::Sender<bool>,
    join_gates: DashMap<Uuid, Arc<Mutex<()>>>,
}

impl AppState {
    /// Construct the shared state wrapped in an [`Arc`].
    ///
    /// The application starts in degraded mode until a record store is
    /// installed. `hub_capacity` sizes the in-process live event channel.
    pub fn new(dispatcher: PushDispatcher, hub_capacity: usize) -> SharedState {
        let (degraded_tx, _rx) = watch::channel(true);
        Arc::new(Self {
            match_store: RwLock::new(None),
            transport: RwLock::new(None),
            hub: Arc::new(BroadcastTransport::new(hub_capacity)),
            dispatcher,
            degraded: degraded_tx,
            join_gates: DashMap::new(),
        })
    }

    /// Handle to the current record store, if one is installed.
    pub async fn match_store(&self) -> Option<Arc<dyn MatchStore>> {
        let guard = self.match_store.read().await;
        guard.as_ref().cloned()
    }

    /// Record store or [`ServiceError::Degraded`] when none is installed.
    pub async fn require_match_store(&self) -> Result<Arc<dyn MatchStore>, ServiceError> {
        self.match_store().await.ok_or(ServiceError::Degraded)
    }

    /// Install a record store implementation and leave degraded mode.
    pub async fn install_match_store(&self, store: Arc<dyn MatchStore>) {
        {
            let mut guard = self.match_store.write().await;
            *guard = Some(store);
        }
        self.update_degraded(false).await;
    }

    /// Remove the current record store and enter degraded mode.
    pub async fn clear_match_store(&self) {
        {
            let mut guard = self.match_store.write().await;
            guard.take();
        }
        self.update_degraded(true).await;
    }

    /// Whether the backend currently runs without a record store.
    pub async fn is_degraded(&self) -> bool {
        let guard = self.match_store.read().await;
        guard.is_none()
    }

    /// Subscribe to degraded mode changes.
    pub fn degraded_watcher(&self) -> watch::Receiver<bool> {
        self.degraded.subscribe()
    }

    /// Live pub/sub transport, if one is installed. Publishing degrades to a
    /// logged no-op while the slot is empty.
    pub async fn transport(&self) -> Option<Arc<dyn PubSubTransport>> {
        let guard = self.transport.read().await;
        guard.as_ref().cloned()
    }

    /// Install a pub/sub transport instance.
    pub async fn install_transport(&self, transport: Arc<dyn PubSubTransport>) {
        let mut guard = self.transport.write().await;
        *guard = Some(transport);
    }

    /// In-process broadcast hub backing the SSE bridge. Installed as the
    /// default transport by the binary.
    pub fn hub(&self) -> Arc<BroadcastTransport> {
        self.hub.clone()
    }

    /// Handle used to enqueue push dispatch work.
    pub fn push_dispatcher(&self) -> &PushDispatcher {
        &self.dispatcher
    }

    /// Serialization point for roster mutations of one match. Joins acquire
    /// this gate so the capacity check and the insert act as one atomic unit
    /// per match identity.
    pub fn join_gate(&self, match_id: Uuid) -> Arc<Mutex<()>> {
        self.join_gates
            .entry(match_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .value()
            .clone()
    }

    async fn update_degraded(&self, value: bool) {
        self.degraded.send_if_modified(|current| {
            let changed = *current != value;
            *current = value;
            changed
        });
    }
}
