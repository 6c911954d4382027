use tracing::warn;

use crate::{dto::health::HealthResponse, state::SharedState};

/// Respond with the current health status, logging connectivity issues with
/// the record store and the live transport.
pub async fn health_status(state: &SharedState) -> HealthResponse {
    match state.require_match_store().await {
        Ok(store) => {
            if let Err(err) = store.health_check().await {
                warn!(error = %err, "record store health check failed");
            }
        }
        Err(_) => warn!("record store unavailable (degraded mode)"),
    }

    if state.transport().await.is_none() {
        warn!("live transport not installed; events are dropped");
    }

    if state.is_degraded().await {
        HealthResponse::degraded()
    } else {
        HealthResponse::ok()
    }
}
