use serde::Serialize;
use utoipa::ToSchema;

/// Simple health response returned by the `/healthcheck` route.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Health status ("ok" or "degraded").
    pub status: String,
}

impl HealthResponse {
    /// Health response indicating the system is fully operational.
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }

    /// Health response indicating the system runs without its record store
    /// or live transport.
    pub fn degraded() -> Self {
        Self {
            status: "degraded".to_string(),
        }
    }
}
