use axum::Router;

use crate::state::SharedState;

/// Swagger UI and OpenAPI document.
pub mod docs;
/// Field management routes.
pub mod fields;
/// Health check route.
pub mod health;
/// Match lifecycle routes.
pub mod matches;
/// Live SSE stream routes.
pub mod sse;
/// Region subscription routes.
pub mod subscriptions;
/// User management routes.
pub mod users;

/// Compose all route trees, wiring in shared state and documentation routes.
pub fn router(state: SharedState) -> Router<()> {
    let api_router = health::router()
        .merge(users::router())
        .merge(fields::router())
        .merge(matches::router())
        .merge(subscriptions::router())
        .merge(sse::router());

    let docs_router = docs::router(state.clone());

    api_router.merge(docs_router).with_state(state)
}
