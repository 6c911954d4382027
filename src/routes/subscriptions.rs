use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::post,
};
use axum_valid::Valid;

use crate::{
    dto::subscriptions::{RegionSubscriptionRequest, RegionSubscriptionResponse},
    error::AppError,
    services::region_service,
    state::SharedState,
};

/// Routes handling region notification subscriptions.
pub fn router() -> Router<SharedState> {
    Router::new().route(
        "/subscriptions/region",
        post(subscribe_region).delete(unsubscribe_region),
    )
}

/// Subscribe a user to new-match notifications for a city.
#[utoipa::path(
    post,
    path = "/subscriptions/region",
    tag = "subscriptions",
    request_body = RegionSubscriptionRequest,
    responses(
        (status = 201, description = "Subscription recorded", body = RegionSubscriptionResponse),
        (status = 404, description = "User not found")
    )
)]
pub async fn subscribe_region(
    State(state): State<SharedState>,
    Valid(Json(payload)): Valid<Json<RegionSubscriptionRequest>>,
) -> Result<(StatusCode, Json<RegionSubscriptionResponse>), AppError> {
    let response = region_service::subscribe(&state, payload).await?;
    let status = if response.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(response)))
}

/// Remove a user's subscription to a city.
#[utoipa::path(
    delete,
    path = "/subscriptions/region",
    tag = "subscriptions",
    request_body = RegionSubscriptionRequest,
    responses(
        (status = 204, description = "Subscription removed"),
        (status = 404, description = "No such subscription")
    )
)]
pub async fn unsubscribe_region(
    State(state): State<SharedState>,
    Valid(Json(payload)): Valid<Json<RegionSubscriptionRequest>>,
) -> Result<StatusCode, AppError> {
    let removed = region_service::unsubscribe(&state, payload.user_id, payload.city).await?;
    if removed {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound("no such subscription".into()))
    }
}
