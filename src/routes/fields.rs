use axum::{
    Json, Router,
    extract::State,
    routing::post,
};
use axum_valid::Valid;

use crate::{
    dto::fields::{CreateFieldRequest, FieldSummary},
    error::AppError,
    services::field_service,
    state::SharedState,
};

/// Routes handling field management.
pub fn router() -> Router<SharedState> {
    Router::new().route("/fields", post(create_field).get(list_fields))
}

/// Register a new field.
#[utoipa::path(
    post,
    path = "/fields",
    tag = "fields",
    request_body = CreateFieldRequest,
    responses((status = 200, description = "Field created", body = FieldSummary))
)]
pub async fn create_field(
    State(state): State<SharedState>,
    Valid(Json(payload)): Valid<Json<CreateFieldRequest>>,
) -> Result<Json<FieldSummary>, AppError> {
    let summary = field_service::create_field(&state, payload).await?;
    Ok(Json(summary))
}

/// List every field.
#[utoipa::path(
    get,
    path = "/fields",
    tag = "fields",
    responses((status = 200, description = "All fields", body = [FieldSummary]))
)]
pub async fn list_fields(
    State(state): State<SharedState>,
) -> Result<Json<Vec<FieldSummary>>, AppError> {
    let fields = field_service::list_fields(&state).await?;
    Ok(Json(fields))
}
