use axum::{
    Json, Router,
    extract::{Path, State},
    routing::post,
};
use axum_valid::Valid;
use uuid::Uuid;

use crate::{
    dto::users::{CreateUserRequest, DeviceTokenRequest, UserSummary},
    error::AppError,
    services::user_service,
    state::SharedState,
};

/// Routes handling user registration and device tokens.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/users", post(create_user).get(list_users))
        .route("/users/{id}/device-token", post(register_device_token))
}

/// Register a new user.
#[utoipa::path(
    post,
    path = "/users",
    tag = "users",
    request_body = CreateUserRequest,
    responses(
        (status = 200, description = "User created", body = UserSummary),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn create_user(
    State(state): State<SharedState>,
    Valid(Json(payload)): Valid<Json<CreateUserRequest>>,
) -> Result<Json<UserSummary>, AppError> {
    let summary = user_service::create_user(&state, payload).await?;
    Ok(Json(summary))
}

/// List every registered user.
#[utoipa::path(
    get,
    path = "/users",
    tag = "users",
    responses((status = 200, description = "All users", body = [UserSummary]))
)]
pub async fn list_users(
    State(state): State<SharedState>,
) -> Result<Json<Vec<UserSummary>>, AppError> {
    let users = user_service::list_users(&state).await?;
    Ok(Json(users))
}

/// Bind a push delivery token to a user.
#[utoipa::path(
    post,
    path = "/users/{id}/device-token",
    tag = "users",
    params(("id" = Uuid, Path, description = "User to bind the token to")),
    request_body = DeviceTokenRequest,
    responses(
        (status = 204, description = "Token bound"),
        (status = 404, description = "User not found")
    )
)]
pub async fn register_device_token(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Valid(Json(payload)): Valid<Json<DeviceTokenRequest>>,
) -> Result<axum::http::StatusCode, AppError> {
    user_service::register_device_token(&state, id, payload.token).await?;
    Ok(axum::http::StatusCode::NO_CONTENT)
}
