use axum::{
    Json, Router,
    extract::{Path, State},
    routing::post,
};
use axum_valid::Valid;
use uuid::Uuid;

use crate::{
    dto::matches::{
        CreateMatchRequest, JoinMatchRequest, MatchJoinedResponse, MatchSummary,
        StartMatchRequest, UpdateScoreRequest,
    },
    error::AppError,
    services::match_service,
    state::SharedState,
};

/// Routes driving the match lifecycle.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/matches", post(create_match).get(list_matches))
        .route("/matches/{id}/join", post(join_match))
        .route("/matches/{id}/start", post(start_match))
        .route("/matches/{id}/score", post(update_score))
}

/// Schedule a new match and fan the announcement out to its region.
#[utoipa::path(
    post,
    path = "/matches",
    tag = "matches",
    request_body = CreateMatchRequest,
    responses(
        (status = 200, description = "Match created", body = MatchSummary),
        (status = 404, description = "Creator or field not found")
    )
)]
pub async fn create_match(
    State(state): State<SharedState>,
    Valid(Json(payload)): Valid<Json<CreateMatchRequest>>,
) -> Result<Json<MatchSummary>, AppError> {
    let summary = match_service::create_match(&state, payload).await?;
    Ok(Json(summary))
}

/// List every match.
#[utoipa::path(
    get,
    path = "/matches",
    tag = "matches",
    responses((status = 200, description = "All matches", body = [MatchSummary]))
)]
pub async fn list_matches(
    State(state): State<SharedState>,
) -> Result<Json<Vec<MatchSummary>>, AppError> {
    let matches = match_service::list_matches(&state).await?;
    Ok(Json(matches))
}

/// Join a match roster.
#[utoipa::path(
    post,
    path = "/matches/{id}/join",
    tag = "matches",
    params(("id" = Uuid, Path, description = "Match to join")),
    request_body = JoinMatchRequest,
    responses(
        (status = 200, description = "Joined", body = MatchJoinedResponse),
        (status = 404, description = "Match or user not found"),
        (status = 409, description = "Already joined, roster full, or match in the past")
    )
)]
pub async fn join_match(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<JoinMatchRequest>,
) -> Result<Json<MatchJoinedResponse>, AppError> {
    let response = match_service::join_match(&state, id, payload.user_id).await?;
    Ok(Json(response))
}

/// Start a scheduled match. Creator only.
#[utoipa::path(
    post,
    path = "/matches/{id}/start",
    tag = "matches",
    params(("id" = Uuid, Path, description = "Match to start")),
    request_body = StartMatchRequest,
    responses(
        (status = 200, description = "Match started", body = MatchSummary),
        (status = 403, description = "Actor is not the creator"),
        (status = 409, description = "Match is not in the scheduled state")
    )
)]
pub async fn start_match(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<StartMatchRequest>,
) -> Result<Json<MatchSummary>, AppError> {
    let summary = match_service::start_match(&state, id, payload.actor_id).await?;
    Ok(Json(summary))
}

/// Update the live score. Creator only; valid at any lifecycle status.
#[utoipa::path(
    post,
    path = "/matches/{id}/score",
    tag = "matches",
    params(("id" = Uuid, Path, description = "Match being scored")),
    request_body = UpdateScoreRequest,
    responses(
        (status = 200, description = "Score updated", body = MatchSummary),
        (status = 403, description = "Actor is not the creator")
    )
)]
pub async fn update_score(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateScoreRequest>,
) -> Result<Json<MatchSummary>, AppError> {
    let summary = match_service::update_score(
        &state,
        id,
        payload.actor_id,
        payload.score_a,
        payload.score_b,
    )
    .await?;
    Ok(Json(summary))
}
