use std::convert::Infallible;

use axum::{
    Router,
    extract::{Path, State},
    response::sse::Sse,
    routing::get,
};
use futures::Stream;
use tracing::info;
use uuid::Uuid;

use crate::{
    services::{
        live_events,
        sse_service::{self, TopicFilter},
    },
    state::SharedState,
};

/// Configure the live SSE endpoints.
pub fn router() -> Router<SharedState> {
    Router::<SharedState>::new()
        .route("/live/region/{city}", get(region_stream))
        .route("/live/matches/{id}", get(match_stream))
}

#[utoipa::path(
    get,
    path = "/live/region/{city}",
    tag = "live",
    params(("city" = String, Path, description = "City whose new-match feed to stream")),
    responses((status = 200, description = "Region event stream", content_type = "text/event-stream", body = String))
)]
/// Stream `new_match` envelopes for one city to the connected client.
pub async fn region_stream(
    State(state): State<SharedState>,
    Path(city): Path<String>,
) -> Sse<impl Stream<Item = Result<axum::response::sse::Event, Infallible>>> {
    let topic = live_events::region_topic(&city);
    info!(%topic, "new region SSE connection");
    sse_service::stream_topic(&state, TopicFilter::Exact(topic))
}

#[utoipa::path(
    get,
    path = "/live/matches/{id}",
    tag = "live",
    params(("id" = Uuid, Path, description = "Match whose lobby and live feeds to stream")),
    responses((status = 200, description = "Match event stream", content_type = "text/event-stream", body = String))
)]
/// Stream lobby and in-play envelopes for one match to the connected client.
pub async fn match_stream(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Sse<impl Stream<Item = Result<axum::response::sse::Event, Infallible>>> {
    info!(match_id = %id, "new match SSE connection");
    sse_service::stream_topic(&state, TopicFilter::Prefix(format!("match/{id}/")))
}
