//! Match lifecycle orchestration: create, join, start, score.
//!
//! Every operation validates and mutates through the record store first and
//! only then fires its side effects (live publish, push dispatch). A failed
//! mutation produces no side effect; a failed side effect never rolls back
//! or fails the mutation.

use std::collections::HashMap;
use std::time::SystemTime;

use time::OffsetDateTime;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{
    dao::models::{MatchEntity, PlayerMatchEntity},
    dto::matches::{CreateMatchRequest, MatchJoinedResponse, MatchSummary},
    error::ServiceError,
    services::{live_events, push_service::PushJob, region_service},
    state::{
        SharedState,
        lifecycle::{self, MatchEvent, MatchStatus},
    },
};

/// Schedule a new match and fan the announcement out to the field's region:
/// one envelope on the region feed, one push batch to the city's subscribers
/// (minus the creator).
pub async fn create_match(
    state: &SharedState,
    request: CreateMatchRequest,
) -> Result<MatchSummary, ServiceError> {
    let store = state.require_match_store().await?;

    let Some(creator) = store.find_user(request.creator_id).await? else {
        return Err(ServiceError::NotFound(format!(
            "creator `{}` not found",
            request.creator_id
        )));
    };
    let Some(field) = store.find_field(request.field_id).await? else {
        return Err(ServiceError::NotFound(format!(
            "field `{}` not found",
            request.field_id
        )));
    };

    let now = SystemTime::now();
    let entity = MatchEntity {
        id: Uuid::new_v4(),
        field_id: field.id,
        creator_id: creator.id,
        title: request.title,
        description: request.description,
        date: request.date,
        start_time: request.start_time,
        end_time: request.end_time,
        max_players: request.max_players,
        status: MatchStatus::Scheduled,
        score_a: 0,
        score_b: 0,
        created_at: now,
        updated_at: now,
    };
    store.insert_match(entity.clone()).await?;

    live_events::publish_new_match(state, &entity, &field).await;

    match region_service::resolve_recipients(&store, &field.city, creator.id).await {
        Ok(recipients) if recipients.is_empty() => {
            debug!(city = %field.city, "no region subscribers to notify");
        }
        Ok(recipients) => {
            state.push_dispatcher().submit(PushJob {
                recipients,
                exclude: Some(creator.id),
                title: "New match in your area!".to_string(),
                body: format!(
                    "The match '{}' was created in {}. Tap to view!",
                    entity.title, field.city
                ),
                data: HashMap::from([("matchId".to_string(), entity.id.to_string())]),
            });
        }
        Err(err) => {
            // The match is already committed; fan-out trouble stays here.
            warn!(error = %err, city = %field.city, "failed to resolve region subscribers");
        }
    }

    Ok(entity.into())
}

/// List every match.
pub async fn list_matches(state: &SharedState) -> Result<Vec<MatchSummary>, ServiceError> {
    let store = state.require_match_store().await?;
    let matches = store.list_matches().await?;
    Ok(matches.into_iter().map(Into::into).collect())
}

/// Add a user to a match roster.
///
/// The duplicate and capacity checks plus the insert run under the per-match
/// join gate, so concurrent joins against one match serialize and can never
/// overshoot `max_players`.
pub async fn join_match(
    state: &SharedState,
    match_id: Uuid,
    user_id: Uuid,
) -> Result<MatchJoinedResponse, ServiceError> {
    let store = state.require_match_store().await?;

    let Some(entity) = store.find_match(match_id).await? else {
        return Err(ServiceError::NotFound(format!("match `{match_id}` not found")));
    };
    let Some(user) = store.find_user(user_id).await? else {
        return Err(ServiceError::NotFound(format!("user `{user_id}` not found")));
    };

    let today = OffsetDateTime::now_utc().date();
    if entity.date < today {
        return Err(ServiceError::InvalidState(
            "cannot join a match scheduled in the past".into(),
        ));
    }

    let joined_at = SystemTime::now();
    let player_count = {
        let gate = state.join_gate(match_id);
        let _guard = gate.lock().await;

        if store.exists_player_match(match_id, user_id).await? {
            return Err(ServiceError::Conflict(format!(
                "user `{}` already joined match `{match_id}`",
                user.name
            )));
        }

        let current = store.count_players(match_id).await?;
        if current >= entity.max_players {
            return Err(ServiceError::CapacityExceeded(format!(
                "match `{match_id}` roster is full ({} players)",
                entity.max_players
            )));
        }

        store
            .insert_player_match(PlayerMatchEntity {
                match_id,
                user_id,
                joined_at,
            })
            .await?;

        current + 1
        // Gate released here; nothing below holds it across the publish.
    };

    live_events::publish_player_joined(state, match_id, &user, joined_at).await;

    Ok(MatchJoinedResponse {
        match_id,
        user_id,
        player_count,
    })
}

/// Transition a match from `scheduled` to `in_progress`. Only the creator
/// may start a match.
pub async fn start_match(
    state: &SharedState,
    match_id: Uuid,
    actor_id: Uuid,
) -> Result<MatchSummary, ServiceError> {
    let store = state.require_match_store().await?;

    let Some(mut entity) = store.find_match(match_id).await? else {
        return Err(ServiceError::NotFound(format!("match `{match_id}` not found")));
    };

    if entity.creator_id != actor_id {
        return Err(ServiceError::Forbidden(
            "only the match creator can start it".into(),
        ));
    }

    entity.status = lifecycle::next_status(entity.status, MatchEvent::Start)?;
    entity.updated_at = SystemTime::now();
    store.update_match(entity.clone()).await?;

    live_events::publish_match_started(state, &entity).await;

    Ok(entity.into())
}

/// Set the live score. Deliberately unguarded by status: the observed
/// behavior accepts score changes at any point of the lifecycle.
pub async fn update_score(
    state: &SharedState,
    match_id: Uuid,
    actor_id: Uuid,
    score_a: u32,
    score_b: u32,
) -> Result<MatchSummary, ServiceError> {
    let store = state.require_match_store().await?;

    let Some(mut entity) = store.find_match(match_id).await? else {
        return Err(ServiceError::NotFound(format!("match `{match_id}` not found")));
    };

    if entity.creator_id != actor_id {
        return Err(ServiceError::Forbidden(
            "only the match creator can update the score".into(),
        ));
    }

    entity.score_a = score_a;
    entity.score_b = score_b;
    entity.updated_at = SystemTime::now();
    store.update_match(entity.clone()).await?;

    live_events::publish_score_update(state, &entity).await;

    Ok(entity.into())
}
