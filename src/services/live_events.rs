//! Live event publishing onto the region and match topic families.
//!
//! Every publish here is fire-and-forget from the caller's perspective: a
//! missing transport or a failed send degrades to a log line and never
//! unwinds the state transition that triggered it. Callers invoke these
//! functions strictly after the state mutation has been committed.

use serde::Serialize;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{
    dao::models::{FieldEntity, MatchEntity, UserEntity},
    dto::{
        events::{LiveEvent, MatchStartedEvent, PlayerJoinedEvent, ScoreUpdateEvent},
        format_system_time,
        matches::MatchSummary,
    },
    pubsub::DeliveryLevel,
    state::SharedState,
};

/// Normalize a city for use in a topic segment: lowercased, spaces replaced
/// with hyphens.
pub fn normalize_city(city: &str) -> String {
    city.trim().to_lowercase().replace(' ', "-")
}

/// Region feed topic carrying `new_match` events for one city.
pub fn region_topic(city: &str) -> String {
    format!("matches/{}", normalize_city(city))
}

/// Lobby feed topic carrying `player_joined` and `match_started` events.
pub fn lobby_topic(match_id: Uuid) -> String {
    format!("match/{match_id}/updates")
}

/// In-play feed topic carrying `score_update` events.
pub fn live_topic(match_id: Uuid) -> String {
    format!("match/{match_id}/live_updates")
}

/// Announce a freshly created match on its field's region feed.
pub async fn publish_new_match(state: &SharedState, entity: &MatchEntity, field: &FieldEntity) {
    let summary: MatchSummary = entity.clone().into();
    let envelope = LiveEvent::NewMatch(summary.into());
    publish(
        state,
        region_topic(&field.city),
        &envelope,
        DeliveryLevel::AtLeastOnce,
    )
    .await;
}

/// Announce a roster join on the match lobby feed.
pub async fn publish_player_joined(
    state: &SharedState,
    match_id: Uuid,
    user: &UserEntity,
    joined_at: std::time::SystemTime,
) {
    let envelope = LiveEvent::PlayerJoined(PlayerJoinedEvent {
        user_id: user.id,
        user_name: user.name.clone(),
        joined_at: format_system_time(joined_at),
    });
    publish(
        state,
        lobby_topic(match_id),
        &envelope,
        DeliveryLevel::ExactlyOnce,
    )
    .await;
}

/// Announce a started match on the lobby feed.
pub async fn publish_match_started(state: &SharedState, entity: &MatchEntity) {
    let envelope = LiveEvent::MatchStarted(MatchStartedEvent {
        match_id: entity.id,
        status: entity.status,
    });
    publish(
        state,
        lobby_topic(entity.id),
        &envelope,
        DeliveryLevel::ExactlyOnce,
    )
    .await;
}

/// Announce a score change on the in-play feed. Score updates are
/// low-frequency and high-value, so they ride the strongest delivery level.
pub async fn publish_score_update(state: &SharedState, entity: &MatchEntity) {
    let envelope = LiveEvent::ScoreUpdate(ScoreUpdateEvent {
        match_id: entity.id,
        score_a: entity.score_a,
        score_b: entity.score_b,
    });
    publish(
        state,
        live_topic(entity.id),
        &envelope,
        DeliveryLevel::ExactlyOnce,
    )
    .await;
}

async fn publish(state: &SharedState, topic: String, envelope: &impl Serialize, level: DeliveryLevel) {
    let payload = match serde_json::to_vec(envelope) {
        Ok(payload) => payload,
        Err(err) => {
            warn!(topic, error = %err, "failed to serialize live event");
            return;
        }
    };

    let Some(transport) = state.transport().await else {
        warn!(topic, "live transport unavailable; event dropped");
        return;
    };

    match transport.publish(topic.clone(), payload, level).await {
        Ok(()) => debug!(topic, "live event published"),
        Err(err) => warn!(topic, error = %err, "live publish failed"),
    }
}

#[cfg(test)]
mod tests {
    use std::time::SystemTime;

    use super::*;
    use crate::services::push_service;
    use crate::state::AppState;
    use crate::state::lifecycle::MatchStatus;
    use time::macros::{date, time};

    fn sample_match() -> MatchEntity {
        MatchEntity {
            id: Uuid::new_v4(),
            field_id: Uuid::new_v4(),
            creator_id: Uuid::new_v4(),
            title: "Friday kickabout".into(),
            description: None,
            date: date!(2030 - 01 - 15),
            start_time: time!(19:00),
            end_time: time!(20:00),
            max_players: 10,
            status: MatchStatus::Scheduled,
            score_a: 0,
            score_b: 0,
            created_at: SystemTime::now(),
            updated_at: SystemTime::now(),
        }
    }

    #[test]
    fn city_normalization_lowercases_and_hyphenates() {
        assert_eq!(normalize_city("Brasilia"), "brasilia");
        assert_eq!(normalize_city("Rio de Janeiro"), "rio-de-janeiro");
        assert_eq!(normalize_city("  Belo Horizonte "), "belo-horizonte");
    }

    #[test]
    fn topics_follow_the_contract() {
        let id = Uuid::nil();
        assert_eq!(region_topic("Brasilia"), "matches/brasilia");
        assert_eq!(
            lobby_topic(id),
            "match/00000000-0000-0000-0000-000000000000/updates"
        );
        assert_eq!(
            live_topic(id),
            "match/00000000-0000-0000-0000-000000000000/live_updates"
        );
    }

    #[tokio::test]
    async fn score_update_lands_on_the_live_feed() {
        let (dispatcher, _queue) = push_service::channel(4);
        let state = AppState::new(dispatcher, 8);
        state.install_transport(state.hub()).await;
        let mut receiver = state.hub().subscribe();

        let mut entity = sample_match();
        entity.score_a = 3;
        entity.score_b = 2;
        publish_score_update(&state, &entity).await;

        let frame = receiver.recv().await.unwrap();
        assert_eq!(frame.topic, live_topic(entity.id));
        let json: serde_json::Value = serde_json::from_slice(&frame.payload).unwrap();
        assert_eq!(json["event"], "score_update");
        assert_eq!(json["data"]["score_a"], 3);
        assert_eq!(json["data"]["score_b"], 2);
    }

    #[tokio::test]
    async fn publishing_without_transport_is_a_no_op() {
        let (dispatcher, _queue) = push_service::channel(4);
        let state = AppState::new(dispatcher, 8);
        // No transport installed: the call must simply return.
        publish_match_started(&state, &sample_match()).await;
    }
}
