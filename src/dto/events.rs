//! Event envelopes published on the live topics.
//!
//! The wire shape is part of the client contract: every envelope serializes
//! as `{"event": "<kind>", "data": {...}}` with ISO-8601 strings for all
//! date/time fields. One variant per event kind keeps field drift a compile
//! error instead of a production surprise.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{dto::matches::MatchSummary, state::lifecycle::MatchStatus};

/// Envelope published on the region and match topics.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum LiveEvent {
    /// A match was created in a region; published on `matches/<city>`.
    NewMatch(MatchSummaryData),
    /// A player joined a roster; published on `match/<id>/updates`.
    PlayerJoined(PlayerJoinedEvent),
    /// The creator started the match; published on `match/<id>/updates`.
    MatchStarted(MatchStartedEvent),
    /// The score changed; published on `match/<id>/live_updates`.
    ScoreUpdate(ScoreUpdateEvent),
}

/// Payload of a `new_match` envelope: a deserializable projection of the
/// match, so regional subscribers can render the card without a follow-up
/// fetch.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MatchSummaryData {
    /// Match identifier.
    pub id: Uuid,
    /// Field reference.
    pub field_id: Uuid,
    /// Creator reference.
    pub creator_id: Uuid,
    /// Match title.
    pub title: String,
    /// Roster capacity.
    pub max_players: u32,
    /// Lifecycle status at publish time.
    pub status: MatchStatus,
    /// Calendar day, ISO-8601.
    pub date: String,
    /// Kick-off time, ISO-8601.
    pub start_time: String,
}

/// Payload of a `player_joined` envelope.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PlayerJoinedEvent {
    /// User who joined.
    pub user_id: Uuid,
    /// Their display name, for lobby rendering.
    pub user_name: String,
    /// Join timestamp, RFC 3339.
    pub joined_at: String,
}

/// Payload of a `match_started` envelope.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MatchStartedEvent {
    /// Match that started.
    pub match_id: Uuid,
    /// Status after the transition (`in_progress`).
    pub status: MatchStatus,
}

/// Payload of a `score_update` envelope.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ScoreUpdateEvent {
    /// Match being scored.
    pub match_id: Uuid,
    /// Side A score.
    pub score_a: u32,
    /// Side B score.
    pub score_b: u32,
}

impl From<MatchSummary> for MatchSummaryData {
    fn from(summary: MatchSummary) -> Self {
        Self {
            id: summary.id,
            field_id: summary.field_id,
            creator_id: summary.creator_id,
            title: summary.title,
            max_players: summary.max_players,
            status: summary.status,
            date: summary.date.to_string(),
            start_time: summary.start_time.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_shape_is_event_plus_data() {
        let envelope = LiveEvent::ScoreUpdate(ScoreUpdateEvent {
            match_id: Uuid::nil(),
            score_a: 2,
            score_b: 1,
        });

        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["event"], "score_update");
        assert_eq!(json["data"]["score_a"], 2);
        assert_eq!(json["data"]["score_b"], 1);
        assert_eq!(
            json["data"]["match_id"],
            "00000000-0000-0000-0000-000000000000"
        );
    }

    #[test]
    fn player_joined_round_trips() {
        let envelope = LiveEvent::PlayerJoined(PlayerJoinedEvent {
            user_id: Uuid::new_v4(),
            user_name: "Ana".into(),
            joined_at: "2026-08-06T12:00:00Z".into(),
        });

        let json = serde_json::to_string(&envelope).unwrap();
        assert!(json.starts_with("{\"event\":\"player_joined\""));

        let back: LiveEvent = serde_json::from_str(&json).unwrap();
        match back {
            LiveEvent::PlayerJoined(event) => assert_eq!(event.user_name, "Ana"),
            other => panic!("unexpected envelope: {other:?}"),
        }
    }

    #[test]
    fn match_started_uses_snake_case_kind() {
        let envelope = LiveEvent::MatchStarted(MatchStartedEvent {
            match_id: Uuid::nil(),
            status: MatchStatus::InProgress,
        });
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["event"], "match_started");
        assert_eq!(json["data"]["status"], "in_progress");
    }
}
