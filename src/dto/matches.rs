use serde::{Deserialize, Serialize};
use time::{Date, Time};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{dao::models::MatchEntity, dto::format_system_time, state::lifecycle::MatchStatus};

/// Payload used to schedule a new match at a field.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateMatchRequest {
    /// User creating the match.
    pub creator_id: Uuid,
    /// Field the match takes place at.
    pub field_id: Uuid,
    #[validate(length(min = 1, max = 120))]
    /// Short title shown in listings and notifications.
    pub title: String,
    #[serde(default)]
    /// Optional free-form description.
    pub description: Option<String>,
    /// Calendar day of the match (ISO-8601 date).
    #[schema(value_type = String, example = "2026-09-12")]
    pub date: Date,
    /// Scheduled kick-off time (ISO-8601 time).
    #[schema(value_type = String, example = "19:00:00")]
    pub start_time: Time,
    /// Scheduled end time (ISO-8601 time).
    #[schema(value_type = String, example = "20:00:00")]
    pub end_time: Time,
    #[validate(range(min = 2, max = 200))]
    /// Roster capacity.
    pub max_players: u32,
}

/// Public projection of a match.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MatchSummary {
    /// Match identifier.
    pub id: Uuid,
    /// Field the match takes place at.
    pub field_id: Uuid,
    /// User who created the match.
    pub creator_id: Uuid,
    /// Short title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Calendar day (ISO-8601 date).
    #[schema(value_type = String)]
    pub date: Date,
    /// Kick-off time (ISO-8601 time).
    #[schema(value_type = String)]
    pub start_time: Time,
    /// End time (ISO-8601 time).
    #[schema(value_type = String)]
    pub end_time: Time,
    /// Roster capacity.
    pub max_players: u32,
    /// Current lifecycle status.
    pub status: MatchStatus,
    /// Side A score.
    pub score_a: u32,
    /// Side B score.
    pub score_b: u32,
    /// Creation timestamp (RFC 3339).
    pub created_at: String,
}

impl From<MatchEntity> for MatchSummary {
    fn from(entity: MatchEntity) -> Self {
        Self {
            id: entity.id,
            field_id: entity.field_id,
            creator_id: entity.creator_id,
            title: entity.title,
            description: entity.description,
            date: entity.date,
            start_time: entity.start_time,
            end_time: entity.end_time,
            max_players: entity.max_players,
            status: entity.status,
            score_a: entity.score_a,
            score_b: entity.score_b,
            created_at: format_system_time(entity.created_at),
        }
    }
}

/// Payload identifying the joining user.
#[derive(Debug, Deserialize, ToSchema)]
pub struct JoinMatchRequest {
    /// User asking to join the roster.
    pub user_id: Uuid,
}

/// Returned once a join was accepted.
#[derive(Debug, Serialize, ToSchema)]
pub struct MatchJoinedResponse {
    /// Match that was joined.
    pub match_id: Uuid,
    /// User now on the roster.
    pub user_id: Uuid,
    /// Roster size after the join.
    pub player_count: u32,
}

/// Payload identifying the actor of a start request.
#[derive(Debug, Deserialize, ToSchema)]
pub struct StartMatchRequest {
    /// Must be the match creator.
    pub actor_id: Uuid,
}

/// Payload carrying a live score update.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateScoreRequest {
    /// Must be the match creator.
    pub actor_id: Uuid,
    /// New side A score.
    pub score_a: u32,
    /// New side B score.
    pub score_b: u32,
}
