use serde::{Deserialize, Serialize};
use std::time::SystemTime;
use time::{Date, Time};
use uuid::Uuid;

use crate::state::lifecycle::MatchStatus;

/// Registered user account as persisted by the record store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserEntity {
    /// Stable identifier for the user.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Unique email address.
    pub email: String,
    /// Optional contact phone number.
    pub phone: Option<String>,
    /// Push delivery token currently bound to this user, if any. A token is
    /// owned by at most one user at a time (last write wins).
    pub device_token: Option<String>,
    /// Creation timestamp for auditing/debugging.
    pub created_at: SystemTime,
    /// Last time the user record was updated.
    pub updated_at: SystemTime,
}

/// Sports field where matches take place.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldEntity {
    /// Stable identifier for the field.
    pub id: Uuid,
    /// Display name of the field.
    pub name: String,
    /// Street address.
    pub address: String,
    /// City the field is located in; drives region fan-out.
    pub city: String,
    /// State / province.
    pub state: String,
}

/// Scheduled match at a field, with a capped roster and a mutable lifecycle
/// status.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MatchEntity {
    /// Primary key of the match.
    pub id: Uuid,
    /// Field the match takes place at.
    pub field_id: Uuid,
    /// User who created the match; the only one allowed to start it.
    pub creator_id: Uuid,
    /// Short title shown in listings and notifications.
    pub title: String,
    /// Optional free-form description.
    pub description: Option<String>,
    /// Calendar day the match is scheduled on.
    pub date: Date,
    /// Scheduled kick-off time.
    pub start_time: Time,
    /// Scheduled end time.
    pub end_time: Time,
    /// Roster capacity; `player_count <= max_players` holds at all times.
    pub max_players: u32,
    /// Current lifecycle status. Transitions are monotonic.
    pub status: MatchStatus,
    /// Running score for side A.
    pub score_a: u32,
    /// Running score for side B.
    pub score_b: u32,
    /// Creation timestamp for auditing/debugging.
    pub created_at: SystemTime,
    /// Last time the match record was updated.
    pub updated_at: SystemTime,
}

/// Join record tying a user to a match roster. At most one exists per
/// (match, user) pair; immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerMatchEntity {
    /// Match the user joined.
    pub match_id: Uuid,
    /// User on the roster.
    pub user_id: Uuid,
    /// When the join happened.
    pub joined_at: SystemTime,
}

/// A user's opt-in to be notified about new matches in a city. At most one
/// exists per (user, city) pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RegionSubscriptionEntity {
    /// Subscribed user.
    pub user_id: Uuid,
    /// City of interest, stored as entered; matching is case-insensitive.
    pub city: String,
}
