pub mod memory;

use futures::future::BoxFuture;
use uuid::Uuid;

use crate::dao::models::{
    FieldEntity, MatchEntity, PlayerMatchEntity, RegionSubscriptionEntity, UserEntity,
};
use crate::dao::storage::StorageResult;

/// Abstraction over the record store backing users, fields, matches, rosters
/// and region subscriptions.
///
/// The lifecycle services only ever talk to this trait; a backend is free to
/// implement it over any persistence layer. Operations that mutate a single
/// record are atomic on their own, but multi-step invariants (the join
/// capacity check) are serialized above this trait by the caller.
pub trait MatchStore: Send + Sync {
    /// Persist a new user record.
    fn insert_user(&self, user: UserEntity) -> BoxFuture<'static, StorageResult<()>>;
    /// Look up a user by id.
    fn find_user(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<UserEntity>>>;
    /// Look up a user by email (exact match).
    fn find_user_by_email(
        &self,
        email: String,
    ) -> BoxFuture<'static, StorageResult<Option<UserEntity>>>;
    /// List every registered user.
    fn list_users(&self) -> BoxFuture<'static, StorageResult<Vec<UserEntity>>>;
    /// Bind a push delivery token to a user, stealing it from any previous
    /// owner (tokens are single-owner, last write wins). Returns `false` when
    /// the user does not exist.
    fn set_device_token(
        &self,
        user_id: Uuid,
        token: String,
    ) -> BoxFuture<'static, StorageResult<bool>>;
    /// Resolve the push tokens of the given users, skipping `exclude` and any
    /// user without a bound token. Order follows `user_ids`; duplicates are
    /// the caller's concern.
    fn device_tokens_excluding(
        &self,
        user_ids: Vec<Uuid>,
        exclude: Option<Uuid>,
    ) -> BoxFuture<'static, StorageResult<Vec<String>>>;

    /// Persist a new field record.
    fn insert_field(&self, field: FieldEntity) -> BoxFuture<'static, StorageResult<()>>;
    /// Look up a field by id.
    fn find_field(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<FieldEntity>>>;
    /// List every field.
    fn list_fields(&self) -> BoxFuture<'static, StorageResult<Vec<FieldEntity>>>;

    /// Persist a new match record.
    fn insert_match(&self, entity: MatchEntity) -> BoxFuture<'static, StorageResult<()>>;
    /// Look up a match by id.
    fn find_match(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<MatchEntity>>>;
    /// Replace a match record with an updated copy.
    fn update_match(&self, entity: MatchEntity) -> BoxFuture<'static, StorageResult<()>>;
    /// List every match.
    fn list_matches(&self) -> BoxFuture<'static, StorageResult<Vec<MatchEntity>>>;

    /// Number of players currently on a match roster.
    fn count_players(&self, match_id: Uuid) -> BoxFuture<'static, StorageResult<u32>>;
    /// Whether a (match, user) join record already exists.
    fn exists_player_match(
        &self,
        match_id: Uuid,
        user_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<bool>>;
    /// Append a join record to a match roster.
    fn insert_player_match(
        &self,
        record: PlayerMatchEntity,
    ) -> BoxFuture<'static, StorageResult<()>>;

    /// All subscriptions for a city. City comparison is case-insensitive.
    fn find_subscriptions(
        &self,
        city: String,
    ) -> BoxFuture<'static, StorageResult<Vec<RegionSubscriptionEntity>>>;
    /// Record a (user, city) subscription. Returns `false` when the pair was
    /// already present (the operation is idempotent).
    fn insert_subscription(
        &self,
        subscription: RegionSubscriptionEntity,
    ) -> BoxFuture<'static, StorageResult<bool>>;
    /// Remove a (user, city) subscription. Returns `false` when no such pair
    /// existed.
    fn remove_subscription(
        &self,
        user_id: Uuid,
        city: String,
    ) -> BoxFuture<'static, StorageResult<bool>>;

    /// Cheap liveness probe used by the health endpoint.
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
}
