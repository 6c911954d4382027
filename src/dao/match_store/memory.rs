//! In-process [`MatchStore`] implementation.
//!
//! Backs the binary by default and every service-level test. All records live
//! in concurrent maps; individual operations are atomic, matching the
//! guarantees a transactional backend would give for single-row writes.

use std::sync::Arc;

use dashmap::DashMap;
use futures::future::BoxFuture;
use uuid::Uuid;

use crate::dao::match_store::MatchStore;
use crate::dao::models::{
    FieldEntity, MatchEntity, PlayerMatchEntity, RegionSubscriptionEntity, UserEntity,
};
use crate::dao::storage::StorageResult;

#[derive(Default)]
struct Inner {
    users: DashMap<Uuid, UserEntity>,
    fields: DashMap<Uuid, FieldEntity>,
    matches: DashMap<Uuid, MatchEntity>,
    // Roster entries keyed by match id.
    players: DashMap<Uuid, Vec<PlayerMatchEntity>>,
    // Subscriptions keyed by user id.
    subscriptions: DashMap<Uuid, Vec<RegionSubscriptionEntity>>,
}

/// Concurrent in-memory record store.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Inner>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl MatchStore for MemoryStore {
    fn insert_user(&self, user: UserEntity) -> BoxFuture<'static, StorageResult<()>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            inner.users.insert(user.id, user);
            Ok(())
        })
    }

    fn find_user(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<UserEntity>>> {
        let inner = self.inner.clone();
        Box::pin(async move { Ok(inner.users.get(&id).map(|entry| entry.value().clone())) })
    }

    fn find_user_by_email(
        &self,
        email: String,
    ) -> BoxFuture<'static, StorageResult<Option<UserEntity>>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            Ok(inner
                .users
                .iter()
                .find(|entry| entry.email == email)
                .map(|entry| entry.value().clone()))
        })
    }

    fn list_users(&self) -> BoxFuture<'static, StorageResult<Vec<UserEntity>>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            Ok(inner
                .users
                .iter()
                .map(|entry| entry.value().clone())
                .collect::<Vec<_>>())
        })
    }

    fn set_device_token(
        &self,
        user_id: Uuid,
        token: String,
    ) -> BoxFuture<'static, StorageResult<bool>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            // Tokens are single-owner: strip the token from any other user
            // before binding it.
            for mut entry in inner.users.iter_mut() {
                if entry.id != user_id && entry.device_token.as_deref() == Some(token.as_str()) {
                    entry.device_token = None;
                }
            }

            match inner.users.get_mut(&user_id) {
                Some(mut entry) => {
                    entry.device_token = Some(token);
                    entry.updated_at = std::time::SystemTime::now();
                    Ok(true)
                }
                None => Ok(false),
            }
        })
    }

    fn device_tokens_excluding(
        &self,
        user_ids: Vec<Uuid>,
        exclude: Option<Uuid>,
    ) -> BoxFuture<'static, StorageResult<Vec<String>>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            let tokens = user_ids
                .into_iter()
                .filter(|id| Some(*id) != exclude)
                .filter_map(|id| inner.users.get(&id).and_then(|u| u.device_token.clone()))
                .collect();
            Ok(tokens)
        })
    }

    fn insert_field(&self, field: FieldEntity) -> BoxFuture<'static, StorageResult<()>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            inner.fields.insert(field.id, field);
            Ok(())
        })
    }

    fn find_field(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<FieldEntity>>> {
        let inner = self.inner.clone();
        Box::pin(async move { Ok(inner.fields.get(&id).map(|entry| entry.value().clone())) })
    }

    fn list_fields(&self) -> BoxFuture<'static, StorageResult<Vec<FieldEntity>>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            Ok(inner
                .fields
                .iter()
                .map(|entry| entry.value().clone())
                .collect::<Vec<_>>())
        })
    }

    fn insert_match(&self, entity: MatchEntity) -> BoxFuture<'static, StorageResult<()>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            inner.matches.insert(entity.id, entity);
            Ok(())
        })
    }

    fn find_match(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<MatchEntity>>> {
        let inner = self.inner.clone();
        Box::pin(async move { Ok(inner.matches.get(&id).map(|entry| entry.value().clone())) })
    }

    fn update_match(&self, entity: MatchEntity) -> BoxFuture<'static, StorageResult<()>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            inner.matches.insert(entity.id, entity);
            Ok(())
        })
    }

    fn list_matches(&self) -> BoxFuture<'static, StorageResult<Vec<MatchEntity>>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            Ok(inner
                .matches
                .iter()
                .map(|entry| entry.value().clone())
                .collect::<Vec<_>>())
        })
    }

    fn count_players(&self, match_id: Uuid) -> BoxFuture<'static, StorageResult<u32>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            let count = inner
                .players
                .get(&match_id)
                .map(|roster| roster.len())
                .unwrap_or(0);
            Ok(count as u32)
        })
    }

    fn exists_player_match(
        &self,
        match_id: Uuid,
        user_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<bool>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            let exists = inner
                .players
                .get(&match_id)
                .is_some_and(|roster| roster.iter().any(|record| record.user_id == user_id));
            Ok(exists)
        })
    }

    fn insert_player_match(
        &self,
        record: PlayerMatchEntity,
    ) -> BoxFuture<'static, StorageResult<()>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            inner
                .players
                .entry(record.match_id)
                .or_default()
                .push(record);
            Ok(())
        })
    }

    fn find_subscriptions(
        &self,
        city: String,
    ) -> BoxFuture<'static, StorageResult<Vec<RegionSubscriptionEntity>>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            let wanted = city.to_lowercase();
            let matching = inner
                .subscriptions
                .iter()
                .flat_map(|entry| {
                    entry
                        .value()
                        .iter()
                        .filter(|sub| sub.city.to_lowercase() == wanted)
                        .cloned()
                        .collect::<Vec<_>>()
                })
                .collect();
            Ok(matching)
        })
    }

    fn insert_subscription(
        &self,
        subscription: RegionSubscriptionEntity,
    ) -> BoxFuture<'static, StorageResult<bool>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            let mut entry = inner.subscriptions.entry(subscription.user_id).or_default();
            let duplicate = entry
                .iter()
                .any(|sub| sub.city.to_lowercase() == subscription.city.to_lowercase());
            if duplicate {
                return Ok(false);
            }
            entry.push(subscription);
            Ok(true)
        })
    }

    fn remove_subscription(
        &self,
        user_id: Uuid,
        city: String,
    ) -> BoxFuture<'static, StorageResult<bool>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            let Some(mut entry) = inner.subscriptions.get_mut(&user_id) else {
                return Ok(false);
            };
            let before = entry.len();
            entry.retain(|sub| sub.city.to_lowercase() != city.to_lowercase());
            Ok(entry.len() != before)
        })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }
}

#[cfg(test)]
mod tests {
    use std::time::SystemTime;

    use super::*;

    fn user(name: &str, token: Option<&str>) -> UserEntity {
        UserEntity {
            id: Uuid::new_v4(),
            name: name.into(),
            email: format!("{name}@example.com"),
            phone: None,
            device_token: token.map(Into::into),
            created_at: SystemTime::now(),
            updated_at: SystemTime::now(),
        }
    }

    #[tokio::test]
    async fn device_token_is_single_owner() {
        let store = MemoryStore::new();
        let first = user("ana", None);
        let second = user("bruno", None);
        store.insert_user(first.clone()).await.unwrap();
        store.insert_user(second.clone()).await.unwrap();

        assert!(store
            .set_device_token(first.id, "shared-device".into())
            .await
            .unwrap());
        assert!(store
            .set_device_token(second.id, "shared-device".into())
            .await
            .unwrap());

        let previous = store.find_user(first.id).await.unwrap().unwrap();
        let current = store.find_user(second.id).await.unwrap().unwrap();
        assert_eq!(previous.device_token, None);
        assert_eq!(current.device_token.as_deref(), Some("shared-device"));
    }

    #[tokio::test]
    async fn set_device_token_for_unknown_user_reports_missing() {
        let store = MemoryStore::new();
        let bound = store
            .set_device_token(Uuid::new_v4(), "token".into())
            .await
            .unwrap();
        assert!(!bound);
    }

    #[tokio::test]
    async fn subscription_insert_is_idempotent_per_city() {
        let store = MemoryStore::new();
        let user_id = Uuid::new_v4();
        let sub = RegionSubscriptionEntity {
            user_id,
            city: "Brasilia".into(),
        };

        assert!(store.insert_subscription(sub.clone()).await.unwrap());
        // Same city in a different case still counts as a duplicate.
        let again = RegionSubscriptionEntity {
            user_id,
            city: "brasilia".into(),
        };
        assert!(!store.insert_subscription(again).await.unwrap());

        let found = store.find_subscriptions("BRASILIA".into()).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].user_id, user_id);
    }

    #[tokio::test]
    async fn remove_subscription_reports_absence() {
        let store = MemoryStore::new();
        let user_id = Uuid::new_v4();
        assert!(!store
            .remove_subscription(user_id, "nowhere".into())
            .await
            .unwrap());

        store
            .insert_subscription(RegionSubscriptionEntity {
                user_id,
                city: "Goiania".into(),
            })
            .await
            .unwrap();
        assert!(store
            .remove_subscription(user_id, "GOIANIA".into())
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn roster_counts_follow_inserts() {
        let store = MemoryStore::new();
        let match_id = Uuid::new_v4();
        let user_id = Uuid::new_v4();
        assert_eq!(store.count_players(match_id).await.unwrap(), 0);

        store
            .insert_player_match(PlayerMatchEntity {
                match_id,
                user_id,
                joined_at: SystemTime::now(),
            })
            .await
            .unwrap();

        assert_eq!(store.count_players(match_id).await.unwrap(), 1);
        assert!(store.exists_player_match(match_id, user_id).await.unwrap());
        assert!(!store
            .exists_player_match(match_id, Uuid::new_v4())
            .await
            .unwrap());
    }
}
