//! Region subscriptions and recipient resolution.

use std::collections::HashSet;
use std::sync::Arc;

use uuid::Uuid;

use crate::{
    dao::{match_store::MatchStore, models::RegionSubscriptionEntity},
    dto::subscriptions::{RegionSubscriptionRequest, RegionSubscriptionResponse},
    error::ServiceError,
    state::SharedState,
};

/// Subscribe a user to a city feed. Idempotent: re-subscribing the same
/// (user, city) pair reports `created: false`.
pub async fn subscribe(
    state: &SharedState,
    request: RegionSubscriptionRequest,
) -> Result<RegionSubscriptionResponse, ServiceError> {
    let store = state.require_match_store().await?;

    if store.find_user(request.user_id).await?.is_none() {
        return Err(ServiceError::NotFound(format!(
            "user `{}` not found",
            request.user_id
        )));
    }

    let created = store
        .insert_subscription(RegionSubscriptionEntity {
            user_id: request.user_id,
            city: request.city.clone(),
        })
        .await?;

    Ok(RegionSubscriptionResponse {
        user_id: request.user_id,
        city: request.city,
        created,
    })
}

/// Remove a (user, city) subscription. Returns whether anything was removed.
pub async fn unsubscribe(
    state: &SharedState,
    user_id: Uuid,
    city: String,
) -> Result<bool, ServiceError> {
    let store = state.require_match_store().await?;
    Ok(store.remove_subscription(user_id, city).await?)
}

/// Resolve the deduplicated set of users subscribed to `city`, excluding the
/// acting user. City matching is case-insensitive. An empty result means
/// nobody to notify, which is a normal outcome, not a failure.
pub async fn resolve_recipients(
    store: &Arc<dyn MatchStore>,
    city: &str,
    exclude: Uuid,
) -> Result<Vec<Uuid>, ServiceError> {
    let subscriptions = store.find_subscriptions(city.to_string()).await?;

    let mut seen = HashSet::new();
    let recipients = subscriptions
        .into_iter()
        .map(|subscription| subscription.user_id)
        .filter(|user_id| *user_id != exclude && seen.insert(*user_id))
        .collect();

    Ok(recipients)
}

#[cfg(test)]
mod tests {
    use std::time::SystemTime;

    use super::*;
    use crate::dao::match_store::memory::MemoryStore;
    use crate::dao::models::UserEntity;
    use crate::services::push_service;
    use crate::state::AppState;

    async fn seeded_state() -> (SharedState, Uuid) {
        let (dispatcher, _queue) = push_service::channel(4);
        let state = AppState::new(dispatcher, 8);
        let store = MemoryStore::new();
        let user_id = Uuid::new_v4();
        store
            .insert_user(UserEntity {
                id: user_id,
                name: "Ana".into(),
                email: "ana@example.com".into(),
                phone: None,
                device_token: None,
                created_at: SystemTime::now(),
                updated_at: SystemTime::now(),
            })
            .await
            .unwrap();
        state.install_match_store(Arc::new(store)).await;
        (state, user_id)
    }

    #[tokio::test]
    async fn city_matching_is_case_insensitive() {
        let (state, user_id) = seeded_state().await;
        subscribe(
            &state,
            RegionSubscriptionRequest {
                user_id,
                city: "Brasilia".into(),
            },
        )
        .await
        .unwrap();

        let store = state.match_store().await.unwrap();
        let recipients = resolve_recipients(&store, "brasilia", Uuid::new_v4())
            .await
            .unwrap();
        assert_eq!(recipients, vec![user_id]);
    }

    #[tokio::test]
    async fn actor_is_excluded_from_recipients() {
        let (state, user_id) = seeded_state().await;
        subscribe(
            &state,
            RegionSubscriptionRequest {
                user_id,
                city: "Brasilia".into(),
            },
        )
        .await
        .unwrap();

        let store = state.match_store().await.unwrap();
        let recipients = resolve_recipients(&store, "Brasilia", user_id).await.unwrap();
        assert!(recipients.is_empty());
    }

    #[tokio::test]
    async fn resubscribe_reports_existing_pair() {
        let (state, user_id) = seeded_state().await;
        let request = || RegionSubscriptionRequest {
            user_id,
            city: "Goiania".into(),
        };

        let first = subscribe(&state, request()).await.unwrap();
        assert!(first.created);
        let second = subscribe(&state, request()).await.unwrap();
        assert!(!second.created);
    }

    #[tokio::test]
    async fn subscribe_unknown_user_is_not_found() {
        let (state, _user_id) = seeded_state().await;
        let err = subscribe(
            &state,
            RegionSubscriptionRequest {
                user_id: Uuid::new_v4(),
                city: "Brasilia".into(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn no_subscribers_resolves_to_empty_set() {
        let (state, _user_id) = seeded_state().await;
        let store = state.match_store().await.unwrap();
        let recipients = resolve_recipients(&store, "nowhere", Uuid::new_v4())
            .await
            .unwrap();
        assert!(recipients.is_empty());
    }
}
