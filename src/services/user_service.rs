//! User registration and device-token management.

use std::time::SystemTime;

use tracing::info;
use uuid::Uuid;

use crate::{
    dao::models::UserEntity,
    dto::users::{CreateUserRequest, UserSummary},
    error::ServiceError,
    state::SharedState,
};

/// Register a new user. Emails are unique across the system.
pub async fn create_user(
    state: &SharedState,
    request: CreateUserRequest,
) -> Result<UserSummary, ServiceError> {
    let store = state.require_match_store().await?;

    if store
        .find_user_by_email(request.email.clone())
        .await?
        .is_some()
    {
        return Err(ServiceError::Conflict(format!(
            "email `{}` is already registered",
            request.email
        )));
    }

    let now = SystemTime::now();
    let entity = UserEntity {
        id: Uuid::new_v4(),
        name: request.name,
        email: request.email,
        phone: request.phone,
        device_token: None,
        created_at: now,
        updated_at: now,
    };
    store.insert_user(entity.clone()).await?;

    Ok(entity.into())
}

/// List every registered user.
pub async fn list_users(state: &SharedState) -> Result<Vec<UserSummary>, ServiceError> {
    let store = state.require_match_store().await?;
    let users = store.list_users().await?;
    Ok(users.into_iter().map(Into::into).collect())
}

/// Bind a push delivery token to a user. Tokens are single-owner: if another
/// user currently holds this token, they lose it (last write wins).
pub async fn register_device_token(
    state: &SharedState,
    user_id: Uuid,
    token: String,
) -> Result<(), ServiceError> {
    let store = state.require_match_store().await?;

    let bound = store.set_device_token(user_id, token).await?;
    if !bound {
        return Err(ServiceError::NotFound(format!("user `{user_id}` not found")));
    }

    info!(%user_id, "device token registered");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::dao::match_store::memory::MemoryStore;
    use crate::services::push_service;
    use crate::state::AppState;

    async fn fresh_state() -> SharedState {
        let (dispatcher, _queue) = push_service::channel(4);
        let state = AppState::new(dispatcher, 8);
        state.install_match_store(Arc::new(MemoryStore::new())).await;
        state
    }

    #[tokio::test]
    async fn duplicate_email_is_a_conflict() {
        let state = fresh_state().await;
        let request = || CreateUserRequest {
            name: "Ana".into(),
            email: "ana@example.com".into(),
            phone: None,
        };

        create_user(&state, request()).await.unwrap();
        let err = create_user(&state, request()).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
    }

    #[tokio::test]
    async fn token_registration_requires_an_existing_user() {
        let state = fresh_state().await;
        let err = register_device_token(&state, Uuid::new_v4(), "tok".into())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }
}
