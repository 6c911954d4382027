//! Field registration and listing.

use uuid::Uuid;

use crate::{
    dao::models::FieldEntity,
    dto::fields::{CreateFieldRequest, FieldSummary},
    error::ServiceError,
    state::SharedState,
};

/// Register a new field.
pub async fn create_field(
    state: &SharedState,
    request: CreateFieldRequest,
) -> Result<FieldSummary, ServiceError> {
    let store = state.require_match_store().await?;

    let entity = FieldEntity {
        id: Uuid::new_v4(),
        name: request.name,
        address: request.address,
        city: request.city,
        state: request.state,
    };
    store.insert_field(entity.clone()).await?;

    Ok(entity.into())
}

/// List every field.
pub async fn list_fields(state: &SharedState) -> Result<Vec<FieldSummary>, ServiceError> {
    let store = state.require_match_store().await?;
    let fields = store.list_fields().await?;
    Ok(fields.into_iter().map(Into::into).collect())
}
