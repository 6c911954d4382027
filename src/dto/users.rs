use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::dao::models::UserEntity;

/// Payload used to register a new user.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, max = 80))]
    /// Display name.
    pub name: String,
    #[validate(email)]
    /// Unique email address.
    pub email: String,
    #[serde(default)]
    /// Optional contact phone number.
    pub phone: Option<String>,
}

/// Public projection of a user. The push token never leaves the backend.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserSummary {
    /// User identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Contact phone number, if given.
    pub phone: Option<String>,
}

impl From<UserEntity> for UserSummary {
    fn from(entity: UserEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            email: entity.email,
            phone: entity.phone,
        }
    }
}

/// Payload binding a push delivery token to a user.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct DeviceTokenRequest {
    #[validate(length(min = 1))]
    /// Opaque device token issued by the push provider.
    pub token: String,
}
