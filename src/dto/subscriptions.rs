use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use crate::dto::validation::validate_city;

/// Payload used to subscribe or unsubscribe a user to a city feed.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RegionSubscriptionRequest {
    /// Subscribing user.
    pub user_id: Uuid,
    /// City of interest; matching is case-insensitive.
    pub city: String,
}

impl Validate for RegionSubscriptionRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if let Err(err) = validate_city(&self.city) {
            errors.add("city", err);
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Outcome of a subscribe call.
#[derive(Debug, Serialize, ToSchema)]
pub struct RegionSubscriptionResponse {
    /// Subscribed user.
    pub user_id: Uuid,
    /// City as submitted.
    pub city: String,
    /// `false` when the (user, city) pair was already subscribed.
    pub created: bool,
}
