use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::{dao::models::FieldEntity, dto::validation::validate_city};

/// Payload used to register a new field.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateFieldRequest {
    /// Display name of the field.
    pub name: String,
    /// Street address.
    pub address: String,
    /// City the field is located in; drives region fan-out.
    pub city: String,
    /// State / province.
    pub state: String,
}

impl Validate for CreateFieldRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if self.name.trim().is_empty() || self.name.chars().count() > 120 {
            let mut err = ValidationError::new("name_length");
            err.message = Some("Field name must be 1 to 120 characters".into());
            errors.add("name", err);
        }

        if self.address.trim().is_empty() {
            let mut err = ValidationError::new("address_blank");
            err.message = Some("Address must not be blank".into());
            errors.add("address", err);
        }

        if let Err(err) = validate_city(&self.city) {
            errors.add("city", err);
        }

        if self.state.trim().is_empty() || self.state.chars().count() > 80 {
            let mut err = ValidationError::new("state_length");
            err.message = Some("State must be 1 to 80 characters".into());
            errors.add("state", err);
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Public projection of a field.
#[derive(Debug, Serialize, ToSchema)]
pub struct FieldSummary {
    /// Field identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Street address.
    pub address: String,
    /// City.
    pub city: String,
    /// State / province.
    pub state: String,
}

impl From<FieldEntity> for FieldSummary {
    fn from(entity: FieldEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            address: entity.address,
            city: entity.city,
            state: entity.state,
        }
    }
}
