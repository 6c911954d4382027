//! Validation helpers for DTOs.

use validator::ValidationError;

/// Validates a city name: non-blank after trimming and at most 80 characters.
pub fn validate_city(city: &str) -> Result<(), ValidationError> {
    if city.trim().is_empty() {
        let mut err = ValidationError::new("city_blank");
        err.message = Some("City must not be blank".into());
        return Err(err);
    }

    if city.chars().count() > 80 {
        let mut err = ValidationError::new("city_length");
        err.message = Some("City must be at most 80 characters".into());
        return Err(err);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_city_valid() {
        assert!(validate_city("Brasilia").is_ok());
        assert!(validate_city("Rio de Janeiro").is_ok());
        assert!(validate_city("São Paulo").is_ok());
    }

    #[test]
    fn test_validate_city_blank() {
        assert!(validate_city("").is_err());
        assert!(validate_city("   ").is_err());
        assert!(validate_city("\t").is_err());
    }

    #[test]
    fn test_validate_city_too_long() {
        let long = "a".repeat(81);
        assert!(validate_city(&long).is_err());
        let just_fits = "a".repeat(80);
        assert!(validate_city(&just_fits).is_ok());
    }
}
