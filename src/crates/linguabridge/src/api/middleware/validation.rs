//! Request validation utilities
//!
//! Helpers shared by the request DTOs' `validate` methods.

use std::str::FromStr;

use crate::api::error::{ApiError, ApiResult};

/// Validate that a required string field is not blank
pub fn validate_not_empty(value: &str, field_name: &str) -> ApiResult<()> {
    if value.trim().is_empty() {
        return Err(ApiError::ValidationError(format!("{} cannot be empty", field_name)));
    }
    Ok(())
}

/// Validate string length constraints
pub fn validate_string_length(value: &str, field_name: &str, min: usize, max: usize) -> ApiResult<()> {
    let len = value.chars().count();
    if len < min || len > max {
        return Err(ApiError::ValidationError(format!(
            "{} must be between {} and {} characters",
            field_name, min, max
        )));
    }
    Ok(())
}

/// Loose email shape check: one `@` with text on both sides and a dot in the domain
pub fn validate_email(value: &str, field_name: &str) -> ApiResult<()> {
    let valid = match value.trim().split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && !domain.contains('@') && domain.contains('.') && !domain.ends_with('.')
        }
        None => false,
    };
    if !valid {
        return Err(ApiError::ValidationError(format!(
            "{} is not a valid email address",
            field_name
        )));
    }
    Ok(())
}

/// Money, counts and distances must not be negative
pub fn validate_non_negative(value: f64, field_name: &str) -> ApiResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(ApiError::ValidationError(format!(
            "{} must be a non-negative number",
            field_name
        )));
    }
    Ok(())
}

/// Latitude and longitude must come as a pair and lie within range
pub fn validate_coordinates(latitude: Option<f64>, longitude: Option<f64>) -> ApiResult<()> {
    match (latitude, longitude) {
        (None, None) => Ok(()),
        (Some(lat), Some(lon)) => {
            if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
                return Err(ApiError::ValidationError(
                    "coordinates out of range".to_string(),
                ));
            }
            Ok(())
        }
        _ => Err(ApiError::ValidationError(
            "latitude and longitude must be given together".to_string(),
        )),
    }
}

/// Parse an enum-like field, reporting the field name on failure
pub fn parse_field<T>(value: &str, field_name: &str) -> ApiResult<T>
where
    T: FromStr<Err = String>,
{
    value
        .parse::<T>()
        .map_err(|e| ApiError::ValidationError(format!("{}: {}", field_name, e)))
}

/// Validate pagination parameters
pub fn validate_pagination(_page: u32, per_page: u32, max_per_page: u32) -> ApiResult<()> {
    if per_page == 0 {
        return Err(ApiError::ValidationError("per_page must be greater than 0".to_string()));
    }
    if per_page > max_per_page {
        return Err(ApiError::ValidationError(format!(
            "per_page cannot exceed {}",
            max_per_page
        )));
    }
    Ok(())
}

/// Validate UUID format
pub fn validate_uuid(value: &str) -> ApiResult<uuid::Uuid> {
    uuid::Uuid::parse_str(value)
        .map_err(|_| ApiError::ValidationError(format!("Invalid UUID: {}", value)))
}
