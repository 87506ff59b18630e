//! Pricing rule API models

use serde::{Deserialize, Serialize};

use crate::api::error::{ApiError, ApiResult};
use crate::api::middleware::validation::{parse_field, validate_non_negative, validate_not_empty};
use crate::db::models::PricingRule;
use crate::domain::ServiceType;

const UNITS: [&str; 4] = ["per_word", "per_hour", "per_page", "flat"];

fn validate_unit(unit: &str) -> ApiResult<()> {
    if !UNITS.contains(&unit) {
        return Err(ApiError::BadRequest(
            "Invalid unit. Must be: per_word, per_hour, per_page, or flat".to_string(),
        ));
    }
    Ok(())
}

fn normalize_code(code: &str) -> String {
    code.trim().to_ascii_lowercase()
}

/// Request to create a pricing rule
///
/// `target_language` and `state` left out act as wildcards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePricingRuleRequest {
    pub name: String,
    pub source_language: String,
    pub target_language: Option<String>,
    pub service_type: String,
    pub state: Option<String>,
    pub unit: Option<String>,
    pub rate: f64,
    pub minimum_charge: Option<f64>,
    pub active: Option<bool>,
}

impl CreatePricingRuleRequest {
    pub fn validate(&self) -> ApiResult<()> {
        validate_not_empty(&self.name, "name")?;
        validate_not_empty(&self.source_language, "source_language")?;
        parse_field::<ServiceType>(&self.service_type, "service_type")?;
        if let Some(ref unit) = self.unit {
            validate_unit(unit)?;
        }
        validate_non_negative(self.rate, "rate")?;
        if let Some(min) = self.minimum_charge {
            validate_non_negative(min, "minimum_charge")?;
        }
        Ok(())
    }

    pub fn into_rule(self, id: String) -> ApiResult<PricingRule> {
        let service_type = parse_field::<ServiceType>(&self.service_type, "service_type")?;
        let now = crate::db::now_timestamp();
        Ok(PricingRule {
            id,
            name: self.name.trim().to_string(),
            source_language: normalize_code(&self.source_language),
            target_language: self.target_language.as_deref().map(normalize_code),
            service_type: service_type.as_str().to_string(),
            state: self.state.map(|s| s.trim().to_ascii_uppercase()),
            unit: self.unit.unwrap_or_else(|| "per_word".to_string()),
            rate: self.rate,
            minimum_charge: self.minimum_charge.unwrap_or(0.0),
            active: self.active.unwrap_or(true),
            created_at: now.clone(),
            updated_at: now,
        })
    }
}

/// Request to update a pricing rule; absent fields are left alone
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePricingRuleRequest {
    pub name: Option<String>,
    pub unit: Option<String>,
    pub rate: Option<f64>,
    pub minimum_charge: Option<f64>,
    pub active: Option<bool>,
}

impl UpdatePricingRuleRequest {
    pub fn has_updates(&self) -> bool {
        self.name.is_some()
            || self.unit.is_some()
            || self.rate.is_some()
            || self.minimum_charge.is_some()
            || self.active.is_some()
    }

    pub fn validate(&self) -> ApiResult<()> {
        if let Some(ref name) = self.name {
            validate_not_empty(name, "name")?;
        }
        if let Some(ref unit) = self.unit {
            validate_unit(unit)?;
        }
        if let Some(rate) = self.rate {
            validate_non_negative(rate, "rate")?;
        }
        if let Some(min) = self.minimum_charge {
            validate_non_negative(min, "minimum_charge")?;
        }
        Ok(())
    }

    pub fn apply_to(self, rule: &mut PricingRule) {
        if let Some(name) = self.name {
            rule.name = name.trim().to_string();
        }
        if let Some(unit) = self.unit {
            rule.unit = unit;
        }
        if let Some(rate) = self.rate {
            rule.rate = rate;
        }
        if let Some(min) = self.minimum_charge {
            rule.minimum_charge = min;
        }
        if let Some(active) = self.active {
            rule.active = active;
        }
        rule.updated_at = crate::db::now_timestamp();
    }
}

/// Price lookup for a prospective job
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstimateRequest {
    pub source_language: String,
    pub target_language: String,
    pub service_type: String,
    pub state: Option<String>,
    #[serde(default)]
    pub word_count: i64,
}

impl EstimateRequest {
    pub fn validate(&self) -> ApiResult<ServiceType> {
        validate_not_empty(&self.source_language, "source_language")?;
        validate_not_empty(&self.target_language, "target_language")?;
        if self.word_count < 0 {
            return Err(ApiError::ValidationError(
                "word_count must be a non-negative number".to_string(),
            ));
        }
        parse_field::<ServiceType>(&self.service_type, "service_type")
    }
}
