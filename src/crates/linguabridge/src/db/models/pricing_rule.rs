//! Pricing rule model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Rate for a language pair / service type / state combination
///
/// `target_language` and `state` are wildcards when `None`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PricingRule {
    pub id: String,
    pub name: String,
    pub source_language: String,
    pub target_language: Option<String>,
    pub service_type: String,
    pub state: Option<String>,

    /// `per_word`, `per_hour`, `per_page` or `flat`
    pub unit: String,

    pub rate: f64,
    pub minimum_charge: f64,
    pub active: bool,
    pub created_at: String,
    pub updated_at: String,
}
