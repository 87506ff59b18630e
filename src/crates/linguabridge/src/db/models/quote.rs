//! Quote model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Priced estimate for a job
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Quote {
    pub id: String,

    /// Human-facing number, e.g. `Q-20260105-0003`
    pub quote_number: String,

    pub customer_id: String,
    pub source_language: String,
    pub target_language: String,
    pub service_type: String,

    /// Billable units (words, hours or pages depending on the rule)
    pub word_count: i64,

    pub rate: f64,
    pub minimum_charge: f64,
    pub subtotal: f64,
    pub discount: f64,
    pub tax: f64,
    pub total: f64,
    pub coupon_code: Option<String>,

    /// Where and when an interpretation job takes place; copied onto the project
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub scheduled_at: Option<String>,

    /// One of [`crate::domain::QuoteStatus`]
    pub status: String,

    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}
