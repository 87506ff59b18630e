//! Coupon models

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::domain::ServiceType;

/// Discount code
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Coupon {
    pub id: String,

    /// Code typed by the customer, matched case-insensitively
    pub code: String,

    /// `percent` or `fixed`
    pub discount_type: String,

    pub discount_value: f64,

    /// Upper bound for percent discounts
    pub max_discount: Option<f64>,

    pub active: bool,
    pub valid_from: Option<String>,
    pub valid_until: Option<String>,
    pub usage_limit: Option<i64>,
    pub usage_count: i64,
    pub minimum_order: Option<f64>,

    /// Comma separated service types; empty means any
    pub service_types: String,

    pub first_order_only: bool,
    pub one_per_customer: bool,
    pub created_at: String,
}

impl Coupon {
    /// Create an active, unrestricted coupon
    pub fn new(id: String, code: String, discount_type: &str, discount_value: f64) -> Self {
        Self {
            id,
            code,
            discount_type: discount_type.to_string(),
            discount_value,
            max_discount: None,
            active: true,
            valid_from: None,
            valid_until: None,
            usage_limit: None,
            usage_count: 0,
            minimum_order: None,
            service_types: String::new(),
            first_order_only: false,
            one_per_customer: false,
            created_at: crate::db::now_timestamp(),
        }
    }

    /// Parsed service type restriction; unknown entries are ignored
    pub fn allowed_service_types(&self) -> Vec<ServiceType> {
        self.service_types
            .split(',')
            .filter_map(|s| s.parse().ok())
            .collect()
    }
}

/// One use of a coupon on a quote
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CouponRedemption {
    pub id: String,
    pub coupon_id: String,
    pub customer_id: String,
    pub quote_id: String,
    pub amount: f64,
    pub created_at: String,
}
