//! Coupon API models

use serde::{Deserialize, Serialize};

use crate::api::error::{ApiError, ApiResult};
use crate::api::middleware::validation::{parse_field, validate_non_negative, validate_not_empty};
use crate::db::models::Coupon;
use crate::domain::ServiceType;
use crate::CouponRejection;

/// Request to create a coupon
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateCouponRequest {
    pub code: String,

    /// `percent` or `fixed`
    pub discount_type: String,
    pub discount_value: f64,
    pub max_discount: Option<f64>,
    pub active: Option<bool>,

    /// RFC 3339 timestamp or a bare `YYYY-MM-DD` date
    pub valid_from: Option<String>,
    pub valid_until: Option<String>,
    pub usage_limit: Option<i64>,
    pub minimum_order: Option<f64>,

    /// Empty means any service type
    #[serde(default)]
    pub service_types: Vec<String>,
    #[serde(default)]
    pub first_order_only: bool,
    #[serde(default)]
    pub one_per_customer: bool,
}

impl CreateCouponRequest {
    pub fn validate(&self) -> ApiResult<()> {
        validate_not_empty(&self.code, "code")?;
        if self.code.trim().contains(char::is_whitespace) {
            return Err(ApiError::ValidationError(
                "code cannot contain whitespace".to_string(),
            ));
        }
        match self.discount_type.as_str() {
            "percent" => {
                if self.discount_value > 100.0 {
                    return Err(ApiError::ValidationError(
                        "percent discount cannot exceed 100".to_string(),
                    ));
                }
            }
            "fixed" => {}
            _ => {
                return Err(ApiError::BadRequest(
                    "Invalid discount_type. Must be: percent or fixed".to_string(),
                ))
            }
        }
        validate_non_negative(self.discount_value, "discount_value")?;
        if let Some(max) = self.max_discount {
            validate_non_negative(max, "max_discount")?;
        }
        if let Some(min) = self.minimum_order {
            validate_non_negative(min, "minimum_order")?;
        }
        if matches!(self.usage_limit, Some(limit) if limit < 0) {
            return Err(ApiError::ValidationError(
                "usage_limit must be a non-negative number".to_string(),
            ));
        }
        for service_type in &self.service_types {
            parse_field::<ServiceType>(service_type, "service_types")?;
        }
        Ok(())
    }

    pub fn into_coupon(self, id: String) -> ApiResult<Coupon> {
        let service_types = self
            .service_types
            .iter()
            .map(|s| parse_field::<ServiceType>(s, "service_types").map(|st| st.as_str()))
            .collect::<ApiResult<Vec<_>>>()?
            .join(",");

        let mut coupon = Coupon::new(
            id,
            self.code.trim().to_string(),
            &self.discount_type,
            self.discount_value,
        );
        coupon.max_discount = self.max_discount;
        coupon.active = self.active.unwrap_or(true);
        coupon.valid_from = self.valid_from;
        coupon.valid_until = self.valid_until;
        coupon.usage_limit = self.usage_limit;
        coupon.minimum_order = self.minimum_order;
        coupon.service_types = service_types;
        coupon.first_order_only = self.first_order_only;
        coupon.one_per_customer = self.one_per_customer;
        Ok(coupon)
    }
}

/// Dry-run of a coupon against an order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateCouponRequest {
    pub code: String,
    pub amount: f64,
    pub service_type: String,

    /// Enables the first-order and once-per-customer checks
    pub customer_id: Option<String>,
}

impl ValidateCouponRequest {
    pub fn validate(&self) -> ApiResult<ServiceType> {
        validate_not_empty(&self.code, "code")?;
        validate_non_negative(self.amount, "amount")?;
        parse_field::<ServiceType>(&self.service_type, "service_type")
    }
}

/// Outcome of a coupon dry-run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateCouponResponse {
    pub valid: bool,

    /// Machine-readable rejection code when invalid
    pub reason: Option<String>,

    /// Human-readable rejection message when invalid
    pub message: Option<String>,
    pub discount: f64,
}

impl ValidateCouponResponse {
    pub fn accepted(discount: f64) -> Self {
        Self {
            valid: true,
            reason: None,
            message: None,
            discount,
        }
    }

    pub fn rejected(rejection: CouponRejection) -> Self {
        Self {
            valid: false,
            reason: Some(rejection.code().to_string()),
            message: Some(rejection.to_string()),
            discount: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CreateCouponRequest {
        CreateCouponRequest {
            code: "WELCOME10".into(),
            discount_type: "percent".into(),
            discount_value: 10.0,
            service_types: vec!["Translation".into(), "onsite".into()],
            ..Default::default()
        }
    }

    #[test]
    fn test_coupon_validation() {
        assert!(request().validate().is_ok());

        let mut bad = request();
        bad.discount_value = 150.0;
        assert!(bad.validate().is_err());

        let mut bad = request();
        bad.discount_type = "bogo".into();
        assert!(bad.validate().is_err());

        let mut bad = request();
        bad.service_types = vec!["courier".into()];
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_into_coupon_normalizes_service_types() {
        let coupon = request().into_coupon("cp-1".into()).unwrap();
        assert_eq!(coupon.service_types, "translation,onsite");
        assert!(coupon.active);
        assert_eq!(coupon.usage_count, 0);
    }

    #[test]
    fn test_rejected_response() {
        let resp = ValidateCouponResponse::rejected(CouponRejection::Expired);
        assert!(!resp.valid);
        assert_eq!(resp.reason.as_deref(), Some("expired"));
        assert_eq!(resp.discount, 0.0);
    }
}
