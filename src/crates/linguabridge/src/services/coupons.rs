//! Coupon validation, discount calculation and redemption

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::Serialize;
use sqlx::SqliteConnection;
use std::fmt;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::db::models::{Coupon, CouponRedemption};
use crate::db::repositories::{CouponRepository, QuoteRepository};
use crate::domain::ServiceType;
use crate::services::format::round_cents;
use crate::{LinguabridgeError, Result};

/// Why a coupon cannot be applied; validation reports the first that holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CouponRejection {
    Inactive,
    NotYetValid,
    Expired,
    UsageLimitReached,
    BelowMinimumOrder,
    WrongServiceType,
    FirstOrderOnly,
    AlreadyUsedByCustomer,
}

impl CouponRejection {
    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            CouponRejection::Inactive => "inactive",
            CouponRejection::NotYetValid => "not_yet_valid",
            CouponRejection::Expired => "expired",
            CouponRejection::UsageLimitReached => "usage_limit_reached",
            CouponRejection::BelowMinimumOrder => "below_minimum_order",
            CouponRejection::WrongServiceType => "wrong_service_type",
            CouponRejection::FirstOrderOnly => "first_order_only",
            CouponRejection::AlreadyUsedByCustomer => "already_used_by_customer",
        }
    }
}

impl fmt::Display for CouponRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            CouponRejection::Inactive => "coupon is not active",
            CouponRejection::NotYetValid => "coupon is not valid yet",
            CouponRejection::Expired => "coupon has expired",
            CouponRejection::UsageLimitReached => "coupon usage limit reached",
            CouponRejection::BelowMinimumOrder => "order is below the coupon minimum",
            CouponRejection::WrongServiceType => "coupon does not apply to this service",
            CouponRejection::FirstOrderOnly => "coupon is only valid on a first order",
            CouponRejection::AlreadyUsedByCustomer => "coupon already used by this customer",
        };
        f.write_str(message)
    }
}

/// Facts about the order a coupon is being applied to
#[derive(Debug, Clone)]
pub struct CouponContext {
    pub now: DateTime<Utc>,
    pub order_amount: f64,
    pub service_type: ServiceType,

    /// Quotes the customer has already been invoiced for
    pub prior_billed_quotes: i64,

    /// Whether the customer has redeemed this coupon before
    pub already_redeemed: bool,
}

/// Start of a validity window; bare dates start at midnight UTC
fn window_start(value: &str) -> Option<DateTime<Utc>> {
    parse_bound(value, NaiveTime::MIN)
}

/// End of a validity window; bare dates run through the end of the day
fn window_end(value: &str) -> Option<DateTime<Utc>> {
    parse_bound(value, NaiveTime::from_hms_opt(23, 59, 59)?)
}

fn parse_bound(value: &str, time_of_day: NaiveTime) -> Option<DateTime<Utc>> {
    if let Ok(at) = DateTime::parse_from_rfc3339(value) {
        return Some(at.with_timezone(&Utc));
    }
    match NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        Ok(date) => Some(date.and_time(time_of_day).and_utc()),
        Err(_) => {
            warn!("Ignoring unparsable coupon date: {}", value);
            None
        }
    }
}

/// Check a coupon against an order
pub fn validate_coupon(coupon: &Coupon, ctx: &CouponContext) -> std::result::Result<(), CouponRejection> {
    if !coupon.active {
        return Err(CouponRejection::Inactive);
    }
    if let Some(start) = coupon.valid_from.as_deref().and_then(window_start) {
        if ctx.now < start {
            return Err(CouponRejection::NotYetValid);
        }
    }
    if let Some(end) = coupon.valid_until.as_deref().and_then(window_end) {
        if ctx.now > end {
            return Err(CouponRejection::Expired);
        }
    }
    if let Some(limit) = coupon.usage_limit {
        if coupon.usage_count >= limit {
            return Err(CouponRejection::UsageLimitReached);
        }
    }
    if let Some(minimum) = coupon.minimum_order {
        if ctx.order_amount < minimum {
            return Err(CouponRejection::BelowMinimumOrder);
        }
    }
    let allowed = coupon.allowed_service_types();
    if !allowed.is_empty() && !allowed.contains(&ctx.service_type) {
        return Err(CouponRejection::WrongServiceType);
    }
    if coupon.first_order_only && ctx.prior_billed_quotes > 0 {
        return Err(CouponRejection::FirstOrderOnly);
    }
    if coupon.one_per_customer && ctx.already_redeemed {
        return Err(CouponRejection::AlreadyUsedByCustomer);
    }
    Ok(())
}

/// Discount a coupon grants on `amount`, never more than the amount itself
pub fn discount_for(coupon: &Coupon, amount: f64) -> f64 {
    let raw = match coupon.discount_type.as_str() {
        "percent" => {
            let pct = amount * coupon.discount_value / 100.0;
            match coupon.max_discount {
                Some(cap) => pct.min(cap),
                None => pct,
            }
        }
        _ => coupon.discount_value,
    };
    round_cents(raw.clamp(0.0, amount.max(0.0)))
}

/// A coupon that passed validation, with the discount it grants
#[derive(Debug, Clone, Serialize)]
pub struct AppliedCoupon {
    pub coupon: Coupon,
    pub discount: f64,
}

/// Look a coupon up by code and validate it for a customer's order
///
/// Without a customer the first-order and once-per-customer checks pass.
pub async fn check_coupon(
    conn: &mut SqliteConnection,
    code: &str,
    customer_id: Option<&str>,
    order_amount: f64,
    service_type: ServiceType,
    now: DateTime<Utc>,
) -> Result<AppliedCoupon> {
    let coupon = CouponRepository::get_by_code(&mut *conn, code)
        .await?
        .ok_or_else(|| LinguabridgeError::not_found("coupon", code))?;

    let (prior_billed_quotes, already_redeemed) = match customer_id {
        Some(customer_id) => (
            QuoteRepository::count_billed_for_customer(&mut *conn, customer_id).await?,
            CouponRepository::has_redemption(&mut *conn, &coupon.id, customer_id).await?,
        ),
        None => (0, false),
    };

    let ctx = CouponContext {
        now,
        order_amount,
        service_type,
        prior_billed_quotes,
        already_redeemed,
    };
    validate_coupon(&coupon, &ctx).map_err(|rejection| {
        debug!("Coupon {} rejected: {}", coupon.code, rejection.code());
        LinguabridgeError::CouponRejected(rejection)
    })?;

    let discount = discount_for(&coupon, order_amount);
    Ok(AppliedCoupon { coupon, discount })
}

/// Record a redemption and bump the usage counter
///
/// Run inside the caller's transaction so both writes land together.
pub async fn redeem(
    conn: &mut SqliteConnection,
    coupon: &Coupon,
    customer_id: &str,
    quote_id: &str,
    amount: f64,
) -> Result<CouponRedemption> {
    if CouponRepository::increment_usage(&mut *conn, &coupon.id).await? == 0 {
        return Err(LinguabridgeError::CouponRejected(
            CouponRejection::UsageLimitReached,
        ));
    }

    let redemption = CouponRedemption {
        id: Uuid::new_v4().to_string(),
        coupon_id: coupon.id.clone(),
        customer_id: customer_id.to_string(),
        quote_id: quote_id.to_string(),
        amount,
        created_at: crate::db::now_timestamp(),
    };
    Ok(CouponRepository::create_redemption(&mut *conn, &redemption).await?)
}
