//! Coupon endpoint handlers

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use uuid::Uuid;

use crate::api::{
    error::{ApiError, ApiResult},
    middleware::validation::validate_pagination,
    models::{
        CreateCouponRequest, PageQuery, ValidateCouponRequest, ValidateCouponResponse,
        MAX_PER_PAGE,
    },
    response,
    routes::AppState,
};
use crate::db::error::is_unique_violation;
use crate::db::repositories::CouponRepository;
use crate::services::coupons;
use crate::LinguabridgeError;

/// Create a coupon
///
/// POST /api/v1/coupons
pub async fn create_coupon(
    State(app_state): State<AppState>,
    Json(req): Json<CreateCouponRequest>,
) -> ApiResult<impl axum::response::IntoResponse> {
    req.validate()?;

    let coupon = req.into_coupon(Uuid::new_v4().to_string())?;
    let created = CouponRepository::create(app_state.db.pool(), &coupon)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                ApiError::Conflict(format!("coupon code {} already exists", coupon.code))
            } else {
                e.into()
            }
        })?;

    tracing::info!("Created coupon {}", created.code);
    Ok(response::created(created))
}

/// List coupons
///
/// GET /api/v1/coupons
pub async fn list_coupons(
    State(app_state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> ApiResult<impl axum::response::IntoResponse> {
    validate_pagination(query.page(), query.per_page(), MAX_PER_PAGE)?;

    let coupons = CouponRepository::list(app_state.db.pool()).await?;
    Ok(response::paginated(coupons, query.page(), query.per_page()))
}

/// Get a coupon
///
/// GET /api/v1/coupons/:id
pub async fn get_coupon(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl axum::response::IntoResponse> {
    let coupon = CouponRepository::get_by_id(app_state.db.pool(), &id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Coupon {} not found", id)))?;
    Ok(response::ok(coupon))
}

/// Delete a coupon
///
/// DELETE /api/v1/coupons/:id
pub async fn delete_coupon(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl axum::response::IntoResponse> {
    let deleted = CouponRepository::delete(app_state.db.pool(), &id).await?;
    if deleted == 0 {
        return Err(ApiError::NotFound(format!("Coupon {} not found", id)));
    }

    tracing::info!("Deleted coupon: {}", id);
    Ok(response::no_content())
}

/// Check a coupon against an order without redeeming it
///
/// POST /api/v1/coupons/validate
///
/// A rule failure is a normal 200 answer with `valid: false` and the reason;
/// an unknown code is a 404.
pub async fn validate_coupon(
    State(app_state): State<AppState>,
    Json(req): Json<ValidateCouponRequest>,
) -> ApiResult<impl axum::response::IntoResponse> {
    let service_type = req.validate()?;

    let mut conn = app_state.db.pool().acquire().await?;
    let result = coupons::check_coupon(
        &mut conn,
        &req.code,
        req.customer_id.as_deref(),
        req.amount,
        service_type,
        Utc::now(),
    )
    .await;

    let body = match result {
        Ok(applied) => ValidateCouponResponse::accepted(applied.discount),
        Err(LinguabridgeError::CouponRejected(rejection)) => ValidateCouponResponse::rejected(rejection),
        Err(e) => return Err(e.into()),
    };
    Ok(response::ok(body))
}
