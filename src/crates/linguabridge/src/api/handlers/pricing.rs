//! Pricing rule endpoint handlers

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use crate::api::{
    error::{ApiError, ApiResult},
    middleware::validation::validate_pagination,
    models::{
        CreatePricingRuleRequest, EstimateRequest, PageQuery, UpdatePricingRuleRequest,
        MAX_PER_PAGE,
    },
    response,
    routes::AppState,
};
use crate::db::models::PricingRule;
use crate::db::repositories::PricingRuleRepository;
use crate::db::DatabasePool;
use crate::services::pricing::{self, RuleQuery};

async fn load_rule(pool: &DatabasePool, id: &str) -> ApiResult<PricingRule> {
    PricingRuleRepository::get_by_id(pool, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Pricing rule {} not found", id)))
}

/// Create a pricing rule
///
/// POST /api/v1/pricing-rules
pub async fn create_pricing_rule(
    State(app_state): State<AppState>,
    Json(req): Json<CreatePricingRuleRequest>,
) -> ApiResult<impl axum::response::IntoResponse> {
    req.validate()?;

    let rule = req.into_rule(Uuid::new_v4().to_string())?;
    let created = PricingRuleRepository::create(app_state.db.pool(), &rule).await?;

    tracing::info!(
        "Created pricing rule {} ({} {} -> {})",
        created.id,
        created.service_type,
        created.source_language,
        created.target_language.as_deref().unwrap_or("*")
    );
    Ok(response::created(created))
}

/// List pricing rules
///
/// GET /api/v1/pricing-rules
pub async fn list_pricing_rules(
    State(app_state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> ApiResult<impl axum::response::IntoResponse> {
    validate_pagination(query.page(), query.per_page(), MAX_PER_PAGE)?;

    let rules = PricingRuleRepository::list(app_state.db.pool()).await?;
    Ok(response::paginated(rules, query.page(), query.per_page()))
}

/// Get a pricing rule
///
/// GET /api/v1/pricing-rules/:id
pub async fn get_pricing_rule(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl axum::response::IntoResponse> {
    let rule = load_rule(app_state.db.pool(), &id).await?;
    Ok(response::ok(rule))
}

/// Update a pricing rule
///
/// PUT /api/v1/pricing-rules/:id
pub async fn update_pricing_rule(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdatePricingRuleRequest>,
) -> ApiResult<impl axum::response::IntoResponse> {
    if !req.has_updates() {
        return Err(ApiError::BadRequest("No fields to update".to_string()));
    }
    req.validate()?;

    let pool = app_state.db.pool();
    let mut rule = load_rule(pool, &id).await?;
    req.apply_to(&mut rule);
    PricingRuleRepository::update(pool, &rule).await?;

    tracing::info!("Updated pricing rule: {}", id);
    Ok(response::ok(rule))
}

/// Delete a pricing rule
///
/// DELETE /api/v1/pricing-rules/:id
pub async fn delete_pricing_rule(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl axum::response::IntoResponse> {
    let deleted = PricingRuleRepository::delete(app_state.db.pool(), &id).await?;
    if deleted == 0 {
        return Err(ApiError::NotFound(format!("Pricing rule {} not found", id)));
    }

    tracing::info!("Deleted pricing rule: {}", id);
    Ok(response::no_content())
}

/// Price a prospective job with the most specific active rule
///
/// POST /api/v1/pricing/estimate
pub async fn estimate_price(
    State(app_state): State<AppState>,
    Json(req): Json<EstimateRequest>,
) -> ApiResult<impl axum::response::IntoResponse> {
    let service_type = req.validate()?;

    let source = req.source_language.trim().to_ascii_lowercase();
    let target = req.target_language.trim().to_ascii_lowercase();
    let state = req.state.as_deref().map(|s| s.trim().to_ascii_uppercase());
    let query = RuleQuery {
        source_language: &source,
        target_language: &target,
        service_type,
        state: state.as_deref(),
    };

    let estimate = pricing::estimate(app_state.db.pool(), &query, req.word_count).await?;
    Ok(response::ok(estimate))
}
