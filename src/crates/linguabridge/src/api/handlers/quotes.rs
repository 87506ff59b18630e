//! Quote endpoint handlers

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;

use crate::api::{
    error::{ApiError, ApiResult},
    middleware::validation::{parse_field, validate_pagination},
    models::{CreateQuoteRequest, QuoteListQuery, QuoteStatusRequest, DEFAULT_PER_PAGE, MAX_PER_PAGE},
    response,
    routes::AppState,
};
use crate::db::repositories::QuoteRepository;
use crate::domain::QuoteStatus;
use crate::services::quotes;

/// Create a quote
///
/// POST /api/v1/quotes
pub async fn create_quote(
    State(app_state): State<AppState>,
    Json(req): Json<CreateQuoteRequest>,
) -> ApiResult<impl axum::response::IntoResponse> {
    req.validate()?;

    let new_quote = req.into_new_quote()?;
    let created = quotes::create_quote(app_state.db.pool(), new_quote, Utc::now()).await?;

    tracing::info!("Created quote {} for {}", created.quote_number, created.total);
    Ok(response::created(created))
}

/// List quotes, newest first
///
/// GET /api/v1/quotes
pub async fn list_quotes(
    State(app_state): State<AppState>,
    Query(query): Query<QuoteListQuery>,
) -> ApiResult<impl axum::response::IntoResponse> {
    let page = query.page.unwrap_or(0);
    let per_page = query.per_page.unwrap_or(DEFAULT_PER_PAGE);
    validate_pagination(page, per_page, MAX_PER_PAGE)?;

    let status = query
        .status
        .as_deref()
        .map(|s| parse_field::<QuoteStatus>(s, "status"))
        .transpose()?;

    let quotes = QuoteRepository::list(
        app_state.db.pool(),
        status.map(|s| s.as_str()),
        query.customer_id.as_deref(),
    )
    .await?;
    Ok(response::paginated(quotes, page, per_page))
}

/// Get a quote
///
/// GET /api/v1/quotes/:id
pub async fn get_quote(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl axum::response::IntoResponse> {
    let quote = QuoteRepository::get_by_id(app_state.db.pool(), &id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Quote {} not found", id)))?;
    Ok(response::ok(quote))
}

/// Move a quote through its workflow
///
/// POST /api/v1/quotes/:id/status
///
/// The response carries the invoice or project created by the change.
pub async fn update_quote_status(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<QuoteStatusRequest>,
) -> ApiResult<impl axum::response::IntoResponse> {
    let next = req.parse()?;

    let outcome = quotes::transition_quote(
        app_state.db.pool(),
        app_state.mailer.as_ref(),
        &id,
        next,
        Utc::now(),
    )
    .await?;
    Ok(response::ok(outcome))
}
