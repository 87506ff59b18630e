//! Invoice endpoint handlers

use axum::extract::{Path, Query, State};

use crate::api::{
    error::{ApiError, ApiResult},
    middleware::validation::validate_pagination,
    models::{InvoiceListQuery, DEFAULT_PER_PAGE, MAX_PER_PAGE},
    response,
    routes::AppState,
};
use crate::db::repositories::InvoiceRepository;

const INVOICE_STATUSES: [&str; 3] = ["unpaid", "paid", "void"];

/// List invoices
///
/// GET /api/v1/invoices
pub async fn list_invoices(
    State(app_state): State<AppState>,
    Query(query): Query<InvoiceListQuery>,
) -> ApiResult<impl axum::response::IntoResponse> {
    let page = query.page.unwrap_or(0);
    let per_page = query.per_page.unwrap_or(DEFAULT_PER_PAGE);
    validate_pagination(page, per_page, MAX_PER_PAGE)?;

    if let Some(ref status) = query.status {
        if !INVOICE_STATUSES.contains(&status.as_str()) {
            return Err(ApiError::BadRequest(
                "Invalid status. Must be: unpaid, paid, or void".to_string(),
            ));
        }
    }

    let invoices = InvoiceRepository::list(app_state.db.pool(), query.status.as_deref()).await?;
    Ok(response::paginated(invoices, page, per_page))
}

/// Get an invoice
///
/// GET /api/v1/invoices/:id
pub async fn get_invoice(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl axum::response::IntoResponse> {
    let invoice = InvoiceRepository::get_by_id(app_state.db.pool(), &id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Invoice {} not found", id)))?;
    Ok(response::ok(invoice))
}
