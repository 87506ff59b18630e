//! System information endpoint handler

use axum::extract::State;

use crate::api::error::ApiResult;
use crate::api::models::SystemInfoResponse;
use crate::api::response;
use crate::api::routes::AppState;
use crate::db::repositories::QuoteRepository;
use crate::domain::QuoteStatus;

/// Get system information
///
/// GET /api/v1/system/info
pub async fn system_info(
    State(app_state): State<AppState>,
) -> ApiResult<impl axum::response::IntoResponse> {
    let pool = app_state.db.pool();
    let open_quotes = QuoteRepository::count_by_status(pool, QuoteStatus::Sent.as_str()).await?;
    let unpaid_quotes = QuoteRepository::count_by_status(pool, QuoteStatus::Invoiced.as_str()).await?;

    let info = SystemInfoResponse {
        version: crate::version::VERSION.to_string(),
        build_timestamp: crate::version::BUILD_TIMESTAMP.to_string(),
        git_commit: crate::version::GIT_COMMIT.to_string(),
        rust_version: env!("CARGO_PKG_RUST_VERSION").to_string(),
        open_quotes,
        unpaid_quotes,
    };
    Ok(response::ok(info))
}
