//! Job invitation endpoint handlers
//!
//! Accept and decline are public: the token in the path is the credential.

use axum::extract::{Path, State};
use chrono::Utc;
use serde::Serialize;

use crate::api::{error::ApiResult, response, routes::AppState};
use crate::services::invitations;

/// Result of an expiry sweep
#[derive(Debug, Clone, Serialize)]
pub struct ExpireResponse {
    pub expired: u64,
}

/// Accept an invitation
///
/// POST /api/v1/invitations/:token/accept
///
/// 410 when the invitation has expired, 409 when the project is taken.
pub async fn accept_invitation(
    State(app_state): State<AppState>,
    Path(token): Path<String>,
) -> ApiResult<impl axum::response::IntoResponse> {
    let acceptance = invitations::accept(
        app_state.db.pool(),
        app_state.mailer.as_ref(),
        &token,
        Utc::now(),
    )
    .await?;
    Ok(response::ok(acceptance))
}

/// Decline an invitation
///
/// POST /api/v1/invitations/:token/decline
pub async fn decline_invitation(
    State(app_state): State<AppState>,
    Path(token): Path<String>,
) -> ApiResult<impl axum::response::IntoResponse> {
    let invitation = invitations::decline(app_state.db.pool(), &token, Utc::now()).await?;
    Ok(response::ok(invitation))
}

/// Expire every overdue pending invitation now
///
/// POST /api/v1/invitations/expire
pub async fn expire_invitations(
    State(app_state): State<AppState>,
) -> ApiResult<impl axum::response::IntoResponse> {
    let expired = invitations::expire_overdue(app_state.db.pool(), Utc::now()).await?;
    Ok(response::ok(ExpireResponse { expired }))
}
