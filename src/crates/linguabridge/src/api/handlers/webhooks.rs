//! Payment provider webhook handler

use axum::{
    body::Bytes,
    extract::State,
    http::HeaderMap,
};
use chrono::Utc;
use serde::Serialize;

use crate::api::{
    error::{ApiError, ApiResult},
    response,
    routes::AppState,
};
use crate::services::payments::{self, PaymentEvent, WebhookOutcome, SIGNATURE_HEADER};

/// Acknowledgement returned to the provider
#[derive(Debug, Clone, Serialize)]
pub struct WebhookAck {
    pub received: bool,
    pub outcome: WebhookOutcome,
}

/// Receive a signed payment event
///
/// POST /api/v1/webhooks/payments
///
/// The signature covers the raw body, so the body is read as bytes and only
/// parsed after verification.
pub async fn payment_webhook(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<impl axum::response::IntoResponse> {
    let secret = app_state.config.get_webhook_secret().ok_or_else(|| {
        ApiError::Unavailable("payment webhook secret is not configured".to_string())
    })?;

    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::InvalidSignature(format!("missing {} header", SIGNATURE_HEADER)))?;

    payments::verify_signature(
        &secret,
        signature,
        &body,
        Utc::now().timestamp(),
        app_state.config.payments.tolerance_secs,
    )?;

    let envelope: serde_json::Value = serde_json::from_slice(&body)?;
    let event_type = envelope
        .get("type")
        .and_then(|t| t.as_str())
        .unwrap_or_default();

    let outcome = match event_type {
        "payment.succeeded" | "payment.failed" => {
            let event: PaymentEvent = serde_json::from_value(envelope)?;
            payments::handle_event(app_state.db.pool(), &event, Utc::now()).await?
        }
        other => {
            tracing::info!("Ignoring webhook event type {:?}", other);
            WebhookOutcome::Ignored
        }
    };

    Ok(response::ok(WebhookAck {
        received: true,
        outcome,
    }))
}
