//! Payment-provider webhook: signature check and event handling
//!
//! Signature header format: `t=<unix seconds>,v1=<hex HMAC-SHA256>` where the
//! MAC covers `"<t>.<raw body>"`.

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use tracing::{info, warn};
use uuid::Uuid;

use crate::db::models::Payment;
use crate::db::repositories::{InvoiceRepository, PaymentRepository, QuoteRepository};
use crate::db::{begin_write, timestamp, DatabasePool};
use crate::domain::QuoteStatus;
use crate::services::quotes::apply_transition;
use crate::{LinguabridgeError, Result};

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the webhook signature
pub const SIGNATURE_HEADER: &str = "x-signature";

/// Default allowed clock skew between provider and server
pub const DEFAULT_TOLERANCE_SECS: i64 = 300;

/// Hex MAC of `"<timestamp>.<body>"`
pub fn sign(secret: &str, timestamp: i64, body: &[u8]) -> Result<String> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| LinguabridgeError::InvalidSignature(e.to_string()))?;
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(body);
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Full header value for a body, as the provider would send it
pub fn signature_header(secret: &str, timestamp: i64, body: &[u8]) -> Result<String> {
    Ok(format!("t={},v1={}", timestamp, sign(secret, timestamp, body)?))
}

/// Verify a signature header against the raw request body
///
/// Any one matching `v1` entry is enough; comparison is constant time.
pub fn verify_signature(
    secret: &str,
    header: &str,
    body: &[u8],
    now_unix: i64,
    tolerance_secs: i64,
) -> Result<()> {
    let mut timestamp = None;
    let mut signatures = Vec::new();
    for part in header.split(',') {
        match part.trim().split_once('=') {
            Some(("t", value)) => timestamp = value.parse::<i64>().ok(),
            Some(("v1", value)) => signatures.push(value),
            _ => {}
        }
    }

    let timestamp = timestamp
        .ok_or_else(|| LinguabridgeError::InvalidSignature("missing timestamp".to_string()))?;
    if signatures.is_empty() {
        return Err(LinguabridgeError::InvalidSignature(
            "missing v1 signature".to_string(),
        ));
    }
    if (now_unix - timestamp).abs() > tolerance_secs {
        return Err(LinguabridgeError::InvalidSignature(
            "timestamp outside tolerance".to_string(),
        ));
    }

    for candidate in signatures {
        let Ok(expected) = hex::decode(candidate) else {
            continue;
        };
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
            .map_err(|e| LinguabridgeError::InvalidSignature(e.to_string()))?;
        mac.update(timestamp.to_string().as_bytes());
        mac.update(b".");
        mac.update(body);
        if mac.verify_slice(&expected).is_ok() {
            return Ok(());
        }
    }
    Err(LinguabridgeError::InvalidSignature(
        "signature mismatch".to_string(),
    ))
}

/// Webhook payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentEvent {
    /// Provider event id, used for idempotency
    pub id: String,

    #[serde(rename = "type")]
    pub event_type: String,

    pub data: PaymentEventData,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentEventData {
    pub quote_id: String,
    pub amount: f64,
}

/// What the webhook did with an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WebhookOutcome {
    /// Payment recorded and quote advanced to INVOICE_PAID
    Applied,
    /// Event id seen before; nothing changed
    Duplicate,
    /// Payment recorded without changing the quote
    Recorded,
    /// Event type not handled
    Ignored,
}

/// Process a verified webhook event
pub async fn handle_event(pool: &DatabasePool, event: &PaymentEvent, now: DateTime<Utc>) -> Result<WebhookOutcome> {
    match event.event_type.as_str() {
        "payment.succeeded" => record_payment(pool, event, "succeeded", now).await,
        "payment.failed" => record_payment(pool, event, "failed", now).await,
        other => {
            info!("Ignoring webhook event {} of type {}", event.id, other);
            Ok(WebhookOutcome::Ignored)
        }
    }
}

async fn record_payment(
    pool: &DatabasePool,
    event: &PaymentEvent,
    status: &str,
    now: DateTime<Utc>,
) -> Result<WebhookOutcome> {
    let mut tx = begin_write(pool).await?;

    if PaymentRepository::get_by_event(&mut *tx, &event.id).await?.is_some() {
        info!("Webhook event {} already processed", event.id);
        return Ok(WebhookOutcome::Duplicate);
    }

    let quote = QuoteRepository::get_by_id(&mut *tx, &event.data.quote_id)
        .await?
        .ok_or_else(|| LinguabridgeError::not_found("quote", event.data.quote_id.clone()))?;

    let mut outcome = WebhookOutcome::Recorded;

    if status == "succeeded" {
        if (event.data.amount - quote.total).abs() > 0.005 {
            warn!(
                "Payment {} amount {} differs from quote {} total {}",
                event.id, event.data.amount, quote.quote_number, quote.total
            );
        }

        match quote.status.parse::<QuoteStatus>() {
            Ok(QuoteStatus::Accepted) => {
                let invoiced = apply_transition(&mut tx, &quote, QuoteStatus::Invoiced, now).await?;
                apply_transition(&mut tx, &invoiced.quote, QuoteStatus::InvoicePaid, now).await?;
                outcome = WebhookOutcome::Applied;
            }
            Ok(QuoteStatus::Invoiced) => {
                apply_transition(&mut tx, &quote, QuoteStatus::InvoicePaid, now).await?;
                outcome = WebhookOutcome::Applied;
            }
            _ => warn!(
                "Payment {} for quote {} in status {}; recorded without transition",
                event.id, quote.quote_number, quote.status
            ),
        }
    } else {
        warn!("Payment failed for quote {} (event {})", quote.quote_number, event.id);
    }

    let invoice_id = InvoiceRepository::get_by_quote(&mut *tx, &quote.id)
        .await?
        .map(|invoice| invoice.id);
    let payment = Payment {
        id: Uuid::new_v4().to_string(),
        provider_event_id: event.id.clone(),
        quote_id: quote.id.clone(),
        invoice_id,
        amount: event.data.amount,
        status: status.to_string(),
        created_at: timestamp(now),
    };
    PaymentRepository::create(&mut *tx, &payment).await?;

    tx.commit().await?;
    info!(
        "Recorded {} payment {} for quote {}",
        status, event.id, quote.quote_number
    );
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "whsec_test";

    #[test]
    fn test_signature_round_trip() {
        let body = br#"{"id":"evt_1"}"#;
        let header = signature_header(SECRET, 1_700_000_000, body).unwrap();
        assert!(verify_signature(SECRET, &header, body, 1_700_000_100, 300).is_ok());
    }

    #[test]
    fn test_signature_rejections() {
        let body = br#"{"id":"evt_1"}"#;
        let header = signature_header(SECRET, 1_700_000_000, body).unwrap();

        let tampered = verify_signature(SECRET, &header, br#"{"id":"evt_2"}"#, 1_700_000_000, 300);
        assert!(matches!(tampered, Err(LinguabridgeError::InvalidSignature(_))));

        let wrong_key = verify_signature("other", &header, body, 1_700_000_000, 300);
        assert!(wrong_key.is_err());

        let stale = verify_signature(SECRET, &header, body, 1_700_000_301, 300);
        assert!(stale.is_err());

        assert!(verify_signature(SECRET, "v1=abcd", body, 0, 300).is_err());
        assert!(verify_signature(SECRET, "t=1700000000", body, 1_700_000_000, 300).is_err());
        assert!(verify_signature(SECRET, "t=1700000000,v1=zz", body, 1_700_000_000, 300).is_err());
    }

    #[test]
    fn test_any_matching_v1_accepted() {
        let body = b"{}";
        let good = sign(SECRET, 42, body).unwrap();
        let header = format!("t=42, v1=deadbeef, v1={}", good);
        assert!(verify_signature(SECRET, &header, body, 42, 300).is_ok());
    }

    #[test]
    fn test_event_parsing() {
        let event: PaymentEvent = serde_json::from_str(
            r#"{"id":"evt_9","type":"payment.succeeded","data":{"quote_id":"q-1","amount":50.0}}"#,
        )
        .unwrap();
        assert_eq!(event.event_type, "payment.succeeded");
        assert_eq!(event.data.quote_id, "q-1");
    }
}
