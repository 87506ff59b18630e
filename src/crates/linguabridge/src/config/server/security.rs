//! Security configuration and middleware
//!
//! Admin routes are either open or guarded by a bearer API key. Public routes
//! (invitation tokens, signed webhooks) never pass through this layer.

use crate::config::{SecurityConfig, SecurityMode};
use axum::extract::Request;
use axum::http::{header, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use tracing::warn;

use crate::api::error::ApiErrorResponse;

/// Security middleware state
#[derive(Clone)]
pub struct SecurityState {
    config: Arc<SecurityConfig>,
}

impl SecurityState {
    pub fn new(config: SecurityConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    pub fn mode(&self) -> SecurityMode {
        self.config.mode
    }

    pub fn get_secret_key(&self) -> Option<String> {
        std::env::var("SECRET_KEY")
            .ok()
            .or_else(|| self.config.secret_key.clone())
            .filter(|k| !k.is_empty())
    }

    /// Whether a request's Authorization header carries the admin key
    pub fn is_authorized(&self, authorization: Option<&str>) -> bool {
        match self.mode() {
            SecurityMode::Open => true,
            SecurityMode::SecretKey => {
                let presented = authorization.and_then(|v| v.strip_prefix("Bearer "));
                match (presented, self.get_secret_key()) {
                    (Some(key), Some(expected)) => keys_match(key, &expected),
                    _ => false,
                }
            }
        }
    }
}

/// Compare keys in time independent of where they first differ
///
/// Both sides are hashed first so the comparison always runs over 32 bytes,
/// whatever the key lengths.
fn keys_match(presented: &str, expected: &str) -> bool {
    let presented = Sha256::digest(presented.as_bytes());
    let expected = Sha256::digest(expected.as_bytes());
    presented
        .iter()
        .zip(expected.iter())
        .fold(0u8, |diff, (a, b)| diff | (a ^ b))
        == 0
}

/// Security middleware for Axum
pub async fn security_middleware(state: Arc<SecurityState>, request: Request, next: Next) -> Response {
    let authorization = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    if state.is_authorized(authorization) {
        return next.run(request).await;
    }

    warn!(
        "Unauthorized request to {} - missing or invalid API key",
        request.uri().path()
    );
    let body = ApiErrorResponse::new(
        "Unauthorized",
        "Unauthorized: missing or invalid API key",
        "UNAUTHORIZED",
    );
    (StatusCode::UNAUTHORIZED, Json(body)).into_response()
}
