//! API error types and HTTP response conversion
//!
//! Converts domain and database errors into HTTP status codes and a JSON body
//! of the form `{error, message, code}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::db::DatabaseError;
use crate::LinguabridgeError;

/// API error response structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Error type identifier
    pub error: String,
    /// Human-readable error message
    pub message: String,
    /// Error code for programmatic handling
    pub code: String,
}

impl ApiErrorResponse {
    /// Create a new API error response
    pub fn new(error: impl Into<String>, message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            code: code.into(),
        }
    }
}

/// API result type
pub type ApiResult<T> = Result<T, ApiError>;

/// Custom API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid request data
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Validation error
    #[error("Validation failed: {0}")]
    ValidationError(String),

    /// Conflict with the current state of a resource
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Workflow does not allow the requested status change
    #[error("Invalid state transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    /// Resource existed but can no longer be used
    #[error("Gone: {0}")]
    Gone(String),

    /// Coupon failed one of its rules
    #[error("Coupon rejected: {0}")]
    CouponRejected(crate::CouponRejection),

    /// Internal server error
    #[error("Internal server error: {0}")]
    InternalError(String),

    /// Database error
    #[error("Database error: {0}")]
    DatabaseError(#[from] DatabaseError),

    /// Unauthorized
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Webhook signature missing or wrong
    #[error("Invalid signature: {0}")]
    InvalidSignature(String),

    /// Feature needs configuration that is missing
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    JsonError(String),
}

impl ApiError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::ValidationError(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::InvalidTransition { .. } => StatusCode::CONFLICT,
            ApiError::Gone(_) => StatusCode::GONE,
            ApiError::CouponRejected(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::InvalidSignature(_) => StatusCode::UNAUTHORIZED,
            ApiError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::DatabaseError(db_err) => {
                if db_err.is_not_found() {
                    StatusCode::NOT_FOUND
                } else if db_err.is_constraint_violation() {
                    StatusCode::CONFLICT
                } else {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            }
            ApiError::JsonError(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Get the error code identifier
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::ValidationError(_) => "VALIDATION_ERROR",
            ApiError::Conflict(_) => "CONFLICT",
            ApiError::InvalidTransition { .. } => "INVALID_TRANSITION",
            ApiError::Gone(_) => "GONE",
            ApiError::CouponRejected(_) => "COUPON_REJECTED",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::InvalidSignature(_) => "INVALID_SIGNATURE",
            ApiError::Unavailable(_) => "UNAVAILABLE",
            ApiError::InternalError(_) => "INTERNAL_ERROR",
            ApiError::DatabaseError(db_err) => {
                if db_err.is_not_found() {
                    "DB_NOT_FOUND"
                } else if db_err.is_constraint_violation() {
                    "DB_CONSTRAINT_VIOLATION"
                } else {
                    "DB_ERROR"
                }
            }
            ApiError::JsonError(_) => "JSON_ERROR",
        }
    }

    /// Get the error type name
    pub fn error_type(&self) -> &'static str {
        match self {
            ApiError::NotFound(_) => "NotFound",
            ApiError::BadRequest(_) => "BadRequest",
            ApiError::ValidationError(_) => "ValidationError",
            ApiError::Conflict(_) => "Conflict",
            ApiError::InvalidTransition { .. } => "InvalidTransition",
            ApiError::Gone(_) => "Gone",
            ApiError::CouponRejected(_) => "CouponRejected",
            ApiError::Unauthorized(_) => "Unauthorized",
            ApiError::InvalidSignature(_) => "InvalidSignature",
            ApiError::Unavailable(_) => "Unavailable",
            ApiError::InternalError(_) => "InternalError",
            ApiError::DatabaseError(_) => "DatabaseError",
            ApiError::JsonError(_) => "JsonError",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ApiErrorResponse::new(self.error_type(), self.to_string(), self.code());

        if status.is_server_error() {
            tracing::error!("API Error: {:?}", body);
        } else {
            tracing::warn!("API Error: {:?}", body);
        }

        (status, Json(body)).into_response()
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::JsonError(err.to_string())
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        ApiError::DatabaseError(err.into())
    }
}

impl From<LinguabridgeError> for ApiError {
    fn from(err: LinguabridgeError) -> Self {
        match err {
            LinguabridgeError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{} not found: {}", entity, id))
            }
            LinguabridgeError::InvalidStateTransition { from, to } => {
                ApiError::InvalidTransition { from, to }
            }
            LinguabridgeError::Validation(msg) => ApiError::BadRequest(msg),
            LinguabridgeError::Conflict(msg) => ApiError::Conflict(msg),
            LinguabridgeError::Gone(msg) => ApiError::Gone(msg),
            LinguabridgeError::CouponRejected(reason) => ApiError::CouponRejected(reason),
            LinguabridgeError::InvalidSignature(msg) => ApiError::InvalidSignature(msg),
            LinguabridgeError::Database(db_err) => ApiError::DatabaseError(db_err),
            LinguabridgeError::Serialization(e) => ApiError::JsonError(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_error() {
        let err = ApiError::NotFound("resource".to_string());
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.code(), "NOT_FOUND");
        assert_eq!(err.error_type(), "NotFound");
    }

    #[test]
    fn test_domain_errors_map_to_status() {
        let cases: Vec<(LinguabridgeError, StatusCode)> = vec![
            (LinguabridgeError::not_found("quote", "q-1"), StatusCode::NOT_FOUND),
            (
                LinguabridgeError::InvalidStateTransition {
                    from: "DRAFT".into(),
                    to: "INVOICED".into(),
                },
                StatusCode::CONFLICT,
            ),
            (LinguabridgeError::Validation("bad".into()), StatusCode::BAD_REQUEST),
            (LinguabridgeError::Conflict("taken".into()), StatusCode::CONFLICT),
            (LinguabridgeError::Gone("expired".into()), StatusCode::GONE),
            (
                LinguabridgeError::CouponRejected(crate::CouponRejection::Expired),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (LinguabridgeError::InvalidSignature("nope".into()), StatusCode::UNAUTHORIZED),
        ];
        for (domain, status) in cases {
            assert_eq!(ApiError::from(domain).status_code(), status);
        }
    }

    #[test]
    fn test_constraint_violation_is_conflict() {
        let err = ApiError::DatabaseError(DatabaseError::constraint("UNIQUE constraint failed"));
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert_eq!(err.code(), "DB_CONSTRAINT_VIOLATION");
    }

    #[test]
    fn test_coupon_rejection_message() {
        let err = ApiError::CouponRejected(crate::CouponRejection::BelowMinimumOrder);
        assert_eq!(err.to_string(), "Coupon rejected: order is below the coupon minimum");
        assert_eq!(err.code(), "COUPON_REJECTED");
    }
}
