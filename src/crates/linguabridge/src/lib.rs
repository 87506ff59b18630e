//! Back office for a translation and interpretation agency
//!
//! Customer quoting, linguist management, pricing rules, coupons,
//! interpreter matching with job invitations, invoicing and payment
//! webhooks, exposed as a JSON API over SQLite.

pub mod api;
pub mod config;
pub mod db;
pub mod domain;
pub mod import;
pub mod services;
pub mod version;

use thiserror::Error;

pub use domain::{InvitationStatus, ProjectStatus, QuoteStatus, ServiceType};
pub use services::coupons::CouponRejection;

/// Errors raised by the domain services
#[derive(Debug, Error)]
pub enum LinguabridgeError {
    /// Entity lookup failed
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Status change not allowed by the workflow
    #[error("Invalid state transition from {from} to {to}")]
    InvalidStateTransition { from: String, to: String },

    /// Input rejected before touching the database
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Request conflicts with current state
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Resource existed but is no longer usable (e.g. expired invitation)
    #[error("Gone: {0}")]
    Gone(String),

    /// Coupon failed validation
    #[error("Coupon rejected: {0}")]
    CouponRejected(CouponRejection),

    /// Webhook signature missing or wrong
    #[error("Invalid signature: {0}")]
    InvalidSignature(String),

    /// Database error
    #[error(transparent)]
    Database(#[from] db::DatabaseError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl LinguabridgeError {
    /// Shorthand for a not-found error
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        LinguabridgeError::NotFound {
            entity,
            id: id.into(),
        }
    }
}

impl From<sqlx::Error> for LinguabridgeError {
    fn from(err: sqlx::Error) -> Self {
        LinguabridgeError::Database(err.into())
    }
}

/// Result type for domain operations
pub type Result<T> = std::result::Result<T, LinguabridgeError>;
