//! API data transfer objects (DTOs) and response models
//!
//! Request bodies carry a `validate` method; responses mostly reuse the row
//! models, which already serialize cleanly.

pub mod coupon;
pub mod customer;
pub mod language;
pub mod linguist;
pub mod pricing;
pub mod project;
pub mod quote;

pub use coupon::{CreateCouponRequest, ValidateCouponRequest, ValidateCouponResponse};
pub use customer::{CreateContactRequest, CreateCustomerRequest, UpdateCustomerRequest};
pub use language::CreateLanguageRequest;
pub use linguist::{
    CreateLinguistRequest, LanguageTag, LinguistResponse, SetLanguagesRequest,
    UpdateLinguistRequest,
};
pub use pricing::{CreatePricingRuleRequest, EstimateRequest, UpdatePricingRuleRequest};
pub use project::{MatchQuery, MatchResponse, ProjectListQuery, ProjectStatusRequest};
pub use quote::{CreateQuoteRequest, InvoiceListQuery, QuoteListQuery, QuoteStatusRequest};

/// Default page size for list endpoints
pub const DEFAULT_PER_PAGE: u32 = 20;

/// Upper bound on page size
pub const MAX_PER_PAGE: u32 = 100;

/// Plain pagination parameters
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct PageQuery {
    /// Current page (0-indexed, default 0)
    pub page: Option<u32>,

    /// Items per page (default 20, max 100)
    pub per_page: Option<u32>,
}

impl PageQuery {
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(0)
    }

    pub fn per_page(&self) -> u32 {
        self.per_page.unwrap_or(DEFAULT_PER_PAGE)
    }
}

/// System health response
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct HealthResponse {
    /// Overall status
    pub status: String,

    /// Database connection status
    pub database: String,

    /// API version
    pub version: String,

    /// Current timestamp
    pub timestamp: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn new(status: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            database: database.into(),
            version: crate::version::VERSION.to_string(),
            timestamp: crate::db::now_timestamp(),
        }
    }
}

/// System info response
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SystemInfoResponse {
    /// Application version
    pub version: String,

    /// Build timestamp
    pub build_timestamp: String,

    /// Git commit hash
    pub git_commit: String,

    /// Rust version
    pub rust_version: String,

    /// Quotes waiting on the customer
    pub open_quotes: i64,

    /// Quotes invoiced but unpaid
    pub unpaid_quotes: i64,
}
