//! REST API layer
//!
//! JSON endpoints for the agency back office:
//! - Languages, customers and linguists
//! - Pricing rules, estimates and coupons
//! - Quotes, invoices and projects
//! - Interpreter matching and job invitations
//! - Signed payment webhooks

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod response;
pub mod routes;

pub use error::{ApiError, ApiErrorResponse, ApiResult};
pub use middleware::cors_layer;
pub use response::{PaginatedResponse, SuccessResponse};
pub use routes::{create_router, AppState};

/// Re-export commonly used items
pub mod prelude {
    pub use crate::api::error::{ApiError, ApiResult};
    pub use crate::api::models::*;
    pub use crate::api::response::*;
}
