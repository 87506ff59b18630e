//! API middleware layer
//!
//! CORS, request tracing and request validation helpers. API-key security
//! lives in [`crate::config::security_middleware`].

pub mod cors;
pub mod logging;
pub mod validation;

pub use cors::cors_layer;
pub use logging::logging_layer;
pub use validation::{
    parse_field, validate_coordinates, validate_email, validate_non_negative, validate_not_empty,
    validate_pagination, validate_string_length, validate_uuid,
};
