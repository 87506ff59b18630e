//! Configuration module
//!
//! TOML server configuration (`linguabridge-server.toml`) with environment
//! overrides, plus the API-key security middleware.

pub mod server;

pub use server::security::{security_middleware, SecurityState};
pub use server::{
    DatabaseConfig, MailConfig, MatchingConfig, PaymentsConfig, SecurityConfig, SecurityMode,
    ServerConfig, ServerConfigError, ServerInfoConfig,
};
