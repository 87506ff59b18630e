//! Server configuration for linguabridge-server
//!
//! Loads and parses linguabridge-server.toml. Every section has defaults, so
//! an empty file (or no file at all) yields a working local setup.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

use crate::services::invitations::InvitationSettings;

pub mod security;

#[derive(Debug, Error)]
pub enum ServerConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    ParseError(toml::de::Error),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Server identification and bind address
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerInfoConfig {
    /// Server name for identification (displayed to clients)
    #[serde(default = "default_server_name")]
    pub name: String,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerInfoConfig {
    fn default() -> Self {
        Self {
            name: default_server_name(),
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_server_name() -> String {
    "linguabridge-server".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite database file path
    #[serde(default = "default_database_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
        }
    }
}

fn default_database_path() -> String {
    "linguabridge.db".to_string()
}

/// Security mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SecurityMode {
    /// No authentication required
    Open,
    /// API key based authentication for admin routes
    SecretKey,
}

/// Security configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Security mode
    pub mode: SecurityMode,
    /// Secret key (can be overridden by SECRET_KEY environment variable)
    #[serde(default)]
    pub secret_key: Option<String>,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            mode: SecurityMode::Open,
            secret_key: None,
        }
    }
}

/// Payment webhook settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentsConfig {
    /// Shared webhook secret (can be overridden by PAYMENT_WEBHOOK_SECRET)
    #[serde(default)]
    pub webhook_secret: Option<String>,

    /// Allowed clock skew for signed webhooks, in seconds
    #[serde(default = "default_tolerance_secs")]
    pub tolerance_secs: i64,
}

impl Default for PaymentsConfig {
    fn default() -> Self {
        Self {
            webhook_secret: None,
            tolerance_secs: default_tolerance_secs(),
        }
    }
}

fn default_tolerance_secs() -> i64 {
    crate::services::payments::DEFAULT_TOLERANCE_SECS
}

/// Interpreter matching and invitation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchingConfig {
    /// Search radius used when a request does not give one
    #[serde(default = "default_max_distance")]
    pub default_max_distance_miles: f64,

    /// How long an invitation stays open
    #[serde(default = "default_ttl_hours")]
    pub invitation_ttl_hours: i64,

    /// Interval of the background sweep that expires overdue invitations
    #[serde(default = "default_sweep_secs")]
    pub expiry_sweep_secs: u64,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            default_max_distance_miles: default_max_distance(),
            invitation_ttl_hours: default_ttl_hours(),
            expiry_sweep_secs: default_sweep_secs(),
        }
    }
}

fn default_max_distance() -> f64 {
    50.0
}

fn default_ttl_hours() -> i64 {
    48
}

fn default_sweep_secs() -> u64 {
    300
}

/// Outgoing mail settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    /// Base URL used for links in emails
    #[serde(default = "default_portal_base_url")]
    pub portal_base_url: String,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            portal_base_url: default_portal_base_url(),
        }
    }
}

fn default_portal_base_url() -> String {
    "http://localhost:8080/api/v1".to_string()
}

/// Complete server configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server identification
    #[serde(default)]
    pub server: ServerInfoConfig,
    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Security configuration
    #[serde(default)]
    pub security: SecurityConfig,
    /// Payment webhook configuration
    #[serde(default)]
    pub payments: PaymentsConfig,
    /// Matching configuration
    #[serde(default)]
    pub matching: MatchingConfig,
    /// Mail configuration
    #[serde(default)]
    pub mail: MailConfig,
}

impl ServerConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, ServerConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(ServerConfigError::ReadError)?;
        Self::from_str(&content)
    }

    /// Load configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self, ServerConfigError> {
        let config: Self = toml::from_str(content).map_err(ServerConfigError::ParseError)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from default location or environment
    ///
    /// Searches for config in:
    /// 1. CONFIG_PATH environment variable
    /// 2. ./config/linguabridge-server.toml
    /// 3. ./linguabridge-server.toml
    ///
    /// Falls back to defaults when no file is found.
    pub fn load() -> Result<Self, ServerConfigError> {
        if let Ok(config_path) = std::env::var("CONFIG_PATH") {
            return Self::from_file(config_path);
        }

        let paths = [
            PathBuf::from("config/linguabridge-server.toml"),
            PathBuf::from("./linguabridge-server.toml"),
        ];

        for path in &paths {
            if path.exists() {
                return Self::from_file(path);
            }
        }

        tracing::warn!("No linguabridge-server.toml found, using defaults");
        Ok(Self::default())
    }

    /// Reject values that would make the server misbehave
    pub fn validate(&self) -> Result<(), ServerConfigError> {
        if self.matching.default_max_distance_miles <= 0.0 {
            return Err(ServerConfigError::InvalidConfig(
                "matching.default_max_distance_miles must be positive".to_string(),
            ));
        }
        if self.matching.invitation_ttl_hours <= 0 {
            return Err(ServerConfigError::InvalidConfig(
                "matching.invitation_ttl_hours must be positive".to_string(),
            ));
        }
        if self.payments.tolerance_secs <= 0 {
            return Err(ServerConfigError::InvalidConfig(
                "payments.tolerance_secs must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Get the secret key, checking environment variable first
    pub fn get_secret_key(&self) -> Option<String> {
        std::env::var("SECRET_KEY")
            .ok()
            .or_else(|| self.security.secret_key.clone())
            .filter(|k| !k.is_empty())
    }

    /// Get the webhook secret, checking environment variable first
    pub fn get_webhook_secret(&self) -> Option<String> {
        std::env::var("PAYMENT_WEBHOOK_SECRET")
            .ok()
            .or_else(|| self.payments.webhook_secret.clone())
            .filter(|k| !k.is_empty())
    }

    /// Bind address; HOST and PORT environment variables win
    pub fn bind_address(&self) -> String {
        let host = std::env::var("HOST").unwrap_or_else(|_| self.server.host.clone());
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(self.server.port);
        format!("{}:{}", host, port)
    }

    /// Get database URL from configuration
    pub fn database_url(&self) -> String {
        format!("sqlite://{}", self.database.path)
    }

    /// Invitation settings derived from `[matching]` and `[mail]`
    pub fn invitation_settings(&self) -> InvitationSettings {
        InvitationSettings {
            ttl: chrono::Duration::hours(self.matching.invitation_ttl_hours),
            portal_base_url: self.mail.portal_base_url.clone(),
        }
    }
}
