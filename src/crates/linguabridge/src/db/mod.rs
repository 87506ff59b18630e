//! Database module
//!
//! Provides database connectivity, models, repositories, and error handling
//! for persistent storage of agency records.

pub mod connection;
pub mod error;
pub mod models;
pub mod repositories;

pub use connection::{begin_write, DatabaseConnection, DatabasePool, PoolStatistics};
pub use error::{DatabaseError, DbResult};

use chrono::{DateTime, SecondsFormat, Utc};

/// Canonical stored form of a timestamp: RFC 3339, whole seconds, `Z` suffix
///
/// A fixed width keeps lexicographic order equal to chronological order, which
/// the expiry queries rely on.
pub fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Current time in stored form
pub fn now_timestamp() -> String {
    timestamp(Utc::now())
}
