//! Language model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A language the agency works with, keyed by short code (`en`, `es`, `asl`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Language {
    pub code: String,
    pub name: String,
}
