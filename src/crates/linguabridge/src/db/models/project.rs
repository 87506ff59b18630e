//! Project model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Fulfilment record created once a quote is paid
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Project {
    pub id: String,
    pub quote_id: String,
    pub customer_id: String,
    pub name: String,
    pub source_language: String,
    pub target_language: String,
    pub service_type: String,

    /// Job location for on-site work
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,

    pub scheduled_at: Option<String>,

    /// Linguist who accepted the job
    pub linguist_id: Option<String>,

    /// One of [`crate::domain::ProjectStatus`]
    pub status: String,

    pub created_at: String,
    pub updated_at: String,
}

impl Project {
    /// Job coordinates, if both are present
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        Some((self.latitude?, self.longitude?))
    }
}
