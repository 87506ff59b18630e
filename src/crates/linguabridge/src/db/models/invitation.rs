//! Job invitation model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Offer of a project slot to one linguist
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobInvitation {
    pub id: String,
    pub project_id: String,
    pub linguist_id: String,

    /// Opaque accept/decline token sent by email
    pub token: String,

    /// One of [`crate::domain::InvitationStatus`]
    pub status: String,

    /// Distance from the job for on-site work
    pub distance_miles: Option<f64>,

    pub expires_at: String,
    pub responded_at: Option<String>,
    pub created_at: String,
}

impl JobInvitation {
    /// Whether `expires_at` lies before `now`; unparsable timestamps count as expired
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        DateTime::parse_from_rfc3339(&self.expires_at)
            .map(|at| at.with_timezone(&Utc) < now)
            .unwrap_or(true)
    }
}
