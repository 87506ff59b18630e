//! Email template and outbox models

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Named subject/body pair with `{{placeholder}}` markers
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EmailTemplate {
    pub name: String,
    pub subject: String,
    pub body: String,
    pub updated_at: String,
}

/// Rendered message waiting for delivery
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct OutboundEmail {
    pub id: String,
    pub recipient: String,
    pub template: String,
    pub subject: String,
    pub body: String,
    pub status: String,
    pub created_at: String,
}
