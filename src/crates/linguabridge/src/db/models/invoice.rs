//! Invoice, payment and purchase order models

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Bill issued to a customer for a quote
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Invoice {
    pub id: String,
    pub invoice_number: String,
    pub quote_id: String,
    pub customer_id: String,
    pub amount: f64,

    /// `unpaid`, `paid` or `void`
    pub status: String,

    pub due_date: String,
    pub paid_at: Option<String>,
    pub created_at: String,
}

/// Payment-provider event recorded against a quote
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Payment {
    pub id: String,

    /// Provider event id; replays of the same event are ignored
    pub provider_event_id: String,

    pub quote_id: String,
    pub invoice_id: Option<String>,
    pub amount: f64,

    /// `succeeded` or `failed`
    pub status: String,

    pub created_at: String,
}

/// Work order issued to the linguist who accepted a project
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PurchaseOrder {
    pub id: String,
    pub po_number: String,
    pub project_id: String,
    pub linguist_id: String,
    pub status: String,
    pub amount: Option<f64>,
    pub created_at: String,
}
