//! Customer and contact models

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// An individual or corporate client
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Customer {
    /// Unique customer identifier (UUID string)
    pub id: String,

    /// Display name (person or organisation)
    pub name: String,

    /// Billing email, unique across customers
    pub email: String,

    pub phone: Option<String>,

    /// `individual` or `corporate`
    pub customer_type: String,

    /// Company name for corporate accounts
    pub company_name: Option<String>,

    /// US state code, used to pick state-specific pricing rules
    pub state: Option<String>,

    /// Creation timestamp (ISO8601 string)
    pub created_at: String,

    /// Last update timestamp (ISO8601 string)
    pub updated_at: String,
}

impl Customer {
    /// Create an individual customer with required fields
    pub fn new(id: String, name: String, email: String) -> Self {
        let now = crate::db::now_timestamp();
        Self {
            id,
            name,
            email,
            phone: None,
            customer_type: "individual".to_string(),
            company_name: None,
            state: None,
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

/// A person to talk to at a (usually corporate) customer
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Contact {
    pub id: String,
    pub customer_id: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub role: Option<String>,
    pub created_at: String,
}
