//! Linguist (translator/interpreter) models

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::domain::ServiceType;

/// Vendor profile of a translator or interpreter
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Linguist {
    /// Unique linguist identifier (UUID string)
    pub id: String,

    pub first_name: String,
    pub last_name: String,

    /// Contact email, unique across linguists
    pub email: String,

    pub phone: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,

    /// Home base coordinates used for on-site matching
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,

    /// Furthest the linguist will travel for on-site work, in miles
    pub max_travel_distance: Option<f64>,

    pub available_onsite: bool,
    pub available_video: bool,
    pub available_phone: bool,

    pub hourly_rate: Option<f64>,
    pub per_word_rate: Option<f64>,

    /// Inactive linguists are never matched
    pub active: bool,

    pub created_at: String,
    pub updated_at: String,
}

impl Linguist {
    /// Create an active linguist with no availability flags set
    pub fn new(id: String, first_name: String, last_name: String, email: String) -> Self {
        let now = crate::db::now_timestamp();
        Self {
            id,
            first_name,
            last_name,
            email,
            phone: None,
            city: None,
            state: None,
            latitude: None,
            longitude: None,
            max_travel_distance: None,
            available_onsite: false,
            available_video: false,
            available_phone: false,
            hourly_rate: None,
            per_word_rate: None,
            active: true,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Whether the availability flag for an interpretation service is set
    pub fn is_available_for(&self, service: ServiceType) -> bool {
        match service {
            ServiceType::Onsite => self.available_onsite,
            ServiceType::Video => self.available_video,
            ServiceType::Phone => self.available_phone,
            ServiceType::Translation => false,
        }
    }

    /// Stored coordinates, if both are present
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        Some((self.latitude?, self.longitude?))
    }
}

/// Language tag on a linguist: which language, for which kind of work
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct LinguistLanguage {
    pub linguist_id: String,
    pub language_code: String,

    /// `translation` or `interpretation`
    pub service: String,
}
