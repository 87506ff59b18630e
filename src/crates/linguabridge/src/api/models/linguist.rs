//! Linguist API models

use serde::{Deserialize, Serialize};

use crate::api::error::{ApiError, ApiResult};
use crate::api::middleware::validation::{
    validate_coordinates, validate_email, validate_non_negative, validate_not_empty,
};
use crate::db::models::{Linguist, LinguistLanguage};

const LANGUAGE_SERVICES: [&str; 2] = ["translation", "interpretation"];

/// One language a linguist works in, for one kind of work
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageTag {
    pub language_code: String,

    /// `translation` or `interpretation`
    pub service: String,
}

impl LanguageTag {
    pub fn validate(&self) -> ApiResult<()> {
        validate_not_empty(&self.language_code, "language_code")?;
        if !LANGUAGE_SERVICES.contains(&self.service.as_str()) {
            return Err(ApiError::BadRequest(
                "Invalid service. Must be: translation or interpretation".to_string(),
            ));
        }
        Ok(())
    }

    pub fn into_row(self, linguist_id: &str) -> LinguistLanguage {
        LinguistLanguage {
            linguist_id: linguist_id.to_string(),
            language_code: self.language_code.trim().to_ascii_lowercase(),
            service: self.service,
        }
    }
}

impl From<LinguistLanguage> for LanguageTag {
    fn from(row: LinguistLanguage) -> Self {
        Self {
            language_code: row.language_code,
            service: row.service,
        }
    }
}

/// Request to create a linguist
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateLinguistRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,

    /// Furthest the linguist travels for on-site work, in miles
    pub max_travel_distance: Option<f64>,
    #[serde(default)]
    pub available_onsite: bool,
    #[serde(default)]
    pub available_video: bool,
    #[serde(default)]
    pub available_phone: bool,
    pub hourly_rate: Option<f64>,
    pub per_word_rate: Option<f64>,

    /// Initial language tags
    #[serde(default)]
    pub languages: Vec<LanguageTag>,
}

impl CreateLinguistRequest {
    pub fn validate(&self) -> ApiResult<()> {
        validate_not_empty(&self.first_name, "first_name")?;
        validate_not_empty(&self.last_name, "last_name")?;
        validate_email(&self.email, "email")?;
        validate_coordinates(self.latitude, self.longitude)?;
        for (value, field) in [
            (self.max_travel_distance, "max_travel_distance"),
            (self.hourly_rate, "hourly_rate"),
            (self.per_word_rate, "per_word_rate"),
        ] {
            if let Some(v) = value {
                validate_non_negative(v, field)?;
            }
        }
        for tag in &self.languages {
            tag.validate()?;
        }
        Ok(())
    }

    /// Split into the linguist row and its language tags
    pub fn into_parts(self, id: String) -> (Linguist, Vec<LinguistLanguage>) {
        let mut linguist = Linguist::new(
            id,
            self.first_name.trim().to_string(),
            self.last_name.trim().to_string(),
            self.email.trim().to_string(),
        );
        linguist.phone = self.phone;
        linguist.city = self.city;
        linguist.state = self.state.map(|s| s.trim().to_ascii_uppercase());
        linguist.latitude = self.latitude;
        linguist.longitude = self.longitude;
        linguist.max_travel_distance = self.max_travel_distance;
        linguist.available_onsite = self.available_onsite;
        linguist.available_video = self.available_video;
        linguist.available_phone = self.available_phone;
        linguist.hourly_rate = self.hourly_rate;
        linguist.per_word_rate = self.per_word_rate;

        let tags = self
            .languages
            .into_iter()
            .map(|tag| tag.into_row(&linguist.id))
            .collect();
        (linguist, tags)
    }
}

/// Request to update a linguist; absent fields are left alone
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateLinguistRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub max_travel_distance: Option<f64>,
    pub available_onsite: Option<bool>,
    pub available_video: Option<bool>,
    pub available_phone: Option<bool>,
    pub hourly_rate: Option<f64>,
    pub per_word_rate: Option<f64>,
    pub active: Option<bool>,
}

impl UpdateLinguistRequest {
    pub fn has_updates(&self) -> bool {
        self.first_name.is_some()
            || self.last_name.is_some()
            || self.email.is_some()
            || self.phone.is_some()
            || self.city.is_some()
            || self.state.is_some()
            || self.latitude.is_some()
            || self.longitude.is_some()
            || self.max_travel_distance.is_some()
            || self.available_onsite.is_some()
            || self.available_video.is_some()
            || self.available_phone.is_some()
            || self.hourly_rate.is_some()
            || self.per_word_rate.is_some()
            || self.active.is_some()
    }

    pub fn validate(&self) -> ApiResult<()> {
        if let Some(ref name) = self.first_name {
            validate_not_empty(name, "first_name")?;
        }
        if let Some(ref name) = self.last_name {
            validate_not_empty(name, "last_name")?;
        }
        if let Some(ref email) = self.email {
            validate_email(email, "email")?;
        }
        validate_coordinates(self.latitude, self.longitude)?;
        for (value, field) in [
            (self.max_travel_distance, "max_travel_distance"),
            (self.hourly_rate, "hourly_rate"),
            (self.per_word_rate, "per_word_rate"),
        ] {
            if let Some(v) = value {
                validate_non_negative(v, field)?;
            }
        }
        Ok(())
    }

    pub fn apply_to(self, linguist: &mut Linguist) {
        if let Some(v) = self.first_name {
            linguist.first_name = v.trim().to_string();
        }
        if let Some(v) = self.last_name {
            linguist.last_name = v.trim().to_string();
        }
        if let Some(v) = self.email {
            linguist.email = v.trim().to_string();
        }
        if let Some(v) = self.phone {
            linguist.phone = Some(v);
        }
        if let Some(v) = self.city {
            linguist.city = Some(v);
        }
        if let Some(v) = self.state {
            linguist.state = Some(v.trim().to_ascii_uppercase());
        }
        if let (Some(lat), Some(lon)) = (self.latitude, self.longitude) {
            linguist.latitude = Some(lat);
            linguist.longitude = Some(lon);
        }
        if let Some(v) = self.max_travel_distance {
            linguist.max_travel_distance = Some(v);
        }
        if let Some(v) = self.available_onsite {
            linguist.available_onsite = v;
        }
        if let Some(v) = self.available_video {
            linguist.available_video = v;
        }
        if let Some(v) = self.available_phone {
            linguist.available_phone = v;
        }
        if let Some(v) = self.hourly_rate {
            linguist.hourly_rate = Some(v);
        }
        if let Some(v) = self.per_word_rate {
            linguist.per_word_rate = Some(v);
        }
        if let Some(v) = self.active {
            linguist.active = v;
        }
        linguist.updated_at = crate::db::now_timestamp();
    }
}

/// Replacement set of language tags
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetLanguagesRequest {
    pub languages: Vec<LanguageTag>,
}

impl SetLanguagesRequest {
    pub fn validate(&self) -> ApiResult<()> {
        for tag in &self.languages {
            tag.validate()?;
        }
        Ok(())
    }
}

/// Linguist with its language tags
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinguistResponse {
    #[serde(flatten)]
    pub linguist: Linguist,
    pub languages: Vec<LanguageTag>,
}

impl LinguistResponse {
    pub fn from_db(linguist: Linguist, languages: Vec<LinguistLanguage>) -> Self {
        Self {
            linguist,
            languages: languages.into_iter().map(LanguageTag::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CreateLinguistRequest {
        CreateLinguistRequest {
            first_name: "Marie".into(),
            last_name: "Joseph".into(),
            email: "marie@example.com".into(),
            latitude: Some(25.9),
            longitude: Some(-80.2),
            available_onsite: true,
            languages: vec![
                LanguageTag {
                    language_code: "HT".into(),
                    service: "interpretation".into(),
                },
                LanguageTag {
                    language_code: "en".into(),
                    service: "interpretation".into(),
                },
            ],
            ..Default::default()
        }
    }

    #[test]
    fn test_create_linguist_validation() {
        assert!(request().validate().is_ok());

        let mut bad = request();
        bad.longitude = None;
        assert!(bad.validate().is_err());

        let mut bad = request();
        bad.languages[0].service = "subtitling".into();
        assert!(bad.validate().is_err());

        let mut bad = request();
        bad.max_travel_distance = Some(-5.0);
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_into_parts_lowercases_language_codes() {
        let (linguist, tags) = request().into_parts("l-1".into());
        assert_eq!(linguist.id, "l-1");
        assert!(linguist.available_onsite);
        assert!(!linguist.available_phone);
        assert_eq!(tags[0].language_code, "ht");
        assert!(tags.iter().all(|t| t.linguist_id == "l-1"));
    }

    #[test]
    fn test_update_ignores_half_coordinates_pair() {
        let (mut linguist, _) = request().into_parts("l-1".into());
        let update = UpdateLinguistRequest {
            active: Some(false),
            ..Default::default()
        };
        update.apply_to(&mut linguist);
        assert!(!linguist.active);
        assert_eq!(linguist.latitude, Some(25.9));
    }

    #[test]
    fn test_response_flattens_linguist() {
        let (linguist, tags) = request().into_parts("l-1".into());
        let json = serde_json::to_value(LinguistResponse::from_db(linguist, tags)).unwrap();
        assert_eq!(json["first_name"], "Marie");
        assert_eq!(json["languages"][1]["language_code"], "en");
    }
}
