//! Quote and invoice API models

use serde::{Deserialize, Serialize};

use crate::api::error::{ApiError, ApiResult};
use crate::api::middleware::validation::{
    parse_field, validate_coordinates, validate_non_negative, validate_not_empty,
};
use crate::domain::{QuoteStatus, ServiceType};
use crate::services::NewQuote;

/// Request to create a quote
///
/// Without `rate` the price comes from the matching pricing rule.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateQuoteRequest {
    pub customer_id: String,
    pub source_language: String,
    pub target_language: String,
    pub service_type: String,
    #[serde(default)]
    pub word_count: i64,
    pub rate: Option<f64>,
    pub minimum_charge: Option<f64>,
    pub coupon_code: Option<String>,

    /// Job site for on-site work
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub scheduled_at: Option<String>,
    pub notes: Option<String>,
}

impl CreateQuoteRequest {
    pub fn validate(&self) -> ApiResult<()> {
        validate_not_empty(&self.customer_id, "customer_id")?;
        validate_not_empty(&self.source_language, "source_language")?;
        validate_not_empty(&self.target_language, "target_language")?;
        parse_field::<ServiceType>(&self.service_type, "service_type")?;
        if self.word_count < 0 {
            return Err(ApiError::ValidationError(
                "word_count must be a non-negative number".to_string(),
            ));
        }
        if let Some(rate) = self.rate {
            validate_non_negative(rate, "rate")?;
        }
        if let Some(min) = self.minimum_charge {
            validate_non_negative(min, "minimum_charge")?;
        }
        validate_coordinates(self.latitude, self.longitude)
    }

    pub fn into_new_quote(self) -> ApiResult<NewQuote> {
        let service_type = parse_field::<ServiceType>(&self.service_type, "service_type")?;
        Ok(NewQuote {
            customer_id: self.customer_id,
            source_language: self.source_language.trim().to_ascii_lowercase(),
            target_language: self.target_language.trim().to_ascii_lowercase(),
            service_type,
            word_count: self.word_count,
            rate: self.rate,
            minimum_charge: self.minimum_charge,
            coupon_code: self
                .coupon_code
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty()),
            address: self.address,
            latitude: self.latitude,
            longitude: self.longitude,
            scheduled_at: self.scheduled_at,
            notes: self.notes,
        })
    }
}

/// Requested quote status change
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteStatusRequest {
    pub status: String,
}

impl QuoteStatusRequest {
    pub fn parse(&self) -> ApiResult<QuoteStatus> {
        parse_field::<QuoteStatus>(&self.status, "status")
    }
}

/// Query parameters for listing quotes
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuoteListQuery {
    pub status: Option<String>,
    pub customer_id: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

/// Query parameters for listing invoices
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InvoiceListQuery {
    /// `unpaid`, `paid` or `void`
    pub status: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CreateQuoteRequest {
        CreateQuoteRequest {
            customer_id: "c-1".into(),
            source_language: "EN".into(),
            target_language: "es".into(),
            service_type: "translation".into(),
            word_count: 1200,
            coupon_code: Some("  ".into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_quote_request_to_new_quote() {
        let req = request();
        assert!(req.validate().is_ok());
        let new = req.into_new_quote().unwrap();
        assert_eq!(new.source_language, "en");
        assert_eq!(new.service_type, ServiceType::Translation);
        assert!(new.coupon_code.is_none());
    }

    #[test]
    fn test_quote_request_rejects_negative_words() {
        let mut req = request();
        req.word_count = -3;
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_status_request_parse() {
        let req = QuoteStatusRequest {
            status: "invoice_paid".into(),
        };
        assert_eq!(req.parse().unwrap(), QuoteStatus::InvoicePaid);
        let bad = QuoteStatusRequest {
            status: "lost".into(),
        };
        assert!(bad.parse().is_err());
    }
}
