//! Customer and contact API models

use serde::{Deserialize, Serialize};

use crate::api::error::{ApiError, ApiResult};
use crate::api::middleware::validation::{validate_email, validate_not_empty, validate_string_length};
use crate::db::models::Customer;

const CUSTOMER_TYPES: [&str; 2] = ["individual", "corporate"];

fn validate_customer_type(value: &str) -> ApiResult<()> {
    if !CUSTOMER_TYPES.contains(&value) {
        return Err(ApiError::BadRequest(
            "Invalid customer_type. Must be: individual or corporate".to_string(),
        ));
    }
    Ok(())
}

/// Request to create a customer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCustomerRequest {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,

    /// `individual` (default) or `corporate`
    pub customer_type: Option<String>,
    pub company_name: Option<String>,

    /// US state code, used to pick state-specific pricing
    pub state: Option<String>,
}

impl CreateCustomerRequest {
    pub fn validate(&self) -> ApiResult<()> {
        validate_not_empty(&self.name, "name")?;
        validate_string_length(&self.name, "name", 1, 255)?;
        validate_email(&self.email, "email")?;
        if let Some(ref customer_type) = self.customer_type {
            validate_customer_type(customer_type)?;
        }
        Ok(())
    }

    pub fn into_customer(self, id: String) -> Customer {
        let mut customer = Customer::new(id, self.name.trim().to_string(), self.email.trim().to_string());
        customer.phone = self.phone;
        if let Some(customer_type) = self.customer_type {
            customer.customer_type = customer_type;
        }
        customer.company_name = self.company_name;
        customer.state = self.state.map(|s| s.trim().to_ascii_uppercase());
        customer
    }
}

/// Request to update a customer; absent fields are left alone
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateCustomerRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub customer_type: Option<String>,
    pub company_name: Option<String>,
    pub state: Option<String>,
}

impl UpdateCustomerRequest {
    /// Check if any fields are being updated
    pub fn has_updates(&self) -> bool {
        self.name.is_some()
            || self.email.is_some()
            || self.phone.is_some()
            || self.customer_type.is_some()
            || self.company_name.is_some()
            || self.state.is_some()
    }

    pub fn validate(&self) -> ApiResult<()> {
        if let Some(ref name) = self.name {
            validate_not_empty(name, "name")?;
        }
        if let Some(ref email) = self.email {
            validate_email(email, "email")?;
        }
        if let Some(ref customer_type) = self.customer_type {
            validate_customer_type(customer_type)?;
        }
        Ok(())
    }

    pub fn apply_to(self, customer: &mut Customer) {
        if let Some(name) = self.name {
            customer.name = name.trim().to_string();
        }
        if let Some(email) = self.email {
            customer.email = email.trim().to_string();
        }
        if let Some(phone) = self.phone {
            customer.phone = Some(phone);
        }
        if let Some(customer_type) = self.customer_type {
            customer.customer_type = customer_type;
        }
        if let Some(company_name) = self.company_name {
            customer.company_name = Some(company_name);
        }
        if let Some(state) = self.state {
            customer.state = Some(state.trim().to_ascii_uppercase());
        }
        customer.updated_at = crate::db::now_timestamp();
    }
}

/// Request to add a contact person to a customer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateContactRequest {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub role: Option<String>,
}

impl CreateContactRequest {
    pub fn validate(&self) -> ApiResult<()> {
        validate_not_empty(&self.name, "name")?;
        if let Some(ref email) = self.email {
            validate_email(email, "email")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CreateCustomerRequest {
        CreateCustomerRequest {
            name: "Acme Legal".into(),
            email: "billing@acme.test".into(),
            phone: None,
            customer_type: Some("corporate".into()),
            company_name: Some("Acme Legal LLC".into()),
            state: Some(" fl ".into()),
        }
    }

    #[test]
    fn test_create_customer_validation() {
        assert!(request().validate().is_ok());

        let mut bad = request();
        bad.customer_type = Some("government".into());
        assert!(bad.validate().is_err());

        let mut bad = request();
        bad.email = "not-an-email".into();
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_into_customer_normalizes_state() {
        let customer = request().into_customer("c-1".into());
        assert_eq!(customer.state.as_deref(), Some("FL"));
        assert_eq!(customer.customer_type, "corporate");
    }

    #[test]
    fn test_update_applies_only_present_fields() {
        let mut customer = request().into_customer("c-1".into());
        let update = UpdateCustomerRequest {
            phone: Some("555-0100".into()),
            ..Default::default()
        };
        assert!(update.has_updates());
        update.apply_to(&mut customer);
        assert_eq!(customer.phone.as_deref(), Some("555-0100"));
        assert_eq!(customer.name, "Acme Legal");

        assert!(!UpdateCustomerRequest::default().has_updates());
    }
}
