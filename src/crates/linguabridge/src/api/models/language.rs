//! Language API models

use serde::{Deserialize, Serialize};

use crate::api::error::{ApiError, ApiResult};
use crate::api::middleware::validation::{validate_not_empty, validate_string_length};

/// Request to add a language
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateLanguageRequest {
    /// Short code, e.g. `en` or `asl`
    pub code: String,

    /// Display name
    pub name: String,
}

impl CreateLanguageRequest {
    pub fn validate(&self) -> ApiResult<()> {
        validate_string_length(self.code.trim(), "code", 2, 8)?;
        if !self.code.trim().chars().all(|c| c.is_ascii_alphabetic() || c == '-') {
            return Err(ApiError::ValidationError(
                "code may only contain letters and '-'".to_string(),
            ));
        }
        validate_not_empty(&self.name, "name")
    }

    /// Codes are stored lowercase
    pub fn normalized_code(&self) -> String {
        self.code.trim().to_ascii_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_code_rules() {
        let ok = CreateLanguageRequest {
            code: "PT-BR".into(),
            name: "Brazilian Portuguese".into(),
        };
        assert!(ok.validate().is_ok());
        assert_eq!(ok.normalized_code(), "pt-br");

        let bad = CreateLanguageRequest {
            code: "e1".into(),
            name: "Digits".into(),
        };
        assert!(bad.validate().is_err());
    }
}
