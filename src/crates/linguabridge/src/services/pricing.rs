//! Quote pricing and pricing rule resolution

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::db::models::PricingRule;
use crate::db::repositories::PricingRuleRepository;
use crate::db::DatabasePool;
use crate::domain::ServiceType;
use crate::{LinguabridgeError, Result};

/// Computed price of a quote before discounts
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuotePrice {
    pub subtotal: f64,
    pub tax: f64,
    pub total: f64,
}

/// Price `word_count` units at `rate`, never below `minimum_charge`
///
/// Tax is not charged under the current policy.
pub fn calculate_quote_price(word_count: i64, rate: f64, minimum_charge: f64) -> QuotePrice {
    let subtotal = (word_count as f64 * rate).max(minimum_charge);
    let tax = 0.0;
    QuotePrice {
        subtotal,
        tax,
        total: subtotal + tax,
    }
}

/// What a rule is being looked up for
#[derive(Debug, Clone)]
pub struct RuleQuery<'a> {
    pub source_language: &'a str,
    pub target_language: &'a str,
    pub service_type: ServiceType,
    pub state: Option<&'a str>,
}

/// How closely a rule matches a query, or `None` when it does not apply
///
/// An exact target language outranks an exact state.
fn specificity(rule: &PricingRule, query: &RuleQuery<'_>) -> Option<u8> {
    if !rule.active
        || !rule.source_language.eq_ignore_ascii_case(query.source_language)
        || rule.service_type != query.service_type.as_str()
    {
        return None;
    }

    let target_score = match rule.target_language.as_deref() {
        None => 0,
        Some(t) if t.eq_ignore_ascii_case(query.target_language) => 2,
        Some(_) => return None,
    };
    let state_score = match (rule.state.as_deref(), query.state) {
        (None, _) => 0,
        (Some(s), Some(q)) if s.eq_ignore_ascii_case(q) => 1,
        (Some(_), _) => return None,
    };

    Some(target_score + state_score)
}

/// Most specific applicable rule; ties go to the most recently updated
pub fn resolve_rule<'r>(rules: &'r [PricingRule], query: &RuleQuery<'_>) -> Option<&'r PricingRule> {
    rules
        .iter()
        .filter_map(|rule| specificity(rule, query).map(|score| (score, rule)))
        .max_by(|(a_score, a), (b_score, b)| match a_score.cmp(b_score) {
            Ordering::Equal => a.updated_at.cmp(&b.updated_at),
            other => other,
        })
        .map(|(_, rule)| rule)
}

/// Price estimate for a job, resolved against stored rules
#[derive(Debug, Clone, Serialize)]
pub struct PriceEstimate {
    pub rule: PricingRule,
    pub price: QuotePrice,
}

/// Resolve the applicable rule and price `word_count` units with it
pub async fn estimate(pool: &DatabasePool, query: &RuleQuery<'_>, word_count: i64) -> Result<PriceEstimate> {
    let rule = find_rule(pool, query).await?;
    let price = calculate_quote_price(word_count, rule.rate, rule.minimum_charge);
    Ok(PriceEstimate { rule, price })
}

/// Load candidate rules and pick the most specific one
pub async fn find_rule(pool: &DatabasePool, query: &RuleQuery<'_>) -> Result<PricingRule> {
    let rules =
        PricingRuleRepository::list_active_for(pool, query.source_language, query.service_type.as_str())
            .await?;

    resolve_rule(&rules, query).cloned().ok_or_else(|| {
        LinguabridgeError::not_found(
            "pricing rule",
            format!(
                "{}->{} {}{}",
                query.source_language,
                query.target_language,
                query.service_type,
                query.state.map(|s| format!(" in {}", s)).unwrap_or_default()
            ),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn rule(id: &str, target: Option<&str>, state: Option<&str>, rate: f64, updated_at: &str) -> PricingRule {
        PricingRule {
            id: id.to_string(),
            name: id.to_string(),
            source_language: "en".to_string(),
            target_language: target.map(str::to_string),
            service_type: "translation".to_string(),
            state: state.map(str::to_string),
            unit: "per_word".to_string(),
            rate,
            minimum_charge: 25.0,
            active: true,
            created_at: "2026-01-01T00:00:00Z".to_string(),
            updated_at: updated_at.to_string(),
        }
    }

    fn query<'a>(target: &'a str, state: Option<&'a str>) -> RuleQuery<'a> {
        RuleQuery {
            source_language: "en",
            target_language: target,
            service_type: ServiceType::Translation,
            state,
        }
    }

    #[test]
    fn test_minimum_charge_applies() {
        let price = calculate_quote_price(100, 0.12, 25.0);
        assert_eq!(price.subtotal, 25.0);
        assert_eq!(price.tax, 0.0);
        assert_eq!(price.total, 25.0);

        let price = calculate_quote_price(1000, 0.12, 25.0);
        assert!((price.subtotal - 120.0).abs() < 1e-9);
    }

    #[test]
    fn test_exact_target_beats_wildcard() {
        let rules = vec![
            rule("any", None, None, 0.10, "2026-01-01T00:00:00Z"),
            rule("es", Some("es"), None, 0.12, "2026-01-01T00:00:00Z"),
        ];
        assert_eq!(resolve_rule(&rules, &query("es", None)).unwrap().id, "es");
        assert_eq!(resolve_rule(&rules, &query("fr", None)).unwrap().id, "any");
    }

    #[test]
    fn test_target_outranks_state() {
        let rules = vec![
            rule("fl", None, Some("FL"), 0.09, "2026-01-01T00:00:00Z"),
            rule("es", Some("es"), None, 0.12, "2026-01-01T00:00:00Z"),
            rule("es-fl", Some("es"), Some("FL"), 0.11, "2026-01-01T00:00:00Z"),
        ];
        assert_eq!(resolve_rule(&rules, &query("es", Some("FL"))).unwrap().id, "es-fl");
        assert_eq!(resolve_rule(&rules, &query("es", Some("NY"))).unwrap().id, "es");
        assert_eq!(resolve_rule(&rules, &query("fr", Some("FL"))).unwrap().id, "fl");
        assert!(resolve_rule(&rules, &query("fr", None)).is_none());
    }

    #[test]
    fn test_tie_goes_to_latest_update() {
        let rules = vec![
            rule("old", Some("es"), None, 0.10, "2026-01-01T00:00:00Z"),
            rule("new", Some("es"), None, 0.14, "2026-03-01T00:00:00Z"),
        ];
        assert_eq!(resolve_rule(&rules, &query("es", None)).unwrap().id, "new");
    }

    #[test]
    fn test_inactive_and_other_service_ignored() {
        let mut inactive = rule("inactive", Some("es"), None, 0.10, "2026-01-01T00:00:00Z");
        inactive.active = false;
        let mut onsite = rule("onsite", Some("es"), None, 60.0, "2026-01-01T00:00:00Z");
        onsite.service_type = "onsite".to_string();

        let rules = vec![inactive, onsite];
        assert!(resolve_rule(&rules, &query("es", None)).is_none());
    }

    #[test]
    fn test_pairs_are_directional() {
        let rules = vec![rule("en-es", Some("es"), None, 0.12, "2026-01-01T00:00:00Z")];
        let reverse = RuleQuery {
            source_language: "es",
            target_language: "en",
            service_type: ServiceType::Translation,
            state: None,
        };
        assert!(resolve_rule(&rules, &reverse).is_none());
    }

    proptest! {
        #[test]
        fn prop_price_formula(word_count in 0i64..1_000_000, rate in 0.0f64..5.0, minimum in 0.0f64..500.0) {
            let price = calculate_quote_price(word_count, rate, minimum);
            prop_assert_eq!(price.subtotal, (word_count as f64 * rate).max(minimum));
            prop_assert_eq!(price.tax, 0.0);
            prop_assert_eq!(price.total, price.subtotal);
        }
    }
}
