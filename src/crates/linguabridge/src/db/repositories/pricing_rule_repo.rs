//! Pricing rule repository for database operations

use crate::db::models::PricingRule;
use crate::db::now_timestamp;
use sqlx::{Executor, Sqlite};

/// Pricing rule repository
pub struct PricingRuleRepository;

impl PricingRuleRepository {
    /// Insert a pricing rule
    pub async fn create<'c, E>(executor: E, rule: &PricingRule) -> Result<PricingRule, sqlx::Error>
    where
        E: Executor<'c, Database = Sqlite>,
    {
        sqlx::query_as::<_, PricingRule>(
            "INSERT INTO pricing_rules (id, name, source_language, target_language, service_type, state,
                                        unit, rate, minimum_charge, active, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *",
        )
        .bind(&rule.id)
        .bind(&rule.name)
        .bind(&rule.source_language)
        .bind(&rule.target_language)
        .bind(&rule.service_type)
        .bind(&rule.state)
        .bind(&rule.unit)
        .bind(rule.rate)
        .bind(rule.minimum_charge)
        .bind(rule.active)
        .bind(&rule.created_at)
        .bind(&rule.updated_at)
        .fetch_one(executor)
        .await
    }

    /// Get a pricing rule by ID
    pub async fn get_by_id<'c, E>(executor: E, id: &str) -> Result<Option<PricingRule>, sqlx::Error>
    where
        E: Executor<'c, Database = Sqlite>,
    {
        sqlx::query_as::<_, PricingRule>("SELECT * FROM pricing_rules WHERE id = ?")
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// List all pricing rules
    pub async fn list<'c, E>(executor: E) -> Result<Vec<PricingRule>, sqlx::Error>
    where
        E: Executor<'c, Database = Sqlite>,
    {
        sqlx::query_as::<_, PricingRule>(
            "SELECT * FROM pricing_rules ORDER BY source_language, target_language, service_type, state",
        )
        .fetch_all(executor)
        .await
    }

    /// Active rules that could apply to a source language and service type
    pub async fn list_active_for<'c, E>(
        executor: E,
        source_language: &str,
        service_type: &str,
    ) -> Result<Vec<PricingRule>, sqlx::Error>
    where
        E: Executor<'c, Database = Sqlite>,
    {
        sqlx::query_as::<_, PricingRule>(
            "SELECT * FROM pricing_rules
             WHERE active = 1 AND source_language = ? AND service_type = ?",
        )
        .bind(source_language)
        .bind(service_type)
        .fetch_all(executor)
        .await
    }

    /// Overwrite the mutable columns of a rule
    pub async fn update<'c, E>(executor: E, rule: &PricingRule) -> Result<u64, sqlx::Error>
    where
        E: Executor<'c, Database = Sqlite>,
    {
        let result = sqlx::query(
            "UPDATE pricing_rules SET name = ?, source_language = ?, target_language = ?, service_type = ?,
                                      state = ?, unit = ?, rate = ?, minimum_charge = ?, active = ?, updated_at = ?
             WHERE id = ?",
        )
        .bind(&rule.name)
        .bind(&rule.source_language)
        .bind(&rule.target_language)
        .bind(&rule.service_type)
        .bind(&rule.state)
        .bind(&rule.unit)
        .bind(rule.rate)
        .bind(rule.minimum_charge)
        .bind(rule.active)
        .bind(now_timestamp())
        .bind(&rule.id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }

    /// Delete a pricing rule
    pub async fn delete<'c, E>(executor: E, id: &str) -> Result<u64, sqlx::Error>
    where
        E: Executor<'c, Database = Sqlite>,
    {
        let result = sqlx::query("DELETE FROM pricing_rules WHERE id = ?")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }
}
