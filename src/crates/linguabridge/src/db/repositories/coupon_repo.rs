//! Coupon repository for database operations

use crate::db::models::{Coupon, CouponRedemption};
use sqlx::{Executor, Sqlite};

/// Coupon repository
pub struct CouponRepository;

impl CouponRepository {
    /// Insert a coupon
    pub async fn create<'c, E>(executor: E, coupon: &Coupon) -> Result<Coupon, sqlx::Error>
    where
        E: Executor<'c, Database = Sqlite>,
    {
        sqlx::query_as::<_, Coupon>(
            "INSERT INTO coupons (id, code, discount_type, discount_value, max_discount, active, valid_from,
                                  valid_until, usage_limit, usage_count, minimum_order, service_types,
                                  first_order_only, one_per_customer, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *",
        )
        .bind(&coupon.id)
        .bind(&coupon.code)
        .bind(&coupon.discount_type)
        .bind(coupon.discount_value)
        .bind(coupon.max_discount)
        .bind(coupon.active)
        .bind(&coupon.valid_from)
        .bind(&coupon.valid_until)
        .bind(coupon.usage_limit)
        .bind(coupon.usage_count)
        .bind(coupon.minimum_order)
        .bind(&coupon.service_types)
        .bind(coupon.first_order_only)
        .bind(coupon.one_per_customer)
        .bind(&coupon.created_at)
        .fetch_one(executor)
        .await
    }

    /// Get a coupon by ID
    pub async fn get_by_id<'c, E>(executor: E, id: &str) -> Result<Option<Coupon>, sqlx::Error>
    where
        E: Executor<'c, Database = Sqlite>,
    {
        sqlx::query_as::<_, Coupon>("SELECT * FROM coupons WHERE id = ?")
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Get a coupon by code; the column collates case-insensitively
    pub async fn get_by_code<'c, E>(executor: E, code: &str) -> Result<Option<Coupon>, sqlx::Error>
    where
        E: Executor<'c, Database = Sqlite>,
    {
        sqlx::query_as::<_, Coupon>("SELECT * FROM coupons WHERE code = ?")
            .bind(code.trim())
            .fetch_optional(executor)
            .await
    }

    /// List all coupons
    pub async fn list<'c, E>(executor: E) -> Result<Vec<Coupon>, sqlx::Error>
    where
        E: Executor<'c, Database = Sqlite>,
    {
        sqlx::query_as::<_, Coupon>("SELECT * FROM coupons ORDER BY created_at DESC, code")
            .fetch_all(executor)
            .await
    }

    /// Delete a coupon
    pub async fn delete<'c, E>(executor: E, id: &str) -> Result<u64, sqlx::Error>
    where
        E: Executor<'c, Database = Sqlite>,
    {
        let result = sqlx::query("DELETE FROM coupons WHERE id = ?")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }

    /// Bump usage_count unless the usage limit is already reached
    pub async fn increment_usage<'c, E>(executor: E, id: &str) -> Result<u64, sqlx::Error>
    where
        E: Executor<'c, Database = Sqlite>,
    {
        let result = sqlx::query(
            "UPDATE coupons SET usage_count = usage_count + 1
             WHERE id = ? AND (usage_limit IS NULL OR usage_count < usage_limit)",
        )
        .bind(id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }

    /// Record a redemption
    pub async fn create_redemption<'c, E>(
        executor: E,
        redemption: &CouponRedemption,
    ) -> Result<CouponRedemption, sqlx::Error>
    where
        E: Executor<'c, Database = Sqlite>,
    {
        sqlx::query_as::<_, CouponRedemption>(
            "INSERT INTO coupon_redemptions (id, coupon_id, customer_id, quote_id, amount, created_at)
             VALUES (?, ?, ?, ?, ?, ?)
             RETURNING *",
        )
        .bind(&redemption.id)
        .bind(&redemption.coupon_id)
        .bind(&redemption.customer_id)
        .bind(&redemption.quote_id)
        .bind(redemption.amount)
        .bind(&redemption.created_at)
        .fetch_one(executor)
        .await
    }

    /// Whether a customer has already redeemed a coupon
    pub async fn has_redemption<'c, E>(executor: E, coupon_id: &str, customer_id: &str) -> Result<bool, sqlx::Error>
    where
        E: Executor<'c, Database = Sqlite>,
    {
        let result: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM coupon_redemptions WHERE coupon_id = ? AND customer_id = ?",
        )
        .bind(coupon_id)
        .bind(customer_id)
        .fetch_one(executor)
        .await?;
        Ok(result.0 > 0)
    }
}
