//! Quote repository for database operations

use crate::db::models::Quote;
use crate::db::now_timestamp;
use sqlx::{Executor, Sqlite};

/// Quote repository
pub struct QuoteRepository;

impl QuoteRepository {
    /// Insert a quote
    pub async fn create<'c, E>(executor: E, quote: &Quote) -> Result<Quote, sqlx::Error>
    where
        E: Executor<'c, Database = Sqlite>,
    {
        sqlx::query_as::<_, Quote>(
            "INSERT INTO quotes (id, quote_number, customer_id, source_language, target_language, service_type,
                                 word_count, rate, minimum_charge, subtotal, discount, tax, total, coupon_code,
                                 address, latitude, longitude, scheduled_at, status, notes, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *",
        )
        .bind(&quote.id)
        .bind(&quote.quote_number)
        .bind(&quote.customer_id)
        .bind(&quote.source_language)
        .bind(&quote.target_language)
        .bind(&quote.service_type)
        .bind(quote.word_count)
        .bind(quote.rate)
        .bind(quote.minimum_charge)
        .bind(quote.subtotal)
        .bind(quote.discount)
        .bind(quote.tax)
        .bind(quote.total)
        .bind(&quote.coupon_code)
        .bind(&quote.address)
        .bind(quote.latitude)
        .bind(quote.longitude)
        .bind(&quote.scheduled_at)
        .bind(&quote.status)
        .bind(&quote.notes)
        .bind(&quote.created_at)
        .bind(&quote.updated_at)
        .fetch_one(executor)
        .await
    }

    /// Get a quote by ID
    pub async fn get_by_id<'c, E>(executor: E, id: &str) -> Result<Option<Quote>, sqlx::Error>
    where
        E: Executor<'c, Database = Sqlite>,
    {
        sqlx::query_as::<_, Quote>("SELECT * FROM quotes WHERE id = ?")
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// List quotes, newest first, optionally narrowed by status and customer
    pub async fn list<'c, E>(
        executor: E,
        status: Option<&str>,
        customer_id: Option<&str>,
    ) -> Result<Vec<Quote>, sqlx::Error>
    where
        E: Executor<'c, Database = Sqlite>,
    {
        sqlx::query_as::<_, Quote>(
            "SELECT * FROM quotes
             WHERE (? IS NULL OR status = ?) AND (? IS NULL OR customer_id = ?)
             ORDER BY created_at DESC, quote_number DESC",
        )
        .bind(status)
        .bind(status)
        .bind(customer_id)
        .bind(customer_id)
        .fetch_all(executor)
        .await
    }

    /// Set the status column
    pub async fn update_status<'c, E>(executor: E, id: &str, status: &str) -> Result<u64, sqlx::Error>
    where
        E: Executor<'c, Database = Sqlite>,
    {
        let result = sqlx::query("UPDATE quotes SET status = ?, updated_at = ? WHERE id = ?")
            .bind(status)
            .bind(now_timestamp())
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }

    /// Number of quotes a customer has already been billed for
    pub async fn count_billed_for_customer<'c, E>(executor: E, customer_id: &str) -> Result<i64, sqlx::Error>
    where
        E: Executor<'c, Database = Sqlite>,
    {
        let result: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM quotes
             WHERE customer_id = ? AND status IN ('INVOICED', 'INVOICE_PAID')",
        )
        .bind(customer_id)
        .fetch_one(executor)
        .await?;
        Ok(result.0)
    }

    /// Count quotes by status
    pub async fn count_by_status<'c, E>(executor: E, status: &str) -> Result<i64, sqlx::Error>
    where
        E: Executor<'c, Database = Sqlite>,
    {
        let result: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM quotes WHERE status = ?")
            .bind(status)
            .fetch_one(executor)
            .await?;
        Ok(result.0)
    }
}
