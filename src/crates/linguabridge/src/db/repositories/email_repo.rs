//! Email template and outbox repository

use crate::db::models::{EmailTemplate, OutboundEmail};
use sqlx::{Executor, Sqlite};

/// Email repository
pub struct EmailRepository;

impl EmailRepository {
    /// Get a template by name
    pub async fn get_template<'c, E>(executor: E, name: &str) -> Result<Option<EmailTemplate>, sqlx::Error>
    where
        E: Executor<'c, Database = Sqlite>,
    {
        sqlx::query_as::<_, EmailTemplate>("SELECT * FROM email_templates WHERE name = ?")
            .bind(name)
            .fetch_optional(executor)
            .await
    }

    /// Queue a rendered message
    pub async fn enqueue<'c, E>(executor: E, email: &OutboundEmail) -> Result<(), sqlx::Error>
    where
        E: Executor<'c, Database = Sqlite>,
    {
        sqlx::query(
            "INSERT INTO outbound_emails (id, recipient, template, subject, body, status, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&email.id)
        .bind(&email.recipient)
        .bind(&email.template)
        .bind(&email.subject)
        .bind(&email.body)
        .bind(&email.status)
        .bind(&email.created_at)
        .execute(executor)
        .await?;
        Ok(())
    }

    /// Messages queued for a recipient, oldest first
    pub async fn list_for_recipient<'c, E>(executor: E, recipient: &str) -> Result<Vec<OutboundEmail>, sqlx::Error>
    where
        E: Executor<'c, Database = Sqlite>,
    {
        sqlx::query_as::<_, OutboundEmail>(
            "SELECT * FROM outbound_emails WHERE recipient = ? ORDER BY created_at, id",
        )
        .bind(recipient)
        .fetch_all(executor)
        .await
    }
}
