//! Language repository

use crate::db::models::Language;
use sqlx::{Executor, Sqlite};

/// Language repository for managing the language catalogue
pub struct LanguageRepository;

impl LanguageRepository {
    /// List all languages ordered by name
    pub async fn list<'c, E>(executor: E) -> Result<Vec<Language>, sqlx::Error>
    where
        E: Executor<'c, Database = Sqlite>,
    {
        sqlx::query_as::<_, Language>("SELECT code, name FROM languages ORDER BY name")
            .fetch_all(executor)
            .await
    }

    /// Insert a language
    pub async fn create<'c, E>(executor: E, code: &str, name: &str) -> Result<Language, sqlx::Error>
    where
        E: Executor<'c, Database = Sqlite>,
    {
        sqlx::query_as::<_, Language>(
            "INSERT INTO languages (code, name) VALUES (?, ?) RETURNING code, name",
        )
        .bind(code)
        .bind(name)
        .fetch_one(executor)
        .await
    }

    /// Check whether a language code exists
    pub async fn exists<'c, E>(executor: E, code: &str) -> Result<bool, sqlx::Error>
    where
        E: Executor<'c, Database = Sqlite>,
    {
        let result: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM languages WHERE code = ?")
            .bind(code)
            .fetch_one(executor)
            .await?;
        Ok(result.0 > 0)
    }
}
