//! Linguist repository for database operations

use crate::db::models::{Linguist, LinguistLanguage};
use crate::db::now_timestamp;
use crate::domain::ServiceType;
use sqlx::{Executor, Sqlite, SqliteConnection};

/// Linguist repository for managing vendor profiles and their language tags
pub struct LinguistRepository;

impl LinguistRepository {
    /// Insert a linguist
    pub async fn create<'c, E>(executor: E, linguist: &Linguist) -> Result<Linguist, sqlx::Error>
    where
        E: Executor<'c, Database = Sqlite>,
    {
        sqlx::query_as::<_, Linguist>(
            "INSERT INTO linguists (id, first_name, last_name, email, phone, city, state, latitude, longitude,
                                    max_travel_distance, available_onsite, available_video, available_phone,
                                    hourly_rate, per_word_rate, active, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *",
        )
        .bind(&linguist.id)
        .bind(&linguist.first_name)
        .bind(&linguist.last_name)
        .bind(&linguist.email)
        .bind(&linguist.phone)
        .bind(&linguist.city)
        .bind(&linguist.state)
        .bind(linguist.latitude)
        .bind(linguist.longitude)
        .bind(linguist.max_travel_distance)
        .bind(linguist.available_onsite)
        .bind(linguist.available_video)
        .bind(linguist.available_phone)
        .bind(linguist.hourly_rate)
        .bind(linguist.per_word_rate)
        .bind(linguist.active)
        .bind(&linguist.created_at)
        .bind(&linguist.updated_at)
        .fetch_one(executor)
        .await
    }

    /// Get a linguist by ID
    pub async fn get_by_id<'c, E>(executor: E, id: &str) -> Result<Option<Linguist>, sqlx::Error>
    where
        E: Executor<'c, Database = Sqlite>,
    {
        sqlx::query_as::<_, Linguist>("SELECT * FROM linguists WHERE id = ?")
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Get a linguist by email (case-insensitive)
    pub async fn get_by_email<'c, E>(executor: E, email: &str) -> Result<Option<Linguist>, sqlx::Error>
    where
        E: Executor<'c, Database = Sqlite>,
    {
        sqlx::query_as::<_, Linguist>("SELECT * FROM linguists WHERE lower(email) = lower(?)")
            .bind(email)
            .fetch_optional(executor)
            .await
    }

    /// List all linguists by name
    pub async fn list<'c, E>(executor: E) -> Result<Vec<Linguist>, sqlx::Error>
    where
        E: Executor<'c, Database = Sqlite>,
    {
        sqlx::query_as::<_, Linguist>("SELECT * FROM linguists ORDER BY last_name, first_name, id")
            .fetch_all(executor)
            .await
    }

    /// Overwrite the mutable columns of a linguist
    pub async fn update<'c, E>(executor: E, linguist: &Linguist) -> Result<u64, sqlx::Error>
    where
        E: Executor<'c, Database = Sqlite>,
    {
        let result = sqlx::query(
            "UPDATE linguists SET first_name = ?, last_name = ?, email = ?, phone = ?, city = ?, state = ?,
                                  latitude = ?, longitude = ?, max_travel_distance = ?,
                                  available_onsite = ?, available_video = ?, available_phone = ?,
                                  hourly_rate = ?, per_word_rate = ?, active = ?, updated_at = ?
             WHERE id = ?",
        )
        .bind(&linguist.first_name)
        .bind(&linguist.last_name)
        .bind(&linguist.email)
        .bind(&linguist.phone)
        .bind(&linguist.city)
        .bind(&linguist.state)
        .bind(linguist.latitude)
        .bind(linguist.longitude)
        .bind(linguist.max_travel_distance)
        .bind(linguist.available_onsite)
        .bind(linguist.available_video)
        .bind(linguist.available_phone)
        .bind(linguist.hourly_rate)
        .bind(linguist.per_word_rate)
        .bind(linguist.active)
        .bind(now_timestamp())
        .bind(&linguist.id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }

    /// Delete a linguist (language tags cascade)
    pub async fn delete<'c, E>(executor: E, id: &str) -> Result<u64, sqlx::Error>
    where
        E: Executor<'c, Database = Sqlite>,
    {
        let result = sqlx::query("DELETE FROM linguists WHERE id = ?")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }

    /// Replace every language tag of a linguist
    ///
    /// Runs several statements; call it inside a transaction.
    pub async fn set_languages(
        conn: &mut SqliteConnection,
        linguist_id: &str,
        languages: &[LinguistLanguage],
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM linguist_languages WHERE linguist_id = ?")
            .bind(linguist_id)
            .execute(&mut *conn)
            .await?;

        for tag in languages {
            sqlx::query(
                "INSERT OR IGNORE INTO linguist_languages (linguist_id, language_code, service)
                 VALUES (?, ?, ?)",
            )
            .bind(linguist_id)
            .bind(&tag.language_code)
            .bind(&tag.service)
            .execute(&mut *conn)
            .await?;
        }
        Ok(())
    }

    /// Language tags of one linguist
    pub async fn languages_for<'c, E>(executor: E, linguist_id: &str) -> Result<Vec<LinguistLanguage>, sqlx::Error>
    where
        E: Executor<'c, Database = Sqlite>,
    {
        sqlx::query_as::<_, LinguistLanguage>(
            "SELECT linguist_id, language_code, service FROM linguist_languages
             WHERE linguist_id = ? ORDER BY service, language_code",
        )
        .bind(linguist_id)
        .fetch_all(executor)
        .await
    }

    /// Active linguists flagged available for `service` who interpret both languages
    pub async fn find_interpretation_candidates<'c, E>(
        executor: E,
        source_language: &str,
        target_language: &str,
        service: ServiceType,
    ) -> Result<Vec<Linguist>, sqlx::Error>
    where
        E: Executor<'c, Database = Sqlite>,
    {
        let availability_column = match service {
            ServiceType::Onsite => "available_onsite",
            ServiceType::Video => "available_video",
            ServiceType::Phone => "available_phone",
            ServiceType::Translation => return Ok(Vec::new()),
        };
        let required: i64 = if source_language == target_language { 1 } else { 2 };

        let sql = format!(
            "SELECT l.* FROM linguists l
             WHERE l.active = 1
               AND l.{availability_column} = 1
               AND (SELECT COUNT(DISTINCT ll.language_code) FROM linguist_languages ll
                    WHERE ll.linguist_id = l.id
                      AND ll.service = 'interpretation'
                      AND ll.language_code IN (?, ?)) = ?
             ORDER BY l.last_name, l.id"
        );

        sqlx::query_as::<_, Linguist>(&sql)
            .bind(source_language)
            .bind(target_language)
            .bind(required)
            .fetch_all(executor)
            .await
    }
}
