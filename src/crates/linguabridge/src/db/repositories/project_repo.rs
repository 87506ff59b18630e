//! Project repository for database operations

use crate::db::models::Project;
use crate::db::now_timestamp;
use sqlx::{Executor, Sqlite};

/// Project repository
pub struct ProjectRepository;

impl ProjectRepository {
    /// Insert a project
    pub async fn create<'c, E>(executor: E, project: &Project) -> Result<Project, sqlx::Error>
    where
        E: Executor<'c, Database = Sqlite>,
    {
        sqlx::query_as::<_, Project>(
            "INSERT INTO projects (id, quote_id, customer_id, name, source_language, target_language, service_type,
                                   address, latitude, longitude, scheduled_at, linguist_id, status, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *",
        )
        .bind(&project.id)
        .bind(&project.quote_id)
        .bind(&project.customer_id)
        .bind(&project.name)
        .bind(&project.source_language)
        .bind(&project.target_language)
        .bind(&project.service_type)
        .bind(&project.address)
        .bind(project.latitude)
        .bind(project.longitude)
        .bind(&project.scheduled_at)
        .bind(&project.linguist_id)
        .bind(&project.status)
        .bind(&project.created_at)
        .bind(&project.updated_at)
        .fetch_one(executor)
        .await
    }

    /// Get a project by ID
    pub async fn get_by_id<'c, E>(executor: E, id: &str) -> Result<Option<Project>, sqlx::Error>
    where
        E: Executor<'c, Database = Sqlite>,
    {
        sqlx::query_as::<_, Project>("SELECT * FROM projects WHERE id = ?")
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Get the project created from a quote
    pub async fn get_by_quote<'c, E>(executor: E, quote_id: &str) -> Result<Option<Project>, sqlx::Error>
    where
        E: Executor<'c, Database = Sqlite>,
    {
        sqlx::query_as::<_, Project>("SELECT * FROM projects WHERE quote_id = ?")
            .bind(quote_id)
            .fetch_optional(executor)
            .await
    }

    /// List projects, newest first, optionally by status
    pub async fn list<'c, E>(executor: E, status: Option<&str>) -> Result<Vec<Project>, sqlx::Error>
    where
        E: Executor<'c, Database = Sqlite>,
    {
        sqlx::query_as::<_, Project>(
            "SELECT * FROM projects WHERE (? IS NULL OR status = ?) ORDER BY created_at DESC, id",
        )
        .bind(status)
        .bind(status)
        .fetch_all(executor)
        .await
    }

    /// Set the status column
    pub async fn update_status<'c, E>(executor: E, id: &str, status: &str) -> Result<u64, sqlx::Error>
    where
        E: Executor<'c, Database = Sqlite>,
    {
        let result = sqlx::query("UPDATE projects SET status = ?, updated_at = ? WHERE id = ?")
            .bind(status)
            .bind(now_timestamp())
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }

    /// Assign a linguist, only while no one else holds the project
    pub async fn assign_linguist<'c, E>(executor: E, id: &str, linguist_id: &str) -> Result<u64, sqlx::Error>
    where
        E: Executor<'c, Database = Sqlite>,
    {
        let result = sqlx::query(
            "UPDATE projects SET linguist_id = ?, status = 'assigned', updated_at = ?
             WHERE id = ? AND linguist_id IS NULL",
        )
        .bind(linguist_id)
        .bind(now_timestamp())
        .bind(id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }
}
