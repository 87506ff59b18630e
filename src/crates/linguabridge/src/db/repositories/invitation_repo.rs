//! Job invitation repository for database operations

use crate::db::models::JobInvitation;
use sqlx::{Executor, Sqlite};

/// Job invitation repository
pub struct InvitationRepository;

impl InvitationRepository {
    /// Insert an invitation
    pub async fn create<'c, E>(executor: E, invitation: &JobInvitation) -> Result<JobInvitation, sqlx::Error>
    where
        E: Executor<'c, Database = Sqlite>,
    {
        sqlx::query_as::<_, JobInvitation>(
            "INSERT INTO job_invitations (id, project_id, linguist_id, token, status, distance_miles,
                                          expires_at, responded_at, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *",
        )
        .bind(&invitation.id)
        .bind(&invitation.project_id)
        .bind(&invitation.linguist_id)
        .bind(&invitation.token)
        .bind(&invitation.status)
        .bind(invitation.distance_miles)
        .bind(&invitation.expires_at)
        .bind(&invitation.responded_at)
        .bind(&invitation.created_at)
        .fetch_one(executor)
        .await
    }

    /// Look an invitation up by its emailed token
    pub async fn get_by_token<'c, E>(executor: E, token: &str) -> Result<Option<JobInvitation>, sqlx::Error>
    where
        E: Executor<'c, Database = Sqlite>,
    {
        sqlx::query_as::<_, JobInvitation>("SELECT * FROM job_invitations WHERE token = ?")
            .bind(token)
            .fetch_optional(executor)
            .await
    }

    /// Invitations sent for a project, closest linguist first
    pub async fn list_by_project<'c, E>(executor: E, project_id: &str) -> Result<Vec<JobInvitation>, sqlx::Error>
    where
        E: Executor<'c, Database = Sqlite>,
    {
        sqlx::query_as::<_, JobInvitation>(
            "SELECT * FROM job_invitations WHERE project_id = ?
             ORDER BY distance_miles IS NULL, distance_miles, created_at",
        )
        .bind(project_id)
        .fetch_all(executor)
        .await
    }

    /// Whether a linguist already holds a pending invitation for a project
    pub async fn has_pending<'c, E>(executor: E, project_id: &str, linguist_id: &str) -> Result<bool, sqlx::Error>
    where
        E: Executor<'c, Database = Sqlite>,
    {
        let result: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM job_invitations
             WHERE project_id = ? AND linguist_id = ? AND status = 'PENDING'",
        )
        .bind(project_id)
        .bind(linguist_id)
        .fetch_one(executor)
        .await?;
        Ok(result.0 > 0)
    }

    /// Number of accepted invitations on a project
    pub async fn count_accepted<'c, E>(executor: E, project_id: &str) -> Result<i64, sqlx::Error>
    where
        E: Executor<'c, Database = Sqlite>,
    {
        let result: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM job_invitations WHERE project_id = ? AND status = 'ACCEPTED'",
        )
        .bind(project_id)
        .fetch_one(executor)
        .await?;
        Ok(result.0)
    }

    /// Move a PENDING invitation to `status`; returns 0 when it was no longer pending
    pub async fn resolve_pending<'c, E>(
        executor: E,
        id: &str,
        status: &str,
        responded_at: &str,
    ) -> Result<u64, sqlx::Error>
    where
        E: Executor<'c, Database = Sqlite>,
    {
        let result = sqlx::query(
            "UPDATE job_invitations SET status = ?, responded_at = ?
             WHERE id = ? AND status = 'PENDING'",
        )
        .bind(status)
        .bind(responded_at)
        .bind(id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }

    /// Expire every other pending invitation of a project
    pub async fn expire_other_pending<'c, E>(
        executor: E,
        project_id: &str,
        keep_id: &str,
    ) -> Result<u64, sqlx::Error>
    where
        E: Executor<'c, Database = Sqlite>,
    {
        let result = sqlx::query(
            "UPDATE job_invitations SET status = 'EXPIRED'
             WHERE project_id = ? AND id <> ? AND status = 'PENDING'",
        )
        .bind(project_id)
        .bind(keep_id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }

    /// Expire every pending invitation of a project
    pub async fn expire_pending_for_project<'c, E>(executor: E, project_id: &str) -> Result<u64, sqlx::Error>
    where
        E: Executor<'c, Database = Sqlite>,
    {
        let result = sqlx::query(
            "UPDATE job_invitations SET status = 'EXPIRED' WHERE project_id = ? AND status = 'PENDING'",
        )
        .bind(project_id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }

    /// Expire pending invitations whose deadline is before `now`
    pub async fn expire_overdue<'c, E>(executor: E, now: &str) -> Result<u64, sqlx::Error>
    where
        E: Executor<'c, Database = Sqlite>,
    {
        let result = sqlx::query(
            "UPDATE job_invitations SET status = 'EXPIRED'
             WHERE status = 'PENDING' AND expires_at < ?",
        )
        .bind(now)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }
}
