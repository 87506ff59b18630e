//! Database connection management
//!
//! Provides database connection pooling, migrations, and health checks.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use sqlx::{Sqlite, Transaction};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

/// Type alias for the database connection pool
pub type DatabasePool = SqlitePool;

/// How long a writer waits for SQLite's write lock before failing
pub const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Begin a transaction that holds the write lock from its first statement
///
/// A deferred transaction that reads before it writes cannot wait for the
/// lock: SQLite fails the upgrade with SQLITE_BUSY as soon as another
/// connection has written. The no-op UPDATE takes the lock up front, so
/// concurrent read-then-write transactions queue on [`BUSY_TIMEOUT`] and
/// each sees the previous one's committed rows.
pub async fn begin_write(pool: &DatabasePool) -> Result<Transaction<'static, Sqlite>, sqlx::Error> {
    let mut tx = pool.begin().await?;
    sqlx::query("UPDATE languages SET name = name WHERE 0")
        .execute(&mut *tx)
        .await?;
    Ok(tx)
}

/// Database connection statistics
#[derive(Debug, Clone, serde::Serialize)]
pub struct PoolStatistics {
    /// Number of currently idle connections
    pub idle_connections: u32,

    /// Number of connections checked out
    pub active_connections: u32,

    /// Connections currently open
    pub open_connections: u32,
}

/// Database connection wrapper
#[derive(Clone)]
pub struct DatabaseConnection {
    pool: Arc<DatabasePool>,
}

impl DatabaseConnection {
    /// Create a new database connection from a connection string
    ///
    /// # Arguments
    /// * `database_url` - SQLite connection string (e.g., "sqlite://agency.db")
    ///
    /// The file is created when missing, foreign keys are enforced and the
    /// journal runs in WAL mode.
    pub async fn new(database_url: &str) -> Result<Self, sqlx::Error> {
        Self::with_max_connections(database_url, 5).await
    }

    /// Create a new database connection with custom pool size
    pub async fn with_max_connections(
        database_url: &str,
        max_connections: u32,
    ) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(BUSY_TIMEOUT);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    /// Single-connection in-memory database with the schema applied
    ///
    /// Every pooled connection to `sqlite::memory:` would see its own empty
    /// database, so the pool is pinned to one connection.
    pub async fn in_memory() -> Result<Self, sqlx::Error> {
        let conn = Self::with_max_connections("sqlite::memory:", 1).await?;
        conn.run_migrations().await?;
        Ok(conn)
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &DatabasePool {
        &self.pool
    }

    /// Run migrations on the database
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(self.pool.as_ref()).await
    }

    /// Perform a health check by running a simple query
    pub async fn health_check(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").fetch_one(self.pool.as_ref()).await?;

        Ok(())
    }

    /// Get connection pool statistics
    pub fn get_pool_statistics(&self) -> PoolStatistics {
        let idle = self.pool.num_idle() as u32;
        let open = self.pool.size();

        PoolStatistics {
            idle_connections: idle,
            active_connections: open.saturating_sub(idle),
            open_connections: open,
        }
    }

    /// Close the connection pool gracefully
    pub async fn close(self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_connection() {
        let conn = DatabaseConnection::with_max_connections("sqlite::memory:", 1)
            .await
            .unwrap();

        assert!(conn.pool().acquire().await.is_ok());
    }

    #[tokio::test]
    async fn test_health_check_success() {
        let conn = DatabaseConnection::in_memory().await.unwrap();

        assert!(conn.health_check().await.is_ok());
    }

    #[tokio::test]
    async fn test_migrations_seed_languages_and_templates() {
        let conn = DatabaseConnection::in_memory().await.unwrap();

        let (languages,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM languages")
            .fetch_one(conn.pool())
            .await
            .unwrap();
        assert!(languages >= 2);

        let (templates,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM email_templates WHERE name = 'job_invitation'",
        )
        .fetch_one(conn.pool())
        .await
        .unwrap();
        assert_eq!(templates, 1);
    }

    #[tokio::test]
    async fn test_get_pool_statistics() {
        let conn = DatabaseConnection::in_memory().await.unwrap();

        let stats = conn.get_pool_statistics();
        assert_eq!(stats.open_connections, 1);
        assert!(stats.active_connections <= stats.open_connections);
    }

    #[tokio::test]
    async fn test_file_database_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("agency.db");
        let url = format!("sqlite://{}", path.display());

        let conn = DatabaseConnection::new(&url).await.unwrap();
        conn.run_migrations().await.unwrap();
        assert!(path.exists());
        conn.close().await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_write_transactions_queue_instead_of_failing() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}", dir.path().join("agency.db").display());
        let conn = DatabaseConnection::new(&url).await.unwrap();
        conn.run_migrations().await.unwrap();
        sqlx::query("CREATE TABLE counter (n INTEGER NOT NULL)")
            .execute(conn.pool())
            .await
            .unwrap();
        sqlx::query("INSERT INTO counter (n) VALUES (0)")
            .execute(conn.pool())
            .await
            .unwrap();

        // Each task reads, yields, then writes what it read plus one.
        let mut handles = Vec::new();
        for _ in 0..4 {
            let pool = conn.pool().clone();
            handles.push(tokio::spawn(async move {
                let mut tx = begin_write(&pool).await?;
                let (n,): (i64,) = sqlx::query_as("SELECT n FROM counter")
                    .fetch_one(&mut *tx)
                    .await?;
                tokio::time::sleep(Duration::from_millis(20)).await;
                sqlx::query("UPDATE counter SET n = ?")
                    .bind(n + 1)
                    .execute(&mut *tx)
                    .await?;
                tx.commit().await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let (n,): (i64,) = sqlx::query_as("SELECT n FROM counter")
            .fetch_one(conn.pool())
            .await
            .unwrap();
        assert_eq!(n, 4);
        conn.close().await;
    }
}
