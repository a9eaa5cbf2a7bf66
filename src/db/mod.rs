//! Database module for vidshelf.
//!
//! Owns the sqlx connection pool used by the metadata store and applies
//! schema migrations when the database is opened. The backend is chosen at
//! compile time through the `sqlite` (default) or `postgres` feature.

mod schema;

pub use schema::MIGRATIONS;

use std::time::Duration;

use tracing::{debug, info};

use crate::Result;

#[cfg(all(feature = "sqlite", feature = "postgres"))]
compile_error!("features `sqlite` and `postgres` are mutually exclusive");

#[cfg(not(any(feature = "sqlite", feature = "postgres")))]
compile_error!("one of the `sqlite` or `postgres` features must be enabled");

/// Connection pool type for the enabled backend.
#[cfg(feature = "sqlite")]
pub type DbPool = sqlx::SqlitePool;

/// Connection pool type for the enabled backend.
#[cfg(feature = "postgres")]
pub type DbPool = sqlx::PgPool;

/// Maximum pooled connections for file-backed databases.
const MAX_CONNECTIONS: u32 = 5;

/// How long a caller waits for a pooled connection.
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(10);

/// Database wrapper owning the connection pool.
pub struct Database {
    pool: DbPool,
}

impl Database {
    /// Connect to the database at `url` and apply pending migrations.
    ///
    /// For SQLite the file (and its parent directory) is created if missing.
    pub async fn open(url: &str) -> Result<Self> {
        info!(backend = Self::backend_name(), "Opening metadata database");

        let pool = Self::connect(url).await?;
        let db = Self { pool };
        db.migrate().await?;

        Ok(db)
    }

    /// Open an in-memory database for testing.
    #[cfg(feature = "sqlite")]
    pub async fn open_in_memory() -> Result<Self> {
        use sqlx::sqlite::SqlitePoolOptions;

        debug!("Opening in-memory database");

        // Every in-memory connection is a separate database, so pin the pool to one.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;

        let db = Self { pool };
        db.migrate().await?;

        Ok(db)
    }

    #[cfg(feature = "sqlite")]
    async fn connect(url: &str) -> Result<DbPool> {
        use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
        use std::str::FromStr;

        let opts = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5));

        if let Some(parent) = opts.get_filename().parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .connect_with(opts)
            .await?;

        Ok(pool)
    }

    #[cfg(feature = "postgres")]
    async fn connect(url: &str) -> Result<DbPool> {
        use sqlx::postgres::PgPoolOptions;

        let pool = PgPoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .connect(url)
            .await?;

        Ok(pool)
    }

    /// Name of the compiled-in backend.
    pub fn backend_name() -> &'static str {
        if cfg!(feature = "postgres") {
            "postgres"
        } else {
            "sqlite"
        }
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    /// Get the current schema version (0 when nothing has been applied).
    pub async fn schema_version(&self) -> Result<i64> {
        let version: i64 =
            sqlx::query_scalar("SELECT COALESCE(MAX(version), 0) FROM schema_version")
                .fetch_one(&self.pool)
                .await?;
        Ok(version)
    }

    /// Apply pending migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::raw_sql(
            "CREATE TABLE IF NOT EXISTS schema_version (
                version     BIGINT PRIMARY KEY,
                applied_at  TEXT NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;

        let current_version = self.schema_version().await?;
        if current_version as usize >= MIGRATIONS.len() {
            debug!("Database is up to date (version {})", current_version);
            return Ok(());
        }

        info!(
            "Migrating database from version {} to {}",
            current_version,
            MIGRATIONS.len()
        );

        for (i, migration) in MIGRATIONS.iter().enumerate().skip(current_version as usize) {
            let version = (i + 1) as i64;
            info!("Applying migration v{}", version);

            let mut tx = self.pool.begin().await?;
            sqlx::raw_sql(migration).execute(&mut *tx).await?;
            sqlx::query("INSERT INTO schema_version (version, applied_at) VALUES ($1, $2)")
                .bind(version)
                .bind(chrono::Utc::now().to_rfc3339())
                .execute(&mut *tx)
                .await?;
            tx.commit().await?;

            debug!("Migration v{} applied successfully", version);
        }

        Ok(())
    }

    /// Close every pooled connection.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("backend", &Self::backend_name())
            .finish()
    }
}

#[cfg(all(test, feature = "sqlite"))]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_open_in_memory() {
        let db = Database::open_in_memory().await.unwrap();
        assert_eq!(db.schema_version().await.unwrap(), MIGRATIONS.len() as i64);
    }

    #[tokio::test]
    async fn test_uploads_table_created() {
        let db = Database::open_in_memory().await.unwrap();

        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'uploads'",
        )
        .fetch_one(db.pool())
        .await
        .unwrap();

        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_migrate_is_idempotent() {
        let db = Database::open_in_memory().await.unwrap();
        db.migrate().await.unwrap();
        db.migrate().await.unwrap();
        assert_eq!(db.schema_version().await.unwrap(), MIGRATIONS.len() as i64);
    }

    #[tokio::test]
    async fn test_open_file_creates_parent_dir() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("nested").join("meta.db");
        let url = format!("sqlite:{}", db_path.display());

        let db = Database::open(&url).await.unwrap();

        assert!(db_path.exists());
        assert_eq!(db.schema_version().await.unwrap(), MIGRATIONS.len() as i64);
        db.close().await;
    }

    #[tokio::test]
    async fn test_reopen_keeps_version() {
        let temp_dir = TempDir::new().unwrap();
        let url = format!("sqlite:{}", temp_dir.path().join("meta.db").display());

        let db = Database::open(&url).await.unwrap();
        db.close().await;

        let db = Database::open(&url).await.unwrap();
        assert_eq!(db.schema_version().await.unwrap(), MIGRATIONS.len() as i64);
    }

    #[test]
    fn test_backend_name() {
        assert_eq!(Database::backend_name(), "sqlite");
    }
}
