//! Upload records and the metadata repository.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::db::DbPool;
use crate::Result;

/// Metadata describing one completed upload.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UploadRecord {
    /// Store-generated ID.
    pub id: i64,
    /// File name as sent by the client.
    pub original_name: String,
    /// Web path the file is served from (e.g. `/uploads/clip.mp4`).
    pub storage_path: String,
    /// Creation time (RFC 3339, UTC).
    pub created_at: String,
}

impl UploadRecord {
    /// Get the created_at as DateTime<Utc>.
    pub fn created_at_datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.created_at)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

/// Data for a new upload record.
#[derive(Debug, Clone)]
pub struct NewUpload {
    /// File name as sent by the client.
    pub original_name: String,
    /// Web path the file is served from.
    pub storage_path: String,
}

impl NewUpload {
    /// Create a new NewUpload.
    pub fn new(original_name: impl Into<String>, storage_path: impl Into<String>) -> Self {
        Self {
            original_name: original_name.into(),
            storage_path: storage_path.into(),
        }
    }
}

/// Repository for upload records. Records are append-only.
pub struct UploadRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> UploadRepository<'a> {
    /// Create a new repository instance.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Append a record stamped with the current time.
    pub async fn create(&self, upload: &NewUpload) -> Result<UploadRecord> {
        let created_at = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);

        let record = sqlx::query_as::<_, UploadRecord>(
            "INSERT INTO uploads (original_name, storage_path, created_at)
             VALUES ($1, $2, $3)
             RETURNING id, original_name, storage_path, created_at",
        )
        .bind(&upload.original_name)
        .bind(&upload.storage_path)
        .bind(&created_at)
        .fetch_one(self.pool)
        .await?;

        Ok(record)
    }

    /// Get a record by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<UploadRecord>> {
        let record = sqlx::query_as::<_, UploadRecord>(
            "SELECT id, original_name, storage_path, created_at FROM uploads WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(record)
    }

    /// Count all records.
    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM uploads")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }

    /// Count records carrying the given original name.
    pub async fn count_by_name(&self, original_name: &str) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM uploads WHERE original_name = $1")
            .bind(original_name)
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }
}
