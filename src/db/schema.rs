//! Database schema and migrations for vidshelf.
//!
//! Migrations are applied in order; `schema_version` records which ones ran.

/// Database migrations.
#[cfg(feature = "sqlite")]
pub const MIGRATIONS: &[&str] = &[
    // v1: upload records
    r#"
CREATE TABLE uploads (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    original_name   TEXT NOT NULL,
    storage_path    TEXT NOT NULL,
    created_at      TEXT NOT NULL
);

CREATE INDEX idx_uploads_original_name ON uploads(original_name);
"#,
];

/// Database migrations.
#[cfg(feature = "postgres")]
pub const MIGRATIONS: &[&str] = &[
    // v1: upload records
    r#"
CREATE TABLE uploads (
    id              BIGSERIAL PRIMARY KEY,
    original_name   TEXT NOT NULL,
    storage_path    TEXT NOT NULL,
    created_at      TEXT NOT NULL
);

CREATE INDEX idx_uploads_original_name ON uploads(original_name);
"#,
];
