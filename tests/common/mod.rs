//! Test helpers for web tests.
//!
//! Builds an axum-test server over an in-memory database and a temporary
//! upload root.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use tempfile::TempDir;

use vidshelf::web::handlers::AppState;
use vidshelf::web::router::create_router;
use vidshelf::{Database, UploadRepository, UploadRoot};

/// Upload cap used by test servers.
pub const TEST_UPLOAD_LIMIT: usize = 64 * 1024;

/// A running test application.
pub struct TestApp {
    pub server: TestServer,
    pub db: Arc<Database>,
    /// Parent of the upload root, so tests can place files outside it.
    pub temp_dir: TempDir,
    pub uploads: PathBuf,
}

impl TestApp {
    /// Create a test application with the default upload cap.
    pub async fn new() -> Self {
        Self::with_limit(TEST_UPLOAD_LIMIT).await
    }

    /// Create a test application with a custom upload cap.
    pub async fn with_limit(max_upload_bytes: usize) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let uploads = temp_dir.path().join("uploads");
        let root = UploadRoot::new(&uploads).expect("Failed to create upload root");

        let db = Arc::new(
            Database::open_in_memory()
                .await
                .expect("Failed to create test database"),
        );

        let app_state = Arc::new(AppState::new(db.clone(), root));
        let router = create_router(app_state, max_upload_bytes);
        let server = TestServer::new(router).expect("Failed to create test server");

        Self {
            server,
            db,
            temp_dir,
            uploads,
        }
    }

    /// Path under the upload root.
    pub fn upload_path(&self, rel: impl AsRef<Path>) -> PathBuf {
        self.uploads.join(rel)
    }

    /// Number of upload records in the database.
    pub async fn record_count(&self) -> i64 {
        UploadRepository::new(self.db.pool()).count().await.unwrap()
    }

    /// Number of upload records for one original filename.
    pub async fn record_count_for(&self, name: &str) -> i64 {
        UploadRepository::new(self.db.pool())
            .count_by_name(name)
            .await
            .unwrap()
    }
}

/// Build a form carrying one file in the `video` field.
pub fn video_form(filename: &str, content: &[u8]) -> MultipartForm {
    MultipartForm::new().add_part(
        "video",
        Part::bytes(content.to_vec())
            .file_name(filename)
            .mime_type("video/mp4"),
    )
}
