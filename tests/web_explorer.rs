//! Explorer Tests
//!
//! Integration tests for browsing the upload root one directory at a time.

mod common;

use axum::http::StatusCode;

use common::TestApp;

/// Create `a.txt` and `sub/clip.mp4` under the upload root.
fn populate(app: &TestApp) {
    std::fs::write(app.upload_path("a.txt"), b"hello").unwrap();
    std::fs::create_dir(app.upload_path("sub")).unwrap();
    std::fs::write(app.upload_path("sub/clip.mp4"), b"frames").unwrap();
}

/// Create a directory next to the upload root holding a secret file.
fn create_outside_dir(app: &TestApp) {
    let private = app.temp_dir.path().join("private");
    std::fs::create_dir(&private).unwrap();
    std::fs::write(private.join("secret.txt"), b"TOPSECRET").unwrap();
}

#[tokio::test]
async fn test_explorer_root_lists_entries() {
    let app = TestApp::new().await;
    populate(&app);

    let response = app.server.get("/explorer/").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.text();
    assert!(body.contains(r#"<a href="/explorer/sub">sub/</a>"#));
    assert!(body.contains(r#"<a href="/uploads/a.txt" download>"#));
    assert!(!body.contains(".. (up)"));
    // Only one level deep.
    assert!(!body.contains("clip.mp4"));
    // Directories first.
    assert!(body.find("sub/").unwrap() < body.find("a.txt").unwrap());
}

#[tokio::test]
async fn test_explorer_without_trailing_slash() {
    let app = TestApp::new().await;
    populate(&app);

    let response = app.server.get("/explorer").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert!(response.text().contains(r#"<a href="/explorer/sub">sub/</a>"#));
}

#[tokio::test]
async fn test_explorer_subdirectory_has_parent_link() {
    let app = TestApp::new().await;
    populate(&app);

    let response = app.server.get("/explorer/sub").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.text();
    assert!(body.contains(r#"<a href="/explorer/">.. (up)</a>"#));
    assert!(body.contains(r#"<a href="/uploads/sub/clip.mp4" target="_blank">"#));

    let served = app.server.get("/uploads/sub/clip.mp4").await;
    assert_eq!(served.status_code(), StatusCode::OK);
    assert_eq!(served.text(), "frames");
}

#[tokio::test]
async fn test_explorer_nested_parent_link() {
    let app = TestApp::new().await;
    std::fs::create_dir_all(app.upload_path("shows/season 1")).unwrap();

    let response = app.server.get("/explorer/shows/season%201").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert!(response
        .text()
        .contains(r#"<a href="/explorer/shows">.. (up)</a>"#));
}

#[tokio::test]
async fn test_explorer_empty_directory() {
    let app = TestApp::new().await;
    std::fs::create_dir(app.upload_path("empty")).unwrap();

    let response = app.server.get("/explorer/empty").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert!(response.text().contains(".. (up)"));
}

#[tokio::test]
async fn test_explorer_missing_directory() {
    let app = TestApp::new().await;

    let response = app.server.get("/explorer/nothing-here").await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    assert!(response.text().contains("Could not read folder"));
}

#[tokio::test]
async fn test_explorer_file_path_is_not_found() {
    let app = TestApp::new().await;
    populate(&app);

    let response = app.server.get("/explorer/a.txt").await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_explorer_rejects_encoded_traversal() {
    let app = TestApp::new().await;
    create_outside_dir(&app);

    for path in [
        "/explorer/..%2Fprivate",
        "/explorer/%2E%2E%2Fprivate",
        "/explorer/sub%2F..%2F..%2Fprivate",
        "/explorer/..%2F..%2F..%2Fetc",
    ] {
        let response = app.server.get(path).await;

        assert_eq!(response.status_code(), StatusCode::NOT_FOUND, "{path}");
        let body = response.text();
        assert!(!body.contains("secret.txt"), "{path}");
        assert!(!body.contains("passwd"), "{path}");
    }
}

#[tokio::test]
async fn test_explorer_rejects_backslash_traversal() {
    let app = TestApp::new().await;
    create_outside_dir(&app);

    let response = app.server.get("/explorer/..%5Cprivate").await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    assert!(!response.text().contains("secret.txt"));
}

#[cfg(unix)]
#[tokio::test]
async fn test_explorer_rejects_symlink_escape() {
    let app = TestApp::new().await;
    create_outside_dir(&app);
    std::os::unix::fs::symlink(app.temp_dir.path().join("private"), app.upload_path("link"))
        .unwrap();

    let response = app.server.get("/explorer/link").await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    assert!(!response.text().contains("secret.txt"));
}

#[cfg(unix)]
#[tokio::test]
async fn test_uploads_rejects_symlink_escape() {
    let app = TestApp::new().await;
    let secret = app.temp_dir.path().join("secret.txt");
    std::fs::write(&secret, b"TOPSECRET").unwrap();
    std::os::unix::fs::symlink(&secret, app.upload_path("leak.txt")).unwrap();

    let response = app.server.get("/uploads/leak.txt").await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    assert!(!response.text().contains("TOPSECRET"));

    let listing = app.server.get("/explorer/").await;
    assert!(!listing.text().contains("leak.txt"));
}

#[cfg(unix)]
#[tokio::test]
async fn test_uploads_follows_symlink_inside_root() {
    let app = TestApp::new().await;
    std::fs::write(app.upload_path("real.mp4"), b"frames").unwrap();
    std::os::unix::fs::symlink(app.upload_path("real.mp4"), app.upload_path("alias.mp4"))
        .unwrap();

    let response = app.server.get("/uploads/alias.mp4").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.text(), "frames");
}

#[tokio::test]
async fn test_uploads_rejects_encoded_traversal() {
    let app = TestApp::new().await;
    std::fs::write(app.temp_dir.path().join("secret.txt"), b"TOPSECRET").unwrap();

    let response = app.server.get("/uploads/..%2Fsecret.txt").await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    assert!(!response.text().contains("TOPSECRET"));
}

#[tokio::test]
async fn test_uploads_directory_is_not_found() {
    let app = TestApp::new().await;
    populate(&app);

    let response = app.server.get("/uploads/sub").await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_explorer_escapes_entry_names() {
    let app = TestApp::new().await;
    std::fs::write(app.upload_path("<b>bold.mp4"), b"x").unwrap();

    let response = app.server.get("/explorer/").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.text();
    assert!(body.contains("&lt;b&gt;bold.mp4"));
    assert!(!body.contains("<b>bold.mp4"));
}
