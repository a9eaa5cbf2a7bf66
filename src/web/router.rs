//! Router configuration for the web UI.

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use super::handlers::{
    explore, explore_root, index, list_videos, serve_upload, upload_video, AppState,
};
use super::middleware::security_headers;
use crate::upload::UPLOADS_URL_PREFIX;

/// Create the main router: pages, upload endpoint, static uploads and health check.
///
/// `max_upload_bytes` caps the request body accepted by `POST /upload`.
pub fn create_router(app_state: Arc<AppState>, max_upload_bytes: usize) -> Router {
    // Stored files skip the page middleware so range requests and caching work.
    let files = Router::new()
        .route(&format!("{UPLOADS_URL_PREFIX}/*path"), get(serve_upload))
        .with_state(app_state.clone());

    let pages = Router::new()
        .route("/", get(index))
        .route(
            "/upload",
            post(upload_video).layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .route("/videos", get(list_videos))
        .route("/explorer", get(explore_root))
        .route("/explorer/", get(explore_root))
        .route("/explorer/*path", get(explore))
        .layer(
            ServiceBuilder::new()
                .layer(CompressionLayer::new())
                .layer(middleware::from_fn(security_headers)),
        )
        .with_state(app_state);

    Router::new()
        .merge(pages)
        .merge(files)
        .merge(create_health_router())
        .layer(TraceLayer::new_for_http())
}

/// Create a health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}
