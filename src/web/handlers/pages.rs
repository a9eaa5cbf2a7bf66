//! Upload form and flat video list.

use axum::{extract::State, response::Html};
use std::sync::Arc;

use crate::web::error::WebError;
use crate::web::handlers::AppState;
use crate::web::html;

/// GET / - Upload form.
pub async fn index() -> Html<String> {
    Html(html::upload_form())
}

/// GET /videos - Files directly in the upload root, read from disk.
pub async fn list_videos(State(state): State<Arc<AppState>>) -> Result<Html<String>, WebError> {
    let files = state.explorer.list_root_files().await.map_err(|e| {
        tracing::error!("Failed to list videos: {}", e);
        WebError::internal("Could not read the videos")
    })?;

    Ok(Html(html::video_list(&files)))
}
