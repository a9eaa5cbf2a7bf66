//! Directory explorer pages.

use axum::{
    extract::{Path, State},
    response::Html,
};
use std::sync::Arc;

use crate::upload::RelativePath;
use crate::web::error::WebError;
use crate::web::handlers::AppState;
use crate::web::html;

/// GET /explorer/ - List the upload root.
pub async fn explore_root(State(state): State<Arc<AppState>>) -> Result<Html<String>, WebError> {
    render(&state, "").await
}

/// GET /explorer/*path - List a directory below the upload root.
pub async fn explore(
    State(state): State<Arc<AppState>>,
    Path(path): Path<String>,
) -> Result<Html<String>, WebError> {
    render(&state, &path).await
}

async fn render(state: &AppState, raw_path: &str) -> Result<Html<String>, WebError> {
    // Every failure, escape attempts included, reads as a missing folder.
    let not_readable = |e: crate::VidshelfError| {
        tracing::debug!(path = %raw_path, error = %e, "Could not read folder");
        WebError::not_found("Could not read folder")
    };

    let path = RelativePath::parse(raw_path).map_err(not_readable)?;
    let listing = state.explorer.list(&path).await.map_err(not_readable)?;

    Ok(Html(html::explorer_listing(&listing)))
}
