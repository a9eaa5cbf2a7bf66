//! Uploaded file downloads.

use axum::{
    body::Body,
    extract::{Path, Request, State},
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tower::ServiceExt;
use tower_http::services::ServeFile;

use crate::upload::{is_partial_name, RelativePath};
use crate::web::error::WebError;
use crate::web::handlers::AppState;

/// GET /uploads/*path - Serve a stored file.
///
/// The path is checked against the upload root before the file is handed to
/// `ServeFile`, so links leaving the root and partial uploads are not served.
/// Range and conditional requests are handled by `ServeFile`.
pub async fn serve_upload(
    State(state): State<Arc<AppState>>,
    Path(path): Path<String>,
    request: Request,
) -> Result<Response, WebError> {
    let not_found = |e: crate::VidshelfError| {
        tracing::debug!(path = %path, error = %e, "Refusing to serve upload");
        WebError::not_found("Not found")
    };

    let rel = RelativePath::parse(&path).map_err(not_found)?;
    if rel.name().map_or(true, is_partial_name) {
        return Err(WebError::not_found("Not found"));
    }

    let resolved = state.root.resolve(&rel).await.map_err(not_found)?;
    let is_file = tokio::fs::metadata(&resolved)
        .await
        .map(|m| m.is_file())
        .unwrap_or(false);
    if !is_file {
        return Err(WebError::not_found("Not found"));
    }

    match ServeFile::new(resolved).oneshot(request).await {
        Ok(response) => Ok(response.map(Body::new).into_response()),
        Err(never) => match never {},
    }
}
