//! Video upload handler.

use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    response::Html,
};
use std::sync::Arc;

use crate::upload::{PendingUpload, UPLOAD_FIELD};
use crate::web::error::WebError;
use crate::web::handlers::AppState;
use crate::web::html;

fn multipart_error(e: MultipartError) -> WebError {
    tracing::warn!("Failed to read multipart data: {}", e);
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        WebError::payload_too_large("The upload is too large")
    } else {
        WebError::bad_request("Invalid multipart data")
    }
}

/// POST /upload - Store one video.
///
/// Request body: multipart/form-data with a single file in the `video` field.
/// The file is streamed into a partial file and only moved into place and
/// recorded once the whole request has been read.
pub async fn upload_video(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Html<String>, WebError> {
    let mut pending: Option<PendingUpload> = None;

    if let Err(e) = receive(&state, &mut multipart, &mut pending).await {
        if let Some(pending) = pending {
            pending.abort().await;
        }
        return Err(e);
    }

    let pending = pending.ok_or_else(|| WebError::bad_request("No video provided"))?;
    let filename = pending.original_name().to_string();

    let receipt = state.uploads.commit(pending).await.map_err(|e| {
        tracing::error!(filename = %filename, "Failed to store upload: {}", e);
        WebError::internal("Failed to save the video")
    })?;

    Ok(Html(html::upload_confirmation(&receipt)))
}

/// Read every field, streaming the `video` file into `pending`.
async fn receive(
    state: &AppState,
    multipart: &mut Multipart,
    pending: &mut Option<PendingUpload>,
) -> Result<(), WebError> {
    while let Some(mut field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        if pending.is_some() {
            return Err(WebError::bad_request("Only one video can be uploaded at a time"));
        }

        let filename = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| WebError::bad_request("The video field must contain a file"))?;

        let upload = pending.insert(state.uploads.begin(&filename).await?);

        while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
            upload.write_chunk(&chunk).await?;
        }
    }

    Ok(())
}
