//! Error responses for the web pages.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use super::html;
use crate::VidshelfError;

/// Error codes surfaced to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Bad request (400).
    BadRequest,
    /// Not found (404).
    NotFound,
    /// Payload too large (413).
    PayloadTooLarge,
    /// Internal server error (500).
    InternalError,
}

impl ErrorCode {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ErrorCode::BadRequest => StatusCode::BAD_REQUEST,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Web error type, rendered as an HTML error page.
#[derive(Debug)]
pub struct WebError {
    code: ErrorCode,
    message: String,
}

impl WebError {
    /// Create a new web error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Create a bad request error.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::BadRequest, message)
    }

    /// Create a not found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    /// Create a payload too large error.
    pub fn payload_too_large(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::PayloadTooLarge, message)
    }

    /// Create an internal server error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Error code.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Client-facing message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        (self.code.status_code(), Html(html::error_page(&self.message))).into_response()
    }
}

impl std::fmt::Display for WebError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.code, self.message)
    }
}

impl std::error::Error for WebError {}

impl From<VidshelfError> for WebError {
    fn from(err: VidshelfError) -> Self {
        match &err {
            VidshelfError::NotFound(msg) => WebError::not_found(format!("{msg} not found")),
            VidshelfError::PathEscape(_) => WebError::not_found("Not found"),
            VidshelfError::Validation(msg) => WebError::bad_request(msg.clone()),
            _ => {
                tracing::error!("Internal error: {}", err);
                WebError::internal("An internal error occurred")
            }
        }
    }
}
