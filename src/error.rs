//! Error types for vidshelf.

use thiserror::Error;

/// Common error type for vidshelf.
#[derive(Error, Debug)]
pub enum VidshelfError {
    /// Database error.
    ///
    /// Wraps errors from whichever sqlx backend the crate was built with.
    #[error("database error: {0}")]
    Database(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Validation error for user input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// A path resolved outside the upload root.
    #[error("path escapes upload root: {0}")]
    PathEscape(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<sqlx::Error> for VidshelfError {
    fn from(e: sqlx::Error) -> Self {
        VidshelfError::Database(e.to_string())
    }
}

/// Result type alias for vidshelf operations.
pub type Result<T> = std::result::Result<T, VidshelfError>;
