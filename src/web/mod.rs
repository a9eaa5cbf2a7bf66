//! Web UI for vidshelf.
//!
//! Serves the upload form, the upload endpoint, the flat video list, the
//! directory explorer and the uploaded files themselves.

pub mod error;
pub mod handlers;
pub mod html;
pub mod middleware;
pub mod router;
pub mod server;

pub use error::WebError;
pub use router::create_router;
pub use server::WebServer;
