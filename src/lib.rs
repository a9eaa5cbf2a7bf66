//! vidshelf - video upload server.
//!
//! Accepts video uploads over HTTP, records each upload in a metadata
//! database and lets users browse the upload directory one level at a time.

pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod upload;
pub mod web;

pub use config::Config;
pub use db::{Database, DbPool};
pub use error::{Result, VidshelfError};
pub use upload::{
    Explorer, RelativePath, UploadReceipt, UploadRecord, UploadRepository, UploadRoot,
    UploadService,
};
pub use web::WebServer;
