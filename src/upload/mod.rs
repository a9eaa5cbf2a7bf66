//! Upload storage for vidshelf.
//!
//! This module holds the core of the service:
//! - `UploadRoot`: the base directory and the path check every disk access uses
//! - `UploadService`: stores an uploaded file, then appends its metadata record
//! - `UploadRepository`: the append-only metadata store
//! - `Explorer`: lists one directory level below the root

mod explorer;
mod path;
mod record;
mod root;
mod service;

pub use explorer::{explorer_url, Entry, EntryKind, Explorer, Listing, EXPLORER_URL_PREFIX};
pub use path::RelativePath;
pub use record::{NewUpload, UploadRecord, UploadRepository};
pub use root::{is_partial_name, UploadRoot};
pub use service::{upload_url, PendingUpload, UploadReceipt, UploadService, UPLOADS_URL_PREFIX};

/// Multipart field carrying the uploaded video.
pub const UPLOAD_FIELD: &str = "video";
