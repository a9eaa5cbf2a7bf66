//! Page handlers for the web UI.

pub mod explorer;
pub mod files;
pub mod pages;
pub mod upload;

pub use explorer::*;
pub use files::*;
pub use pages::*;
pub use upload::*;

use std::sync::Arc;

use crate::upload::{Explorer, UploadRoot, UploadService};
use crate::Database;

/// Shared database handle.
pub type SharedDatabase = Arc<Database>;

/// Application state shared across handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Metadata database.
    pub db: SharedDatabase,
    /// Upload root directory.
    pub root: UploadRoot,
    /// Upload flow.
    pub uploads: UploadService,
    /// Directory explorer.
    pub explorer: Explorer,
}

impl AppState {
    /// Create a new application state over an open database and upload root.
    pub fn new(db: SharedDatabase, root: UploadRoot) -> Self {
        Self {
            uploads: UploadService::new(root.clone(), db.clone()),
            explorer: Explorer::new(root.clone()),
            db,
            root,
        }
    }
}
