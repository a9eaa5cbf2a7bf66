//! Directory explorer: one directory level per call, relative to the root.

use std::cmp::Ordering;

use tokio::fs;

use super::root::is_partial_name;
use super::service::upload_url;
use super::{RelativePath, UploadRoot};
use crate::Result;

/// URL prefix of the explorer pages.
pub const EXPLORER_URL_PREFIX: &str = "/explorer";

/// Explorer page URL for a directory.
pub fn explorer_url(path: &RelativePath) -> String {
    format!("{EXPLORER_URL_PREFIX}/{}", path.to_url_path())
}

/// Kind of a directory entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// A subdirectory.
    Directory,
    /// A regular file.
    File,
}

/// One entry of a directory listing.
#[derive(Debug, Clone)]
pub struct Entry {
    /// Entry name.
    pub name: String,
    /// Path of the entry below the root.
    pub path: RelativePath,
    /// Directory or file.
    pub kind: EntryKind,
    /// Size in bytes (0 for directories).
    pub size: u64,
    /// Content type guessed from the extension.
    pub content_type: String,
}

impl Entry {
    /// Whether the entry is a directory.
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    /// Where the entry links to: the explorer page for a directory,
    /// the static file for a file.
    pub fn href(&self) -> String {
        match self.kind {
            EntryKind::Directory => explorer_url(&self.path),
            EntryKind::File => upload_url(&self.path),
        }
    }
}

/// One level of a directory.
#[derive(Debug, Clone)]
pub struct Listing {
    /// The listed directory.
    pub path: RelativePath,
    /// Parent directory; `None` at the root.
    pub parent: Option<RelativePath>,
    /// Entries, directories first, then by name.
    pub entries: Vec<Entry>,
}

impl Listing {
    /// Number of subdirectories.
    pub fn directory_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_dir()).count()
    }

    /// Number of files.
    pub fn file_count(&self) -> usize {
        self.entries.len() - self.directory_count()
    }
}

/// Lists directories below the upload root.
#[derive(Debug, Clone)]
pub struct Explorer {
    root: UploadRoot,
}

impl Explorer {
    /// Create a new explorer over `root`.
    pub fn new(root: UploadRoot) -> Self {
        Self { root }
    }

    /// List the immediate children of `path`.
    pub async fn list(&self, path: &RelativePath) -> Result<Listing> {
        let mut dir = self.root.read_dir(path).await?;
        let mut entries = Vec::new();

        while let Some(dir_entry) = dir.next_entry().await? {
            let Some(name) = dir_entry.file_name().to_str().map(str::to_string) else {
                tracing::debug!(path = %path, "Skipping entry with non UTF-8 name");
                continue;
            };
            if is_partial_name(&name) {
                continue;
            }
            let entry_path = match path.join(&name) {
                Ok(entry_path) => entry_path,
                Err(e) => {
                    tracing::debug!(
                        path = %path,
                        name = %name,
                        error = %e,
                        "Skipping entry whose name can't be linked"
                    );
                    continue;
                }
            };

            // Follow symlinks; broken ones and ones leaving the root are skipped.
            let is_link = dir_entry
                .file_type()
                .await
                .map(|t| t.is_symlink())
                .unwrap_or(false);
            if is_link && self.root.resolve(&entry_path).await.is_err() {
                continue;
            }
            let Ok(meta) = fs::metadata(dir_entry.path()).await else {
                continue;
            };

            let (kind, size, content_type) = if meta.is_dir() {
                (EntryKind::Directory, 0, String::new())
            } else {
                let mime = mime_guess::from_path(&name).first_or_octet_stream();
                (EntryKind::File, meta.len(), mime.essence_str().to_string())
            };

            entries.push(Entry {
                name,
                path: entry_path,
                kind,
                size,
                content_type,
            });
        }

        entries.sort_by(compare_entries);

        Ok(Listing {
            path: path.clone(),
            parent: path.parent(),
            entries,
        })
    }

    /// Regular files directly inside the root, sorted by name.
    pub async fn list_root_files(&self) -> Result<Vec<Entry>> {
        let listing = self.list(&RelativePath::root()).await?;
        Ok(listing
            .entries
            .into_iter()
            .filter(|e| e.kind == EntryKind::File)
            .collect())
    }
}

fn compare_entries(a: &Entry, b: &Entry) -> Ordering {
    b.is_dir()
        .cmp(&a.is_dir())
        .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        .then_with(|| a.name.cmp(&b.name))
}
