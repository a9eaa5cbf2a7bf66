//! The upload root directory and the path resolution guarding it.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::fs;

use super::RelativePath;
use crate::{Result, VidshelfError};

/// Suffix of files still being received.
const PARTIAL_SUFFIX: &str = ".part";

/// Distinguishes concurrent partial files for the same name.
static NEXT_PARTIAL: AtomicU64 = AtomicU64::new(0);

/// Whether `name` is a file still being received (`.{name}.{n}.part`).
pub fn is_partial_name(name: &str) -> bool {
    name.starts_with('.') && name.ends_with(PARTIAL_SUFFIX)
}

/// Base directory holding every uploaded file and folder.
///
/// All disk access below the root goes through [`UploadRoot::resolve`], which
/// refuses anything that ends up outside the canonical root, including paths
/// routed through symlinks.
#[derive(Debug, Clone)]
pub struct UploadRoot {
    /// Directory as configured.
    path: PathBuf,
    /// Canonical form used for containment checks.
    canonical: PathBuf,
}

impl UploadRoot {
    /// Open the upload root, creating the directory if it doesn't exist.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        std::fs::create_dir_all(&path)?;
        let canonical = path.canonicalize()?;

        Ok(Self { path, canonical })
    }

    /// The root directory as configured.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Resolve `rel` to an absolute path inside the root.
    ///
    /// Paths that don't exist yet are returned as joined; existing paths are
    /// canonicalized and must stay under the root.
    pub async fn resolve(&self, rel: &RelativePath) -> Result<PathBuf> {
        let mut path = self.canonical.clone();
        path.extend(rel.segments());

        match fs::symlink_metadata(&path).await {
            Ok(meta) => {
                let canonical = fs::canonicalize(&path).await.map_err(|e| {
                    if meta.file_type().is_symlink() {
                        VidshelfError::NotFound(format!("link target for {rel}"))
                    } else {
                        VidshelfError::Io(e)
                    }
                })?;

                if !canonical.starts_with(&self.canonical) {
                    tracing::warn!(path = %rel, "Rejected path resolving outside upload root");
                    return Err(VidshelfError::PathEscape(rel.to_string()));
                }

                Ok(canonical)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(path),
            Err(e) => Err(e.into()),
        }
    }

    /// Open a hidden partial file that will become `name` once complete.
    ///
    /// The file currently stored as `name` is left alone until
    /// [`UploadRoot::persist`] replaces it.
    pub async fn create_partial(
        &self,
        name: &RelativePath,
    ) -> Result<(RelativePath, PathBuf, fs::File)> {
        self.ensure_not_dir(name).await?;

        let seq = NEXT_PARTIAL.fetch_add(1, Ordering::Relaxed);
        let partial = RelativePath::file_name(&format!(".{name}.{seq}{PARTIAL_SUFFIX}"))?;
        let path = self.resolve(&partial).await?;

        let file = fs::File::create(&path).await?;
        Ok((partial, path, file))
    }

    /// Move a finished partial file over `name`, replacing any file stored there.
    pub async fn persist(&self, partial: &RelativePath, name: &RelativePath) -> Result<PathBuf> {
        self.ensure_not_dir(name).await?;

        let from = self.resolve(partial).await?;
        let to = self.resolve(name).await?;
        fs::rename(&from, &to).await?;

        Ok(to)
    }

    async fn ensure_not_dir(&self, name: &RelativePath) -> Result<()> {
        let path = self.resolve(name).await?;
        if fs::metadata(&path).await.map(|m| m.is_dir()).unwrap_or(false) {
            return Err(VidshelfError::Validation(format!(
                "a folder named {name} already exists"
            )));
        }
        Ok(())
    }

    /// Read the directory at `rel`.
    ///
    /// A missing path or a path that isn't a directory is reported as
    /// [`VidshelfError::NotFound`].
    pub async fn read_dir(&self, rel: &RelativePath) -> Result<fs::ReadDir> {
        let path = self.resolve(rel).await?;

        match fs::metadata(&path).await {
            Ok(meta) if meta.is_dir() => Ok(fs::read_dir(&path).await?),
            Ok(_) => Err(VidshelfError::NotFound(format!("folder {rel}"))),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(VidshelfError::NotFound(format!("folder {rel}")))
            }
            Err(e) => Err(e.into()),
        }
    }
}
