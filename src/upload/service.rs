//! Upload flow: write the file under the root, then record it.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::fs;
use tokio::io::AsyncWriteExt;

use super::root::is_partial_name;
use super::{NewUpload, RelativePath, UploadRecord, UploadRepository, UploadRoot};
use crate::{Database, Result, VidshelfError};

/// URL prefix uploaded files are served under.
pub const UPLOADS_URL_PREFIX: &str = "/uploads";

/// Web path for a file below the upload root.
pub fn upload_url(path: &RelativePath) -> String {
    format!("{UPLOADS_URL_PREFIX}/{}", path.to_url_path())
}

/// Service storing uploaded files and their metadata.
#[derive(Debug, Clone)]
pub struct UploadService {
    root: UploadRoot,
    db: Arc<Database>,
}

/// A file being received into a hidden partial file. Finish it with
/// [`UploadService::commit`] or discard it with [`PendingUpload::abort`].
#[derive(Debug)]
pub struct PendingUpload {
    original_name: String,
    name: RelativePath,
    partial: RelativePath,
    path: PathBuf,
    file: fs::File,
    bytes_written: u64,
}

impl PendingUpload {
    /// Append a chunk of file content.
    pub async fn write_chunk(&mut self, chunk: &[u8]) -> Result<()> {
        self.file.write_all(chunk).await?;
        self.bytes_written += chunk.len() as u64;
        Ok(())
    }

    /// File name as sent by the client.
    pub fn original_name(&self) -> &str {
        &self.original_name
    }

    /// Bytes written so far.
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Discard the partial file. A file already stored under the same name
    /// is untouched.
    pub async fn abort(self) {
        drop(self.file);
        remove_partial(&self.path).await;
    }
}

async fn remove_partial(path: &Path) {
    if let Err(e) = fs::remove_file(path).await {
        tracing::warn!(path = %path.display(), error = %e, "Failed to remove partial upload");
    }
}

/// Result of a completed upload.
#[derive(Debug, Clone)]
pub struct UploadReceipt {
    /// The metadata record created for the upload.
    pub record: UploadRecord,
    /// Size of the stored file.
    pub bytes: u64,
}

impl UploadService {
    /// Create a new upload service.
    pub fn new(root: UploadRoot, db: Arc<Database>) -> Self {
        Self { root, db }
    }

    /// The upload root files are written to.
    pub fn root(&self) -> &UploadRoot {
        &self.root
    }

    /// Start receiving a file named `original_name`.
    ///
    /// The name is used verbatim as the stored name, so a later upload with
    /// the same name replaces the file once it commits. Names that would
    /// leave the root directory are rejected.
    pub async fn begin(&self, original_name: &str) -> Result<PendingUpload> {
        let name = RelativePath::file_name(original_name)?;
        if is_partial_name(original_name) {
            return Err(VidshelfError::Validation(format!(
                "file name is reserved for uploads in progress: {original_name}"
            )));
        }
        let (partial, path, file) = self.root.create_partial(&name).await?;

        tracing::debug!(filename = %original_name, partial = %partial, "Receiving upload");

        Ok(PendingUpload {
            original_name: original_name.to_string(),
            name,
            partial,
            path,
            file,
            bytes_written: 0,
        })
    }

    /// Move the received file into place, then append its metadata record.
    ///
    /// A failed insert leaves the stored file on disk: earlier records may
    /// already point at the same name.
    pub async fn commit(&self, pending: PendingUpload) -> Result<UploadReceipt> {
        let PendingUpload {
            original_name,
            name,
            partial,
            path,
            mut file,
            bytes_written,
        } = pending;

        let synced = async {
            file.flush().await?;
            file.sync_all().await
        }
        .await;
        drop(file);
        if let Err(e) = synced {
            remove_partial(&path).await;
            return Err(e.into());
        }

        if let Err(e) = self.root.persist(&partial, &name).await {
            remove_partial(&path).await;
            return Err(e);
        }

        let repo = UploadRepository::new(self.db.pool());
        let record = repo
            .create(&NewUpload::new(&original_name, upload_url(&name)))
            .await?;

        tracing::info!(
            filename = %record.original_name,
            record_id = record.id,
            bytes = bytes_written,
            "Upload stored"
        );

        Ok(UploadReceipt {
            record,
            bytes: bytes_written,
        })
    }

    /// Store an in-memory file in one step.
    pub async fn store(&self, original_name: &str, content: &[u8]) -> Result<UploadReceipt> {
        let mut pending = self.begin(original_name).await?;
        if let Err(e) = pending.write_chunk(content).await {
            pending.abort().await;
            return Err(e);
        }
        self.commit(pending).await
    }
}
