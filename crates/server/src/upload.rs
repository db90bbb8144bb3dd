//! # Upload Storage
//!
//! Uploaded PDFs are written under a fresh UUID name inside the configured
//! upload directory, so concurrent requests never share a path even when the
//! client-supplied file names collide. The file lives until
//! [`StoredUpload::remove`] is awaited, or until the guard is dropped.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("No PDF file was uploaded")]
    MissingFile,
    #[error("Failed to read multipart request: {0}")]
    Multipart(String),
    #[error("Failed to store upload at '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// The directory that holds in-flight uploads.
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    /// Opens the store, creating the directory if it does not exist yet.
    pub async fn new(dir: impl Into<PathBuf>) -> Result<Self, UploadError> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|source| UploadError::Io {
                path: dir.clone(),
                source,
            })?;
        info!(dir = %dir.display(), "Upload directory ready.");
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Persists one upload. The client's file name is only kept for logging.
    pub async fn save(
        &self,
        original_name: &str,
        data: &[u8],
    ) -> Result<StoredUpload, UploadError> {
        let path = self.dir.join(format!("{}.pdf", Uuid::new_v4()));
        tokio::fs::write(&path, data)
            .await
            .map_err(|source| UploadError::Io {
                path: path.clone(),
                source,
            })?;
        info!(
            original_name,
            path = %path.display(),
            bytes = data.len(),
            "Stored uploaded PDF."
        );
        Ok(StoredUpload {
            path,
            removed: false,
        })
    }
}

/// A stored upload.
///
/// Await [`StoredUpload::remove`] once the file has been read. A guard that is
/// dropped instead (an early return, a cancelled request) hands the deletion
/// to tokio's blocking pool.
#[derive(Debug)]
pub struct StoredUpload {
    path: PathBuf,
    removed: bool,
}

impl StoredUpload {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Deletes the file without blocking the runtime.
    pub async fn remove(mut self) {
        self.removed = true;
        log_removal(&self.path, tokio::fs::remove_file(&self.path).await);
    }
}

impl Drop for StoredUpload {
    fn drop(&mut self) {
        if self.removed {
            return;
        }
        let path = std::mem::take(&mut self.path);
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn_blocking(move || log_removal(&path, std::fs::remove_file(&path)));
            }
            Err(_) => log_removal(&path, std::fs::remove_file(&path)),
        }
    }
}

fn log_removal(path: &Path, result: std::io::Result<()>) {
    match result {
        Ok(()) => debug!(path = %path.display(), "Removed upload."),
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => warn!(path = %path.display(), "Failed to remove upload: {e}"),
    }
}
