//! Staged uploads: an uploaded image held in a temp file until it is committed or discarded.
//!
//! The temp file is removed when the `StagedUpload` is dropped, so no exit path (early return,
//! error, panic, cancelled request) can leave it behind. Callers still discard explicitly so a
//! failed removal is logged instead of silently ignored.

use projmeta_core::{AppError, ErrorMetadata};
use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempPath;

pub struct StagedUpload {
    path: Option<TempPath>,
    content_type: String,
    extension: String,
    size: u64,
}

impl StagedUpload {
    pub fn new(path: TempPath, content_type: String, extension: String, size: u64) -> Self {
        Self {
            path: Some(path),
            content_type,
            extension,
            size,
        }
    }

    /// Stage `data` as a new temp file inside `dir`.
    pub fn write_in(
        dir: &Path,
        data: &[u8],
        content_type: &str,
        extension: &str,
    ) -> io::Result<Self> {
        use std::io::Write;

        let mut file = tempfile::Builder::new().prefix("upload-").tempfile_in(dir)?;
        file.write_all(data)?;
        file.flush()?;
        Ok(Self::new(
            file.into_temp_path(),
            content_type.to_string(),
            extension.to_string(),
            data.len() as u64,
        ))
    }

    /// Record the final size and storage extension once the body has been fully read.
    pub fn with_details(mut self, extension: String, size: u64) -> Self {
        self.extension = extension;
        self.size = size;
        self
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Lower-cased extension the image is stored under.
    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    /// Location of the temp file, or `None` once it has been moved or removed.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn is_consumed(&self) -> bool {
        self.path.is_none()
    }

    /// Move the staged file to `dest`.
    ///
    /// Uses a rename; when that fails (e.g. temp dir on another filesystem) the bytes are
    /// copied and the temp file removed. If the copy fails too the upload stays staged.
    pub async fn persist_to(&mut self, dest: &Path) -> io::Result<()> {
        let temp = self.path.take().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, "staged upload already consumed")
        })?;

        match tokio::fs::rename(&temp, dest).await {
            Ok(()) => {
                // the file now lives at `dest`; stop the guard from deleting it
                if let Err(err) = temp.keep() {
                    tracing::debug!(error = %err.error, "Failed to release staged upload guard");
                }
                Ok(())
            }
            Err(err) => {
                tracing::debug!(
                    error = %err,
                    from = %temp.display(),
                    to = %dest.display(),
                    "Rename of staged upload failed, copying instead"
                );
                if let Err(copy_err) = tokio::fs::copy(&temp, dest).await {
                    self.path = Some(temp);
                    return Err(copy_err);
                }
                remove_temp(temp).await;
                Ok(())
            }
        }
    }

    /// Remove the temp file if it is still staged. Failures are logged, never returned.
    pub async fn discard(&mut self) {
        if let Some(temp) = self.path.take() {
            remove_temp(temp).await;
        }
    }
}

impl std::fmt::Debug for StagedUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StagedUpload")
            .field("path", &self.path.as_deref().map(Path::to_path_buf))
            .field("content_type", &self.content_type)
            .field("extension", &self.extension)
            .field("size", &self.size)
            .finish()
    }
}

async fn remove_temp(temp: TempPath) {
    let staged_path: PathBuf = temp.to_path_buf();
    let result = tokio::task::spawn_blocking(move || temp.close()).await;

    let failure = match result {
        Ok(Ok(())) => None,
        Ok(Err(e)) if e.kind() == io::ErrorKind::NotFound => None,
        Ok(Err(e)) => Some(e.to_string()),
        Err(join_err) => Some(join_err.to_string()),
    };

    match failure {
        None => tracing::debug!(path = %staged_path.display(), "Removed staged upload"),
        Some(message) => {
            let err = AppError::TempCleanupFailed {
                path: staged_path.display().to_string(),
                message,
            };
            tracing::warn!(
                error = %err,
                error_code = err.error_code(),
                "Failed to remove staged upload"
            );
        }
    }
}
