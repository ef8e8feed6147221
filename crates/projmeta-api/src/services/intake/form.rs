//! Multipart parsing and upload staging.

use axum::extract::multipart::{Field, MultipartError};
use axum::extract::Multipart;
use axum::http::StatusCode;
use projmeta_core::constants::IMAGE_FIELD;
use projmeta_core::AppError;
use projmeta_storage::StagedUpload;
use std::collections::HashMap;
use std::path::Path;
use tokio::io::AsyncWriteExt;

use super::validation::image_extension;

/// A parsed intake request: text fields plus the staged image, if one was sent.
#[derive(Debug, Default)]
pub struct ProjectForm {
    pub values: HashMap<String, String>,
    pub image: Option<StagedUpload>,
    /// Additional `image` parts beyond the first; they are never staged.
    pub extra_images: usize,
}

impl ProjectForm {
    /// Read every part of `multipart`, staging the first `image` part in `temp_dir`.
    ///
    /// Image bytes beyond `max_image_size` are counted but not written. On error anything
    /// already staged is removed before returning.
    pub async fn read(
        multipart: Multipart,
        temp_dir: &Path,
        max_image_size: u64,
    ) -> Result<Self, AppError> {
        let mut form = ProjectForm::default();
        if let Err(err) = form.read_parts(multipart, temp_dir, max_image_size).await {
            form.discard().await;
            return Err(err);
        }
        Ok(form)
    }

    async fn read_parts(
        &mut self,
        mut multipart: Multipart,
        temp_dir: &Path,
        max_image_size: u64,
    ) -> Result<(), AppError> {
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| multipart_error(e, max_image_size))?
        {
            let name = field.name().map(|s| s.to_string()).unwrap_or_default();

            if name == IMAGE_FIELD {
                if self.image.is_some() {
                    self.extra_images += 1;
                    continue;
                }
                self.image = stage_image(field, temp_dir, max_image_size).await?;
            } else if field.file_name().is_none() {
                let value = field
                    .text()
                    .await
                    .map_err(|e| multipart_error(e, max_image_size))?;
                self.values.insert(name, value);
            } else {
                tracing::debug!(field = %name, "Ignoring unexpected file field");
            }
        }
        Ok(())
    }

    /// Remove the staged image unless the store already moved it.
    pub async fn discard(&mut self) {
        if let Some(upload) = self.image.as_mut() {
            upload.discard().await;
        }
    }
}

/// Stream one image part into a temp file. Returns `None` for an empty file input
/// (no filename, no bytes), which browsers send when nothing was selected.
async fn stage_image(
    mut field: Field<'_>,
    temp_dir: &Path,
    max_image_size: u64,
) -> Result<Option<StagedUpload>, AppError> {
    let filename = field.file_name().map(|s| s.to_string());
    let content_type = field
        .content_type()
        .map(|s| s.to_string())
        .unwrap_or_else(|| "application/octet-stream".to_string());

    let named = tempfile::Builder::new()
        .prefix("upload-")
        .tempfile_in(temp_dir)
        .map_err(|e| {
            AppError::Internal(format!(
                "Failed to create staging file in {}: {}",
                temp_dir.display(),
                e
            ))
        })?;
    let (file, temp_path) = named.into_parts();
    let mut file = tokio::fs::File::from_std(file);
    // from here on the temp file is removed when `upload` drops
    let mut upload = StagedUpload::new(temp_path, content_type.clone(), String::new(), 0);

    let mut size: u64 = 0;
    while let Some(chunk) = field
        .chunk()
        .await
        .map_err(|e| multipart_error(e, max_image_size))?
    {
        let written = size;
        size += chunk.len() as u64;
        if size <= max_image_size {
            file.write_all(&chunk).await?;
        } else if written <= max_image_size {
            tracing::debug!(max_image_size, "Image exceeds size limit, no longer staging bytes");
        }
    }
    file.flush().await?;
    drop(file);

    if size == 0 && filename.as_deref().map(str::is_empty).unwrap_or(true) {
        upload.discard().await;
        return Ok(None);
    }

    let extension = image_extension(filename.as_deref(), &content_type);
    tracing::debug!(
        filename = ?filename,
        content_type = %content_type,
        size_bytes = size,
        "Staged image upload"
    );
    Ok(Some(upload.with_details(extension, size)))
}

fn multipart_error(err: MultipartError, max_image_size: u64) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return AppError::PayloadTooLarge {
            size: max_image_size.saturating_add(1),
            max: max_image_size,
        };
    }
    AppError::InvalidMultipart(format!("Failed to read multipart body: {}", err.body_text()))
}
