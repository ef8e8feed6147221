use crate::layout::{self, METADATA_TEMP_FILENAME};
use crate::locks::KeyLocks;
use crate::staged::StagedUpload;
use crate::traits::{CreateOutcome, ProjectStore, StorageError, StorageResult, StoredProject};
use async_trait::async_trait;
use chrono::Utc;
use projmeta_core::constants::IMAGE_FILE_STEM;
use projmeta_core::{ProjectFields, ProjectKey, ProjectRecord};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Local filesystem project store
#[derive(Clone)]
pub struct LocalProjectStore {
    base_path: PathBuf,
    base_url: String,
    locks: Arc<KeyLocks>,
}

impl LocalProjectStore {
    /// Create a new LocalProjectStore instance
    ///
    /// # Arguments
    /// * `base_path` - Root directory of the project tree (e.g., "/var/lib/projmeta/storage")
    /// * `base_url` - Base URL the tree is served under (e.g., "http://localhost:4000/storage")
    pub async fn new(base_path: impl Into<PathBuf>, base_url: String) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalProjectStore {
            base_path,
            base_url,
            locks: Arc::new(KeyLocks::default()),
        })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Sorted names of accepted image files in `dir`; empty when the directory is missing.
    async fn image_files(&self, dir: &Path) -> StorageResult<Vec<String>> {
        let mut entries = match fs::read_dir(dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(StorageError::ReadFailed(format!(
                    "Failed to list {}: {}",
                    dir.display(),
                    e
                )))
            }
        };

        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(|e| {
            StorageError::ReadFailed(format!("Failed to list {}: {}", dir.display(), e))
        })? {
            let is_file = entry.file_type().await.map(|t| t.is_file()).unwrap_or(false);
            if let Some(name) = entry.file_name().to_str() {
                if is_file && layout::is_image_file(name) {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    /// Remove image files left behind by an earlier create that never wrote its metadata.
    async fn remove_orphaned_images(&self, key: &ProjectKey, dir: &Path) -> StorageResult<()> {
        for name in self.image_files(dir).await? {
            let path = dir.join(&name);
            tracing::warn!(
                key = %key,
                path = %path.display(),
                "Removing orphaned project image without metadata"
            );
            fs::remove_file(&path).await.map_err(|e| {
                StorageError::WriteFailed(format!(
                    "Failed to remove orphaned image {}: {}",
                    path.display(),
                    e
                ))
            })?;
        }
        Ok(())
    }

    /// Write `metadata.json` through a hidden sibling and rename it into place.
    async fn write_metadata(&self, dir: &Path, record: &ProjectRecord) -> StorageResult<()> {
        let data = serde_json::to_vec_pretty(record).map_err(|e| {
            StorageError::WriteFailed(format!("Failed to serialize metadata: {}", e))
        })?;
        let temp_path = dir.join(METADATA_TEMP_FILENAME);
        let final_path = dir.join(projmeta_core::constants::METADATA_FILENAME);

        let result = async {
            let mut file = fs::File::create(&temp_path).await.map_err(|e| {
                StorageError::WriteFailed(format!(
                    "Failed to create file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;
            file.write_all(&data).await.map_err(|e| {
                StorageError::WriteFailed(format!(
                    "Failed to write file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;
            file.sync_all().await.map_err(|e| {
                StorageError::WriteFailed(format!(
                    "Failed to sync file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;
            fs::rename(&temp_path, &final_path).await.map_err(|e| {
                StorageError::WriteFailed(format!(
                    "Failed to rename {} to {}: {}",
                    temp_path.display(),
                    final_path.display(),
                    e
                ))
            })
        }
        .await;

        if result.is_err() {
            let _ = fs::remove_file(&temp_path).await;
        }
        result
    }

    fn image_url(&self, key: &ProjectKey, filename: &str) -> String {
        layout::public_url(&self.base_url, key, filename)
    }
}

#[async_trait]
impl ProjectStore for LocalProjectStore {
    async fn exists(&self, key: &ProjectKey) -> StorageResult<bool> {
        let path = layout::metadata_path(&self.base_path, key);

        match fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => {}
            Ok(_) => return Ok(false),
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(false),
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "Metadata not accessible");
                return Ok(false);
            }
        }

        match fs::File::open(&path).await {
            Ok(_) => Ok(true),
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "Metadata not readable");
                Ok(false)
            }
        }
    }

    async fn fetch(&self, key: &ProjectKey) -> StorageResult<StoredProject> {
        let dir = layout::project_dir(&self.base_path, key);
        let path = layout::metadata_path(&self.base_path, key);

        let data = fs::read(&path).await.map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                StorageError::NotFound(key.to_string())
            } else {
                StorageError::ReadFailed(format!("Failed to read file {}: {}", path.display(), e))
            }
        })?;

        let metadata: serde_json::Value = serde_json::from_slice(&data).map_err(|e| {
            StorageError::ReadFailed(format!("Corrupt metadata at {}: {}", path.display(), e))
        })?;

        let images = self.image_files(&dir).await?;
        let image = images
            .iter()
            .find(|name| {
                Path::new(name.as_str()).file_stem().and_then(|s| s.to_str())
                    == Some(IMAGE_FILE_STEM)
            })
            .or_else(|| images.first());

        if image.is_none() {
            tracing::warn!(key = %key, "Project metadata exists but no image file was found");
        }

        Ok(StoredProject {
            metadata,
            metadata_url: layout::metadata_url(&self.base_url, key),
            image_url: image.map(|name| self.image_url(key, name)),
        })
    }

    async fn create_or_fetch(
        &self,
        key: &ProjectKey,
        fields: ProjectFields,
        upload: &mut StagedUpload,
    ) -> StorageResult<CreateOutcome> {
        let _guard = self.locks.lock(key).await;

        if self.exists(key).await? {
            tracing::info!(key = %key, "Project already exists, returning stored record");
            return Ok(CreateOutcome::Existing(self.fetch(key).await?));
        }

        let start = std::time::Instant::now();
        let filename = layout::image_filename(upload.extension());
        if !layout::is_image_file(&filename) {
            return Err(StorageError::WriteFailed(format!(
                "Unsupported image extension '{}'",
                upload.extension()
            )));
        }

        let dir = layout::project_dir(&self.base_path, key);
        fs::create_dir_all(&dir).await.map_err(|e| {
            StorageError::WriteFailed(format!(
                "Failed to create directory {}: {}",
                dir.display(),
                e
            ))
        })?;

        self.remove_orphaned_images(key, &dir).await?;

        let image_path = dir.join(&filename);
        upload.persist_to(&image_path).await.map_err(|e| {
            StorageError::WriteFailed(format!(
                "Failed to move upload to {}: {}",
                image_path.display(),
                e
            ))
        })?;

        let image_url = self.image_url(key, &filename);
        let record = ProjectRecord::new(key, fields, image_url.clone(), Utc::now());
        self.write_metadata(&dir, &record).await?;

        tracing::info!(
            key = %key,
            path = %dir.display(),
            size_bytes = upload.size(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Project stored"
        );

        Ok(CreateOutcome::Created {
            record,
            metadata_url: layout::metadata_url(&self.base_url, key),
            image_url,
        })
    }

    async fn health_check(&self) -> StorageResult<()> {
        let base_path = self.base_path.clone();
        tokio::task::spawn_blocking(move || {
            tempfile::Builder::new()
                .prefix(".health-")
                .tempfile_in(&base_path)
                .map(drop)
        })
        .await
        .map_err(|e| StorageError::WriteFailed(e.to_string()))?
        .map_err(|e| {
            StorageError::WriteFailed(format!(
                "Storage root {} is not writable: {}",
                self.base_path.display(),
                e
            ))
        })
    }
}
