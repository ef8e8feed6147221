//! Intake pipeline: validate a submission, stage its image and hand it to the project store.

use axum::extract::Multipart;
use projmeta_core::{AppError, Config};
use projmeta_storage::{CreateOutcome, ProjectStore, StagedUpload};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use super::form::ProjectForm;
use super::validation::{required_fields, validate_content_type, validate_file_size};
use crate::error::storage_error;

#[derive(Debug, Clone)]
pub struct IntakeConfig {
    /// Directory uploads are staged in before the store takes them.
    pub temp_dir: PathBuf,
    pub max_image_size_bytes: u64,
}

impl From<&Config> for IntakeConfig {
    fn from(config: &Config) -> Self {
        Self {
            temp_dir: config.upload_temp_dir.clone(),
            max_image_size_bytes: config.max_image_size_bytes as u64,
        }
    }
}

/// What a successful submission produced.
#[derive(Debug, Clone, PartialEq)]
pub enum IntakeOutcome {
    Created {
        metadata_url: String,
        image_url: String,
    },
    Existing {
        metadata_url: String,
        image_url: Option<String>,
    },
}

#[derive(Clone)]
pub struct IntakeService {
    store: Arc<dyn ProjectStore>,
    config: IntakeConfig,
}

impl IntakeService {
    pub fn new(store: Arc<dyn ProjectStore>, config: IntakeConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &IntakeConfig {
        &self.config
    }

    /// Run one submission through the pipeline.
    ///
    /// Whatever happens, the staged image is gone when this returns: either moved into the
    /// store by a successful create, or removed here.
    pub async fn submit(&self, multipart: Multipart) -> Result<IntakeOutcome, AppError> {
        let start = Instant::now();
        let mut form = ProjectForm::read(
            multipart,
            &self.config.temp_dir,
            self.config.max_image_size_bytes,
        )
        .await?;

        let result = self.process(&mut form).await;
        form.discard().await;

        match &result {
            Ok(outcome) => tracing::info!(
                created = matches!(outcome, IntakeOutcome::Created { .. }),
                duration_ms = start.elapsed().as_millis() as u64,
                "Project submission handled"
            ),
            Err(err) => tracing::debug!(
                error = %err,
                duration_ms = start.elapsed().as_millis() as u64,
                "Project submission rejected"
            ),
        }

        result
    }

    async fn process(&self, form: &mut ProjectForm) -> Result<IntakeOutcome, AppError> {
        let (key, fields) = required_fields(&form.values)?;

        if self.store.exists(&key).await.map_err(storage_error)? {
            tracing::debug!(key = %key, "Project already exists, skipping image checks");
            return self.existing(&key).await;
        }

        let upload = self.check_image(form)?;

        match self
            .store
            .create_or_fetch(&key, fields, upload)
            .await
            .map_err(storage_error)?
        {
            CreateOutcome::Created {
                metadata_url,
                image_url,
                ..
            } => Ok(IntakeOutcome::Created {
                metadata_url,
                image_url,
            }),
            // another request committed this key between the check above and the lock
            CreateOutcome::Existing(project) => Ok(IntakeOutcome::Existing {
                metadata_url: project.metadata_url,
                image_url: project.image_url,
            }),
        }
    }

    async fn existing(&self, key: &projmeta_core::ProjectKey) -> Result<IntakeOutcome, AppError> {
        let project = self.store.fetch(key).await.map_err(storage_error)?;
        Ok(IntakeOutcome::Existing {
            metadata_url: project.metadata_url,
            image_url: project.image_url,
        })
    }

    /// Presence, type and size gates, in that order.
    fn check_image<'a>(&self, form: &'a mut ProjectForm) -> Result<&'a mut StagedUpload, AppError> {
        if form.extra_images > 0 {
            return Err(AppError::MultipleImages);
        }
        let upload = form.image.as_mut().ok_or(AppError::MissingImage)?;
        validate_content_type(upload.content_type())?;
        validate_file_size(upload.size(), self.config.max_image_size_bytes)?;
        Ok(upload)
    }
}
