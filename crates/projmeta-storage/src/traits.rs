//! Project store abstraction
//!
//! This module defines the `ProjectStore` trait the intake pipeline is written against.

use async_trait::async_trait;
use projmeta_core::{ProjectFields, ProjectKey, ProjectRecord};
use thiserror::Error;

use crate::staged::StagedUpload;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Write failed: {0}")]
    WriteFailed(String),

    #[error("Read failed: {0}")]
    ReadFailed(String),

    #[error("Project not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// An existing project as read back from disk.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredProject {
    /// `metadata.json` exactly as stored.
    pub metadata: serde_json::Value,
    pub metadata_url: String,
    /// `None` when the metadata document exists but no image file does.
    pub image_url: Option<String>,
}

/// Result of [`ProjectStore::create_or_fetch`].
#[derive(Debug, Clone, PartialEq)]
pub enum CreateOutcome {
    /// A new record was committed; the staged upload was consumed.
    Created {
        record: ProjectRecord,
        metadata_url: String,
        image_url: String,
    },
    /// The key already had a record; nothing was written and the staged upload is untouched.
    Existing(StoredProject),
}

impl CreateOutcome {
    pub fn is_created(&self) -> bool {
        matches!(self, CreateOutcome::Created { .. })
    }
}

/// Key-addressed project store.
///
/// Implementations own the storage tree exclusively. A record is created at most once per key
/// and never modified afterwards.
#[async_trait]
pub trait ProjectStore: Send + Sync {
    /// True iff the metadata document for `key` is present and readable.
    async fn exists(&self, key: &ProjectKey) -> StorageResult<bool>;

    /// Read back an existing project. Fails with `NotFound` when no metadata document exists.
    async fn fetch(&self, key: &ProjectKey) -> StorageResult<StoredProject>;

    /// Create the record for `key` from `fields` and `upload`, or return the existing one.
    ///
    /// The existence check always runs before any write. On `Created` the upload has been
    /// moved into the tree; on `Existing` or on error it is left for the caller to discard.
    async fn create_or_fetch(
        &self,
        key: &ProjectKey,
        fields: ProjectFields,
        upload: &mut StagedUpload,
    ) -> StorageResult<CreateOutcome>;

    /// Check that the storage root can be written to.
    async fn health_check(&self) -> StorageResult<()>;
}
