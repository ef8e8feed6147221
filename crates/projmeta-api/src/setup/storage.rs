//! Storage setup and initialization

use anyhow::{Context, Result};
use projmeta_core::Config;
use projmeta_storage::{LocalProjectStore, ProjectStore};
use std::sync::Arc;

/// Open the project store and make sure the staging directory exists.
pub async fn setup_storage(config: &Config) -> Result<Arc<dyn ProjectStore>> {
    tracing::info!("Initializing project store...");

    let store = LocalProjectStore::new(config.storage_path.clone(), config.storage_base_url())
        .await
        .context("Failed to initialize project store")?;

    tokio::fs::create_dir_all(&config.upload_temp_dir)
        .await
        .with_context(|| {
            format!(
                "Failed to create upload temp dir {}",
                config.upload_temp_dir.display()
            )
        })?;

    tracing::info!(
        storage_path = %store.base_path().display(),
        base_url = %config.storage_base_url(),
        "Project store initialized successfully"
    );

    Ok(Arc::new(store))
}
