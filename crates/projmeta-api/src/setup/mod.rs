//! Application setup and initialization

pub mod routes;
pub mod server;
pub mod storage;

use crate::services::{IntakeConfig, IntakeService};
use crate::state::AppState;
use anyhow::{Context, Result};
use projmeta_core::Config;
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    config.validate().context("Configuration validation failed")?;
    tracing::info!(
        environment = %config.environment(),
        storage_path = %config.storage_path.display(),
        upload_temp_dir = %config.upload_temp_dir.display(),
        "Configuration loaded and validated successfully"
    );

    let store = storage::setup_storage(&config).await?;
    let intake = IntakeService::new(store.clone(), IntakeConfig::from(&config));
    let state = Arc::new(AppState::new(config.clone(), store, intake));

    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
