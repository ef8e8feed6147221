//! Application state shared by all handlers.

use crate::services::IntakeService;
use projmeta_core::Config;
use projmeta_storage::ProjectStore;
use std::sync::Arc;

pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn ProjectStore>,
    pub intake: IntakeService,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn ProjectStore>, intake: IntakeService) -> Self {
        Self {
            config,
            store,
            intake,
        }
    }

    /// Whether error bodies may carry internal details.
    pub fn expose_error_details(&self) -> bool {
        !self.config.is_production()
    }
}
