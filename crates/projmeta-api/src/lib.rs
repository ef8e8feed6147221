//! Projmeta API Library
//!
//! HTTP intake for project metadata: handlers, the intake pipeline and application setup.

mod api_doc;
pub mod constants;
mod handlers;
pub mod services;
pub mod setup;
pub mod telemetry;

pub mod error;
pub mod state;

pub use error::{ErrorResponse, HttpAppError};
pub use services::{IntakeConfig, IntakeOutcome, IntakeService};
pub use state::AppState;
