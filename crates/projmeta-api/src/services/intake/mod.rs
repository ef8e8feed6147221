//! Upload intake pipeline.

mod form;
mod service;
mod validation;

pub use form::ProjectForm;
pub use service::{IntakeConfig, IntakeOutcome, IntakeService};
