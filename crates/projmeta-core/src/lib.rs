//! Projmeta Core Library
//!
//! This crate provides the domain models, error types, configuration and layout constants
//! shared by the project store and the HTTP intake service.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{ProjectFields, ProjectKey, ProjectRecord};
