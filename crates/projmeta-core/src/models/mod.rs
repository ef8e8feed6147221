//! Data models for the application

mod project;
mod response;

pub use project::*;
pub use response::*;
