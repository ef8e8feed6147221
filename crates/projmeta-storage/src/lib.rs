//! Projmeta Storage Library
//!
//! Key-addressed project store. A project identified by `(chainID, tokenAddress)` lives in
//! exactly one directory:
//!
//! ```text
//! <root>/<chainID>/<tokenAddress>/metadata.json
//! <root>/<chainID>/<tokenAddress>/project-image.<ext>
//! ```
//!
//! A project exists iff its `metadata.json` exists; an image without metadata is treated as
//! absent. Path and URL derivation is centralized in the `layout` module.

pub(crate) mod layout;
pub mod local;
pub(crate) mod locks;
pub mod staged;
pub mod traits;

// Re-export commonly used types
pub use local::LocalProjectStore;
pub use staged::StagedUpload;
pub use traits::{CreateOutcome, ProjectStore, StorageError, StorageResult, StoredProject};
