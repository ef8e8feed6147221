use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::MAX_KEY_COMPONENT_LEN;
use crate::error::AppError;

/// Composite identifier of a project: `(chainID, tokenAddress)`.
///
/// Components are kept byte-for-byte as submitted (no case folding, no trimming). Construction
/// goes through [`ProjectKey::new`], which rejects values that are not a single, safe path
/// segment, so every key can be joined onto the storage root without escaping it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProjectKey {
    chain_id: String,
    token_address: String,
}

impl ProjectKey {
    pub fn new(
        chain_id: impl Into<String>,
        token_address: impl Into<String>,
    ) -> Result<Self, AppError> {
        let chain_id = chain_id.into();
        let token_address = token_address.into();
        validate_component("chainID", &chain_id)?;
        validate_component("tokenAddress", &token_address)?;
        Ok(Self {
            chain_id,
            token_address,
        })
    }

    pub fn chain_id(&self) -> &str {
        &self.chain_id
    }

    pub fn token_address(&self) -> &str {
        &self.token_address
    }
}

impl fmt::Display for ProjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.chain_id, self.token_address)
    }
}

fn validate_component(name: &str, value: &str) -> Result<(), AppError> {
    if value.is_empty() {
        return Err(AppError::InvalidKey(format!("{} must not be empty", name)));
    }
    if value == "." || value == ".." {
        return Err(AppError::InvalidKey(format!(
            "{} must not be '.' or '..'",
            name
        )));
    }
    if value.contains(['/', '\\', '\0']) {
        return Err(AppError::InvalidKey(format!(
            "{} must not contain path separators",
            name
        )));
    }
    if value.len() > MAX_KEY_COMPONENT_LEN {
        return Err(AppError::InvalidKey(format!(
            "{} must be at most {} bytes",
            name, MAX_KEY_COMPONENT_LEN
        )));
    }
    Ok(())
}

/// Submitted project fields, excluding the key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectFields {
    pub project_name: String,
    pub project_description: String,
    pub website: String,
    pub twitter: String,
    pub telegram: String,
    pub discord: String,
}

/// The durable project document stored as `metadata.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRecord {
    pub project_name: String,
    pub project_description: String,
    #[serde(rename = "chainID")]
    pub chain_id: String,
    pub token_address: String,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub twitter: String,
    #[serde(default)]
    pub telegram: String,
    #[serde(default)]
    pub discord: String,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProjectRecord {
    /// Build a fresh record; both timestamps are set to `now`.
    pub fn new(
        key: &ProjectKey,
        fields: ProjectFields,
        image_url: String,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            project_name: fields.project_name,
            project_description: fields.project_description,
            chain_id: key.chain_id().to_string(),
            token_address: key.token_address().to_string(),
            website: fields.website,
            twitter: fields.twitter,
            telegram: fields.telegram,
            discord: fields.discord,
            image_url,
            created_at: now,
            updated_at: now,
        }
    }
}
