use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const CREATED_MESSAGE: &str = "Project metadata stored successfully";
pub const EXISTING_MESSAGE: &str = "Project already exists";

/// Body returned by the intake endpoint on success.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectResponse {
    pub success: bool,
    pub message: String,
    pub metadata_url: String,
    /// `null` when an existing project has no image file on disk.
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub existing: Option<bool>,
}

impl ProjectResponse {
    pub fn created(metadata_url: String, image_url: String) -> Self {
        Self {
            success: true,
            message: CREATED_MESSAGE.to_string(),
            metadata_url,
            image_url: Some(image_url),
            existing: None,
        }
    }

    pub fn existing(metadata_url: String, image_url: Option<String>) -> Self {
        Self {
            success: true,
            message: EXISTING_MESSAGE.to_string(),
            metadata_url,
            image_url,
            existing: Some(true),
        }
    }
}
