//! Validation gates of the intake pipeline.

use projmeta_core::constants::{
    ACCEPTED_IMAGE_CONTENT_TYPES, ACCEPTED_IMAGE_EXTENSIONS, REQUIRED_FIELDS,
};
use projmeta_core::{AppError, ProjectFields, ProjectKey};
use std::collections::HashMap;
use std::path::Path;

/// Required-field gate. Reports every missing field at once, then validates the key.
pub fn required_fields(
    values: &HashMap<String, String>,
) -> Result<(ProjectKey, ProjectFields), AppError> {
    let missing: Vec<String> = REQUIRED_FIELDS
        .iter()
        .filter(|name| {
            values
                .get(**name)
                .map(|v| v.trim().is_empty())
                .unwrap_or(true)
        })
        .map(|name| name.to_string())
        .collect();

    if !missing.is_empty() {
        return Err(AppError::MissingFields { missing });
    }

    let get = |name: &str| values.get(name).cloned().unwrap_or_default();

    let key = ProjectKey::new(get("chainID"), get("tokenAddress"))?;
    let fields = ProjectFields {
        project_name: get("projectName"),
        project_description: get("projectDescription"),
        website: get("website"),
        twitter: get("twitter"),
        telegram: get("telegram"),
        discord: get("discord"),
    };

    Ok((key, fields))
}

/// Normalize MIME type by stripping parameters (e.g. "image/png; charset=binary" -> "image/png").
fn normalize_mime_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .map(|s| s.trim())
        .unwrap_or(content_type)
        .to_lowercase()
}

/// Type gate: the declared MIME type must be JPEG, PNG or GIF.
pub fn validate_content_type(content_type: &str) -> Result<(), AppError> {
    let normalized = normalize_mime_type(content_type);
    if !ACCEPTED_IMAGE_CONTENT_TYPES.contains(&normalized.as_str()) {
        return Err(AppError::UnsupportedMediaType {
            content_type: content_type.to_string(),
        });
    }
    Ok(())
}

/// Size gate.
pub fn validate_file_size(size: u64, max_size: u64) -> Result<(), AppError> {
    if size > max_size {
        return Err(AppError::PayloadTooLarge {
            size,
            max: max_size,
        });
    }
    Ok(())
}

/// Extension the image is stored under.
///
/// Taken from the original filename when it is an accepted image extension, otherwise derived
/// from the declared MIME type. Always lower-case; empty when neither source is usable (the
/// type gate rejects such uploads).
pub fn image_extension(filename: Option<&str>, content_type: &str) -> String {
    let from_name = filename
        .and_then(|name| Path::new(name).extension())
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .filter(|e| ACCEPTED_IMAGE_EXTENSIONS.contains(&e.as_str()));

    if let Some(extension) = from_name {
        return extension;
    }

    match normalize_mime_type(content_type).as_str() {
        "image/jpeg" => "jpg",
        "image/png" => "png",
        "image/gif" => "gif",
        _ => "",
    }
    .to_string()
}
