//! Canonical on-disk layout and public URLs.
//!
//! Layout: `<root>/<chainID>/<tokenAddress>/{metadata.json,project-image.<ext>}`. URLs mirror
//! it under the configured storage base URL, with each key component percent-encoded.

use projmeta_core::constants::{ACCEPTED_IMAGE_EXTENSIONS, IMAGE_FILE_STEM, METADATA_FILENAME};
use projmeta_core::ProjectKey;
use std::path::{Path, PathBuf};

/// Hidden sibling the metadata document is written to before being renamed into place.
pub const METADATA_TEMP_FILENAME: &str = ".metadata.json.tmp";

pub fn project_dir(base_path: &Path, key: &ProjectKey) -> PathBuf {
    base_path.join(key.chain_id()).join(key.token_address())
}

pub fn metadata_path(base_path: &Path, key: &ProjectKey) -> PathBuf {
    project_dir(base_path, key).join(METADATA_FILENAME)
}

pub fn image_filename(extension: &str) -> String {
    format!("{}.{}", IMAGE_FILE_STEM, extension)
}

/// Public URL of `filename` inside the project directory of `key`.
pub fn public_url(base_url: &str, key: &ProjectKey, filename: &str) -> String {
    format!(
        "{}/{}/{}/{}",
        base_url.trim_end_matches('/'),
        urlencoding::encode(key.chain_id()),
        urlencoding::encode(key.token_address()),
        filename
    )
}

pub fn metadata_url(base_url: &str, key: &ProjectKey) -> String {
    public_url(base_url, key, METADATA_FILENAME)
}

/// True when `filename` has one of the accepted image extensions (case-insensitive).
pub fn is_image_file(filename: &str) -> bool {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            let e = e.to_lowercase();
            ACCEPTED_IMAGE_EXTENSIONS.contains(&e.as_str())
        })
        .unwrap_or(false)
}
