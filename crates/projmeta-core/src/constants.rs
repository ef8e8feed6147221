//! Layout and validation constants shared by the store and the intake pipeline.

/// Name of the metadata document inside a project directory.
pub const METADATA_FILENAME: &str = "metadata.json";

/// File stem of the stored project image (`project-image.<ext>`).
pub const IMAGE_FILE_STEM: &str = "project-image";

/// Image extensions recognised when scanning a project directory.
pub const ACCEPTED_IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif"];

/// MIME types accepted for the uploaded image.
pub const ACCEPTED_IMAGE_CONTENT_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif"];

/// Default maximum image size: 3 MiB.
pub const DEFAULT_MAX_IMAGE_SIZE_BYTES: usize = 3 * 1024 * 1024;

/// URL path under which the storage root is served read-only.
pub const STORAGE_URL_PATH: &str = "/storage";

/// Multipart field carrying the image.
pub const IMAGE_FIELD: &str = "image";

/// Required multipart text fields, in the order they are reported.
pub const REQUIRED_FIELDS: &[&str] = &[
    "projectName",
    "projectDescription",
    "chainID",
    "tokenAddress",
];

/// Optional multipart text fields.
pub const OPTIONAL_FIELDS: &[&str] = &["website", "twitter", "telegram", "discord"];

/// Longest accepted key component (one path segment).
pub const MAX_KEY_COMPONENT_LEN: usize = 255;
