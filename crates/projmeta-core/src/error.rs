//! Error types module
//!
//! All failures surfaced by the intake pipeline are unified under [`AppError`]. Client-input
//! errors (missing fields, bad image) are fully described to the caller; storage failures are
//! reported with a generic message and logged with their full context. `TempCleanupFailed` is
//! never rendered to a client: it exists so cleanup failures are logged the same way as
//! everything else.

use std::io;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues like leftover temp files
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "MISSING_FIELDS")
    fn error_code(&self) -> &'static str;

    /// Suggested action for the client
    fn suggested_action(&self) -> Option<&'static str>;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Whether details should be hidden from every client, regardless of environment
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Missing required fields: {}", missing.join(", "))]
    MissingFields { missing: Vec<String> },

    #[error("Invalid project key: {0}")]
    InvalidKey(String),

    #[error("Project image is required for new projects")]
    MissingImage,

    #[error("Only one project image may be uploaded")]
    MultipleImages,

    #[error("Unsupported image type: {content_type}")]
    UnsupportedMediaType { content_type: String },

    #[error("Image too large: {size} bytes (max: {max} bytes)")]
    PayloadTooLarge { size: u64, max: u64 },

    #[error("Invalid multipart request: {0}")]
    InvalidMultipart(String),

    #[error("Storage write failed: {message}")]
    StorageWriteFailed { message: String },

    #[error("Storage read failed: {message}")]
    StorageReadFailed { message: String },

    #[error("Failed to remove staged upload {path}: {message}")]
    TempCleanupFailed { path: String, message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Internal(format!("IO error: {}", err))
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(format!("{:#}", err))
    }
}

/// Static metadata for each variant: (http_status, error_code, suggested_action, sensitive, log_level).
fn app_error_static_metadata(
    err: &AppError,
) -> (u16, &'static str, Option<&'static str>, bool, LogLevel) {
    match err {
        AppError::MissingFields { .. } => (
            400,
            "MISSING_FIELDS",
            Some("Provide every required field and resubmit"),
            false,
            LogLevel::Debug,
        ),
        AppError::InvalidKey(_) => (
            400,
            "INVALID_KEY",
            Some("chainID and tokenAddress must not contain '/', '\\' or be '.' or '..'"),
            false,
            LogLevel::Debug,
        ),
        AppError::MissingImage => (
            400,
            "MISSING_IMAGE",
            Some("Attach exactly one image in the 'image' field"),
            false,
            LogLevel::Debug,
        ),
        AppError::MultipleImages => (
            400,
            "MULTIPLE_IMAGES",
            Some("Attach exactly one image in the 'image' field"),
            false,
            LogLevel::Debug,
        ),
        AppError::UnsupportedMediaType { .. } => (
            400,
            "UNSUPPORTED_MEDIA_TYPE",
            Some("Upload a JPEG, PNG or GIF image"),
            false,
            LogLevel::Debug,
        ),
        AppError::PayloadTooLarge { .. } => (
            400,
            "PAYLOAD_TOO_LARGE",
            Some("Reduce the image size and resubmit"),
            false,
            LogLevel::Debug,
        ),
        AppError::InvalidMultipart(_) => (
            400,
            "INVALID_MULTIPART",
            Some("Send the request as multipart/form-data"),
            false,
            LogLevel::Debug,
        ),
        AppError::StorageWriteFailed { .. } => (
            500,
            "STORAGE_WRITE_FAILED",
            Some("Retry after a short delay"),
            false,
            LogLevel::Error,
        ),
        AppError::StorageReadFailed { .. } => (
            500,
            "STORAGE_READ_FAILED",
            Some("Retry after a short delay"),
            false,
            LogLevel::Error,
        ),
        AppError::TempCleanupFailed { .. } => (500, "TEMP_CLEANUP_FAILED", None, true, LogLevel::Warn),
        AppError::Internal(_) => (
            500,
            "INTERNAL_ERROR",
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
    }
}

impl AppError {
    /// Get the error type name for detailed error responses
    pub fn error_type(&self) -> &'static str {
        match self {
            AppError::MissingFields { .. } => "MissingFields",
            AppError::InvalidKey(_) => "InvalidKey",
            AppError::MissingImage => "MissingImage",
            AppError::MultipleImages => "MultipleImages",
            AppError::UnsupportedMediaType { .. } => "UnsupportedMediaType",
            AppError::PayloadTooLarge { .. } => "PayloadTooLarge",
            AppError::InvalidMultipart(_) => "InvalidMultipart",
            AppError::StorageWriteFailed { .. } => "StorageWriteFailed",
            AppError::StorageReadFailed { .. } => "StorageReadFailed",
            AppError::TempCleanupFailed { .. } => "TempCleanupFailed",
            AppError::Internal(_) => "Internal",
        }
    }

    /// True for errors caused by the request contents rather than the server.
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.http_status_code())
    }

    /// Get detailed error information including error chain
    pub fn detailed_message(&self) -> String {
        use std::error::Error;

        let mut details = self.to_string();

        let mut source = self.source();
        let mut depth = 0;
        while let Some(err) = source {
            depth += 1;
            if depth > 5 {
                details.push_str("\n  ... (truncated)");
                break;
            }
            details.push_str(&format!("\n  Caused by: {}", err));
            source = err.source();
        }

        details
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn suggested_action(&self) -> Option<&'static str> {
        app_error_static_metadata(self).2
    }

    fn is_sensitive(&self) -> bool {
        app_error_static_metadata(self).3
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).4
    }

    fn client_message(&self) -> String {
        match self {
            AppError::MissingFields { missing } => {
                format!("Missing required fields: {}", missing.join(", "))
            }
            AppError::InvalidKey(ref msg) => msg.clone(),
            AppError::MissingImage => {
                "A project image is required: upload one file in the 'image' field".to_string()
            }
            AppError::MultipleImages => "Only one project image may be uploaded".to_string(),
            AppError::UnsupportedMediaType { content_type } => format!(
                "Unsupported image type '{}': only JPEG, PNG and GIF images are allowed",
                content_type
            ),
            AppError::PayloadTooLarge { max, .. } => format!(
                "Image file is too large: maximum allowed size is {} bytes",
                max
            ),
            AppError::InvalidMultipart(ref msg) => msg.clone(),
            AppError::StorageWriteFailed { .. } => "Failed to store project metadata".to_string(),
            AppError::StorageReadFailed { .. } => "Failed to read project metadata".to_string(),
            AppError::TempCleanupFailed { .. } | AppError::Internal(_) => {
                "Internal server error".to_string()
            }
        }
    }
}
