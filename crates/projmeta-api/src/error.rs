//! HTTP error response conversion
//!
//! Handlers return `Result<_, HttpAppError>`. Every error body carries `success: false` and a
//! human-readable `error`; validation errors also list the inputs the endpoint expects so a
//! client can correct the request in one go.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use projmeta_core::constants::{ACCEPTED_IMAGE_CONTENT_TYPES, OPTIONAL_FIELDS, REQUIRED_FIELDS};
use projmeta_core::{AppError, ErrorMetadata, LogLevel};
use projmeta_storage::StorageError;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    /// Always `false`
    pub success: bool,
    pub error: String,
    /// Machine-readable error code for programmatic handling
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_action: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub missing_fields: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_fields: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optional_fields: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accepted_types: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_size_bytes: Option<u64>,
}

impl ErrorResponse {
    fn from_app_error(error: &AppError, expose_details: bool) -> Self {
        let mut body = ErrorResponse {
            success: false,
            error: error.client_message(),
            code: error.error_code().to_string(),
            details: None,
            error_type: None,
            suggested_action: error.suggested_action().map(String::from),
            missing_fields: None,
            required_fields: None,
            optional_fields: None,
            accepted_types: None,
            max_size_bytes: None,
        };

        if expose_details && !error.is_sensitive() {
            body.details = Some(error.detailed_message());
            body.error_type = Some(error.error_type().to_string());
        }

        if error.is_client_error() {
            body.required_fields = Some(to_strings(REQUIRED_FIELDS));
            body.optional_fields = Some(to_strings(OPTIONAL_FIELDS));
        }

        match error {
            AppError::MissingFields { missing } => body.missing_fields = Some(missing.clone()),
            AppError::MissingImage
            | AppError::MultipleImages
            | AppError::UnsupportedMediaType { .. } => {
                body.accepted_types = Some(to_strings(ACCEPTED_IMAGE_CONTENT_TYPES));
            }
            AppError::PayloadTooLarge { max, .. } => {
                body.accepted_types = Some(to_strings(ACCEPTED_IMAGE_CONTENT_TYPES));
                body.max_size_bytes = Some(*max);
            }
            _ => {}
        }

        body
    }
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

/// Wrapper type for AppError to implement IntoResponse
///
/// `expose_details` is decided by the caller from configuration (off in production).
#[derive(Debug)]
pub struct HttpAppError {
    pub error: AppError,
    pub expose_details: bool,
}

impl HttpAppError {
    pub fn new(error: AppError, expose_details: bool) -> Self {
        Self {
            error,
            expose_details,
        }
    }
}

impl From<AppError> for HttpAppError {
    fn from(error: AppError) -> Self {
        HttpAppError::new(error, false)
    }
}

impl From<StorageError> for HttpAppError {
    fn from(err: StorageError) -> Self {
        HttpAppError::from(storage_error(err))
    }
}

/// Map a store failure onto the application error taxonomy.
pub fn storage_error(err: StorageError) -> AppError {
    match err {
        StorageError::WriteFailed(message) => AppError::StorageWriteFailed { message },
        StorageError::ReadFailed(message) => AppError::StorageReadFailed { message },
        StorageError::NotFound(key) => AppError::StorageReadFailed {
            message: format!("Project {} disappeared while being read", key),
        },
        StorageError::ConfigError(msg) => AppError::Internal(msg),
    }
}

pub fn log_error(error: &AppError) {
    let error_type = error.error_type();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type = error_type, "Request rejected");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Error => {
            tracing::error!(
                error = %error.detailed_message(),
                error_type = error_type,
                "Error occurred"
            );
        }
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(&self.error);

        let body = ErrorResponse::from_app_error(&self.error, self.expose_details);
        (status, Json(body)).into_response()
    }
}
