//! Project submission handler.

use crate::error::{ErrorResponse, HttpAppError};
use crate::services::IntakeOutcome;
use crate::state::AppState;
use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use projmeta_core::models::ProjectResponse;
use std::sync::Arc;

/// Submit project metadata with its image.
///
/// Creates the project when `(chainID, tokenAddress)` is new and answers 201. When the key is
/// already stored nothing is written and the existing locations come back with 200; the image
/// is optional in that case.
#[utoipa::path(
    post,
    path = "/api/v0/projects",
    tag = "projects",
    request_body(content = inline(Object), content_type = "multipart/form-data",
        description = "Fields projectName, projectDescription, chainID, tokenAddress (required), website, twitter, telegram, discord (optional) and one `image` file (JPEG, PNG or GIF)"),
    responses(
        (status = 201, description = "Project metadata stored", body = ProjectResponse),
        (status = 200, description = "Project already exists", body = ProjectResponse),
        (status = 400, description = "Invalid submission", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
#[tracing::instrument(
    skip(state, multipart),
    fields(
        request_id = %uuid::Uuid::new_v4(),
        operation = "submit_project"
    )
)]
pub async fn submit_project(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Response, HttpAppError> {
    let outcome = state
        .intake
        .submit(multipart)
        .await
        .map_err(|e| HttpAppError::new(e, state.expose_error_details()))?;

    let response = match outcome {
        IntakeOutcome::Created {
            metadata_url,
            image_url,
        } => (
            StatusCode::CREATED,
            Json(ProjectResponse::created(metadata_url, image_url)),
        ),
        IntakeOutcome::Existing {
            metadata_url,
            image_url,
        } => (
            StatusCode::OK,
            Json(ProjectResponse::existing(metadata_url, image_url)),
        ),
    };

    Ok(response.into_response())
}
