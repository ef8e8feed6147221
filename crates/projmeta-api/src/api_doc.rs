//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use projmeta_core::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Projmeta API",
        version = "0.1.0",
        description = "Project metadata intake. Submissions are keyed by (chainID, tokenAddress); each key is stored once and later submissions return the stored locations. Stored files are published under /storage/."
    ),
    paths(
        handlers::projects::submit_project,
        handlers::health::liveness_check,
        handlers::health::readiness_check,
    ),
    components(schemas(
        models::ProjectResponse,
        error::ErrorResponse,
        handlers::health::ReadinessResponse,
    )),
    tags(
        (name = "projects", description = "Project metadata submission"),
        (name = "health", description = "Liveness and readiness probes")
    )
)]
pub struct ApiDoc;
