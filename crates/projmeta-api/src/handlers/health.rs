//! Health check handlers and response types.

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use std::fmt::Display;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

const CHECK_TIMEOUT: Duration = Duration::from_secs(5);

/// Run an async check with timeout; returns "healthy", "timeout", or "{prefix}: {error}".
async fn run_check<F, E>(timeout: Duration, f: F, error_prefix: &str) -> String
where
    F: Future<Output = Result<(), E>>,
    E: Display,
{
    match tokio::time::timeout(timeout, f).await {
        Ok(Ok(())) => "healthy".to_string(),
        Ok(Err(e)) => format!("{}: {}", error_prefix, e),
        Err(_) => "timeout".to_string(),
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ReadinessResponse {
    pub status: String,
    pub storage: String,
    pub upload_temp_dir: String,
}

/// Liveness probe - process is running.
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses((status = 200, description = "Service is alive"))
)]
pub async fn liveness_check() -> impl IntoResponse {
    (StatusCode::OK, Json(serde_json::json!({ "status": "alive" })))
}

/// Readiness probe - storage root and staging directory are writable.
#[utoipa::path(
    get,
    path = "/health/ready",
    tag = "health",
    responses(
        (status = 200, description = "Ready to accept submissions", body = ReadinessResponse),
        (status = 503, description = "A dependency is not usable", body = ReadinessResponse)
    )
)]
pub async fn readiness_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let store = state.store.clone();
    let storage = run_check(
        CHECK_TIMEOUT,
        async move { store.health_check().await },
        "unhealthy",
    )
    .await;

    let temp_dir = state.intake.config().temp_dir.clone();
    let upload_temp_dir = run_check(CHECK_TIMEOUT, probe_dir(temp_dir), "unhealthy").await;

    let ready = storage == "healthy" && upload_temp_dir == "healthy";
    if !ready {
        tracing::error!(
            storage = %storage,
            upload_temp_dir = %upload_temp_dir,
            "Readiness check failed"
        );
    }

    let response = ReadinessResponse {
        status: if ready { "ready" } else { "not_ready" }.to_string(),
        storage,
        upload_temp_dir,
    };
    let status_code = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(response))
}

/// Create and remove a scratch file in `dir`.
async fn probe_dir(dir: PathBuf) -> std::io::Result<()> {
    tokio::task::spawn_blocking(move || {
        tempfile::Builder::new()
            .prefix(".health-")
            .tempfile_in(&dir)?
            .close()
    })
    .await
    .map_err(std::io::Error::other)?
}
