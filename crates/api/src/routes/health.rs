use axum::extract::State;
use axum::{routing::get, Json, Router};
use leadgen_pipeline::pipeline::ServiceState;
use serde::Serialize;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Overall service status.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Whether the text-generation service is reachable.
    pub text_service: ServiceState,
    /// Whether the image-generation queue is reachable.
    pub image_service: ServiceState,
}

/// GET /health -- returns service and upstream health.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let services = state.pipeline.check_services().await;

    let status = if services.all_up() { "ok" } else { "degraded" };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        text_service: services.text_service,
        image_service: services.image_service,
    })
}

/// Mount health check routes (intended for root-level, NOT under `/api/v1`).
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
