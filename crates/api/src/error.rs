use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use leadgen_core::error::CoreError;
use leadgen_pipeline::pipeline::PipelineError;
use leadgen_pipeline::publish::PublishError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and [`PipelineError`] for
/// generation failures, and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `leadgen_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A failure while generating or publishing a lead page.
    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An upstream service needed for the request is unreachable.
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => classify_core_error(core),

            // --- Generation pipeline ---
            AppError::Pipeline(err) => classify_pipeline_error(err),

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::ServiceUnavailable(msg) => {
                tracing::warn!(error = %msg, "Upstream service unavailable");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "SERVICE_UNAVAILABLE",
                    msg.clone(),
                )
            }
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

fn classify_core_error(core: &CoreError) -> (StatusCode, &'static str, String) {
    match core {
        CoreError::NotFound { entity, id } => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{entity} with id {id} not found"),
        ),
        CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
        CoreError::Internal(msg) => {
            tracing::error!(error = %msg, "Internal core error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
    }
}

/// Classify a pipeline failure into an HTTP status, error code, and message.
///
/// - An empty prompt maps to 400.
/// - An unreachable upstream service maps to 503.
/// - A slug collision maps to 409.
/// - Everything else maps to 500 and keeps the stage message so callers can
///   tell which step failed.
fn classify_pipeline_error(err: &PipelineError) -> (StatusCode, &'static str, String) {
    match err {
        PipelineError::Validation(core) => classify_core_error(core),
        PipelineError::Publish(PublishError::DuplicateSlug(_)) => {
            (StatusCode::CONFLICT, "CONFLICT", err.to_string())
        }
        _ if err.is_service_unavailable() => {
            tracing::warn!(error = %err, "Upstream service unreachable during generation");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                "SERVICE_UNAVAILABLE",
                format!("Failed to generate lead page: {err}"),
            )
        }
        _ => {
            tracing::error!(error = %err, "Lead page generation failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "GENERATION_FAILED",
                format!("Failed to generate lead page: {err}"),
            )
        }
    }
}
