//! Handlers for the `/lead-pages` resource.
//!
//! Creating a page runs the whole generation pipeline inside the request:
//! copy from the text service, three images from ComfyUI, then publication
//! into the page store.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use leadgen_core::error::CoreError;
use leadgen_core::types::DocumentId;
use leadgen_pipeline::memory_store::StoredPage;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for lead page generation.
#[derive(Debug, Deserialize)]
pub struct CreateLeadPageRequest {
    /// Free-form description of the page, e.g. "Sell pallet storage with
    /// same-day fulfillment."
    #[serde(default)]
    pub prompt: String,
}

/// Response payload for a created lead page.
#[derive(Debug, Serialize)]
pub struct LeadPageCreated {
    pub page_id: DocumentId,
    pub slug: String,
    pub page_url: String,
    pub message: &'static str,
}

/// POST /api/v1/lead-pages
///
/// Checks that both upstream services are reachable, then generates and
/// publishes a page. Returns 201 with the new page's id, slug and URL.
pub async fn create_lead_page(
    State(state): State<AppState>,
    Json(input): Json<CreateLeadPageRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<LeadPageCreated>>)> {
    if input.prompt.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Prompt is required".to_string(),
        )));
    }

    let services = state.pipeline.check_services().await;
    if !services.all_up() {
        return Err(AppError::ServiceUnavailable(format!(
            "Required services are not reachable: {}",
            services.down_services().join(", ")
        )));
    }

    let published = state.pipeline.run(&input.prompt).await?;

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: LeadPageCreated {
                page_id: published.page_id,
                slug: published.slug,
                page_url: published.page_url,
                message: "Lead generation page created successfully",
            },
        }),
    ))
}

/// GET /api/v1/lead-pages/{id}
pub async fn get_lead_page(
    State(state): State<AppState>,
    Path(id): Path<DocumentId>,
) -> AppResult<Json<DataResponse<StoredPage>>> {
    let Some(page) = state.store.get_page(&id).await else {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "LeadGenPage",
            id,
        }));
    };
    Ok(Json(DataResponse { data: page }))
}
