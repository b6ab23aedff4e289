//! Handlers for the `/media` resource.

use axum::extract::{Path, State};
use axum::http::header::{CACHE_CONTROL, CONTENT_TYPE};
use axum::response::IntoResponse;
use leadgen_core::error::CoreError;
use leadgen_core::types::DocumentId;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Generated images are always PNG.
const MEDIA_CONTENT_TYPE: &str = "image/png";

/// GET /api/v1/media/{id}
///
/// Serve the raw bytes of a stored image.
pub async fn get_media(
    State(state): State<AppState>,
    Path(id): Path<DocumentId>,
) -> AppResult<impl IntoResponse> {
    let Some(media) = state.store.get_media(&id).await else {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Media",
            id,
        }));
    };

    Ok((
        [
            (CONTENT_TYPE, MEDIA_CONTENT_TYPE),
            (CACHE_CONTROL, "public, max-age=31536000, immutable"),
        ],
        media.bytes,
    ))
}
