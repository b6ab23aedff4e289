use axum::routing::get;
use axum::Router;

use crate::handlers::media;
use crate::state::AppState;

/// Routes mounted at `/api/v1/media`.
pub fn router() -> Router<AppState> {
    Router::new().route("/{id}", get(media::get_media))
}
