use axum::routing::{get, post};
use axum::Router;

use crate::handlers::lead_pages;
use crate::state::AppState;

/// Routes mounted at `/api/v1/lead-pages`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(lead_pages::create_lead_page))
        .route("/{id}", get(lead_pages::get_lead_page))
}
