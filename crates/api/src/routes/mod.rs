pub mod health;
pub mod lead_pages;
pub mod media;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /lead-pages                generate and publish a page (POST)
/// /lead-pages/{id}           get a stored page
///
/// /media/{id}                get stored image bytes
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/lead-pages", lead_pages::router())
        .nest("/media", media::router())
}
