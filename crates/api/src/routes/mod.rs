pub mod catalog;
pub mod health;
pub mod sessions;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /categories                                      all categories
/// /magazines                                       filtered listing (?search=&category=)
/// /magazines/{id}                                  magazine profile
/// /magazines/{id}/issues/{issue_id}/flipbook       issue pages
///
/// /sessions                                        open (POST)
/// /sessions/{id}                                   current screen, close (DELETE)
/// /sessions/{id}/catalog                           back to catalog (POST)
/// /sessions/{id}/filter                            replace search / category (PUT)
/// /sessions/{id}/profile/{magazine_id}             open profile (POST)
/// /sessions/{id}/booking                           start booking (POST)
/// /sessions/{id}/booking/events                    booking event (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(catalog::router())
        .nest("/sessions", sessions::router())
}
