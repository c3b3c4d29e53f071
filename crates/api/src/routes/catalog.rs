use axum::routing::get;
use axum::Router;

use crate::handlers::catalog;
use crate::state::AppState;

/// Read-only catalog routes.
///
/// ```text
/// GET /categories                                  -> list_categories
/// GET /magazines                                   -> list_magazines
/// GET /magazines/{id}                              -> get_magazine
/// GET /magazines/{id}/issues/{issue_id}/flipbook   -> get_flipbook
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/categories", get(catalog::list_categories))
        .route("/magazines", get(catalog::list_magazines))
        .route("/magazines/{id}", get(catalog::get_magazine))
        .route(
            "/magazines/{id}/issues/{issue_id}/flipbook",
            get(catalog::get_flipbook),
        )
}
