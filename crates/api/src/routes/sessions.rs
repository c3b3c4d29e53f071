use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::sessions;
use crate::state::AppState;

/// Visitor session routes mounted at `/sessions`.
///
/// ```text
/// POST   /                                -> open_session
/// GET    /{id}                            -> get_session
/// DELETE /{id}                            -> close_session
/// POST   /{id}/catalog                    -> go_catalog
/// PUT    /{id}/filter                     -> update_filter
/// POST   /{id}/profile/{magazine_id}      -> open_profile
/// POST   /{id}/booking                    -> open_booking
/// POST   /{id}/booking/events             -> dispatch_booking_event
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(sessions::open_session))
        .route(
            "/{id}",
            get(sessions::get_session).delete(sessions::close_session),
        )
        .route("/{id}/catalog", post(sessions::go_catalog))
        .route("/{id}/filter", put(sessions::update_filter))
        .route("/{id}/profile/{magazine_id}", post(sessions::open_profile))
        .route("/{id}/booking", post(sessions::open_booking))
        .route(
            "/{id}/booking/events",
            post(sessions::dispatch_booking_event),
        )
}
