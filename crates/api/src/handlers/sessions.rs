//! Visitor session endpoints.
//!
//! Every endpoint drives the session's navigator and answers with the
//! resulting screen, so a client can render from responses alone.

use std::sync::Arc;

use adspace_core::booking::{confirmation_message, BookingEvent, BookingOutcome};
use adspace_core::error::CoreError;
use adspace_core::filter::MagazineFilter;
use adspace_core::navigation::{Navigator, Screen};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SessionView {
    pub id: Uuid,
    pub screen: Screen,
}

#[derive(Debug, Default, Deserialize)]
pub struct OpenBookingRequest {
    #[serde(default)]
    pub magazine_id: Option<String>,
}

/// Result of a booking event: the terminal outcome (if any), the message to
/// show after a submission, and the screen to render next.
#[derive(Debug, Serialize)]
pub struct DispatchResponse {
    pub outcome: Option<BookingOutcome>,
    pub confirmation: Option<String>,
    pub screen: Screen,
}

fn view(id: Uuid, nav: &Navigator) -> Json<DataResponse<SessionView>> {
    Json(DataResponse {
        data: SessionView {
            id,
            screen: nav.screen(),
        },
    })
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

/// POST /api/v1/sessions
///
/// Open a session on the catalog view.
pub async fn open_session(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let catalog = Arc::clone(&state.catalog);
    let bus = Arc::clone(&state.event_bus);
    let id = state
        .sessions
        .open(|id| Navigator::new(catalog, Arc::new(bus.for_session(id))))
        .await?;

    tracing::info!(session_id = %id, "Session opened");

    let body = state.sessions.read(id, |nav| view(id, nav)).await?;
    Ok((StatusCode::CREATED, body))
}

/// GET /api/v1/sessions/{id}
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    Ok(state.sessions.read(id, |nav| view(id, nav)).await?)
}

/// DELETE /api/v1/sessions/{id}
pub async fn close_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    state.sessions.close(id).await?;
    tracing::info!(session_id = %id, "Session closed");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Navigation
// ---------------------------------------------------------------------------

/// POST /api/v1/sessions/{id}/catalog
pub async fn go_catalog(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let body = state
        .sessions
        .update(id, |nav| {
            nav.go_catalog();
            view(id, nav)
        })
        .await?;
    Ok(body)
}

/// PUT /api/v1/sessions/{id}/filter
///
/// Replaces the search term and category. A missing, empty or `"All"`
/// category clears the constraint.
pub async fn update_filter(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(filter): Json<MagazineFilter>,
) -> AppResult<impl IntoResponse> {
    let filter = filter.normalized();
    let body = state
        .sessions
        .update(id, |nav| {
            nav.set_search(filter.search_term);
            nav.select_category(filter.category);
            view(id, nav)
        })
        .await?;
    Ok(body)
}

/// POST /api/v1/sessions/{id}/profile/{magazine_id}
///
/// An unknown magazine leaves the session on the catalog.
pub async fn open_profile(
    State(state): State<AppState>,
    Path((id, magazine_id)): Path<(Uuid, String)>,
) -> AppResult<impl IntoResponse> {
    let body = state
        .sessions
        .update(id, |nav| {
            let shown = nav.go_profile(&magazine_id);
            tracing::debug!(
                session_id = %id,
                magazine_id = %magazine_id,
                view = ?shown,
                "Profile requested"
            );
            view(id, nav)
        })
        .await?;
    Ok(body)
}

// ---------------------------------------------------------------------------
// Booking
// ---------------------------------------------------------------------------

/// POST /api/v1/sessions/{id}/booking
///
/// Start a booking, seeded with `magazine_id` when given.
pub async fn open_booking(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<OpenBookingRequest>,
) -> AppResult<impl IntoResponse> {
    let body = state
        .sessions
        .update(id, |nav| {
            let shown = nav.go_booking_for(input.magazine_id.as_deref());
            tracing::info!(
                session_id = %id,
                magazine_id = input.magazine_id.as_deref(),
                view = ?shown,
                "Booking started"
            );
            view(id, nav)
        })
        .await?;
    Ok(body)
}

/// POST /api/v1/sessions/{id}/booking/events
///
/// Rejected events answer 409 and leave the booking unchanged.
pub async fn dispatch_booking_event(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(event): Json<BookingEvent>,
) -> AppResult<impl IntoResponse> {
    let response = state
        .sessions
        .update(id, |nav| {
            let outcome = nav.dispatch(event)?;
            let confirmation = match &outcome {
                Some(BookingOutcome::Completed(snapshot)) => Some(confirmation_message(snapshot)),
                _ => None,
            };
            Ok::<_, CoreError>(DispatchResponse {
                outcome,
                confirmation,
                screen: nav.screen(),
            })
        })
        .await??;

    Ok(Json(DataResponse { data: response }))
}
