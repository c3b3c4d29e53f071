//! Read-only catalog endpoints.

use adspace_core::error::CoreError;
use adspace_core::filter::MagazineFilter;
use adspace_core::flipbook::Flipbook;
use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct MagazineQuery {
    pub search: Option<String>,
    /// Omitted or `"All"` means no category constraint.
    pub category: Option<String>,
}

impl MagazineQuery {
    fn into_filter(self) -> MagazineFilter {
        MagazineFilter::new(self.search.unwrap_or_default(), self.category).normalized()
    }
}

/// Flipbook payload: the pages in display order plus the first page label.
#[derive(Debug, Serialize)]
pub struct FlipbookView {
    #[serde(flatten)]
    pub flipbook: Flipbook,
    pub total: usize,
    pub label: String,
}

/// GET /api/v1/categories
pub async fn list_categories(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    Ok(Json(DataResponse {
        data: state.catalog.all_categories().to_vec(),
    }))
}

/// GET /api/v1/magazines?search=&category=
pub async fn list_magazines(
    State(state): State<AppState>,
    Query(query): Query<MagazineQuery>,
) -> AppResult<impl IntoResponse> {
    let magazines = query.into_filter().apply(&state.catalog);
    Ok(Json(DataResponse { data: magazines }))
}

/// GET /api/v1/magazines/{id}
pub async fn get_magazine(
    State(state): State<AppState>,
    Path(magazine_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let magazine = state.catalog.require_magazine(&magazine_id)?;
    Ok(Json(DataResponse {
        data: magazine.clone(),
    }))
}

/// GET /api/v1/magazines/{id}/issues/{issue_id}/flipbook
///
/// Uses the catalog cover only; issues with neither a cover nor pages have
/// nothing to show.
pub async fn get_flipbook(
    State(state): State<AppState>,
    Path((magazine_id, issue_id)): Path<(String, String)>,
) -> AppResult<impl IntoResponse> {
    let magazine = state.catalog.require_magazine(&magazine_id)?;
    let issue = magazine
        .find_issue(&issue_id)
        .ok_or_else(|| CoreError::not_found("MagazineIssue", issue_id.as_str()))?;

    let flipbook = Flipbook::for_issue(magazine, issue, None);
    if flipbook.total() == 0 {
        return Err(CoreError::not_found("Issue pages", issue_id).into());
    }

    Ok(Json(DataResponse {
        data: FlipbookView {
            total: flipbook.total(),
            label: flipbook.label(),
            flipbook,
        },
    }))
}
