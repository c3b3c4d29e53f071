use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    pub magazines: usize,
    pub open_sessions: usize,
}

/// GET /health
async fn health_check(State(state): State<AppState>) -> Json<DataResponse<HealthResponse>> {
    Json(DataResponse {
        data: HealthResponse {
            status: "ok",
            version: env!("CARGO_PKG_VERSION"),
            magazines: state.catalog.magazines().len(),
            open_sessions: state.sessions.len().await,
        },
    })
}

/// Mount health check routes (root level, not under `/api/v1`).
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
