#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use adspace_api::config::ServerConfig;
use adspace_api::router::build_app_router;
use adspace_api::state::AppState;
use adspace_core::catalog::Catalog;
use adspace_events::EventBus;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        catalog_path: None,
        max_sessions: 16,
        session_idle_secs: 1800,
    }
}

/// Build the full application router on the bundled catalog, sharing
/// `event_bus` so tests can observe published events.
pub fn build_test_app_with_bus(event_bus: Arc<EventBus>, config: ServerConfig) -> Router {
    let state = AppState::new(config.clone(), Catalog::builtin(), event_bus);
    build_app_router(state, &config)
}

pub fn build_test_app() -> Router {
    build_test_app_with_bus(Arc::new(EventBus::default()), test_config())
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, Body::empty(), false).await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Body::empty(), false).await
}

pub async fn post_json(app: Router, uri: &str, json: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, Body::from(json.to_string()), true).await
}

pub async fn put_json(app: Router, uri: &str, json: serde_json::Value) -> Response<Body> {
    send(app, Method::PUT, uri, Body::from(json.to_string()), true).await
}

async fn send(app: Router, method: Method, uri: &str, body: Body, json: bool) -> Response<Body> {
    let mut request = Request::builder().method(method).uri(uri);
    if json {
        request = request.header("content-type", "application/json");
    }
    app.oneshot(request.body(body).unwrap()).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Open a session and return its id.
pub async fn open_session(app: &Router) -> String {
    let response = post_json(app.clone(), "/api/v1/sessions", serde_json::json!({})).await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    body_json(response).await["data"]["id"]
        .as_str()
        .unwrap()
        .to_string()
}
