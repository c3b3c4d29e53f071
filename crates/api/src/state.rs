use std::sync::Arc;
use std::time::Duration;

use adspace_core::catalog::Catalog;
use adspace_events::EventBus;

use crate::config::ServerConfig;
use crate::sessions::SessionStore;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; everything inside is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    /// The catalog served by this instance. Never mutated.
    pub catalog: Arc<Catalog>,
    pub sessions: Arc<SessionStore>,
    /// Receives booking completions and cancellations from every session.
    pub event_bus: Arc<EventBus>,
}

impl AppState {
    pub fn new(config: ServerConfig, catalog: Arc<Catalog>, event_bus: Arc<EventBus>) -> Self {
        let sessions = Arc::new(SessionStore::new(
            config.max_sessions,
            Duration::from_secs(config.session_idle_secs),
        ));
        Self {
            config: Arc::new(config),
            catalog,
            sessions,
            event_bus,
        }
    }
}
