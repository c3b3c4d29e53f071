use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use adspace_api::config::ServerConfig;
use adspace_api::router::build_app_router;
use adspace_api::sessions::start_session_reaper;
use adspace_api::state::AppState;
use adspace_core::catalog::Catalog;
use adspace_events::{BookingLog, EventBus};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "adspace_api=debug,adspace_events=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Catalog ---
    let catalog = load_catalog(config.catalog_path.as_deref())?;
    tracing::info!(
        magazines = catalog.magazines().len(),
        categories = catalog.all_categories().len(),
        "Catalog loaded"
    );

    // --- Event bus ---
    let event_bus = Arc::new(EventBus::default());
    let log_handle = tokio::spawn(BookingLog::run(event_bus.subscribe()));
    tracing::info!("Event bus and booking log started");

    // --- Router ---
    let state = AppState::new(config.clone(), catalog, Arc::clone(&event_bus));
    let reaper_handle = start_session_reaper(Arc::clone(&state.sessions));
    tracing::info!(idle_secs = config.session_idle_secs, "Session reaper started");
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().context("Invalid HOST address")?,
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    reaper_handle.abort();

    // Dropping the last sender closes the channel and ends the log loop.
    drop(event_bus);
    let _ = tokio::time::timeout(Duration::from_secs(5), log_handle).await;

    tracing::info!("Graceful shutdown complete");
    Ok(())
}

/// The catalog at `path`, or the bundled one when no path is configured.
fn load_catalog(path: Option<&str>) -> anyhow::Result<Arc<Catalog>> {
    let Some(path) = path else {
        return Ok(Catalog::builtin());
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalog file {path}"))?;
    let catalog =
        Catalog::from_json(&json).with_context(|| format!("Invalid catalog file {path}"))?;
    Ok(Arc::new(catalog))
}

/// Wait for SIGINT (Ctrl-C) or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl-C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
