//! mm_server - a cache-mediated markdown content server

use std::net::SocketAddr;

use anyhow::Context;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mm_server::{create_router, AppState, Config, RouteTable};

/// Main entry point for the content server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Load the static route table, if configured
/// 4. Create the cache client and content service
/// 5. Start HTTP server on configured port
/// 6. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mm_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting content server");

    let config = Config::from_env();
    info!(
        port = config.server_port,
        namespace = %config.namespace,
        texts_dir = %config.texts_dir,
        cache = ?config.cache_backend,
        "Configuration loaded"
    );

    let routes = load_routes(config.routes_file.as_deref()).await?;
    info!(routes = routes.len(), "Route table loaded");

    // The cache connects lazily on the first request
    let state = AppState::from_config(&config, routes);
    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

async fn load_routes(path: Option<&str>) -> anyhow::Result<RouteTable> {
    let Some(path) = path else {
        return Ok(RouteTable::new());
    };
    let json = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read routes file {path}"))?;
    RouteTable::from_json(&json).with_context(|| format!("invalid routes file {path}"))
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
}
