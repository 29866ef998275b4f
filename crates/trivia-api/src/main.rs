//! Trivia API server entry point.

use std::error::Error;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use trivia_api::config::Config;
use trivia_api::state::AppState;
use trivia_core::clock::SystemClock;
use trivia_core::rng::{DeterministicRng, SeededRng};
use trivia_core::throttle::Throttle;
use trivia_opentdb::OpenTdbClient;
use trivia_store::MemoryStore;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Initialize tracing subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting trivia API server");

    let config = Config::from_env()?;

    let remote = OpenTdbClient::new(&config.opentdb_base_url, config.opentdb_timeout)?;
    let rng: Box<dyn DeterministicRng> = match config.store_seed {
        Some(seed) => Box::new(SeededRng::from_seed(seed)),
        None => Box::new(SeededRng::from_os()),
    };

    // Build application state.
    let app_state = AppState::new(
        Arc::new(MemoryStore::new(rng)),
        Arc::new(remote),
        Arc::new(SystemClock),
        Throttle::new(config.fetch_throttle),
    );
    let shutdown = app_state.shutdown.clone();

    // TODO: Replace CorsLayer::permissive() with restricted origins for production.
    let app = trivia_api::app(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    // Start server.
    let addr = config.socket_addr()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await?;

    Ok(())
}

/// Resolves on Ctrl-C and cancels every in-flight fetch.
async fn shutdown_signal(shutdown: CancellationToken) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
    shutdown.cancel();
}
