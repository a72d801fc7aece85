//! Sync Controller (syncwall-sc) - Main entry point
//!
//! Bootstraps the stream registry from the discovery service, runs the
//! clock sync session, and serves the HTTP/SSE control interface.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use syncwall_sc::api;
use syncwall_sc::config::Config;
use syncwall_sc::discovery::DiscoveryClient;
use syncwall_sc::registry::StreamRegistry;
use syncwall_sc::sink::ClockSinkLoader;
use syncwall_sc::state::SharedState;
use syncwall_sc::sync::SyncSession;
use syncwall_sc::transport::TransportController;

/// Command-line arguments for syncwall-sc
#[derive(Parser, Debug)]
#[command(name = "syncwall-sc")]
#[command(about = "Sync Controller service for syncwall")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, env = "SYNCWALL_SC_PORT")]
    port: Option<u16>,

    /// Base URL of the stream discovery service
    #[arg(short, long, env = "SYNCWALL_DISCOVERY_URL")]
    discovery_url: Option<String>,

    /// Correction loop tick period in milliseconds
    #[arg(long, env = "SYNCWALL_TICK_MS")]
    tick_ms: Option<u64>,

    /// Optional TOML config file
    #[arg(short, long, env = "SYNCWALL_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "syncwall_sc=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Parse command-line arguments
    let args = Args::parse();
    let config = Config::resolve(
        args.port,
        args.discovery_url,
        args.tick_ms,
        args.config.as_deref(),
    )
    .context("Failed to resolve configuration")?;

    info!("Starting syncwall Sync Controller on port {}", config.port);
    info!("Discovery service: {}", config.discovery_url);

    // Fetch the stream list. Discovery failure degrades to a session
    // with zero synchronized streams rather than aborting.
    let discovery = DiscoveryClient::new(config.discovery_url.clone());
    let urls = match discovery.fetch_stream_urls().await {
        Ok(urls) => urls,
        Err(e) => {
            warn!("Stream discovery failed: {} (starting with empty registry)", e);
            Vec::new()
        }
    };

    // Bind discovered streams to sinks
    let state = Arc::new(SharedState::new());
    let loader = ClockSinkLoader;
    let registry = Arc::new(StreamRegistry::bootstrap(&loader, &urls, &state).await);

    // Start the sync session
    let session = Arc::new(SyncSession::new(
        Arc::clone(&registry),
        Arc::clone(&state),
        config.tick,
    ));
    session.start().await;
    info!("Sync session started");

    let transport = Arc::new(TransportController::new(
        Arc::clone(&registry),
        Arc::clone(&session),
        Arc::clone(&state),
    ));

    // Build the application router
    let ctx = api::AppContext {
        state,
        registry,
        session: Arc::clone(&session),
        transport,
        port: config.port,
    };
    let app = api::create_router(ctx);

    // Create socket address
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("Starting HTTP server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    // Teardown contract: every follower rate returns to 1.0
    session.stop().await;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
