use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use mosaic::config::MosaicConfig;
use mosaic::fetch::{RetryPolicy, RetryingFetcher};
use mosaic::http::{AppState, HttpServer};
use mosaic::ratelimit::RateLimiter;

/// Personalized content dashboard gateway.
#[derive(Parser, Debug)]
#[command(name = "mosaic", version, about)]
struct Args {
    /// Path to a YAML configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// Override the configured listen address
    #[arg(short, long)]
    listen: Option<SocketAddr>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = Args::parse();

    info!("Starting Mosaic content gateway");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let mut config = match args.config.as_deref() {
        Some(path) => MosaicConfig::from_file(path)?,
        None => MosaicConfig::default(),
    };
    config.apply_env();
    if let Some(listen) = args.listen {
        config.server.listen_addr = listen;
    }
    info!(listen_addr = %config.server.listen_addr, "Configuration loaded");

    if config.providers.tmdb_api_key.is_none() {
        warn!("Movie provider API key not configured; movie routes will fail fast");
    }
    if config.providers.news_api_key.is_none() {
        warn!("News provider API key not configured; news routes will serve mock data");
    }

    // Initialize the rate limiter and its garbage collection sweep
    let limiter = Arc::new(RateLimiter::in_memory(config.rate_limiting.groups.clone()));
    let sweeper = limiter.spawn_sweeper(
        Duration::from_secs(config.rate_limiting.sweep_interval_secs),
        Duration::from_secs(config.rate_limiting.retention_secs),
    );
    info!("Rate limiter initialized");

    let client = reqwest::Client::new();
    let state = AppState {
        limiter,
        fetcher: RetryingFetcher::new(client.clone(), RetryPolicy::default()),
        client,
        config: Arc::new(config.clone()),
    };

    let server = HttpServer::new(config.server.listen_addr, state);

    // Run the server with graceful shutdown on Ctrl+C
    server.serve_with_shutdown(shutdown_signal()).await?;

    sweeper.abort();
    info!("Mosaic content gateway stopped");
    Ok(())
}

/// Wait for a shutdown signal (Ctrl+C or SIGTERM).
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
            info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
