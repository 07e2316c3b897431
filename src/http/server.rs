//! HTTP server implementation.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::get;
use axum::{middleware, Json, Router};
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::config::MosaicConfig;
use crate::error::{MosaicError, Result};
use crate::fetch::RetryingFetcher;
use crate::handlers::{image, movies, news, social};
use crate::ratelimit::RateLimiter;

use super::middleware::rate_limit;

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    /// Admission control for the API surface
    pub limiter: Arc<RateLimiter>,
    /// Retrying client for the movie-data upstream
    pub fetcher: RetryingFetcher,
    /// Plain client for passthrough fetches
    pub client: reqwest::Client,
    /// Immutable configuration
    pub config: Arc<MosaicConfig>,
}

/// Build the full application router.
pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/tmdb/popular", get(movies::popular))
        .route("/tmdb/upcoming", get(movies::upcoming))
        .route("/tmdb/genres", get(movies::genres))
        .route("/tmdb/movie/{id}", get(movies::movie_details))
        .route("/news/top-headlines", get(news::top_headlines))
        .route("/news/search", get(news::search))
        .route("/news/category/{category}", get(news::category))
        .route("/social/feed", get(social::feed))
        .route("/social/trending", get(social::trending))
        .route("/social/search", get(social::search))
        .route("/image-proxy", get(image::image_proxy))
        .route("/test", get(movies::api_test));

    Router::new()
        .nest("/api", api)
        .route("/health", get(health))
        .layer(middleware::from_fn_with_state(state.clone(), rate_limit))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// HTTP server for the dashboard API.
pub struct HttpServer {
    /// Address to bind to
    addr: SocketAddr,
    /// Shared application state
    state: AppState,
}

impl HttpServer {
    /// Create a new HTTP server.
    pub fn new(addr: SocketAddr, state: AppState) -> Self {
        Self { addr, state }
    }

    /// Start the server.
    ///
    /// This method will block until the server is shut down.
    pub async fn serve(self) -> Result<()> {
        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        info!(addr = %self.addr, "Starting HTTP server");

        axum::serve(listener, build_router(self.state))
            .await
            .map_err(|e| {
                error!(error = %e, "HTTP server failed");
                MosaicError::Server(e.to_string())
            })
    }

    /// Start the server with graceful shutdown.
    ///
    /// The server will shut down when the provided signal resolves.
    pub async fn serve_with_shutdown<F>(self, signal: F) -> Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        info!(addr = %self.addr, "Starting HTTP server with graceful shutdown");

        axum::serve(listener, build_router(self.state))
            .with_graceful_shutdown(signal)
            .await
            .map_err(|e| {
                error!(error = %e, "HTTP server failed");
                MosaicError::Server(e.to_string())
            })
    }
}
