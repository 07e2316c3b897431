//! Movie metadata proxy routes.
//!
//! The popular and details routes go through the retrying fetcher; the
//! remaining routes make a single attempt and surface a 500 on failure.
//! A missing API key fails fast without touching the upstream.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use reqwest::Url;
use serde_json::{json, Value};
use tracing::error;

use crate::fetch::FetchError;
use crate::http::AppState;

use super::{json_error, PageQuery};

/// Build an upstream URL with the API key attached.
fn upstream_url(state: &AppState, path: &str, params: &[(&str, String)]) -> Result<Url, Response> {
    let Some(key) = state.config.providers.tmdb_api_key.clone() else {
        return Err(json_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "TMDB API key not configured",
        ));
    };

    let base = &state.config.providers.tmdb_base_url;
    let mut query: Vec<(&str, String)> = vec![("api_key", key)];
    query.extend(params.iter().cloned());

    Url::parse_with_params(&format!("{base}/{path}"), &query).map_err(|e| {
        error!(error = %e, path, "Invalid upstream movie URL");
        json_error(StatusCode::INTERNAL_SERVER_ERROR, "Invalid upstream URL")
    })
}

/// `GET /api/tmdb/popular?page=`: retried with linear backoff.
pub async fn popular(State(state): State<AppState>, Query(query): Query<PageQuery>) -> Response {
    let url = match upstream_url(&state, "movie/popular", &[("page", query.page.to_string())]) {
        Ok(url) => url,
        Err(response) => return response,
    };

    match state.fetcher.fetch_json::<Value>(url).await {
        Ok(payload) => Json(payload).into_response(),
        Err(FetchError::NotFound) => json_error(StatusCode::NOT_FOUND, "Not found upstream"),
        Err(err) => {
            error!(error = %err, "Popular movies fetch failed");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to fetch popular movies",
            )
        }
    }
}

/// `GET /api/tmdb/movie/{id}`: retried; upstream 404 is terminal.
pub async fn movie_details(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let url = match upstream_url(&state, &format!("movie/{id}"), &[]) {
        Ok(url) => url,
        Err(response) => return response,
    };

    match state.fetcher.fetch_json::<Value>(url).await {
        Ok(payload) => Json(payload).into_response(),
        Err(FetchError::NotFound) => json_error(StatusCode::NOT_FOUND, "Movie not found"),
        Err(err) => {
            error!(error = %err, movie_id = %id, "Movie details fetch failed");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to fetch movie details",
            )
        }
    }
}

/// `GET /api/tmdb/upcoming?page=`: single attempt.
pub async fn upcoming(State(state): State<AppState>, Query(query): Query<PageQuery>) -> Response {
    let url = match upstream_url(&state, "movie/upcoming", &[("page", query.page.to_string())]) {
        Ok(url) => url,
        Err(response) => return response,
    };

    match state.fetcher.fetch_json_once::<Value>(url).await {
        Ok(payload) => Json(payload).into_response(),
        Err(err) => {
            error!(error = %err, "Upcoming movies fetch failed");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to fetch upcoming movies",
            )
        }
    }
}

/// `GET /api/tmdb/genres`: single attempt.
pub async fn genres(State(state): State<AppState>) -> Response {
    let url = match upstream_url(&state, "genre/movie/list", &[]) {
        Ok(url) => url,
        Err(response) => return response,
    };

    match state.fetcher.fetch_json_once::<Value>(url).await {
        Ok(payload) => Json(payload).into_response(),
        Err(err) => {
            error!(error = %err, "Genre list fetch failed");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch genres")
        }
    }
}

/// `GET /api/test`: diagnostic probe of the movie provider configuration.
pub async fn api_test(State(state): State<AppState>) -> Response {
    if state.config.providers.tmdb_api_key.is_none() {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "success": false,
                "error": "TMDB API key is not configured",
                "message": "Set TMDB_API_KEY in the environment or providers.tmdb_api_key in the configuration file",
            })),
        )
            .into_response();
    }

    let url = match upstream_url(&state, "movie/popular", &[("page", "1".to_string())]) {
        Ok(url) => url,
        Err(response) => return response,
    };

    match state.fetcher.fetch_json_once::<Value>(url).await {
        Ok(payload) => {
            let retrieved = payload
                .get("results")
                .and_then(Value::as_array)
                .map(Vec::len)
                .unwrap_or(0);
            Json(json!({
                "success": true,
                "message": "Movie provider API key is working",
                "details": {
                    "apiKeyConfigured": true,
                    "moviesRetrieved": retrieved,
                },
            }))
            .into_response()
        }
        Err(FetchError::Status(status)) => (
            StatusCode::from_u16(status.as_u16()).unwrap_or(StatusCode::BAD_GATEWAY),
            Json(json!({
                "success": false,
                "error": "Upstream request failed",
                "status": status.as_u16(),
                "message": "Verify the API key is correct and active",
            })),
        )
            .into_response(),
        Err(err) => {
            error!(error = %err, "Provider probe failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "success": false,
                    "error": "Upstream request failed",
                })),
            )
                .into_response()
        }
    }
}
