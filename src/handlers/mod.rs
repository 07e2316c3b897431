//! Route handlers for the API surface.

pub mod image;
pub mod movies;
pub mod news;
pub mod social;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;

/// Standard JSON error body: `{"error": message}`.
pub(crate) fn json_error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

/// Pagination query shared by the list routes; upstream pages start at 1.
#[derive(Debug, Deserialize)]
pub(crate) struct PageQuery {
    #[serde(default = "default_page")]
    pub page: u32,
}

pub(crate) fn default_page() -> u32 {
    1
}
