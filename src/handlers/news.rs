//! News headline proxy routes.
//!
//! These routes never surface an upstream error to the dashboard: with no
//! API key, or on any upstream failure, they serve mock headlines with an
//! HTTP 200 instead. Successful upstream payloads get stable synthesized
//! article IDs, since the provider omits them.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use reqwest::Url;
use serde::Deserialize;
use serde_json::{json, Value};
use sha2::{Digest, Sha256};
use tracing::warn;

use crate::content::{mock_headlines, mock_search_results};
use crate::http::AppState;

use super::{default_page, json_error};

/// Articles fetched per upstream page.
const PAGE_SIZE: u32 = 20;

#[derive(Debug, Deserialize)]
pub struct HeadlinesQuery {
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default = "default_page")]
    pub page: u32,
}

fn default_category() -> String {
    "general".to_string()
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
    #[serde(default = "default_page")]
    pub page: u32,
}

/// Stable article identifier derived from the article URL: hex SHA-256,
/// truncated, suffixed with the article's position in the page.
fn stable_id(url: &str, index: usize) -> String {
    let digest = Sha256::digest(url.as_bytes());
    format!("{}-{}", &hex::encode(digest)[..24], index)
}

/// Insert an `id` field into each article of an upstream payload.
fn attach_article_ids(payload: &mut Value, fallback_prefix: &str) {
    let Some(articles) = payload.get_mut("articles").and_then(Value::as_array_mut) else {
        return;
    };

    let now_ms = Utc::now().timestamp_millis();
    for (index, article) in articles.iter_mut().enumerate() {
        let id = match article.get("url").and_then(Value::as_str) {
            Some(url) => stable_id(url, index),
            None => format!("{fallback_prefix}-{now_ms}-{index}"),
        };
        if let Some(object) = article.as_object_mut() {
            object.insert("id".to_string(), json!(id));
        }
    }
}

async fn fetch_headlines(state: &AppState, key: &str, category: &str, page: u32) -> Option<Value> {
    let base = &state.config.providers.news_base_url;
    let url = Url::parse_with_params(
        &format!("{base}/top-headlines"),
        &[
            ("country", "us".to_string()),
            ("category", category.to_string()),
            ("page", page.to_string()),
            ("pageSize", PAGE_SIZE.to_string()),
            ("apiKey", key.to_string()),
        ],
    )
    .ok()?;

    match state.fetcher.fetch_json_once::<Value>(url).await {
        Ok(mut payload) => {
            attach_article_ids(&mut payload, "news");
            Some(payload)
        }
        Err(err) => {
            warn!(error = %err, category, "News upstream failed, serving mock headlines");
            None
        }
    }
}

/// `GET /api/news/top-headlines?category=&page=`
pub async fn top_headlines(
    State(state): State<AppState>,
    Query(query): Query<HeadlinesQuery>,
) -> Response {
    let Some(key) = state.config.providers.news_api_key.clone() else {
        return Json(mock_headlines(&query.category)).into_response();
    };

    match fetch_headlines(&state, &key, &query.category, query.page).await {
        Some(payload) => Json(payload).into_response(),
        None => Json(mock_headlines(&query.category)).into_response(),
    }
}

/// `GET /api/news/category/{category}?page=`
pub async fn category(
    State(state): State<AppState>,
    Path(category): Path<String>,
    Query(query): Query<super::PageQuery>,
) -> Response {
    let Some(key) = state.config.providers.news_api_key.clone() else {
        return Json(mock_headlines(&category)).into_response();
    };

    match fetch_headlines(&state, &key, &category, query.page).await {
        Some(payload) => Json(payload).into_response(),
        None => Json(mock_headlines(&category)).into_response(),
    }
}

/// `GET /api/news/search?q=&page=`
pub async fn search(State(state): State<AppState>, Query(query): Query<SearchQuery>) -> Response {
    let Some(q) = query.q.filter(|q| !q.is_empty()) else {
        return json_error(StatusCode::BAD_REQUEST, "Search query is required");
    };

    let Some(key) = state.config.providers.news_api_key.clone() else {
        return Json(mock_search_results(&q)).into_response();
    };

    let base = &state.config.providers.news_base_url;
    let url = Url::parse_with_params(
        &format!("{base}/everything"),
        &[
            ("q", q.clone()),
            ("page", query.page.to_string()),
            ("pageSize", PAGE_SIZE.to_string()),
            ("apiKey", key),
        ],
    );

    let Ok(url) = url else {
        return Json(mock_search_results(&q)).into_response();
    };

    match state.fetcher.fetch_json_once::<Value>(url).await {
        Ok(mut payload) => {
            attach_article_ids(&mut payload, "news-search");
            Json(payload).into_response()
        }
        Err(err) => {
            warn!(error = %err, query = %q, "News search upstream failed, serving mock results");
            Json(mock_search_results(&q)).into_response()
        }
    }
}
