//! Image proxy route.
//!
//! Fetches remote images on behalf of the browser so third-party CDNs never
//! see the dashboard's users directly. Only hosts on the static allowlist
//! are proxied.

use axum::body::Body;
use axum::extract::{Query, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use reqwest::Url;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use crate::http::AppState;

use super::json_error;

/// Hosts the proxy will fetch from.
const ALLOWED_DOMAINS: &[&str] = &[
    // Movie poster CDN
    "image.tmdb.org",
    // News image sources
    "images.unsplash.com",
    "cdn.pixabay.com",
    // Common CDNs
    "res.cloudinary.com",
    "images.pexels.com",
    // Major news sources
    "ichef.bbci.co.uk",
    "static01.nyt.com",
    "cdn.cnn.com",
    "media.cnn.com",
    "s.yimg.com",
    "a.espncdn.com",
    "platform.polygon.com",
    "cdn.arstechnica.net",
    "www.politico.com",
    "static.politico.com",
    "assets1.cbsnewsstatic.com",
    "assets2.cbsnewsstatic.com",
    "assets3.cbsnewsstatic.com",
    "static.clubs.nfl.com",
    "image.cnbcfm.com",
    "images.axios.com",
    "media.pitchfork.com",
    "media-cldnry.s-nbcnews.com",
    "i.abcnewsfe.com",
    "media.zenfs.com",
    "img.huffingtonpost.com",
    "www.washingtonpost.com",
    "wp.com",
    "i.insider.com",
    "i0.wp.com",
    "i1.wp.com",
    "i2.wp.com",
    "cdn.vox-cdn.com",
    "techcrunch.com",
    "tctechcrunch2011.files.wordpress.com",
    // Social media
    "pbs.twimg.com",
    "abs.twimg.com",
];

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                          (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

#[derive(Debug, Deserialize)]
pub struct ImageQuery {
    pub url: Option<String>,
}

/// `GET /api/image-proxy?url=`: allowlisted image passthrough.
pub async fn image_proxy(
    State(state): State<AppState>,
    Query(query): Query<ImageQuery>,
) -> Response {
    let Some(raw_url) = query.url else {
        return json_error(StatusCode::BAD_REQUEST, "URL parameter is required");
    };

    let Ok(url) = Url::parse(&raw_url) else {
        warn!(url = %raw_url, "Image proxy received an unparsable URL");
        return StatusCode::BAD_REQUEST.into_response();
    };

    let host = url.host_str().unwrap_or_default().to_string();
    if !ALLOWED_DOMAINS.contains(&host.as_str()) {
        warn!(domain = %host, "Image proxy domain not allowed");
        return (
            StatusCode::FORBIDDEN,
            Json(json!({ "error": "Domain not allowed", "domain": host })),
        )
            .into_response();
    }

    let origin = url.origin().ascii_serialization();
    debug!(url = %url, "Proxying image");

    let upstream = state
        .client
        .get(url.clone())
        .header(header::USER_AGENT, USER_AGENT)
        .header(
            header::ACCEPT,
            "image/avif,image/webp,image/apng,image/svg+xml,image/*,*/*;q=0.8",
        )
        .header(header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
        .header(header::REFERER, format!("{origin}/"))
        .header(header::ORIGIN, origin)
        .send()
        .await;

    let upstream = match upstream {
        Ok(response) => response,
        Err(err) => {
            warn!(error = %err, url = %url, "Image proxy request failed");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    if !upstream.status().is_success() {
        warn!(status = %upstream.status(), url = %url, "Image proxy upstream error");
        return StatusCode::from_u16(upstream.status().as_u16())
            .unwrap_or(StatusCode::BAD_GATEWAY)
            .into_response();
    }

    let content_type = upstream
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("image/jpeg")
        .to_string();

    if !content_type.starts_with("image/") {
        warn!(content_type = %content_type, url = %url, "Image proxy got non-image content");
        return StatusCode::UNSUPPORTED_MEDIA_TYPE.into_response();
    }

    let bytes = match upstream.bytes().await {
        Ok(bytes) => bytes,
        Err(err) => {
            warn!(error = %err, url = %url, "Image proxy body read failed");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let mut response = Response::new(Body::from(bytes));
    let headers = response.headers_mut();
    if let Ok(value) = HeaderValue::from_str(&content_type) {
        headers.insert(header::CONTENT_TYPE, value);
    }
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static("public, max-age=86400, s-maxage=86400"),
    );
    response
}
