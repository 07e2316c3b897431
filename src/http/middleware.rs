//! Rate limiting middleware for the API surface.
//!
//! Every request under `/api` is checked against the limiter; all other
//! paths pass through untouched. Both admitted and rejected responses carry
//! the standard `X-RateLimit-*` headers.

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, HeaderMap, HeaderValue, Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::ratelimit::Decision;

use super::server::AppState;

/// Derive the client identifier for rate limiting.
///
/// First entry of `x-forwarded-for`, trimmed. Clients without the header
/// (and any client whose value is unreadable) collapse into one shared
/// anonymous bucket; acceptable behind a single reverse proxy, conservative
/// everywhere else.
pub fn client_identifier(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or("anonymous")
        .to_string()
}

/// Admission control for API routes.
///
/// Rejection is a policy outcome, not a fault: it returns a 429 with retry
/// guidance and never propagates an error through the pipeline.
pub async fn rate_limit(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let path = req.uri().path().to_string();
    if !path.starts_with("/api") {
        return next.run(req).await;
    }

    let client = client_identifier(req.headers());
    let decision = match state.limiter.check(&client, &path).await {
        Some(decision) => decision,
        None => return next.run(req).await,
    };

    if !decision.allowed {
        return rejection(&decision);
    }

    let mut response = next.run(req).await;
    apply_headers(response.headers_mut(), &decision);
    response
}

/// Build the 429 response for a rejected request.
fn rejection(decision: &Decision) -> Response {
    let retry_after = decision.retry_after_secs.unwrap_or(1);
    let body = json!({
        "error": "Too many requests",
        "message": format!(
            "Rate limit exceeded. Please try again in {retry_after} seconds."
        ),
        "retryAfter": retry_after,
    });

    let mut response = (StatusCode::TOO_MANY_REQUESTS, Json(body)).into_response();
    apply_headers(response.headers_mut(), decision);
    response
        .headers_mut()
        .insert(header::RETRY_AFTER, HeaderValue::from(retry_after));
    response
}

/// Attach quota headers to a response, admitted or rejected.
fn apply_headers(headers: &mut HeaderMap, decision: &Decision) {
    headers.insert("x-ratelimit-limit", HeaderValue::from(decision.limit));
    headers.insert("x-ratelimit-remaining", HeaderValue::from(decision.remaining));
    headers.insert("x-ratelimit-reset", HeaderValue::from(decision.reset_unix_secs));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_identifier_takes_first_forwarded_entry() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.7, 10.0.0.1"),
        );
        assert_eq!(client_identifier(&headers), "203.0.113.7");
    }

    #[test]
    fn test_client_identifier_trims_whitespace() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("  203.0.113.7  ,10.0.0.1"),
        );
        assert_eq!(client_identifier(&headers), "203.0.113.7");
    }

    #[test]
    fn test_missing_header_falls_back_to_anonymous() {
        assert_eq!(client_identifier(&HeaderMap::new()), "anonymous");
    }

    #[test]
    fn test_empty_header_falls_back_to_anonymous() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static(""));
        assert_eq!(client_identifier(&headers), "anonymous");
    }

    #[test]
    fn test_malformed_header_falls_back_to_anonymous() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_bytes(b"\xff\xfe").unwrap(),
        );
        assert_eq!(client_identifier(&headers), "anonymous");
    }

    #[test]
    fn test_rejection_shape() {
        let decision = Decision {
            allowed: false,
            limit: 40,
            remaining: 0,
            reset_unix_secs: 1_700_000_010,
            retry_after_secs: Some(7),
        };

        let response = rejection(&decision);
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers()["retry-after"], "7");
        assert_eq!(response.headers()["x-ratelimit-limit"], "40");
        assert_eq!(response.headers()["x-ratelimit-remaining"], "0");
        assert_eq!(response.headers()["x-ratelimit-reset"], "1700000010");
    }
}
