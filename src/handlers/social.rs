//! Mocked social feed routes.

use axum::extract::Query;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::content::{feed_posts, search_posts, trending_posts, SocialPost};

#[derive(Debug, Deserialize)]
pub struct FeedQuery {
    #[serde(default = "super::default_page")]
    pub page: u32,
    pub hashtag: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedResponse {
    pub posts: Vec<SocialPost>,
    pub has_more: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub posts: Vec<SocialPost>,
    pub total_results: usize,
}

/// `GET /api/social/feed?page=&hashtag=`: paginated mock feed.
pub async fn feed(Query(query): Query<FeedQuery>) -> Json<FeedResponse> {
    let posts = feed_posts(query.page as usize, query.hashtag.as_deref());
    let has_more = query.page < 3;

    Json(FeedResponse {
        posts,
        has_more,
        next_cursor: has_more.then(|| format!("page-{}", query.page + 1)),
    })
}

/// `GET /api/social/trending`: fixed trending set.
pub async fn trending() -> Json<FeedResponse> {
    Json(FeedResponse {
        posts: trending_posts(),
        has_more: false,
        next_cursor: None,
    })
}

/// `GET /api/social/search?q=`: substring search over the post pool.
pub async fn search(Query(query): Query<SearchQuery>) -> Json<SearchResponse> {
    let posts = search_posts(&query.q);
    let total_results = posts.len();
    Json(SearchResponse {
        posts,
        total_results,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_feed_cursor_advances() {
        let response = feed(Query(FeedQuery {
            page: 1,
            hashtag: None,
        }))
        .await;
        assert_eq!(response.0.posts.len(), 4);
        assert!(response.0.has_more);
        assert_eq!(response.0.next_cursor.as_deref(), Some("page-2"));
    }

    #[tokio::test]
    async fn test_feed_last_page_has_no_cursor() {
        let response = feed(Query(FeedQuery {
            page: 3,
            hashtag: None,
        }))
        .await;
        assert_eq!(response.0.posts.len(), 2);
        assert!(!response.0.has_more);
        assert!(response.0.next_cursor.is_none());
    }

    #[tokio::test]
    async fn test_trending_never_paginates() {
        let response = trending().await;
        assert_eq!(response.0.posts.len(), 3);
        assert!(!response.0.has_more);
    }

    #[tokio::test]
    async fn test_search_counts_results() {
        let response = search(Query(SearchQuery {
            q: "coding".to_string(),
        }))
        .await;
        assert_eq!(response.0.total_results, response.0.posts.len());
        assert_eq!(response.0.total_results, 1);
    }

    #[tokio::test]
    async fn test_search_without_query_is_empty() {
        let response = search(Query(SearchQuery { q: String::new() })).await;
        assert_eq!(response.0.total_results, 0);
    }
}
