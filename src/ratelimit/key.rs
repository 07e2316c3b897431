//! Bucket key generation and handling.

/// A key that uniquely identifies one rate limit bucket.
///
/// The key is composed of the client identifier and the request path
/// truncated to its leading segments, so requests to different sub-paths
/// under the same group prefix share one counter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BucketKey {
    /// The client this bucket belongs to
    pub client: String,
    /// Truncated path prefix shared by the bucket
    pub group: String,
}

/// Number of leading `/`-separated segments kept in the bucket key.
/// A path like `/api/tmdb/movie/42` truncates to `/api/tmdb`.
const KEY_SEGMENTS: usize = 3;

impl BucketKey {
    /// Create a bucket key from a client identifier and a request path.
    pub fn new(client: &str, path: &str) -> Self {
        let group: Vec<&str> = path.split('/').take(KEY_SEGMENTS).collect();
        Self {
            client: client.to_string(),
            group: group.join("/"),
        }
    }
}

impl std::fmt::Display for BucketKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.client, self.group)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_truncates_to_group_prefix() {
        let key = BucketKey::new("203.0.113.7", "/api/tmdb/movie/42");
        assert_eq!(key.group, "/api/tmdb");
        assert_eq!(key.client, "203.0.113.7");
    }

    #[test]
    fn test_sub_paths_share_a_bucket() {
        let a = BucketKey::new("203.0.113.7", "/api/tmdb/popular");
        let b = BucketKey::new("203.0.113.7", "/api/tmdb/upcoming");
        assert_eq!(a, b);
    }

    #[test]
    fn test_distinct_clients_get_distinct_buckets() {
        let a = BucketKey::new("203.0.113.7", "/api/news/search");
        let b = BucketKey::new("203.0.113.8", "/api/news/search");
        assert_ne!(a, b);
    }

    #[test]
    fn test_short_path_kept_whole() {
        let key = BucketKey::new("anonymous", "/api");
        assert_eq!(key.group, "/api");
    }

    #[test]
    fn test_display() {
        let key = BucketKey::new("anonymous", "/api/social/feed");
        assert_eq!(key.to_string(), "anonymous:/api/social");
    }
}
