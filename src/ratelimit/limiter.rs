//! Core rate limiter implementation.
//!
//! Admission control for inbound requests using fixed-window counters keyed
//! by (client identifier, route group). Rejection is a normal control-flow
//! outcome, not an error: the limiter never aborts the request pipeline.

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::task::JoinHandle;
use tracing::{debug, trace};

use super::groups::{RouteGroup, RouteGroups};
use super::key::BucketKey;
use super::store::{MemoryStore, RateLimitStore};

/// The admission decision for one request, carrying everything the transport
/// layer needs to emit rate-limit headers.
#[derive(Debug, Clone, Copy)]
pub struct Decision {
    /// Whether the request is admitted
    pub allowed: bool,
    /// Configured quota for the window
    pub limit: u32,
    /// Quota left in the current window, never negative
    pub remaining: u32,
    /// Window reset time as a Unix timestamp in seconds, rounded up
    pub reset_unix_secs: u64,
    /// Seconds until a retry can succeed; present only on rejection
    pub retry_after_secs: Option<u64>,
}

/// The core rate limiter: resolves a route group, records the hit against the
/// store and derives the response metadata.
///
/// Shared across tasks behind an `Arc`. Counters live in the [`RateLimitStore`],
/// which is in-memory by default; the state is process-local and therefore
/// not shared across instances.
pub struct RateLimiter {
    store: Arc<dyn RateLimitStore>,
    groups: RouteGroups,
}

impl RateLimiter {
    /// Create a rate limiter over an explicit store.
    pub fn new(store: Arc<dyn RateLimitStore>, groups: Vec<RouteGroup>) -> Self {
        Self {
            store,
            groups: RouteGroups::new(groups),
        }
    }

    /// Create a rate limiter over a fresh in-memory store.
    pub fn in_memory(groups: Vec<RouteGroup>) -> Self {
        Self::new(Arc::new(MemoryStore::new()), groups)
    }

    /// Check a request against its route group at the current wall-clock time.
    ///
    /// Returns `None` when no configured prefix governs the path, in which
    /// case the request bypasses limiting entirely.
    pub async fn check(&self, client: &str, path: &str) -> Option<Decision> {
        self.check_at(client, path, epoch_ms()).await
    }

    /// Check a request at an explicit timestamp. Decision logic is pure with
    /// respect to the supplied time, which keeps window arithmetic testable.
    pub async fn check_at(&self, client: &str, path: &str, now_ms: u64) -> Option<Decision> {
        let group = self.groups.resolve(path)?;
        let key = BucketKey::new(client, path);

        trace!(key = %key, prefix = %group.prefix, "Checking rate limit");

        let outcome = self
            .store
            .hit(key.clone(), group.max_requests, group.window_ms, now_ms)
            .await;

        let remaining = group.max_requests.saturating_sub(outcome.count);
        let reset_unix_secs = (outcome.window_start_ms + group.window_ms).div_ceil(1000);

        if outcome.allowed {
            return Some(Decision {
                allowed: true,
                limit: group.max_requests,
                remaining,
                reset_unix_secs,
                retry_after_secs: None,
            });
        }

        let elapsed = now_ms.saturating_sub(outcome.window_start_ms);
        let retry_after_secs = group.window_ms.saturating_sub(elapsed).div_ceil(1000).max(1);

        debug!(
            key = %key,
            limit = group.max_requests,
            retry_after = retry_after_secs,
            "Rate limit exceeded"
        );

        Some(Decision {
            allowed: false,
            limit: group.max_requests,
            remaining,
            reset_unix_secs,
            retry_after_secs: Some(retry_after_secs),
        })
    }

    /// Number of live records in the store.
    pub async fn record_count(&self) -> usize {
        self.store.len().await
    }

    /// Spawn the background sweep that deletes records older than
    /// `retention`, bounding memory against one-shot clients. Runs every
    /// `interval` until the handle is dropped or aborted.
    pub fn spawn_sweeper(&self, interval: Duration, retention: Duration) -> JoinHandle<()> {
        let store = Arc::clone(&self.store);
        let retention_ms = retention.as_millis() as u64;

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // The first tick fires immediately; there is nothing to sweep yet.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let cutoff = epoch_ms().saturating_sub(retention_ms);
                let removed = store.sweep(cutoff).await;
                if removed > 0 {
                    debug!(removed, "Swept stale rate limit records");
                }
            }
        })
    }
}

/// Current wall-clock time as epoch milliseconds.
pub(crate) fn epoch_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limiter() -> RateLimiter {
        RateLimiter::in_memory(RouteGroup::default_groups())
    }

    #[tokio::test]
    async fn test_unmatched_path_bypasses_limiting() {
        let limiter = limiter();
        assert!(limiter.check_at("c", "/health", 0).await.is_none());
        assert_eq!(limiter.record_count().await, 0);
    }

    #[tokio::test]
    async fn test_quota_exhaustion_rejects_with_retry_after() {
        let limiter = limiter();
        let now = 1_700_000_000_000;

        // The movie-data group admits exactly 40 requests per 10s window.
        for i in 0..40 {
            let d = limiter
                .check_at("203.0.113.7", "/api/tmdb/popular", now + i)
                .await
                .unwrap();
            assert!(d.allowed, "request {} should be admitted", i + 1);
        }

        let d = limiter
            .check_at("203.0.113.7", "/api/tmdb/popular", now + 40)
            .await
            .unwrap();
        assert!(!d.allowed);
        assert_eq!(d.remaining, 0);
        let retry = d.retry_after_secs.unwrap();
        assert!(retry > 0);
        assert!(retry <= 10);
    }

    #[tokio::test]
    async fn test_window_expiry_resets_quota() {
        let limiter = limiter();
        let now = 1_700_000_000_000;

        for _ in 0..40 {
            limiter.check_at("c", "/api/tmdb/popular", now).await;
        }
        assert!(
            !limiter
                .check_at("c", "/api/tmdb/popular", now)
                .await
                .unwrap()
                .allowed
        );

        // Just past the 10s window the next request is admitted again.
        let d = limiter
            .check_at("c", "/api/tmdb/popular", now + 10_001)
            .await
            .unwrap();
        assert!(d.allowed);
        assert_eq!(d.remaining, 39);
    }

    #[tokio::test]
    async fn test_remaining_counts_down() {
        let limiter = limiter();
        let now = 1_700_000_000_000;

        for i in 1..=5u32 {
            let d = limiter
                .check_at("c", "/api/news/top-headlines", now)
                .await
                .unwrap();
            assert_eq!(d.limit, 30);
            assert_eq!(d.remaining, 30 - i);
        }
    }

    #[tokio::test]
    async fn test_reset_timestamp_rounds_up() {
        let limiter = limiter();
        // Window starts at 1,500 ms; the 10s window ends at 11,500 ms -> 12 s.
        let d = limiter
            .check_at("c", "/api/tmdb/popular", 1_500)
            .await
            .unwrap();
        assert_eq!(d.reset_unix_secs, 12);
    }

    #[tokio::test]
    async fn test_sub_paths_drain_shared_quota() {
        let limiter = limiter();
        let now = 1_700_000_000_000;

        for _ in 0..40 {
            limiter.check_at("c", "/api/tmdb/movie/42", now).await;
        }
        // A different sub-path under the same prefix shares the counter.
        let d = limiter
            .check_at("c", "/api/tmdb/popular", now)
            .await
            .unwrap();
        assert!(!d.allowed);
    }

    #[tokio::test]
    async fn test_specific_group_governs_nested_path() {
        let limiter = limiter();
        let d = limiter
            .check_at("c", "/api/tmdb/movie/42", 1_700_000_000_000)
            .await
            .unwrap();
        // Movie-data quota, not the generic /api default.
        assert_eq!(d.limit, 40);
    }

    #[tokio::test]
    async fn test_clients_are_isolated() {
        let limiter = limiter();
        let now = 1_700_000_000_000;

        for _ in 0..40 {
            limiter.check_at("a", "/api/tmdb/popular", now).await;
        }
        assert!(
            !limiter
                .check_at("a", "/api/tmdb/popular", now)
                .await
                .unwrap()
                .allowed
        );
        assert!(
            limiter
                .check_at("b", "/api/tmdb/popular", now)
                .await
                .unwrap()
                .allowed
        );
    }
}
