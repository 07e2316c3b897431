//! Rate limit record storage.
//!
//! The store abstracts where fixed-window records live so a shared backend
//! (e.g. a networked key-value store with atomic increment-and-expire) can be
//! swapped in for multi-instance deployments without touching the limiter.
//! The in-memory implementation is the only one shipped; it is correct for a
//! single process and documented as such.

use async_trait::async_trait;
use dashmap::DashMap;

use super::key::BucketKey;

/// One fixed-window record: requests observed since the window began.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowRecord {
    /// Requests admitted in the current window
    pub count: u32,
    /// Epoch milliseconds at which the current window began
    pub window_start_ms: u64,
}

impl WindowRecord {
    fn fresh(now_ms: u64) -> Self {
        Self {
            count: 0,
            window_start_ms: now_ms,
        }
    }
}

/// Outcome of recording one hit against a bucket.
#[derive(Debug, Clone, Copy)]
pub struct HitOutcome {
    /// Whether the hit was admitted
    pub allowed: bool,
    /// Requests admitted in the window after this hit
    pub count: u32,
    /// Epoch milliseconds at which the window began
    pub window_start_ms: u64,
}

/// Storage backend for rate limit records.
#[async_trait]
pub trait RateLimitStore: Send + Sync {
    /// Record one hit with fixed-window semantics.
    ///
    /// An absent or expired record is replaced by a fresh window before the
    /// hit is applied. A hit against a full window is not counted.
    async fn hit(
        &self,
        key: BucketKey,
        max_requests: u32,
        window_ms: u64,
        now_ms: u64,
    ) -> HitOutcome;

    /// Delete every record whose window began before `cutoff_ms`, regardless
    /// of whether its window is still active. Returns the number removed.
    async fn sweep(&self, cutoff_ms: u64) -> usize;

    /// Number of live records.
    async fn len(&self) -> usize;
}

/// In-memory store backed by a concurrent map.
///
/// Read-modify-write on a key happens under the map's per-entry lock, so a
/// concurrent request to the same bucket cannot interleave mid-update.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: DashMap<BucketKey, WindowRecord>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RateLimitStore for MemoryStore {
    async fn hit(
        &self,
        key: BucketKey,
        max_requests: u32,
        window_ms: u64,
        now_ms: u64,
    ) -> HitOutcome {
        let mut record = self
            .records
            .entry(key)
            .or_insert_with(|| WindowRecord::fresh(now_ms));

        // Window elapsed: replace rather than carry the stale count forward.
        if now_ms.saturating_sub(record.window_start_ms) > window_ms {
            *record = WindowRecord::fresh(now_ms);
        }

        let allowed = record.count < max_requests;
        if allowed {
            record.count += 1;
        }

        HitOutcome {
            allowed,
            count: record.count,
            window_start_ms: record.window_start_ms,
        }
    }

    async fn sweep(&self, cutoff_ms: u64) -> usize {
        let before = self.records.len();
        self.records.retain(|_, r| r.window_start_ms >= cutoff_ms);
        before - self.records.len()
    }

    async fn len(&self) -> usize {
        self.records.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> BucketKey {
        BucketKey::new("203.0.113.7", "/api/tmdb/popular")
    }

    #[tokio::test]
    async fn test_first_hit_creates_fresh_window() {
        let store = MemoryStore::new();
        let outcome = store.hit(key(), 40, 10_000, 1_000).await;

        assert!(outcome.allowed);
        assert_eq!(outcome.count, 1);
        assert_eq!(outcome.window_start_ms, 1_000);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_hits_accumulate_within_window() {
        let store = MemoryStore::new();
        for i in 1..=5 {
            let outcome = store.hit(key(), 40, 10_000, 1_000 + i).await;
            assert!(outcome.allowed);
            assert_eq!(outcome.count, i as u32);
            // Window start stays pinned to the first hit
            assert_eq!(outcome.window_start_ms, 1_001);
        }
    }

    #[tokio::test]
    async fn test_full_window_rejects_without_counting() {
        let store = MemoryStore::new();
        for _ in 0..3 {
            assert!(store.hit(key(), 3, 10_000, 1_000).await.allowed);
        }

        let outcome = store.hit(key(), 3, 10_000, 2_000).await;
        assert!(!outcome.allowed);
        assert_eq!(outcome.count, 3);

        // Still rejecting; the count does not creep past the limit.
        let outcome = store.hit(key(), 3, 10_000, 3_000).await;
        assert!(!outcome.allowed);
        assert_eq!(outcome.count, 3);
    }

    #[tokio::test]
    async fn test_expired_window_resets() {
        let store = MemoryStore::new();
        for _ in 0..3 {
            store.hit(key(), 3, 10_000, 1_000).await;
        }
        assert!(!store.hit(key(), 3, 10_000, 5_000).await.allowed);

        // Strictly past the window boundary: counter starts over.
        let outcome = store.hit(key(), 3, 10_000, 11_001).await;
        assert!(outcome.allowed);
        assert_eq!(outcome.count, 1);
        assert_eq!(outcome.window_start_ms, 11_001);
    }

    #[tokio::test]
    async fn test_window_boundary_is_exclusive() {
        let store = MemoryStore::new();
        store.hit(key(), 3, 10_000, 1_000).await;

        // Exactly window_ms later the window is still active.
        let outcome = store.hit(key(), 3, 10_000, 11_000).await;
        assert_eq!(outcome.count, 2);
        assert_eq!(outcome.window_start_ms, 1_000);
    }

    #[tokio::test]
    async fn test_sweep_removes_stale_records() {
        let store = MemoryStore::new();
        store
            .hit(BucketKey::new("a", "/api/tmdb/popular"), 40, 10_000, 1_000)
            .await;
        store
            .hit(BucketKey::new("b", "/api/news/search"), 30, 60_000, 200_000)
            .await;
        assert_eq!(store.len().await, 2);

        // Retention cutoff removes the old record even though its route
        // group differs; the recent one survives.
        let removed = store.sweep(100_000).await;
        assert_eq!(removed, 1);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_separate_buckets_do_not_interfere() {
        let store = MemoryStore::new();
        let a = BucketKey::new("203.0.113.7", "/api/tmdb/popular");
        let b = BucketKey::new("203.0.113.7", "/api/news/search");

        for _ in 0..3 {
            assert!(store.hit(a.clone(), 3, 10_000, 1_000).await.allowed);
        }
        assert!(!store.hit(a.clone(), 3, 10_000, 1_000).await.allowed);
        assert!(store.hit(b, 3, 60_000, 1_000).await.allowed);
    }
}
