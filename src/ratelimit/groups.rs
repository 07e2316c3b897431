//! Route group configuration and matching.
//!
//! Inbound paths are bucketed into route groups by prefix. Groups are matched
//! longest-prefix-first so a more specific group overrides the generic
//! default.

use serde::{Deserialize, Serialize};

/// Quota configuration for one group of routes sharing a path prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteGroup {
    /// Path prefix this group applies to
    pub prefix: String,
    /// Maximum requests allowed per window
    pub max_requests: u32,
    /// Window duration in milliseconds
    pub window_ms: u64,
}

impl RouteGroup {
    /// The built-in group table, mirroring the published provider quotas.
    pub fn default_groups() -> Vec<RouteGroup> {
        vec![
            RouteGroup {
                prefix: "/api/tmdb".to_string(),
                max_requests: 40,
                window_ms: 10_000,
            },
            RouteGroup {
                prefix: "/api/news".to_string(),
                max_requests: 30,
                window_ms: 60_000,
            },
            RouteGroup {
                prefix: "/api/image-proxy".to_string(),
                max_requests: 100,
                window_ms: 60_000,
            },
            RouteGroup {
                prefix: "/api/social".to_string(),
                max_requests: 60,
                window_ms: 60_000,
            },
            RouteGroup {
                prefix: "/api".to_string(),
                max_requests: 60,
                window_ms: 60_000,
            },
        ]
    }
}

/// An ordered set of route groups supporting longest-prefix resolution.
#[derive(Debug, Clone)]
pub struct RouteGroups {
    /// Groups sorted by descending prefix length
    groups: Vec<RouteGroup>,
}

impl RouteGroups {
    /// Build a resolver from a group list.
    ///
    /// The final entry whose prefix is `/api` (or the shortest prefix
    /// otherwise) acts as the default for any API path no other group claims.
    pub fn new(mut groups: Vec<RouteGroup>) -> Self {
        groups.sort_by(|a, b| b.prefix.len().cmp(&a.prefix.len()));
        Self { groups }
    }

    /// Resolve the group governing `path`, or `None` when no prefix matches.
    pub fn resolve(&self, path: &str) -> Option<&RouteGroup> {
        self.groups.iter().find(|g| path.starts_with(&g.prefix))
    }

    /// The longest configured window, used to size the sweep retention.
    pub fn longest_window_ms(&self) -> u64 {
        self.groups.iter().map(|g| g.window_ms).max().unwrap_or(0)
    }
}

impl Default for RouteGroups {
    fn default() -> Self {
        Self::new(RouteGroup::default_groups())
    }
}
