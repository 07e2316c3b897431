//! Configuration management for Mosaic.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

use crate::ratelimit::RouteGroup;

/// Main configuration for the Mosaic gateway.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MosaicConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Upstream content provider configuration
    #[serde(default)]
    pub providers: ProviderConfig,

    /// Rate limiting configuration
    #[serde(default)]
    pub rate_limiting: RateLimitingConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP listen address
    #[serde(default = "default_listen_addr")]
    pub listen_addr: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
        }
    }
}

fn default_listen_addr() -> SocketAddr {
    "127.0.0.1:3000".parse().unwrap()
}

/// Upstream content provider configuration.
///
/// API keys may be omitted here and supplied through the `TMDB_API_KEY` and
/// `NEWS_API_KEY` environment variables instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Base URL of the movie metadata provider
    #[serde(default = "default_tmdb_base_url")]
    pub tmdb_base_url: String,

    /// API key for the movie metadata provider
    #[serde(default)]
    pub tmdb_api_key: Option<String>,

    /// Base URL of the news headline provider
    #[serde(default = "default_news_base_url")]
    pub news_base_url: String,

    /// API key for the news headline provider
    #[serde(default)]
    pub news_api_key: Option<String>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            tmdb_base_url: default_tmdb_base_url(),
            tmdb_api_key: None,
            news_base_url: default_news_base_url(),
            news_api_key: None,
        }
    }
}

fn default_tmdb_base_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_news_base_url() -> String {
    "https://newsapi.org/v2".to_string()
}

/// Rate limiting configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitingConfig {
    /// Route groups with their quotas, matched longest-prefix-first
    #[serde(default = "RouteGroup::default_groups")]
    pub groups: Vec<RouteGroup>,

    /// Interval between garbage collection sweeps, in seconds
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,

    /// Age past which a record is deleted by the sweep, in seconds
    #[serde(default = "default_retention")]
    pub retention_secs: u64,
}

impl Default for RateLimitingConfig {
    fn default() -> Self {
        Self {
            groups: RouteGroup::default_groups(),
            sweep_interval_secs: default_sweep_interval(),
            retention_secs: default_retention(),
        }
    }
}

fn default_sweep_interval() -> u64 {
    300
}

fn default_retention() -> u64 {
    300
}

impl MosaicConfig {
    /// Load configuration from a file path.
    pub fn from_file(path: &str) -> crate::error::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: MosaicConfig = serde_yaml::from_str(&contents)
            .map_err(|e| crate::error::MosaicError::Config(e.to_string()))?;
        Ok(config)
    }

    /// Override provider API keys from the environment when set.
    pub fn apply_env(&mut self) {
        if let Ok(key) = std::env::var("TMDB_API_KEY") {
            if !key.is_empty() {
                self.providers.tmdb_api_key = Some(key);
            }
        }
        if let Ok(key) = std::env::var("NEWS_API_KEY") {
            if !key.is_empty() {
                self.providers.news_api_key = Some(key);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MosaicConfig::default();
        assert_eq!(config.server.listen_addr.port(), 3000);
        assert!(config.providers.tmdb_api_key.is_none());
        assert_eq!(config.rate_limiting.sweep_interval_secs, 300);
        assert_eq!(config.rate_limiting.groups.len(), 5);
    }

    #[test]
    fn test_parse_partial_yaml() {
        let yaml = r#"
server:
  listen_addr: "0.0.0.0:8080"
providers:
  tmdb_api_key: "abc123"
"#;
        let config: MosaicConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.server.listen_addr.port(), 8080);
        assert_eq!(config.providers.tmdb_api_key.as_deref(), Some("abc123"));
        // Sections not present fall back to defaults
        assert_eq!(config.rate_limiting.retention_secs, 300);
        assert_eq!(
            config.providers.news_base_url,
            "https://newsapi.org/v2"
        );
    }

    #[test]
    fn test_parse_custom_groups() {
        let yaml = r#"
rate_limiting:
  groups:
    - prefix: /api/custom
      max_requests: 5
      window_ms: 1000
  retention_secs: 60
"#;
        let config: MosaicConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.rate_limiting.groups.len(), 1);
        assert_eq!(config.rate_limiting.groups[0].max_requests, 5);
        assert_eq!(config.rate_limiting.retention_secs, 60);
    }
}
