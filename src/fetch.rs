//! Resilient wrapper for outbound calls to upstream content providers.
//!
//! Bounds both attempt count and per-attempt duration. Backoff between
//! attempts is linear (`attempt * backoff_unit`), matching the provider
//! quotas this gateway fronts; no state is shared between invocations.

use std::time::Duration;

use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::warn;

/// Errors surfaced by [`RetryingFetcher`].
#[derive(Debug, Error)]
pub enum FetchError {
    /// Upstream said the resource does not exist. Terminal: retrying is
    /// known not to help, so no further attempts are made.
    #[error("resource not found upstream")]
    NotFound,

    /// Upstream answered with a non-success status.
    #[error("upstream returned status {0}")]
    Status(StatusCode),

    /// The attempt failed in transit: timeout, connection error or an
    /// unreadable body.
    #[error("upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Every attempt failed; carries how many were made.
    #[error("upstream request failed after {attempts} attempts")]
    Exhausted { attempts: u32 },
}

impl FetchError {
    /// Whether another attempt could change the outcome.
    fn is_retryable(&self) -> bool {
        !matches!(self, FetchError::NotFound)
    }
}

/// Retry and timeout policy for one fetcher.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: u32,
    /// Per-attempt deadline; elapsing it cancels the in-flight request
    pub attempt_timeout: Duration,
    /// Backoff before attempt `n + 1` is `n * backoff_unit`
    pub backoff_unit: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            attempt_timeout: Duration::from_secs(10),
            backoff_unit: Duration::from_secs(1),
        }
    }
}

/// HTTP fetcher with bounded retry.
#[derive(Debug, Clone)]
pub struct RetryingFetcher {
    client: Client,
    policy: RetryPolicy,
}

impl RetryingFetcher {
    /// Create a fetcher over an existing client.
    pub fn new(client: Client, policy: RetryPolicy) -> Self {
        Self { client, policy }
    }

    /// Fetch and deserialize a JSON payload, retrying transient failures.
    ///
    /// A 404 is surfaced immediately without consuming remaining attempts.
    /// Any other failure is retried after a linear backoff until the attempt
    /// budget is spent, at which point `Exhausted` is returned.
    pub async fn fetch_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, FetchError> {
        let mut attempt = 1u32;
        loop {
            match self.fetch_json_once(url.clone()).await {
                Ok(payload) => return Ok(payload),
                Err(err) if !err.is_retryable() => return Err(err),
                Err(err) => {
                    warn!(
                        attempt,
                        max_attempts = self.policy.max_attempts,
                        url = %url,
                        error = %err,
                        "Upstream attempt failed"
                    );
                    if attempt >= self.policy.max_attempts {
                        return Err(FetchError::Exhausted { attempts: attempt });
                    }
                    tokio::time::sleep(self.policy.backoff_unit * attempt).await;
                    attempt += 1;
                }
            }
        }
    }

    /// Single attempt with the policy's timeout and the same error mapping,
    /// for routes that degrade rather than retry.
    pub async fn fetch_json_once<T: DeserializeOwned>(&self, url: Url) -> Result<T, FetchError> {
        let response = self
            .client
            .get(url)
            .timeout(self.policy.attempt_timeout)
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => Ok(response.json::<T>().await?),
            StatusCode::NOT_FOUND => Err(FetchError::NotFound),
            status => Err(FetchError::Status(status)),
        }
    }
}
