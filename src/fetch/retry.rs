//! Retry decorator with exponential backoff.
//!
//! Retries timeouts, connection failures, 5xx responses, 408 and 429.
//! Other client errors are returned immediately.

use super::client::HttpClient;
use async_trait::async_trait;
use reqwest::{Request, Response, StatusCode};
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_MAX_RETRIES: u32 = 5;
pub const DEFAULT_INITIAL_DELAY_MS: u64 = 200;
pub const DEFAULT_MAX_DELAY_MS: u64 = 10_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryConfig {
    /// Attempts after the first one.
    pub max_retries: u32,
    /// Delay before the first retry; doubles on every further attempt.
    pub initial_delay: Duration,
    /// Upper bound for any single delay.
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            initial_delay: Duration::from_millis(DEFAULT_INITIAL_DELAY_MS),
            max_delay: Duration::from_millis(DEFAULT_MAX_DELAY_MS),
        }
    }
}

impl RetryConfig {
    pub fn new(max_retries: u32, initial_delay_ms: u64, max_delay_ms: u64) -> Self {
        Self {
            max_retries,
            initial_delay: Duration::from_millis(initial_delay_ms),
            max_delay: Duration::from_millis(max_delay_ms),
        }
    }

    /// Delay before retry number `attempt` (0-based).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let factor = 2u64.saturating_pow(attempt);
        let delay_ms = (self.initial_delay.as_millis() as u64).saturating_mul(factor);
        Duration::from_millis(delay_ms.min(self.max_delay.as_millis() as u64))
    }
}

pub fn is_retryable_status(status: StatusCode) -> bool {
    status.is_server_error()
        || status == StatusCode::TOO_MANY_REQUESTS
        || status == StatusCode::REQUEST_TIMEOUT
}

pub fn is_retryable_error(error: &reqwest::Error) -> bool {
    if error.is_timeout() || error.is_connect() {
        return true;
    }
    error.status().is_some_and(is_retryable_status)
}

/// An [`HttpClient`] wrapper that re-executes failed requests according to a
/// [`RetryConfig`].
pub struct Retry<C> {
    pub inner: C,
    pub config: RetryConfig,
}

impl<C> Retry<C> {
    pub fn new(inner: C, config: RetryConfig) -> Self {
        Self { inner, config }
    }
}

#[async_trait]
impl<C: HttpClient> HttpClient for Retry<C> {
    async fn execute(&self, req: Request) -> reqwest::Result<Response> {
        let mut attempt = 0;

        loop {
            let retries_left = attempt < self.config.max_retries;
            // Requests with streaming bodies cannot be replayed.
            let Some(current) = req.try_clone().filter(|_| retries_left) else {
                return self.inner.execute(req).await;
            };

            match self.inner.execute(current).await {
                Ok(resp) if is_retryable_status(resp.status()) => {
                    warn!(
                        status = %resp.status(),
                        attempt = attempt + 1,
                        max_attempts = self.config.max_retries + 1,
                        "Retryable status"
                    );
                }
                Ok(resp) => {
                    if attempt > 0 {
                        debug!(retries = attempt, "Request succeeded after retries");
                    }
                    return Ok(resp);
                }
                Err(e) if is_retryable_error(&e) => {
                    warn!(
                        error = %e,
                        attempt = attempt + 1,
                        max_attempts = self.config.max_retries + 1,
                        "Retryable request error"
                    );
                }
                Err(e) => return Err(e),
            }

            let delay = self.config.delay_for_attempt(attempt);
            debug!(?delay, "Backing off before retry");
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}
