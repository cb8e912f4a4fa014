//! Call-site retry for resource operations
//!
//! Separate from the gateway: the gateway only ever replays a request once
//! after a credential refresh. This policy retries whole operations on
//! transient failures (network, timeout, 5xx, 429) with exponential backoff.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, warn};

use super::errors::ApiError;

/// Exponential backoff retry budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_retries: u32,
    initial_delay: Duration,
    max_delay: Duration,
}

impl RetryPolicy {
    /// List and detail queries.
    pub const QUERY: Self = Self::new(2);
    /// Idempotent single-shot actions such as badge removal.
    pub const ONCE: Self = Self::new(1);
    /// Mutations.
    pub const NEVER: Self = Self::new(0);

    pub const fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
        }
    }

    #[must_use]
    pub const fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    pub const fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Delay before retry number `retry` (zero based): `initial · 2^retry`,
    /// capped at the maximum.
    pub fn delay_for(&self, retry: u32) -> Duration {
        let factor = 2u32.saturating_pow(retry);
        self.initial_delay.saturating_mul(factor).min(self.max_delay)
    }

    /// Run `operation`, retrying while the error allows it and budget remains.
    ///
    /// # Errors
    /// The last error returned by `operation`
    pub async fn run<T, F, Fut>(&self, mut operation: F) -> Result<T, ApiError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        let mut retry = 0;
        loop {
            match operation().await {
                Ok(value) => {
                    if retry > 0 {
                        debug!(retries = retry, "operation succeeded after retry");
                    }
                    return Ok(value);
                }
                Err(err) if retry < self.max_retries && err.should_retry() => {
                    let delay = self.delay_for(retry);
                    warn!(error = %err, ?delay, attempt = retry + 1, "retrying operation");
                    tokio::time::sleep(delay).await;
                    retry += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::QUERY
    }
}
