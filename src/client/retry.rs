//! Bounded exponential backoff for API calls
//!
//! Every accessor runs its request through [`with_retry`]. Only failures that
//! [`ApiError::is_transient`] accepts are retried; the wait before retry `n`
//! (zero-based) is `base_wait * 2^n`.

use super::config::{DEFAULT_BASE_WAIT_MS, DEFAULT_MAX_RETRIES};
use super::{ApiError, ApiResult};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Retry settings shared by all requests of a client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    pub max_retries: u32,
    /// Wait after the first failed attempt
    pub base_wait: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            base_wait: Duration::from_millis(DEFAULT_BASE_WAIT_MS),
        }
    }
}

impl RetryPolicy {
    /// Create a policy
    pub fn new(max_retries: u32, base_wait: Duration) -> Self {
        Self {
            max_retries,
            base_wait,
        }
    }

    /// Wait after the failed attempt with zero-based index `attempt`
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 1u32.checked_shl(attempt).unwrap_or(u32::MAX);
        self.base_wait.saturating_mul(factor)
    }

    /// Total attempts, never below one
    fn attempts(&self) -> u32 {
        self.max_retries.max(1)
    }
}

/// Run `op` until it succeeds, fails permanently, or runs out of attempts.
///
/// `label` names the operation in log messages (usually the endpoint).
/// The error of the last attempt is returned on exhaustion.
pub async fn with_retry<T, F, Fut>(policy: &RetryPolicy, label: &str, mut op: F) -> ApiResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ApiResult<T>>,
{
    let max_attempts = policy.attempts();
    let mut attempt: u32 = 0;

    loop {
        match op().await {
            Ok(value) => {
                if attempt > 0 {
                    info!(
                        "Retry attempt {}/{} succeeded ({})",
                        attempt + 1,
                        max_attempts,
                        label
                    );
                }
                return Ok(value);
            }
            Err(err) if err.is_transient() && attempt + 1 < max_attempts => {
                let wait = policy.backoff(attempt);
                warn!("{}", format_retry(attempt + 1, max_attempts, &err, wait, label));
                tokio::time::sleep(wait).await;
                attempt += 1;
            }
            Err(err) => {
                if err.is_transient() {
                    error!(
                        "{} failed after {} attempts: {}",
                        label, max_attempts, err
                    );
                } else {
                    debug!("{} failed without retry: {}", label, err);
                }
                return Err(err);
            }
        }
    }
}

fn format_retry(
    attempt: u32,
    max_attempts: u32,
    err: &ApiError,
    wait: Duration,
    label: &str,
) -> String {
    format!(
        "Retrying (attempt {}/{}) after {} - waiting {:.1} seconds... ({}: {})",
        attempt,
        max_attempts,
        err.description(),
        wait.as_secs_f64(),
        label,
        err
    )
}
