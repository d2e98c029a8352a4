//! Retry Executor
//!
//! Linear backoff: after failed attempt `n` the executor sleeps
//! `base_delay * n` before trying again.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use tracing::{error, warn};

// == Retry Policy ==
/// How many times to try and how long to wait between tries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one. Values below 1 behave as 1.
    pub max_attempts: u32,
    /// Delay unit multiplied by the attempt number
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
        }
    }

    /// Single attempt, no waiting.
    pub fn no_retry() -> Self {
        Self::new(1, Duration::ZERO)
    }

    /// Delay to wait after the given failed attempt (1-based).
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(attempt)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_secs(1))
    }
}

// == Execute With Retry ==
/// Runs `operation` until it succeeds or the policy's attempts run out.
///
/// Intermediate failures are logged and swallowed. The error of the last
/// attempt is returned unchanged. The operation must be safe to repeat; no
/// attempt is made to detect partial effects of a failed try.
///
/// # Arguments
/// * `operation` - Factory producing a fresh future per attempt
/// * `label` - Human-readable name used in log events
/// * `policy` - Attempt count and backoff unit
pub async fn execute_with_retry<T, E, F, Fut>(
    mut operation: F,
    label: &str,
    policy: &RetryPolicy,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt < max_attempts => {
                let backoff = policy.delay_after(attempt);
                warn!(
                    operation = label,
                    error = %e,
                    attempt,
                    max_attempts,
                    backoff_ms = backoff.as_millis() as u64,
                    "operation failed, retrying"
                );
                tokio::time::sleep(backoff).await;
                attempt += 1;
            }
            Err(e) => {
                error!(
                    operation = label,
                    error = %e,
                    attempts = attempt,
                    "operation failed after all attempts"
                );
                return Err(e);
            }
        }
    }
}
