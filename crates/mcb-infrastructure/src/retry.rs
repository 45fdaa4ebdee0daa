//! Retry/backoff helper for transient collaborator failures.
//!
//! Wraps any fallible async operation with exponential backoff up to a
//! caller-configured ceiling, retrying only errors classified as transient
//! (`EmbedderUnavailable`, `VectorStoreUnavailable`).

use std::time::Duration;

use mcb_domain::error::{Error, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Exponential backoff policy with a hard ceiling on attempts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts, including the first. `1` disables retrying.
    pub max_attempts: u32,
    /// Delay before the first retry.
    pub initial_delay_ms: u64,
    /// Multiplier applied to the delay after each retry.
    pub backoff_multiplier: f64,
    /// Upper bound on the delay between retries.
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay_ms: 200,
            backoff_multiplier: 2.0,
            max_delay_ms: 5_000,
        }
    }
}

/// Errors worth retrying: transient remote failures, per the platform's own
/// error-handling design. `ParseError`, `NotFound`, `InvalidOptions` and the
/// like are fast-failed, never retried.
pub fn is_transient(err: &Error) -> bool {
    matches!(
        err,
        Error::EmbedderUnavailable { .. } | Error::VectorStoreUnavailable { .. }
    )
}

/// Runs `operation`, retrying with exponential backoff while it fails with a
/// transient error (per `is_retryable`) and attempts remain. Returns the last
/// error once `config.max_attempts` is exhausted or a non-retryable error is
/// hit.
pub async fn retry_with_backoff<T, F, Fut>(
    config: &RetryConfig,
    is_retryable: impl Fn(&Error) -> bool,
    mut operation: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T>>,
{
    let mut delay = Duration::from_millis(config.initial_delay_ms);
    let max_delay = Duration::from_millis(config.max_delay_ms);
    let mut attempt = 1;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) if attempt < config.max_attempts && is_retryable(&err) => {
                warn!(
                    attempt,
                    max_attempts = config.max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "retrying after transient failure"
                );
                tokio::time::sleep(delay).await;
                delay = delay.mul_f64(config.backoff_multiplier).min(max_delay);
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn succeeds_without_retrying_on_first_try() {
        let calls = AtomicU32::new(0);
        let result = retry_with_backoff(&RetryConfig::default(), is_transient, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok::<_, Error>(42) }
        })
        .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retries_transient_failures_until_success() {
        let calls = AtomicU32::new(0);
        let config = RetryConfig {
            max_attempts: 5,
            initial_delay_ms: 1,
            backoff_multiplier: 1.0,
            max_delay_ms: 1,
        };
        let result = retry_with_backoff(&config, is_transient, || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err(Error::embedder_unavailable("still warming up"))
                } else {
                    Ok(n)
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn exhausts_attempts_and_surfaces_the_last_error() {
        let calls = AtomicU32::new(0);
        let config = RetryConfig {
            max_attempts: 2,
            initial_delay_ms: 1,
            backoff_multiplier: 1.0,
            max_delay_ms: 1,
        };
        let result: Result<()> = retry_with_backoff(&config, is_transient, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(Error::vector_store_unavailable("down")) }
        })
        .await;
        assert!(matches!(result, Err(Error::VectorStoreUnavailable { .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn non_transient_errors_are_not_retried() {
        let calls = AtomicU32::new(0);
        let result: Result<()> = retry_with_backoff(&RetryConfig::default(), is_transient, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(Error::not_found("Foo.java")) }
        })
        .await;
        assert!(matches!(result, Err(Error::NotFound { .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
