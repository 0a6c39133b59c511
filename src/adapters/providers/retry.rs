//! Retry and rate limiting shared by the HTTP capability providers.

use std::future::Future;
use std::num::NonZeroU32;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use backoff::ExponentialBackoffBuilder;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use tracing::{debug, warn};

use crate::domain::errors::ProviderError;
use crate::domain::models::RetryConfig;

/// Exponential backoff for transient provider errors.
///
/// Only [`ProviderError::is_transient`] errors are retried. A rate-limit
/// response carrying a retry-after hint waits at least that long.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_retries: u32,
    initial_backoff: Duration,
    max_backoff: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, initial_backoff_ms: u64, max_backoff_ms: u64) -> Self {
        Self {
            max_retries,
            initial_backoff: Duration::from_millis(initial_backoff_ms),
            max_backoff: Duration::from_millis(max_backoff_ms.max(initial_backoff_ms)),
        }
    }

    /// A policy that gives up on the first failure.
    pub fn none() -> Self {
        Self::new(0, 1, 1)
    }

    pub async fn execute<F, Fut, T>(&self, operation: F) -> Result<T, ProviderError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, ProviderError>>,
    {
        let schedule = ExponentialBackoffBuilder::new()
            .with_initial_interval(self.initial_backoff)
            .with_max_interval(self.max_backoff)
            .with_max_elapsed_time(None)
            .build();
        let max_retries = self.max_retries;
        let attempts = AtomicU32::new(0);

        backoff::future::retry(schedule, || {
            let attempt = attempts.fetch_add(1, Ordering::Relaxed);
            let fut = operation();
            async move {
                match fut.await {
                    Ok(value) => {
                        if attempt > 0 {
                            debug!(retries = attempt, "provider call succeeded after retry");
                        }
                        Ok(value)
                    }
                    Err(err) if err.is_transient() && attempt < max_retries => {
                        warn!(attempt = attempt + 1, error = %err, "transient provider error, retrying");
                        Err(match &err {
                            ProviderError::RateLimited {
                                retry_after_secs: Some(secs),
                            } => backoff::Error::retry_after(err.clone(), Duration::from_secs(*secs)),
                            _ => backoff::Error::transient(err),
                        })
                    }
                    Err(err) => Err(backoff::Error::permanent(err)),
                }
            }
        })
        .await
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self::new(config.max_retries, config.initial_backoff_ms, config.max_backoff_ms)
    }
}

/// Direct (unkeyed) limiter allowing `requests_per_second` calls.
pub fn rate_limiter(requests_per_second: u32) -> DefaultDirectRateLimiter {
    let rps = NonZeroU32::new(requests_per_second).unwrap_or(NonZeroU32::MIN);
    RateLimiter::direct(Quota::per_second(rps))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[tokio::test]
    async fn test_retries_transient_errors() {
        let policy = RetryPolicy::new(3, 1, 5);
        let calls = &AtomicUsize::new(0);

        let result = policy
            .execute(move || async move {
                if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err(ProviderError::Unreachable("connection reset".into()))
                } else {
                    Ok("ok")
                }
            })
            .await;

        assert_eq!(result.unwrap(), "ok");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_does_not_retry_invalid_response() {
        let policy = RetryPolicy::new(3, 1, 5);
        let calls = &AtomicUsize::new(0);

        let result: Result<(), _> = policy
            .execute(move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(ProviderError::InvalidResponse("not json".into()))
            })
            .await;

        assert!(matches!(result, Err(ProviderError::InvalidResponse(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_retries() {
        let policy = RetryPolicy::new(2, 1, 2);
        let calls = &AtomicUsize::new(0);

        let result: Result<(), _> = policy
            .execute(move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(ProviderError::RateLimited { retry_after_secs: None })
            })
            .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }
}
