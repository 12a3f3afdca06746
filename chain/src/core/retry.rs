//! Rate-limit-aware retry wrapper for contract reads

use std::future::Future;
use std::time::Duration;

use shared::ProviderFailure;
use tokio::time::sleep;
use tracing::{debug, warn};

/// Retry policy applied to every individual contract read
///
/// Only rate limits are retried; public RPC endpoints throttle aggressively
/// and a short linear backoff usually clears it. Any other failure means the
/// read is not going to improve on its own, so the field is given up
/// immediately and the caller degrades.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(1000),
        }
    }
}

impl RetryPolicy {
    /// Zero-delay policy for tests
    pub fn immediate() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::ZERO,
        }
    }

    /// Run `operation`, retrying rate limits with linear backoff
    ///
    /// Waits `base_delay × attempt_number` between attempts. Returns `None`
    /// on a non-rate-limit failure or once attempts are exhausted; errors
    /// never propagate to the caller.
    pub async fn run<T, F, Fut>(&self, label: &str, mut operation: F) -> Option<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ProviderFailure>>,
    {
        for attempt in 1..=self.max_attempts {
            match operation().await {
                Ok(value) => return Some(value),
                Err(failure) if failure.is_rate_limit() => {
                    if attempt == self.max_attempts {
                        warn!(label, attempt, "rate limited, attempts exhausted");
                        return None;
                    }
                    let wait = self.base_delay * attempt;
                    debug!(label, attempt, wait_ms = wait.as_millis() as u64, "rate limited, backing off");
                    sleep(wait).await;
                }
                Err(failure) => {
                    warn!(label, attempt, error = %failure, "read failed, not retrying");
                    return None;
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn persistent_rate_limit_takes_three_attempts_with_linear_backoff() {
        let policy = RetryPolicy::default();
        let calls = AtomicU32::new(0);
        let started = Instant::now();

        let result: Option<u64> = policy
            .run("supply", || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(ProviderFailure::RateLimited) }
            })
            .await;

        assert_eq!(result, None);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        // 1000 ms after the first attempt, 2000 ms after the second
        assert_eq!(started.elapsed(), Duration::from_millis(3000));
    }

    #[tokio::test(start_paused = true)]
    async fn rate_limit_then_success_recovers() {
        let policy = RetryPolicy::default();
        let calls = AtomicU32::new(0);

        let result = policy
            .run("supply", || {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n == 0 {
                        Err(ProviderFailure::RateLimited)
                    } else {
                        Ok(42u64)
                    }
                }
            })
            .await;

        assert_eq!(result, Some(42));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn other_failures_are_not_retried() {
        let policy = RetryPolicy::default();
        let calls = AtomicU32::new(0);
        let started = Instant::now();

        let result: Option<u64> = policy
            .run("supply", || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(ProviderFailure::Server("boom".to_string())) }
            })
            .await;

        assert_eq!(result, None);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(started.elapsed(), Duration::ZERO);
    }
}
