//! Retry mechanism with exponential backoff
//!
//! Wraps any fallible async operation in a bounded retry loop. State is
//! scoped to one `call` invocation, so a single policy value can be shared
//! across concurrent requests. The backoff sleep is a suspension point and
//! never blocks the worker thread.

use crate::config::RetrySettings;
use std::time::Duration;
use tracing::{debug, error};

/// Retry configuration: attempt bound plus a clamped exponential backoff
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of attempts, including the first
    pub max_attempts: u32,
    /// Backoff multiplier applied to the exponential term
    pub multiplier: f64,
    /// Minimum delay between attempts
    pub min_delay: Duration,
    /// Maximum delay between attempts
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            multiplier: 1.0,
            min_delay: Duration::from_secs(4),
            max_delay: Duration::from_secs(10),
        }
    }
}

impl From<&RetrySettings> for RetryConfig {
    fn from(settings: &RetrySettings) -> Self {
        Self {
            max_attempts: settings.max_attempts,
            multiplier: settings.multiplier,
            min_delay: Duration::from_secs(settings.min_backoff_secs),
            max_delay: Duration::from_secs(settings.max_backoff_secs),
        }
    }
}

/// Retry executor: drives an operation to success or attempt exhaustion
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    config: RetryConfig,
}

impl RetryPolicy {
    /// Create a new retry policy
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    /// Delay inserted after `completed_attempts` failures:
    /// `multiplier * 2^(n-1)`, clamped to `[min_delay, max_delay]`
    pub fn delay_for_attempt(&self, completed_attempts: u32) -> Duration {
        let exponent = completed_attempts.saturating_sub(1).min(i32::MAX as u32) as i32;
        let raw = self.config.multiplier * 2f64.powi(exponent);
        let secs = raw.clamp(
            self.config.min_delay.as_secs_f64(),
            self.config.max_delay.as_secs_f64(),
        );
        Duration::from_secs_f64(secs)
    }

    /// Execute an operation with retry logic. Every error is treated as
    /// retryable; after the final attempt the last error propagates
    /// unchanged.
    pub async fn call<F, Fut, T, E>(&self, mut operation: F) -> std::result::Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = std::result::Result<T, E>>,
        E: std::fmt::Display,
    {
        let mut attempt = 0u32;

        loop {
            attempt += 1;

            match operation().await {
                Ok(result) => {
                    if attempt > 1 {
                        debug!("Retry succeeded on attempt {}", attempt);
                    }
                    return Ok(result);
                }
                Err(err) => {
                    if attempt >= self.config.max_attempts {
                        error!("Retry failed after {} attempts: {}", attempt, err);
                        return Err(err);
                    }

                    let delay = self.delay_for_attempt(attempt);
                    debug!(
                        "Attempt {} failed: {}, retrying in {:?}",
                        attempt, err, delay
                    );

                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(RetryConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn test_backoff_schedule_is_floored_then_exponential() {
        let policy = RetryPolicy::default();
        // 2^0 = 1 and 2^1 = 2 both clamp up to the 4s floor
        assert_eq!(policy.delay_for_attempt(1), Duration::from_secs(4));
        assert_eq!(policy.delay_for_attempt(2), Duration::from_secs(4));
        assert_eq!(policy.delay_for_attempt(3), Duration::from_secs(4));
        assert_eq!(policy.delay_for_attempt(4), Duration::from_secs(8));
        // 2^4 = 16 clamps down to the 10s ceiling
        assert_eq!(policy.delay_for_attempt(5), Duration::from_secs(10));
        assert_eq!(policy.delay_for_attempt(30), Duration::from_secs(10));
    }

    #[tokio::test]
    async fn test_success_on_first_attempt_runs_once() {
        let policy = RetryPolicy::default();
        let calls = Arc::new(AtomicU32::new(0));

        let counter = Arc::clone(&calls);
        let result: Result<u32, String> = policy
            .call(|| {
                let counter = Arc::clone(&counter);
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Ok(42)
                }
            })
            .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_recovers_after_transient_failures() {
        let policy = RetryPolicy::default();
        let calls = Arc::new(AtomicU32::new(0));

        let counter = Arc::clone(&calls);
        let result: Result<&str, String> = policy
            .call(|| {
                let counter = Arc::clone(&counter);
                async move {
                    if counter.fetch_add(1, Ordering::SeqCst) < 2 {
                        Err("transient".to_string())
                    } else {
                        Ok("done")
                    }
                }
            })
            .await;

        assert_eq!(result.unwrap(), "done");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhaustion_propagates_last_error() {
        let policy = RetryPolicy::default();
        let calls = Arc::new(AtomicU32::new(0));

        let counter = Arc::clone(&calls);
        let result: Result<(), String> = policy
            .call(|| {
                let counter = Arc::clone(&counter);
                async move {
                    let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
                    Err(format!("failure {}", n))
                }
            })
            .await;

        assert_eq!(result.unwrap_err(), "failure 3");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhaustion_waits_two_backoffs() {
        let policy = RetryPolicy::default();
        let started = tokio::time::Instant::now();

        let result: Result<(), &str> = policy.call(|| async { Err("down") }).await;

        assert!(result.is_err());
        // Two inter-attempt waits of 4s each under the default policy
        assert_eq!(started.elapsed(), Duration::from_secs(8));
    }
}
