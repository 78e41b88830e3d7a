//! Retry policy for model calls
//!
//! Model completion is the only retried operation. Each failed attempt is
//! logged and followed by an exponential backoff, except the last one.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::core::{AgentError, Result};

/// Configuration for retry behavior
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, including the first (default 3)
    pub max_attempts: u32,
    /// Backoff unit; attempt `n` (0-indexed) waits `unit * 2^n`
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Create a policy
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    /// Delay after the failed attempt `attempt` (0-indexed)
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        self.base_delay
            .saturating_mul(2u32.saturating_pow(attempt))
    }
}

/// Run `operation` until it succeeds or the policy is spent.
///
/// `attempts` is incremented once per call of `operation`, whether it fails
/// or not. Exhaustion yields [`AgentError::ModelApi`] wrapping the last error.
pub async fn with_retry<F, Fut, T>(
    policy: &RetryPolicy,
    operation_name: &str,
    attempts: &mut u32,
    mut operation: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt = 0;

    loop {
        *attempts += 1;
        match operation().await {
            Ok(result) => return Ok(result),
            Err(err) => {
                warn!(
                    operation = operation_name,
                    attempt = attempt + 1,
                    max = policy.max_attempts,
                    err = %err,
                    "call attempt failed"
                );

                if attempt + 1 >= policy.max_attempts {
                    return Err(AgentError::model_api(policy.max_attempts, err));
                }

                let delay = policy.delay_for_attempt(attempt);
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn fast_policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy::new(max_attempts, Duration::from_millis(1))
    }

    #[test]
    fn delay_exponential_backoff() {
        let policy = RetryPolicy::default();

        assert_eq!(policy.delay_for_attempt(0), Duration::from_secs(1));
        assert_eq!(policy.delay_for_attempt(1), Duration::from_secs(2));
        assert_eq!(policy.delay_for_attempt(2), Duration::from_secs(4));
    }

    #[test]
    fn zero_attempts_clamped_to_one() {
        assert_eq!(RetryPolicy::new(0, Duration::ZERO).max_attempts, 1);
    }

    #[tokio::test]
    async fn retry_succeeds_after_failures() {
        let call_count = Arc::new(AtomicU32::new(0));
        let mut attempts = 0;

        let counter = call_count.clone();
        let result = with_retry(&fast_policy(3), "test", &mut attempts, || {
            let counter = counter.clone();
            async move {
                let n = counter.fetch_add(1, Ordering::SeqCst);
                if n < 2 {
                    Err(AgentError::provider("transient error"))
                } else {
                    Ok(42)
                }
            }
        })
        .await;

        tokio_test::assert_ok!(&result);
        assert_eq!(result.unwrap(), 42);
        assert_eq!(call_count.load(Ordering::SeqCst), 3);
        assert_eq!(attempts, 3);
    }

    #[tokio::test]
    async fn retry_exhausted() {
        let mut attempts = 0;

        let result: Result<i32> = with_retry(&fast_policy(3), "test", &mut attempts, || async {
            Err(AgentError::provider("always fails"))
        })
        .await;

        match result {
            Err(AgentError::ModelApi { attempts: n, source }) => {
                assert_eq!(n, 3);
                assert!(source.to_string().contains("always fails"));
            }
            other => panic!("expected ModelApi error, got {:?}", other),
        }
        assert_eq!(attempts, 3);
    }

    #[tokio::test]
    async fn first_success_short_circuits() {
        let mut attempts = 0;
        let result = with_retry(&fast_policy(5), "test", &mut attempts, || async { Ok("ok") }).await;
        assert_eq!(result.unwrap(), "ok");
        assert_eq!(attempts, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn no_sleep_after_final_attempt() {
        let policy = RetryPolicy::new(3, Duration::from_secs(1));
        let mut attempts = 0;
        let start = tokio::time::Instant::now();

        let result: Result<()> = with_retry(&policy, "test", &mut attempts, || async {
            Err(AgentError::provider("down"))
        })
        .await;

        // 1s after the first failure, 2s after the second, nothing after the third
        let elapsed = start.elapsed();
        assert!(result.is_err());
        assert_eq!(attempts, 3);
        assert!(elapsed >= Duration::from_secs(3), "elapsed {:?}", elapsed);
        assert!(elapsed < Duration::from_secs(4), "elapsed {:?}", elapsed);
    }
}
