// Retry-on-429 with linearly growing waits.
//
// Only HTTP 429 is retried. Every other failure is returned to the caller on
// the first attempt.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::error::{ApiError, ApiResult};

/// How many times to try a rate-limited request and how long to wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one.
    pub max_attempts: u32,
    /// Wait after the first 429; the wait after attempt `n` is `base_delay * n`.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            max_attempts: 5,
            base_delay: Duration::from_millis(2000),
        }
    }
}

impl RetryPolicy {
    /// Wait before retrying after `attempt` (1-based) was rate limited.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay * attempt
    }
}

/// Run `op` until it returns something other than a 429, or until the
/// policy's attempt budget is spent.
///
/// Exhausting the budget yields [`ApiError::RateLimited`].
pub async fn with_rate_limit_retry<T, F, Fut>(
    policy: &RetryPolicy,
    label: &str,
    mut op: F,
) -> ApiResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ApiResult<T>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;
    loop {
        match op().await {
            Err(err) if err.is_rate_limited() => {
                if attempt >= max_attempts {
                    warn!(attempt, "{label}: still rate limited, giving up");
                    return Err(ApiError::RateLimited { attempts: attempt });
                }
                let delay = policy.delay_for(attempt);
                warn!(
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    "{label}: rate limited, retrying"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            other => return other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use tokio::time::Instant;

    fn too_many() -> ApiError {
        ApiError::Status {
            status: 429,
            url: "http://test/stats".into(),
        }
    }

    #[test]
    fn delays_grow_linearly() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(1), Duration::from_millis(2000));
        assert_eq!(policy.delay_for(2), Duration::from_millis(4000));
        assert_eq!(policy.delay_for(4), Duration::from_millis(8000));
    }

    #[tokio::test(start_paused = true)]
    async fn persistent_429_exhausts_attempts_with_increasing_waits() {
        let policy = RetryPolicy::default();
        let calls: Arc<Mutex<Vec<Instant>>> = Arc::new(Mutex::new(Vec::new()));

        let result: ApiResult<()> = with_rate_limit_retry(&policy, "test", || {
            let calls = Arc::clone(&calls);
            async move {
                calls.lock().unwrap().push(Instant::now());
                Err(too_many())
            }
        })
        .await;

        match result {
            Err(ApiError::RateLimited { attempts }) => assert_eq!(attempts, 5),
            other => panic!("expected RateLimited, got {other:?}"),
        }

        let calls = calls.lock().unwrap();
        assert_eq!(calls.len(), 5);
        let gaps: Vec<Duration> = calls.windows(2).map(|w| w[1] - w[0]).collect();
        assert_eq!(gaps.len(), 4);
        for pair in gaps.windows(2) {
            assert!(pair[1] > pair[0], "waits must strictly increase: {gaps:?}");
        }
        assert!(gaps[0] >= Duration::from_millis(2000));
        assert!(gaps[3] >= Duration::from_millis(8000));
    }

    #[tokio::test(start_paused = true)]
    async fn recovers_after_transient_429() {
        let policy = RetryPolicy::default();
        let count = Arc::new(Mutex::new(0u32));

        let result = with_rate_limit_retry(&policy, "test", || {
            let count = Arc::clone(&count);
            async move {
                let mut n = count.lock().unwrap();
                *n += 1;
                if *n < 3 {
                    Err(too_many())
                } else {
                    Ok(*n)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn other_errors_are_not_retried() {
        let policy = RetryPolicy::default();
        let count = Arc::new(Mutex::new(0u32));

        let result: ApiResult<()> = with_rate_limit_retry(&policy, "test", || {
            let count = Arc::clone(&count);
            async move {
                *count.lock().unwrap() += 1;
                Err(ApiError::Status {
                    status: 500,
                    url: "http://test/stats".into(),
                })
            }
        })
        .await;

        assert!(matches!(result, Err(ApiError::Status { status: 500, .. })));
        assert_eq!(*count.lock().unwrap(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn single_attempt_policy_fails_immediately() {
        let policy = RetryPolicy {
            max_attempts: 1,
            base_delay: Duration::from_secs(60),
        };
        let start = Instant::now();
        let result: ApiResult<()> =
            with_rate_limit_retry(&policy, "test", || async { Err(too_many()) }).await;
        assert!(matches!(result, Err(ApiError::RateLimited { attempts: 1 })));
        assert!(start.elapsed() < Duration::from_secs(1));
    }
}
