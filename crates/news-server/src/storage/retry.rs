//! Bounded retry with a fixed delay between attempts

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// How often, and how patiently, to retry an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

/// Returned when every attempt failed.
#[derive(Debug)]
pub struct Exhausted<E> {
    pub attempts: u32,
    pub last_error: E,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            delay: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }

    /// Run `op` until it succeeds or the attempt budget is spent.
    ///
    /// `op` receives the 1-based attempt number. The delay is an async sleep,
    /// so the worker thread is free while waiting.
    pub async fn run<T, E, F, Fut>(&self, mut op: F) -> Result<T, Exhausted<E>>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match op(attempt).await {
                Ok(value) => return Ok(value),
                Err(e) if attempt >= max_attempts => {
                    return Err(Exhausted {
                        attempts: attempt,
                        last_error: e,
                    });
                }
                Err(e) => {
                    warn!(
                        "Attempt {}/{} failed: {}; retrying in {:?}",
                        attempt, max_attempts, e, self.delay
                    );
                    tokio::time::sleep(self.delay).await;
                    attempt += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn test_succeeds_after_failures() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::new(5, Duration::ZERO);

        let result = policy
            .run(|attempt| {
                calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if attempt < 3 {
                        Err(format!("attempt {} refused", attempt))
                    } else {
                        Ok(attempt)
                    }
                }
            })
            .await;

        assert_eq!(result.unwrap(), 3);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_exhausts_budget() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::new(4, Duration::ZERO);

        let result: Result<(), _> = policy
            .run(|attempt| {
                calls.fetch_add(1, Ordering::SeqCst);
                async move { Err(format!("attempt {} refused", attempt)) }
            })
            .await;

        let exhausted = result.unwrap_err();
        assert_eq!(exhausted.attempts, 4);
        assert_eq!(exhausted.last_error, "attempt 4 refused");
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_zero_attempts_still_tries_once() {
        let policy = RetryPolicy::new(0, Duration::ZERO);
        let result: Result<(), _> = policy.run(|_| async { Err("down") }).await;
        assert_eq!(result.unwrap_err().attempts, 1);
    }

    #[test]
    fn test_default_budget() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 5);
        assert_eq!(policy.delay, Duration::from_secs(5));
    }
}
