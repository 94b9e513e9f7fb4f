use log::{debug, warn};
use rand::Rng;
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            max_retries: 3,
            base_delay: Duration::from_millis(1000),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, base_delay: Duration) -> Self {
        RetryPolicy {
            max_retries,
            base_delay,
        }
    }

    /// `base * 2^attempt`, without jitter. `attempt` is 0 for the first retry.
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(2u32.saturating_pow(attempt))
    }

    fn delay_with_jitter(&self, attempt: u32) -> Duration {
        let base_ms = self.base_delay.as_millis() as u64;
        let jitter = if base_ms == 0 {
            0
        } else {
            rand::thread_rng().gen_range(0..base_ms)
        };
        self.backoff(attempt) + Duration::from_millis(jitter)
    }
}

/// Runs `operation` until it succeeds or `policy.max_retries` retries are spent.
/// The error from the final attempt is returned unchanged.
pub async fn retry_operation<T, E, F, Fut>(policy: RetryPolicy, mut operation: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let mut attempt = 0;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt < policy.max_retries => {
                let delay = policy.delay_with_jitter(attempt);
                warn!(
                    "Attempt {} failed: {}. Retrying in {}ms",
                    attempt + 1,
                    e,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => {
                debug!("Giving up after {} attempts", attempt + 1);
                return Err(e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles_per_attempt() {
        let policy = RetryPolicy::new(5, Duration::from_millis(100));
        assert_eq!(policy.backoff(0), Duration::from_millis(100));
        assert_eq!(policy.backoff(1), Duration::from_millis(200));
        assert_eq!(policy.backoff(3), Duration::from_millis(800));
    }

    #[test]
    fn jitter_stays_below_one_base_delay() {
        let policy = RetryPolicy::new(3, Duration::from_millis(50));
        for attempt in 0..3 {
            let delay = policy.delay_with_jitter(attempt);
            assert!(delay >= policy.backoff(attempt));
            assert!(delay < policy.backoff(attempt) + policy.base_delay);
        }
    }

    #[test]
    fn zero_base_delay_has_no_jitter() {
        let policy = RetryPolicy::new(1, Duration::ZERO);
        assert_eq!(policy.delay_with_jitter(0), Duration::ZERO);
    }
}
