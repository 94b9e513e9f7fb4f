use super::init_logger;
use crate::core::retry::{RetryPolicy, retry_operation};
use std::time::Duration;
use tokio::time::Instant;

#[tokio::test(start_paused = true)]
async fn succeeds_on_the_third_attempt() {
    init_logger();
    let policy = RetryPolicy::new(3, Duration::from_millis(100));
    let mut calls = 0;
    let started = Instant::now();

    let result: Result<&str, String> = retry_operation(policy, || {
        calls += 1;
        let attempt = calls;
        async move {
            if attempt < 3 {
                Err(format!("attempt {} failed", attempt))
            } else {
                Ok("saved")
            }
        }
    })
    .await;

    assert_eq!(result, Ok("saved"));
    assert_eq!(calls, 3);
    // 100ms + 200ms of backoff, plus under 100ms of jitter per retry
    let waited = started.elapsed();
    assert!(waited >= Duration::from_millis(300));
    assert!(waited < Duration::from_millis(500));
}

#[tokio::test(start_paused = true)]
async fn gives_up_after_max_retries_with_the_last_error() {
    init_logger();
    let policy = RetryPolicy::new(2, Duration::from_millis(50));
    let mut calls = 0;

    let result: Result<(), String> = retry_operation(policy, || {
        calls += 1;
        let attempt = calls;
        async move { Err(format!("attempt {} failed", attempt)) }
    })
    .await;

    assert_eq!(calls, 3);
    assert_eq!(result, Err("attempt 3 failed".to_string()));
}

#[tokio::test(start_paused = true)]
async fn immediate_success_does_not_sleep() {
    let started = Instant::now();
    let mut calls = 0;
    let result: Result<u32, String> = retry_operation(RetryPolicy::default(), || {
        calls += 1;
        async { Ok(7) }
    })
    .await;

    assert_eq!(result, Ok(7));
    assert_eq!(calls, 1);
    assert_eq!(started.elapsed(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn zero_retries_means_a_single_attempt() {
    let mut calls = 0;
    let result: Result<(), String> = retry_operation(RetryPolicy::new(0, Duration::from_millis(10)), || {
        calls += 1;
        async { Err("nope".to_string()) }
    })
    .await;

    assert_eq!(calls, 1);
    assert!(result.is_err());
}
