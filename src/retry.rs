use std::time::Duration;

use tracing::warn;

/// Retry policy for provider calls. Only transient failures (timeouts,
/// connection errors, rate limits, 5xx) are retried; everything else is
/// fatal to the run.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub initial_delay: Duration,
    pub backoff_factor: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        // One automatic retry with backoff
        Self {
            max_retries: 1,
            initial_delay: Duration::from_secs(1),
            backoff_factor: 2.0,
        }
    }
}

/// Run an async operation under the policy, retrying transient errors
pub async fn with_retry<T, E, Fut>(
    policy: &RetryPolicy,
    op: &str,
    is_transient: impl Fn(&E) -> bool,
    mut call: impl FnMut() -> Fut,
) -> Result<T, E>
where
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let mut delay = policy.initial_delay;

    for attempt in 0..=policy.max_retries {
        match call().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt < policy.max_retries && is_transient(&e) => {
                warn!(op, attempt = attempt + 1, delay_ms = delay.as_millis() as u64,
                      "transient failure, retrying: {e}");
                tokio::time::sleep(delay).await;
                delay = Duration::from_secs_f64(delay.as_secs_f64() * policy.backoff_factor);
            }
            Err(e) => return Err(e),
        }
    }

    unreachable!("retry loop always returns")
}
