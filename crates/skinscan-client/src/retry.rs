//! Retry loop with exponential backoff.

use std::time::Duration;

use tracing::warn;

use crate::config::ClassifierConfig;
use crate::error::ClassifierResult;

/// Execute an async operation, retrying transient failures.
///
/// Runs at most `1 + config.max_retries` attempts. Only errors whose
/// `is_retryable()` is true are retried; backoff doubles from
/// `retry_base_delay_ms` and is capped at `retry_max_delay_ms`.
pub async fn with_retry<T, F, Fut>(
    config: &ClassifierConfig,
    operation: &str,
    op: F,
) -> ClassifierResult<T>
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = ClassifierResult<T>>,
{
    let mut attempt = 0;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_retryable() && attempt < config.max_retries => {
                let delay = backoff_delay(config, attempt);
                warn!(
                    operation = %operation,
                    attempt = attempt + 1,
                    delay_ms = delay.as_millis() as u64,
                    "classification attempt failed, retrying: {}",
                    e
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Exponential backoff capped at the configured maximum.
fn backoff_delay(config: &ClassifierConfig, attempt: u32) -> Duration {
    let exp = config
        .retry_base_delay_ms
        .saturating_mul(1u64 << attempt.min(16));
    Duration::from_millis(exp.min(config.retry_max_delay_ms))
}
