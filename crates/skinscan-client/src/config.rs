//! Classifier configuration.

use std::time::Duration;

/// Remote classifier configuration.
///
/// The endpoint and deadline are always injected; nothing is
/// hardcoded. Retries default to off (one attempt per user-triggered
/// capture) and are an explicit configuration choice.
#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    /// Classification endpoint URL
    pub endpoint: String,
    /// Deadline for the whole round trip
    pub request_timeout: Duration,
    /// Extra attempts after the first failure (0 = single attempt)
    pub max_retries: u32,
    /// Base delay for exponential backoff (in milliseconds)
    pub retry_base_delay_ms: u64,
    /// Maximum backoff delay cap (in milliseconds)
    pub retry_max_delay_ms: u64,
}

impl ClassifierConfig {
    /// Create a config for an endpoint with default timing.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            request_timeout: Duration::from_secs(30),
            max_retries: 0,
            retry_base_delay_ms: 100,
            retry_max_delay_ms: 5000,
        }
    }

    /// Create config from environment variables.
    ///
    /// `SKINSCAN_ENDPOINT` is required; the rest fall back to defaults.
    pub fn from_env() -> Option<Self> {
        let endpoint = std::env::var("SKINSCAN_ENDPOINT").ok()?;
        let mut config = Self::new(endpoint);
        config.request_timeout = Duration::from_secs(
            std::env::var("SKINSCAN_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
        );
        config.max_retries = std::env::var("SKINSCAN_MAX_RETRIES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(0);
        config.retry_base_delay_ms = std::env::var("SKINSCAN_RETRY_BASE_MS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(100);
        config.retry_max_delay_ms = std::env::var("SKINSCAN_RETRY_MAX_MS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(5000);
        Some(config)
    }

    /// Override the round-trip deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Enable retries for transient failures.
    pub fn with_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_single_attempt() {
        let config = ClassifierConfig::new("http://localhost:8000/classify");
        assert_eq!(config.max_retries, 0);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_builder_overrides() {
        let config = ClassifierConfig::new("http://localhost:8000/classify")
            .with_timeout(Duration::from_millis(250))
            .with_retries(2);
        assert_eq!(config.request_timeout, Duration::from_millis(250));
        assert_eq!(config.max_retries, 2);
    }
}
