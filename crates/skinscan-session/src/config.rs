//! Session controller configuration.

use std::time::Duration;

/// Session controller configuration.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Backstop deadline for the upload phase.
    ///
    /// The classifier enforces its own request timeout; this bound
    /// guarantees the controller leaves `Uploading` even against an
    /// implementation that never resolves.
    pub upload_deadline: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            upload_deadline: Duration::from_secs(60),
        }
    }
}

impl SessionConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            upload_deadline: Duration::from_secs(
                std::env::var("SKINSCAN_UPLOAD_DEADLINE_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(60),
            ),
        }
    }
}
