//! Camera session lifecycle and the capture interface.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use skinscan_models::RawImage;

use crate::error::CaptureResult;

/// The active camera binding.
///
/// Owned exclusively by the [`ImageCapture`] implementation; created
/// lazily on the first capture request and destroyed on teardown or an
/// explicit stop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureSession {
    /// Platform identifier of the bound device
    pub device_id: String,
    /// Whether the session is currently open
    pub open: bool,
    /// When the session was opened
    pub opened_at: DateTime<Utc>,
}

impl CaptureSession {
    /// Create an open session bound to a device.
    pub fn open(device_id: impl Into<String>) -> Self {
        Self {
            device_id: device_id.into(),
            open: true,
            opened_at: Utc::now(),
        }
    }

    /// Mark the session closed. Idempotent.
    pub fn close(&mut self) {
        self.open = false;
    }
}

/// Fronts the platform camera subsystem.
///
/// Implementations own the single [`CaptureSession`] and must uphold:
/// - `open` fails when no camera enumerates, and is idempotent once
///   a session exists
/// - `capture` delivers exactly one frame per call, fails when called
///   before `open` succeeds, and fails busy while a prior capture is
///   outstanding
/// - `close` is idempotent and tears down any in-flight capture
#[async_trait]
pub trait ImageCapture: Send + Sync {
    /// Open the capture session.
    async fn open(&self) -> CaptureResult<()>;

    /// Trigger one capture and wait for its frame.
    async fn capture(&self) -> CaptureResult<RawImage>;

    /// Release the session.
    async fn close(&self);

    /// The current session, if one is open.
    fn session(&self) -> Option<CaptureSession>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_close_is_idempotent() {
        let mut session = CaptureSession::open("cam0");
        assert!(session.open);
        session.close();
        assert!(!session.open);
        session.close();
        assert!(!session.open);
        assert_eq!(session.device_id, "cam0");
    }
}
