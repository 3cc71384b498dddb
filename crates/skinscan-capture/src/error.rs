//! Capture error types.

use thiserror::Error;

use skinscan_models::ErrorKind;

/// Result type for capture operations.
pub type CaptureResult<T> = Result<T, CaptureError>;

/// Errors that can occur while operating the camera.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("No camera device available: {0}")]
    DeviceUnavailable(String),

    #[error("A capture is already outstanding")]
    Busy,

    #[error("Capture requested before the session was opened")]
    NotOpen,

    #[error("Capture failed: {0}")]
    Failed(String),
}

impl CaptureError {
    pub fn device_unavailable(msg: impl Into<String>) -> Self {
        Self::DeviceUnavailable(msg.into())
    }

    pub fn failed(msg: impl Into<String>) -> Self {
        Self::Failed(msg.into())
    }

    /// Map into the shared workflow failure taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CaptureError::DeviceUnavailable(_) => ErrorKind::DeviceUnavailable,
            CaptureError::Busy => ErrorKind::CaptureBusy,
            CaptureError::NotOpen | CaptureError::Failed(_) => ErrorKind::CaptureError,
        }
    }
}
