//! Failure taxonomy shared across the workflow.
//!
//! Every failure a lower component can produce maps into exactly one
//! of these kinds, so the presentation layer can always render a
//! distinct, human-readable message rather than a generic "error".

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of failure that ended a capture attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The camera capability was denied by the user or platform
    PermissionDenied,
    /// No camera device enumerates
    DeviceUnavailable,
    /// A capture was requested while a prior capture was outstanding
    CaptureBusy,
    /// The camera failed to deliver a frame
    CaptureError,
    /// The captured pixel format is outside the codec's supported set
    UnsupportedFormat,
    /// Encoding failed for a reason other than the pixel format
    EncodeError,
    /// A connection to the classification endpoint could not be established
    NetworkUnreachable,
    /// The endpoint responded with a non-success HTTP status
    ServerError(u16),
    /// No response arrived within the configured deadline
    Timeout,
    /// The response body could not be interpreted as a result
    MalformedResponse,
}

impl ErrorKind {
    /// Get string representation of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::PermissionDenied => "permission_denied",
            ErrorKind::DeviceUnavailable => "device_unavailable",
            ErrorKind::CaptureBusy => "capture_busy",
            ErrorKind::CaptureError => "capture_error",
            ErrorKind::UnsupportedFormat => "unsupported_format",
            ErrorKind::EncodeError => "encode_error",
            ErrorKind::NetworkUnreachable => "network_unreachable",
            ErrorKind::ServerError(_) => "server_error",
            ErrorKind::Timeout => "timeout",
            ErrorKind::MalformedResponse => "malformed_response",
        }
    }

    /// Human-readable message suitable for direct display.
    pub fn user_message(&self) -> String {
        match self {
            ErrorKind::PermissionDenied => {
                "Camera permission was not granted. Enable it in settings and try again.".into()
            }
            ErrorKind::DeviceUnavailable => "No camera was found on this device.".into(),
            ErrorKind::CaptureBusy => "A capture is already in progress.".into(),
            ErrorKind::CaptureError => "The camera failed to take a photo. Please try again.".into(),
            ErrorKind::UnsupportedFormat => {
                "The camera produced an image format this app cannot process.".into()
            }
            ErrorKind::EncodeError => "The photo could not be prepared for upload.".into(),
            ErrorKind::NetworkUnreachable => {
                "Could not reach the analysis server. Check your connection.".into()
            }
            ErrorKind::ServerError(status) => {
                format!("The analysis server returned an error (HTTP {}).", status)
            }
            ErrorKind::Timeout => "The analysis server took too long to respond.".into(),
            ErrorKind::MalformedResponse => {
                "The analysis server sent a response this app could not read.".into()
            }
        }
    }

    /// Whether this failure came from the network round trip.
    pub fn is_network(&self) -> bool {
        matches!(
            self,
            ErrorKind::NetworkUnreachable
                | ErrorKind::ServerError(_)
                | ErrorKind::Timeout
                | ErrorKind::MalformedResponse
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::ServerError(status) => write!(f, "server_error({})", status),
            other => write!(f, "{}", other.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_kind_has_distinct_user_message() {
        let kinds = [
            ErrorKind::PermissionDenied,
            ErrorKind::DeviceUnavailable,
            ErrorKind::CaptureBusy,
            ErrorKind::CaptureError,
            ErrorKind::UnsupportedFormat,
            ErrorKind::EncodeError,
            ErrorKind::NetworkUnreachable,
            ErrorKind::ServerError(500),
            ErrorKind::Timeout,
            ErrorKind::MalformedResponse,
        ];
        let mut messages: Vec<String> = kinds.iter().map(|k| k.user_message()).collect();
        messages.sort();
        messages.dedup();
        assert_eq!(messages.len(), kinds.len());
    }

    #[test]
    fn test_server_error_display_includes_status() {
        assert_eq!(ErrorKind::ServerError(500).to_string(), "server_error(500)");
        assert_eq!(ErrorKind::Timeout.to_string(), "timeout");
    }

    #[test]
    fn test_serde_representation() {
        assert_eq!(serde_json::to_string(&ErrorKind::Timeout).unwrap(), "\"timeout\"");
        assert_eq!(
            serde_json::to_string(&ErrorKind::ServerError(500)).unwrap(),
            "{\"server_error\":500}"
        );
        let kind: ErrorKind = serde_json::from_str("\"permission_denied\"").unwrap();
        assert_eq!(kind, ErrorKind::PermissionDenied);
    }

    #[test]
    fn test_network_classification() {
        assert!(ErrorKind::Timeout.is_network());
        assert!(ErrorKind::ServerError(502).is_network());
        assert!(!ErrorKind::PermissionDenied.is_network());
        assert!(!ErrorKind::CaptureError.is_network());
    }
}
