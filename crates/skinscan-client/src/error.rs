//! Classifier error types.

use thiserror::Error;

use skinscan_models::ErrorKind;

/// Result type for classifier operations.
pub type ClassifierResult<T> = Result<T, ClassifierError>;

/// Errors that can occur during a classification round trip.
#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("Could not reach the endpoint: {0}")]
    NetworkUnreachable(String),

    #[error("Endpoint returned HTTP {0}")]
    ServerError(u16),

    #[error("No response within the configured deadline")]
    Timeout,

    #[error("Response body could not be interpreted: {0}")]
    MalformedResponse(String),
}

impl ClassifierError {
    pub fn invalid_endpoint(msg: impl Into<String>) -> Self {
        Self::InvalidEndpoint(msg.into())
    }

    pub fn network_unreachable(msg: impl Into<String>) -> Self {
        Self::NetworkUnreachable(msg.into())
    }

    pub fn malformed_response(msg: impl Into<String>) -> Self {
        Self::MalformedResponse(msg.into())
    }

    /// Map into the shared workflow failure taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClassifierError::InvalidEndpoint(_) => ErrorKind::NetworkUnreachable,
            ClassifierError::NetworkUnreachable(_) => ErrorKind::NetworkUnreachable,
            ClassifierError::ServerError(status) => ErrorKind::ServerError(*status),
            ClassifierError::Timeout => ErrorKind::Timeout,
            ClassifierError::MalformedResponse(_) => ErrorKind::MalformedResponse,
        }
    }

    /// Whether a retry could plausibly succeed.
    ///
    /// Connection failures, timeouts, and 5xx responses are transient;
    /// 4xx responses and unreadable bodies are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            ClassifierError::NetworkUnreachable(_) | ClassifierError::Timeout => true,
            ClassifierError::ServerError(status) => *status >= 500,
            _ => false,
        }
    }
}
