//! Classification outcomes returned by the remote endpoint.

use serde::{Deserialize, Serialize};

use crate::error_kind::ErrorKind;

/// Outcome of one classification round trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationResult {
    /// The endpoint returned a result body (interpreted as UTF-8 text)
    Success(String),
    /// The round trip failed
    Failure {
        kind: ErrorKind,
        message: String,
    },
}

impl ClassificationResult {
    /// Build a failure from a kind, using its standard user message.
    pub fn failure(kind: ErrorKind) -> Self {
        Self::Failure {
            message: kind.user_message(),
            kind,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ClassificationResult::Success(_))
    }

    /// The successful result label, if any.
    pub fn label(&self) -> Option<&str> {
        match self {
            ClassificationResult::Success(label) => Some(label),
            ClassificationResult::Failure { .. } => None,
        }
    }

    /// The failure kind, if any.
    pub fn error_kind(&self) -> Option<ErrorKind> {
        match self {
            ClassificationResult::Success(_) => None,
            ClassificationResult::Failure { kind, .. } => Some(*kind),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_accessors() {
        let result = ClassificationResult::Success("healthy".into());
        assert!(result.is_success());
        assert_eq!(result.label(), Some("healthy"));
        assert_eq!(result.error_kind(), None);
    }

    #[test]
    fn test_failure_carries_kind_and_message() {
        let result = ClassificationResult::failure(ErrorKind::Timeout);
        assert!(!result.is_success());
        assert_eq!(result.error_kind(), Some(ErrorKind::Timeout));
        match result {
            ClassificationResult::Failure { message, .. } => assert!(!message.is_empty()),
            _ => unreachable!(),
        }
    }
}
