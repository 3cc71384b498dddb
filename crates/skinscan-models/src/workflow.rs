//! Workflow state published by the session controller.
//!
//! The controller owns exactly one [`WorkflowState`] value at any
//! time; transitions are the only way it changes, and the presentation
//! layer observes them through [`WorkflowSnapshot`] values.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::classification::ClassificationResult;
use crate::error_kind::ErrorKind;

/// Unique identifier for one capture attempt.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttemptId(pub String);

impl AttemptId {
    /// Generate a new random attempt ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for AttemptId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AttemptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Current phase of the capture-to-result flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowState {
    /// No attempt in flight; a capture request is accepted from here
    #[default]
    Idle,
    /// Waiting for the user/platform to answer the camera prompt
    AwaitingPermission,
    /// Waiting for the camera to deliver a frame
    Capturing,
    /// Converting the raw frame into a transport payload
    Encoding,
    /// Network round trip to the classification endpoint in flight
    Uploading,
    /// The attempt finished with a result; requires an explicit reset
    ResultReady(ClassificationResult),
    /// The attempt failed; requires an explicit reset
    Failed(ErrorKind),
}

impl WorkflowState {
    /// Phase name for logging and display.
    pub fn phase(&self) -> &'static str {
        match self {
            WorkflowState::Idle => "idle",
            WorkflowState::AwaitingPermission => "awaiting_permission",
            WorkflowState::Capturing => "capturing",
            WorkflowState::Encoding => "encoding",
            WorkflowState::Uploading => "uploading",
            WorkflowState::ResultReady(_) => "result_ready",
            WorkflowState::Failed(_) => "failed",
        }
    }

    /// Whether an attempt is currently in flight.
    pub fn is_busy(&self) -> bool {
        matches!(
            self,
            WorkflowState::AwaitingPermission
                | WorkflowState::Capturing
                | WorkflowState::Encoding
                | WorkflowState::Uploading
        )
    }

    /// Whether this is a terminal state for the attempt (reset required).
    pub fn is_terminal(&self) -> bool {
        matches!(self, WorkflowState::ResultReady(_) | WorkflowState::Failed(_))
    }

    /// Whether a new capture request would be accepted.
    pub fn accepts_capture(&self) -> bool {
        matches!(self, WorkflowState::Idle)
    }
}

impl fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.phase())
    }
}

/// Snapshot of the workflow as observed by subscribers.
///
/// Published on every transition. `event_seq` increases monotonically
/// so observers can detect missed intermediate states.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowSnapshot {
    /// Attempt the snapshot belongs to, if one has started
    pub attempt_id: Option<AttemptId>,
    /// Current workflow state
    pub state: WorkflowState,
    /// When the controller was created or last reset
    pub started_at: DateTime<Utc>,
    /// When the state last changed
    pub updated_at: DateTime<Utc>,
    /// Sequence number for event ordering (monotonically increasing)
    pub event_seq: u64,
}

impl WorkflowSnapshot {
    /// Create the initial idle snapshot.
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            attempt_id: None,
            state: WorkflowState::Idle,
            started_at: now,
            updated_at: now,
            event_seq: 0,
        }
    }

    /// Apply a transition, bumping the sequence number.
    pub fn transition(&mut self, attempt_id: Option<AttemptId>, state: WorkflowState) {
        self.attempt_id = attempt_id;
        self.state = state;
        self.updated_at = Utc::now();
        self.event_seq += 1;
    }
}

impl Default for WorkflowSnapshot {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_predicates() {
        assert!(WorkflowState::Idle.accepts_capture());
        assert!(!WorkflowState::Idle.is_busy());
        assert!(!WorkflowState::Idle.is_terminal());

        for busy in [
            WorkflowState::AwaitingPermission,
            WorkflowState::Capturing,
            WorkflowState::Encoding,
            WorkflowState::Uploading,
        ] {
            assert!(busy.is_busy(), "{} should be busy", busy.phase());
            assert!(!busy.accepts_capture());
            assert!(!busy.is_terminal());
        }

        let done = WorkflowState::ResultReady(ClassificationResult::Success("healthy".into()));
        assert!(done.is_terminal());
        assert!(!done.accepts_capture());

        let failed = WorkflowState::Failed(ErrorKind::Timeout);
        assert!(failed.is_terminal());
        assert!(!failed.is_busy());
    }

    #[test]
    fn test_snapshot_sequence_increases() {
        let mut snapshot = WorkflowSnapshot::new();
        assert_eq!(snapshot.event_seq, 0);
        assert_eq!(snapshot.state, WorkflowState::Idle);

        let attempt = AttemptId::new();
        snapshot.transition(Some(attempt.clone()), WorkflowState::Capturing);
        assert_eq!(snapshot.event_seq, 1);
        assert_eq!(snapshot.attempt_id, Some(attempt));

        snapshot.transition(None, WorkflowState::Idle);
        assert_eq!(snapshot.event_seq, 2);
        assert_eq!(snapshot.attempt_id, None);
    }
}
