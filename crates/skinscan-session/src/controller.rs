//! The workflow state machine.

use std::sync::{Arc, Mutex};

use chrono::Utc;
use tokio::sync::watch;
use tracing::{debug, info, info_span, warn, Instrument};

use skinscan_capture::{Capability, ImageCapture, PermissionGate};
use skinscan_client::Classifier;
use skinscan_codec::ImageCodec;
use skinscan_models::{
    AttemptId, ClassificationResult, EncodedPayload, ErrorKind, RawImage, WorkflowSnapshot,
    WorkflowState,
};

use crate::config::SessionConfig;

/// Drives the capture -> encode -> upload -> result flow.
///
/// Owns the single [`WorkflowState`] value. Transitions are applied
/// under one lock in the order their triggering events are observed,
/// and every transition is published to subscribers. At most one
/// capture attempt is in flight; a request while busy is rejected, not
/// queued. Completions from an abandoned attempt (after a reset or
/// shutdown) are discarded.
#[derive(Clone)]
pub struct SessionController {
    inner: Arc<Inner>,
}

struct Inner {
    config: SessionConfig,
    gate: Arc<dyn PermissionGate>,
    camera: Arc<dyn ImageCapture>,
    codec: ImageCodec,
    classifier: Arc<dyn Classifier>,
    shared: Mutex<Shared>,
    publisher: watch::Sender<WorkflowSnapshot>,
}

struct Shared {
    snapshot: WorkflowSnapshot,
    /// Bumped on every accepted capture request, reset, and shutdown;
    /// a completion whose generation is no longer current is stale.
    generation: u64,
    /// Payload of the last successfully encoded capture, kept for
    /// preview redisplay.
    preview: Option<EncodedPayload>,
}

impl SessionController {
    /// Create a controller over the four collaborators.
    pub fn new(
        config: SessionConfig,
        gate: Arc<dyn PermissionGate>,
        camera: Arc<dyn ImageCapture>,
        codec: ImageCodec,
        classifier: Arc<dyn Classifier>,
    ) -> Self {
        let snapshot = WorkflowSnapshot::new();
        let (publisher, _) = watch::channel(snapshot.clone());
        Self {
            inner: Arc::new(Inner {
                config,
                gate,
                camera,
                codec,
                classifier,
                shared: Mutex::new(Shared {
                    snapshot,
                    generation: 0,
                    preview: None,
                }),
                publisher,
            }),
        }
    }

    /// Request a new capture attempt.
    ///
    /// Accepted only from `Idle`; any other state leaves the workflow
    /// untouched and returns `false`. On acceptance the transition out
    /// of `Idle` is applied before this returns, and the rest of the
    /// attempt runs on a spawned task. Must be called from within a
    /// tokio runtime.
    pub fn request_capture(&self) -> bool {
        let (generation, attempt_id, pre_granted) = {
            let mut shared = self.inner.shared.lock().expect("state lock poisoned");
            if !shared.snapshot.state.accepts_capture() {
                warn!(
                    state = shared.snapshot.state.phase(),
                    "capture request rejected while busy"
                );
                return false;
            }

            shared.generation += 1;
            let attempt_id = AttemptId::new();
            let pre_granted = self.inner.gate.check_granted(Capability::Camera);
            let next = if pre_granted {
                WorkflowState::Capturing
            } else {
                WorkflowState::AwaitingPermission
            };
            shared.snapshot.transition(Some(attempt_id.clone()), next);
            self.inner.publisher.send_replace(shared.snapshot.clone());
            (shared.generation, attempt_id, pre_granted)
        };

        info!(attempt_id = %attempt_id, pre_granted, "capture attempt started");
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            let span = info_span!("attempt", attempt_id = %attempt_id);
            inner
                .run_attempt(generation, attempt_id.clone(), pre_granted)
                .instrument(span)
                .await;
        });
        true
    }

    /// Return to `Idle`.
    ///
    /// From a terminal state this acknowledges the result; from an
    /// in-flight state it abandons the attempt (a network call that is
    /// already in flight completes, but its outcome is discarded).
    /// From `Idle` it is a no-op.
    pub fn reset(&self) {
        let mut shared = self.inner.shared.lock().expect("state lock poisoned");
        if matches!(shared.snapshot.state, WorkflowState::Idle) {
            debug!("reset ignored while idle");
            return;
        }
        info!(state = shared.snapshot.state.phase(), "workflow reset");
        shared.generation += 1;
        shared.snapshot.started_at = Utc::now();
        shared.snapshot.transition(None, WorkflowState::Idle);
        self.inner.publisher.send_replace(shared.snapshot.clone());
    }

    /// Abandon any in-flight attempt and release the camera session.
    pub async fn shutdown(&self) {
        self.reset();
        self.inner.camera.close().await;
        info!("session shut down");
    }

    /// Subscribe to workflow snapshots. The receiver always holds the
    /// latest published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<WorkflowSnapshot> {
        self.inner.publisher.subscribe()
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> WorkflowSnapshot {
        self.inner
            .shared
            .lock()
            .expect("state lock poisoned")
            .snapshot
            .clone()
    }

    /// Current workflow state.
    pub fn state(&self) -> WorkflowState {
        self.snapshot().state
    }

    /// Decode the most recently encoded capture for redisplay.
    ///
    /// Retained across resets until the next successful encode.
    pub fn last_preview(&self) -> Option<RawImage> {
        let payload = self
            .inner
            .shared
            .lock()
            .expect("state lock poisoned")
            .preview
            .clone()?;
        match self.inner.codec.decode(&payload) {
            Ok(image) => Some(image),
            Err(e) => {
                warn!("preview decode failed: {}", e);
                None
            }
        }
    }
}

impl Inner {
    async fn run_attempt(&self, generation: u64, attempt_id: AttemptId, pre_granted: bool) {
        if !pre_granted {
            if !self.gate.request(Capability::Camera).await {
                info!("camera permission denied");
                self.transition_if_current(
                    generation,
                    &attempt_id,
                    WorkflowState::Failed(ErrorKind::PermissionDenied),
                );
                return;
            }
            if !self.transition_if_current(generation, &attempt_id, WorkflowState::Capturing) {
                return;
            }
        }

        // Session opens lazily on the first capture request
        if let Err(e) = self.camera.open().await {
            warn!("camera open failed: {}", e);
            self.transition_if_current(generation, &attempt_id, WorkflowState::Failed(e.kind()));
            return;
        }

        let image = match self.camera.capture().await {
            Ok(image) => image,
            Err(e) => {
                warn!("capture failed: {}", e);
                self.transition_if_current(
                    generation,
                    &attempt_id,
                    WorkflowState::Failed(e.kind()),
                );
                return;
            }
        };

        if !self.transition_if_current(generation, &attempt_id, WorkflowState::Encoding) {
            return;
        }

        let payload = match self.codec.encode(&image) {
            Ok(payload) => payload,
            Err(e) => {
                warn!("encode failed: {}", e);
                self.transition_if_current(
                    generation,
                    &attempt_id,
                    WorkflowState::Failed(e.kind()),
                );
                return;
            }
        };
        self.store_preview(generation, payload.clone());

        if !self.transition_if_current(generation, &attempt_id, WorkflowState::Uploading) {
            return;
        }

        let outcome =
            tokio::time::timeout(self.config.upload_deadline, self.classifier.classify(&payload))
                .await;
        let next = match outcome {
            Ok(Ok(label)) => {
                WorkflowState::ResultReady(ClassificationResult::Success(label))
            }
            Ok(Err(e)) => {
                warn!("classification failed: {}", e);
                WorkflowState::Failed(e.kind())
            }
            Err(_) => {
                warn!(
                    deadline_secs = self.config.upload_deadline.as_secs(),
                    "upload deadline exceeded"
                );
                WorkflowState::Failed(ErrorKind::Timeout)
            }
        };
        self.transition_if_current(generation, &attempt_id, next);
    }

    /// Apply a transition unless the attempt has been abandoned.
    fn transition_if_current(
        &self,
        generation: u64,
        attempt_id: &AttemptId,
        state: WorkflowState,
    ) -> bool {
        let mut shared = self.shared.lock().expect("state lock poisoned");
        if shared.generation != generation {
            debug!(
                attempt_id = %attempt_id,
                discarded = state.phase(),
                "stale completion discarded"
            );
            return false;
        }
        debug!(attempt_id = %attempt_id, state = state.phase(), "transition");
        shared.snapshot.transition(Some(attempt_id.clone()), state);
        self.publisher.send_replace(shared.snapshot.clone());
        true
    }

    fn store_preview(&self, generation: u64, payload: EncodedPayload) {
        let mut shared = self.shared.lock().expect("state lock poisoned");
        if shared.generation == generation {
            shared.preview = Some(payload);
        }
    }
}
