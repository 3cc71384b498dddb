//! In-memory doubles for the capability traits.
//!
//! These stand in for the host platform's permission and camera
//! subsystems so the workflow can be exercised without hardware. They
//! are shipped in the crate proper (not behind `cfg(test)`) because
//! the session selfcheck binary drives the full pipeline through them.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use skinscan_models::RawImage;

use crate::camera::{CaptureSession, ImageCapture};
use crate::error::{CaptureError, CaptureResult};
use crate::permission::{Capability, PermissionGate};

/// Permission gate with a scripted answer.
#[derive(Debug)]
pub struct FixedGate {
    pre_granted: bool,
    prompt_answer: bool,
    prompts: AtomicU32,
}

impl FixedGate {
    /// Capability is already granted; no prompt is ever shown.
    pub fn granted() -> Self {
        Self {
            pre_granted: true,
            prompt_answer: true,
            prompts: AtomicU32::new(0),
        }
    }

    /// Capability is not granted and the prompt is answered with a denial.
    pub fn denied() -> Self {
        Self::prompt_grants(false)
    }

    /// Capability is not pre-granted; the prompt resolves to `answer`.
    pub fn prompt_grants(answer: bool) -> Self {
        Self {
            pre_granted: false,
            prompt_answer: answer,
            prompts: AtomicU32::new(0),
        }
    }

    /// How many times a prompt was shown.
    pub fn prompts_shown(&self) -> u32 {
        self.prompts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PermissionGate for FixedGate {
    fn check_granted(&self, _capability: Capability) -> bool {
        self.pre_granted
    }

    async fn request(&self, capability: Capability) -> bool {
        self.prompts.fetch_add(1, Ordering::SeqCst);
        debug!(capability = %capability, answer = self.prompt_answer, "fake permission prompt");
        self.prompt_answer
    }
}

/// What the fake camera delivers on the next capture.
#[derive(Debug)]
enum ScriptedCapture {
    Frame(RawImage),
    Fail(String),
}

/// Camera double with a scripted frame queue.
///
/// Captures pop frames in order; an empty queue fails the capture.
/// Counters expose how often each operation ran so tests can assert
/// the single-outstanding-capture and no-op-rejection properties.
#[derive(Debug)]
pub struct FakeCamera {
    devices: Vec<String>,
    session: Mutex<Option<CaptureSession>>,
    script: Mutex<VecDeque<ScriptedCapture>>,
    capture_delay: Option<Duration>,
    capturing: AtomicBool,
    opens: AtomicU32,
    captures: AtomicU32,
    closes: AtomicU32,
}

impl FakeCamera {
    /// A camera with one device and an empty frame script.
    pub fn new(device_id: impl Into<String>) -> Self {
        Self {
            devices: vec![device_id.into()],
            session: Mutex::new(None),
            script: Mutex::new(VecDeque::new()),
            capture_delay: None,
            capturing: AtomicBool::new(false),
            opens: AtomicU32::new(0),
            captures: AtomicU32::new(0),
            closes: AtomicU32::new(0),
        }
    }

    /// A host with no camera at all; `open` fails.
    pub fn no_devices() -> Self {
        Self {
            devices: Vec::new(),
            ..Self::new("unused")
        }
    }

    /// Queue a frame for a future capture.
    pub fn push_frame(&self, frame: RawImage) {
        self.script
            .lock()
            .expect("script lock poisoned")
            .push_back(ScriptedCapture::Frame(frame));
    }

    /// Queue a capture failure.
    pub fn push_failure(&self, message: impl Into<String>) {
        self.script
            .lock()
            .expect("script lock poisoned")
            .push_back(ScriptedCapture::Fail(message.into()));
    }

    /// Delay every capture by `delay` (simulates sensor latency).
    pub fn with_capture_delay(mut self, delay: Duration) -> Self {
        self.capture_delay = Some(delay);
        self
    }

    pub fn opens(&self) -> u32 {
        self.opens.load(Ordering::SeqCst)
    }

    pub fn captures(&self) -> u32 {
        self.captures.load(Ordering::SeqCst)
    }

    pub fn closes(&self) -> u32 {
        self.closes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageCapture for FakeCamera {
    async fn open(&self) -> CaptureResult<()> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        let mut session = self.session.lock().expect("session lock poisoned");
        if session.is_some() {
            return Ok(());
        }
        let device_id = self
            .devices
            .first()
            .ok_or_else(|| CaptureError::device_unavailable("no camera enumerates"))?;
        *session = Some(CaptureSession::open(device_id.clone()));
        debug!(device_id = %device_id, "fake camera opened");
        Ok(())
    }

    async fn capture(&self) -> CaptureResult<RawImage> {
        self.captures.fetch_add(1, Ordering::SeqCst);
        if self.session.lock().expect("session lock poisoned").is_none() {
            return Err(CaptureError::NotOpen);
        }
        if self.capturing.swap(true, Ordering::SeqCst) {
            return Err(CaptureError::Busy);
        }

        if let Some(delay) = self.capture_delay {
            tokio::time::sleep(delay).await;
        }

        let next = self
            .script
            .lock()
            .expect("script lock poisoned")
            .pop_front();
        self.capturing.store(false, Ordering::SeqCst);

        match next {
            Some(ScriptedCapture::Frame(frame)) => Ok(frame),
            Some(ScriptedCapture::Fail(message)) => Err(CaptureError::failed(message)),
            None => Err(CaptureError::failed("no scripted frame")),
        }
    }

    async fn close(&self) {
        self.closes.fetch_add(1, Ordering::SeqCst);
        let mut session = self.session.lock().expect("session lock poisoned");
        if let Some(s) = session.as_mut() {
            s.close();
        }
        *session = None;
    }

    fn session(&self) -> Option<CaptureSession> {
        self.session.lock().expect("session lock poisoned").clone()
    }
}
