//! Camera and permission capability interfaces.
//!
//! This crate provides:
//! - The [`PermissionGate`] and [`ImageCapture`] traits that front the
//!   host platform's permission and camera subsystems
//! - [`CaptureSession`] lifecycle tracking
//! - In-memory doubles for both traits, used by the session
//!   controller's tests and the selfcheck binary
//!
//! Concrete hardware backends live outside this workspace; anything
//! that can answer these traits can drive the workflow.

pub mod camera;
pub mod doubles;
pub mod error;
pub mod permission;

pub use camera::{CaptureSession, ImageCapture};
pub use doubles::{FakeCamera, FixedGate};
pub use error::{CaptureError, CaptureResult};
pub use permission::{Capability, PermissionGate};
