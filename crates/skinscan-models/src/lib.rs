//! Shared data models for the SkinScan capture/classify workflow.
//!
//! This crate provides Serde-serializable types for:
//! - Raw captured images and pixel formats
//! - Transport-encoded payloads
//! - Classification results and the failure taxonomy
//! - Workflow state and snapshots published to the presentation layer

pub mod classification;
pub mod error_kind;
pub mod image;
pub mod payload;
pub mod workflow;

// Re-export common types
pub use classification::ClassificationResult;
pub use error_kind::ErrorKind;
pub use image::{PixelFormat, RawImage};
pub use payload::{EncodedPayload, TransportEncoding};
pub use workflow::{AttemptId, WorkflowSnapshot, WorkflowState};
