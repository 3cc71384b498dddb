//! Capture-to-result workflow orchestration.
//!
//! This crate provides [`SessionController`], the single owner of the
//! workflow state. It drives permission gating, capture, encoding, and
//! upload in order, publishes every transition to subscribers, and
//! translates every lower-level failure into a typed failed state.

pub mod config;
pub mod controller;

pub use config::SessionConfig;
pub use controller::SessionController;
