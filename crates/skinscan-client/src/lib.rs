//! HTTP client for the remote classification endpoint.
//!
//! This crate provides:
//! - The [`Classifier`] trait the session controller uploads through
//! - [`RemoteClassifier`], a reqwest-backed implementation with a
//!   configurable endpoint, deadline, and optional retry

pub mod client;
pub mod config;
pub mod error;
pub mod retry;

pub use client::{Classifier, RemoteClassifier};
pub use config::ClassifierConfig;
pub use error::{ClassifierError, ClassifierResult};
