//! Image codec between raw captures and transport payloads.
//!
//! This crate provides:
//! - Deterministic encoding of a [`skinscan_models::RawImage`] into a
//!   transport-safe [`skinscan_models::EncodedPayload`]
//! - The inverse decode, used for local preview redisplay

pub mod codec;
pub mod error;

pub use codec::{CodecConfig, ImageCodec, OutputFormat};
pub use error::{CodecError, CodecResult};
