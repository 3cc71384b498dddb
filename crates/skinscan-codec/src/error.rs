//! Codec error types.

use thiserror::Error;

use skinscan_models::{ErrorKind, PixelFormat};

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors that can occur while encoding or decoding images.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("Unsupported pixel format: {0}")]
    UnsupportedFormat(PixelFormat),

    #[error("Invalid image data: {0}")]
    InvalidImage(String),

    #[error("Encode failed: {0}")]
    Encode(String),

    #[error("Decode failed: {0}")]
    Decode(String),
}

impl CodecError {
    pub fn invalid_image(msg: impl Into<String>) -> Self {
        Self::InvalidImage(msg.into())
    }

    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Map into the shared workflow failure taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CodecError::UnsupportedFormat(_) => ErrorKind::UnsupportedFormat,
            _ => ErrorKind::EncodeError,
        }
    }
}
