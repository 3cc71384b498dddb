//! Transport-ready encoded image payloads.

use serde::{Deserialize, Serialize};

/// How the encoded image bytes are wrapped for transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TransportEncoding {
    /// Base64 text body, safe to embed in JSON-compatible requests
    #[default]
    Base64Text,
    /// Raw encoded image bytes
    Binary,
}

impl TransportEncoding {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransportEncoding::Base64Text => "base64_text",
            TransportEncoding::Binary => "binary",
        }
    }
}

/// An immutable, transport-safe encoded image.
///
/// Produced by the codec, consumed by the remote classifier. Carries
/// its own content type so the classifier can set the HTTP header
/// without any additional metadata. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedPayload {
    data: Vec<u8>,
    content_type: String,
    transport: TransportEncoding,
}

impl EncodedPayload {
    /// Create a payload from encoded bytes.
    pub fn new(data: Vec<u8>, content_type: impl Into<String>, transport: TransportEncoding) -> Self {
        Self {
            data,
            content_type: content_type.into(),
            transport,
        }
    }

    /// Encoded body bytes (base64 text or raw image bytes, per
    /// [`EncodedPayload::transport`]).
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// MIME content type describing the body.
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Transport wrapping applied to the body.
    pub fn transport(&self) -> TransportEncoding {
        self.transport
    }

    /// Body size in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Consume the payload, yielding the body bytes.
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }
}
