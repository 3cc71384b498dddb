//! RawImage <-> EncodedPayload conversion.

use std::io::Cursor;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use image::{DynamicImage, GrayImage, ImageOutputFormat, RgbImage, RgbaImage};
use tracing::debug;

use skinscan_models::{EncodedPayload, PixelFormat, RawImage, TransportEncoding};

use crate::error::{CodecError, CodecResult};

/// Container format for the encoded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Lossless; round trips bit-exact
    Png,
    /// Lossy; quality 1-100. Alpha is dropped (RGBA input is
    /// flattened to RGB before encoding)
    Jpeg(u8),
}

impl OutputFormat {
    /// MIME type of the container.
    pub fn mime_type(&self) -> &'static str {
        match self {
            OutputFormat::Png => "image/png",
            OutputFormat::Jpeg(_) => "image/jpeg",
        }
    }
}

/// Codec configuration.
#[derive(Debug, Clone, Copy)]
pub struct CodecConfig {
    /// Container format to encode into
    pub format: OutputFormat,
    /// How the encoded bytes are wrapped for transport
    pub transport: TransportEncoding,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            // The upstream service expects a base64 text body posted
            // as JSON-compatible content, wrapping a lossless PNG.
            format: OutputFormat::Png,
            transport: TransportEncoding::Base64Text,
        }
    }
}

/// Converts raw captures into transport payloads and back.
///
/// Encoding is deterministic for a given image and configuration. The
/// only rejection for a valid [`RawImage`] is a pixel format outside
/// the supported set (Rgba8, Rgb8, Gray8).
#[derive(Debug, Clone, Default)]
pub struct ImageCodec {
    config: CodecConfig,
}

impl ImageCodec {
    /// Create a codec with the given configuration.
    pub fn new(config: CodecConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Encode a raw image into a transport payload.
    pub fn encode(&self, image: &RawImage) -> CodecResult<EncodedPayload> {
        let dynamic = to_dynamic(image)?;

        let mut container = Vec::new();
        let output = match self.config.format {
            OutputFormat::Png => ImageOutputFormat::Png,
            OutputFormat::Jpeg(quality) => ImageOutputFormat::Jpeg(quality.clamp(1, 100)),
        };
        // JPEG has no alpha channel
        let dynamic = if matches!(self.config.format, OutputFormat::Jpeg(_))
            && image.format == PixelFormat::Rgba8
        {
            DynamicImage::ImageRgb8(dynamic.to_rgb8())
        } else {
            dynamic
        };
        dynamic
            .write_to(&mut Cursor::new(&mut container), output)
            .map_err(|e| CodecError::encode(e.to_string()))?;

        let payload = match self.config.transport {
            TransportEncoding::Base64Text => EncodedPayload::new(
                BASE64.encode(&container).into_bytes(),
                "application/json; charset=utf-8",
                TransportEncoding::Base64Text,
            ),
            TransportEncoding::Binary => EncodedPayload::new(
                container,
                self.config.format.mime_type(),
                TransportEncoding::Binary,
            ),
        };

        debug!(
            width = image.width,
            height = image.height,
            format = %image.format,
            bytes = payload.len(),
            "encoded image"
        );
        Ok(payload)
    }

    /// Decode a payload back into a raw image (preview redisplay).
    pub fn decode(&self, payload: &EncodedPayload) -> CodecResult<RawImage> {
        let container = match payload.transport() {
            TransportEncoding::Base64Text => BASE64
                .decode(payload.data())
                .map_err(|e| CodecError::decode(format!("invalid base64: {}", e)))?,
            TransportEncoding::Binary => payload.data().to_vec(),
        };

        let dynamic = image::load_from_memory(&container)
            .map_err(|e| CodecError::decode(e.to_string()))?;
        from_dynamic(dynamic)
    }
}

fn to_dynamic(image: &RawImage) -> CodecResult<DynamicImage> {
    let (width, height) = (image.width, image.height);
    let pixels = image.pixels.clone();
    let dynamic = match image.format {
        PixelFormat::Rgba8 => RgbaImage::from_raw(width, height, pixels)
            .map(DynamicImage::ImageRgba8),
        PixelFormat::Rgb8 => RgbImage::from_raw(width, height, pixels)
            .map(DynamicImage::ImageRgb8),
        PixelFormat::Gray8 => GrayImage::from_raw(width, height, pixels)
            .map(DynamicImage::ImageLuma8),
        PixelFormat::Yuyv => return Err(CodecError::UnsupportedFormat(PixelFormat::Yuyv)),
    };
    // RawImage validates its buffer on construction, so this only
    // trips on a hand-built struct with mismatched dimensions.
    dynamic.ok_or_else(|| CodecError::invalid_image("buffer does not match dimensions"))
}

fn from_dynamic(dynamic: DynamicImage) -> CodecResult<RawImage> {
    let (format, width, height, pixels) = match dynamic {
        DynamicImage::ImageRgba8(buf) => {
            (PixelFormat::Rgba8, buf.width(), buf.height(), buf.into_raw())
        }
        DynamicImage::ImageRgb8(buf) => {
            (PixelFormat::Rgb8, buf.width(), buf.height(), buf.into_raw())
        }
        DynamicImage::ImageLuma8(buf) => {
            (PixelFormat::Gray8, buf.width(), buf.height(), buf.into_raw())
        }
        other => {
            let buf = other.to_rgba8();
            (PixelFormat::Rgba8, buf.width(), buf.height(), buf.into_raw())
        }
    };
    RawImage::new(width, height, format, pixels)
        .ok_or_else(|| CodecError::decode("decoded buffer does not match dimensions"))
}
