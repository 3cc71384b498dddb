//! Raw in-memory images as delivered by the capture layer.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Pixel layout of a [`RawImage`] buffer.
///
/// Only formats in this set are accepted by the codec; anything else a
/// camera backend produces must be converted before it enters the
/// workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PixelFormat {
    /// 8-bit RGBA, 4 bytes per pixel
    #[default]
    Rgba8,
    /// 8-bit RGB, 3 bytes per pixel
    Rgb8,
    /// 8-bit grayscale, 1 byte per pixel
    Gray8,
    /// Packed YUV 4:2:2 as delivered by many camera backends,
    /// 2 bytes per pixel; not accepted by the codec
    Yuyv,
}

impl PixelFormat {
    /// Bytes per pixel for this format.
    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            PixelFormat::Rgba8 => 4,
            PixelFormat::Rgb8 => 3,
            PixelFormat::Gray8 => 1,
            PixelFormat::Yuyv => 2,
        }
    }

    /// Get string representation of the format.
    pub fn as_str(&self) -> &'static str {
        match self {
            PixelFormat::Rgba8 => "rgba8",
            PixelFormat::Rgb8 => "rgb8",
            PixelFormat::Gray8 => "gray8",
            PixelFormat::Yuyv => "yuyv",
        }
    }
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A decoded, in-memory pixel buffer.
///
/// Produced by the capture layer, consumed exactly once by the codec.
/// The buffer length always matches `width * height * bytes_per_pixel`;
/// construction fails otherwise, so downstream code never re-validates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawImage {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Pixel layout of `pixels`
    pub format: PixelFormat,
    /// Row-major pixel data
    pub pixels: Vec<u8>,
}

impl RawImage {
    /// Create a raw image, validating buffer dimensions.
    ///
    /// Returns `None` when either dimension is zero or the buffer
    /// length does not match `width * height * bytes_per_pixel`.
    pub fn new(width: u32, height: u32, format: PixelFormat, pixels: Vec<u8>) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }
        let expected = width as usize * height as usize * format.bytes_per_pixel();
        if pixels.len() != expected {
            return None;
        }
        Some(Self {
            width,
            height,
            format,
            pixels,
        })
    }

    /// Create an image filled with a single color.
    ///
    /// `color` must be exactly `bytes_per_pixel` long for `format`.
    /// Used by capture doubles and tests.
    pub fn filled(width: u32, height: u32, format: PixelFormat, color: &[u8]) -> Option<Self> {
        if color.len() != format.bytes_per_pixel() {
            return None;
        }
        let count = width as usize * height as usize;
        let mut pixels = Vec::with_capacity(count * color.len());
        for _ in 0..count {
            pixels.extend_from_slice(color);
        }
        Self::new(width, height, format, pixels)
    }

    /// Total number of pixels.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Buffer size in bytes.
    pub fn byte_len(&self) -> usize {
        self.pixels.len()
    }
}
