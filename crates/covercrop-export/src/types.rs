//! Shared types for square image export.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Re-export `RgbaImage` so callers can hand decoded pixels to the
/// exporter without depending on `image` directly.
pub use image::RgbaImage;

/// An RGB color.
pub type Rgb = [u8; 3];

/// An integer rectangle in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelRect {
    /// Left edge.
    pub x: u32,
    /// Top edge.
    pub y: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl PixelRect {
    /// Create a new rectangle.
    #[must_use]
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// A square at the origin.
    #[must_use]
    pub const fn square(side: u32) -> Self {
        Self::new(0, 0, side, side)
    }

    /// Returns `true` if the rectangle covers no pixels.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Intersect with a `width` x `height` area anchored at the origin.
    #[must_use]
    pub fn clip_to(self, width: u32, height: u32) -> Self {
        let x = self.x.min(width);
        let y = self.y.min(height);
        Self {
            x,
            y,
            width: self.width.min(width - x),
            height: self.height.min(height - y),
        }
    }
}

/// Encoded output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Lossy JPEG; honors [`ExportConfig::quality`].
    #[default]
    Jpeg,
    /// Lossless PNG; quality is ignored.
    Png,
}

impl OutputFormat {
    /// File extension without the leading dot.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
        }
    }

    /// MIME type of the encoded bytes.
    #[must_use]
    pub const fn mime_type(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Jpeg => f.write_str("jpeg"),
            Self::Png => f.write_str("png"),
        }
    }
}

/// Configuration for square export.
///
/// Missing fields take their defaults when deserializing, so a partial
/// JSON object such as `{"format": "png"}` is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Ceiling for the output side length, bounding file size regardless
    /// of how large the source or crop is.
    pub max_output_size: u32,

    /// Lossy encoder quality on a 0-1 scale. Must be in `(0, 1]`.
    pub quality: f32,

    /// Encoded output format.
    pub format: OutputFormat,

    /// Opaque base layer painted under the image. Shows through in pad
    /// margins and wherever the source is transparent.
    pub background: Rgb,
}

impl ExportConfig {
    /// Default output ceiling in pixels.
    pub const DEFAULT_MAX_OUTPUT_SIZE: u32 = 2048;
    /// Default lossy quality.
    pub const DEFAULT_QUALITY: f32 = 0.88;
    /// Default background (white).
    pub const DEFAULT_BACKGROUND: Rgb = [255, 255, 255];

    /// Check value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::InvalidConfig`] if `max_output_size` is zero
    /// or `quality` is outside `(0, 1]`.
    pub fn validate(&self) -> Result<(), ExportError> {
        if self.max_output_size == 0 {
            return Err(ExportError::InvalidConfig(
                "max_output_size must be at least 1".to_string(),
            ));
        }
        if !(self.quality > 0.0 && self.quality <= 1.0) {
            return Err(ExportError::InvalidConfig(format!(
                "quality must be in (0, 1], got {}",
                self.quality
            )));
        }
        Ok(())
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            max_output_size: Self::DEFAULT_MAX_OUTPUT_SIZE,
            quality: Self::DEFAULT_QUALITY,
            format: OutputFormat::default(),
            background: Self::DEFAULT_BACKGROUND,
        }
    }
}

/// An encoded square image ready to upload or save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedImage {
    /// Encoded image bytes.
    pub bytes: Vec<u8>,
    /// Suggested filename, e.g. `cover-square.jpg`.
    pub filename: String,
    /// MIME type of `bytes`.
    pub mime_type: &'static str,
    /// Side length of the square output in pixels.
    pub size: u32,
}

/// Errors that can occur while decoding or exporting.
///
/// Geometry never fails; these are platform failures only.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// The input image bytes were empty.
    #[error("input image data is empty")]
    EmptyInput,

    /// Failed to decode the input image.
    #[error("failed to decode image: {0}")]
    ImageDecode(#[from] image::ImageError),

    /// The source image has zero width or height.
    #[error("source image has no pixels")]
    EmptySource,

    /// The encoder failed or produced nothing.
    #[error("failed to encode {format} output: {source}")]
    Encode {
        /// Format being encoded.
        format: OutputFormat,
        /// Underlying encoder error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Export configuration is invalid.
    #[error("invalid export configuration: {0}")]
    InvalidConfig(String),
}
