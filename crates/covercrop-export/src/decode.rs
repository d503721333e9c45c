//! Image decoding.
//!
//! Accepts raw image bytes (PNG, JPEG, BMP, WebP) and produces the RGBA
//! pixels and natural dimensions the crop engine is initialized with.

use covercrop_geometry::Dimensions;

use crate::types::{ExportError, RgbaImage};

/// A decoded source image.
#[derive(Debug, Clone)]
pub struct DecodedSource {
    /// RGBA pixels.
    pub image: RgbaImage,
    /// Natural dimensions of `image`.
    pub dimensions: Dimensions,
}

/// Decode raw image bytes.
///
/// # Errors
///
/// Returns [`ExportError::EmptyInput`] if `bytes` is empty.
/// Returns [`ExportError::ImageDecode`] if the format is unrecognized or
/// the data is corrupt.
/// Returns [`ExportError::EmptySource`] if the image has no pixels.
pub fn decode(bytes: &[u8]) -> Result<DecodedSource, ExportError> {
    if bytes.is_empty() {
        return Err(ExportError::EmptyInput);
    }

    let image = image::load_from_memory(bytes)?.to_rgba8();
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(ExportError::EmptySource);
    }

    log::debug!("decoded {width}x{height} source from {} bytes", bytes.len());
    Ok(DecodedSource {
        image,
        dimensions: Dimensions::new(width, height),
    })
}
