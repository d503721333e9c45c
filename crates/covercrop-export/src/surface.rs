//! The 2D raster surface the exporter draws on.
//!
//! [`RasterSurface`] is the capability the exporter needs from a platform:
//! fill a rectangle, blit a scaled source rectangle, and encode the result.
//! [`ImageSurface`] implements it in memory with the `image` crate.

use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageEncoder, Rgba};

use crate::types::{ExportError, OutputFormat, PixelRect, Rgb, RgbaImage};

/// A square canvas supporting the operations a square export needs.
pub trait RasterSurface {
    /// Side length of the canvas in pixels.
    fn side(&self) -> u32;

    /// Paint `rect` with an opaque color. Parts outside the canvas are
    /// ignored.
    fn fill_rect(&mut self, rect: PixelRect, color: Rgb);

    /// Scale the `src` area of `image` into the `dst` area of the canvas,
    /// compositing source alpha over what is already there.
    fn draw_image(&mut self, image: &RgbaImage, src: PixelRect, dst: PixelRect);

    /// Encode the canvas.
    ///
    /// `quality` is on a 0-1 scale and only affects lossy formats.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Encode`] if the encoder fails.
    fn encode(&self, format: OutputFormat, quality: f32) -> Result<Vec<u8>, ExportError>;
}

/// In-memory RGBA canvas backed by [`RgbaImage`].
///
/// Resampling uses a triangle (bilinear) filter, so output is fully
/// deterministic for identical inputs.
#[derive(Debug, Clone)]
pub struct ImageSurface {
    canvas: RgbaImage,
}

impl ImageSurface {
    /// A fully transparent `side` x `side` canvas.
    #[must_use]
    pub fn new(side: u32) -> Self {
        Self {
            canvas: RgbaImage::new(side, side),
        }
    }

    /// Borrow the canvas pixels.
    #[must_use]
    pub const fn as_image(&self) -> &RgbaImage {
        &self.canvas
    }

    /// Take the canvas pixels.
    #[must_use]
    pub fn into_image(self) -> RgbaImage {
        self.canvas
    }
}

impl RasterSurface for ImageSurface {
    fn side(&self) -> u32 {
        self.canvas.width()
    }

    fn fill_rect(&mut self, rect: PixelRect, color: Rgb) {
        let rect = rect.clip_to(self.canvas.width(), self.canvas.height());
        let pixel = Rgba([color[0], color[1], color[2], 255]);
        for y in rect.y..rect.y + rect.height {
            for x in rect.x..rect.x + rect.width {
                self.canvas.put_pixel(x, y, pixel);
            }
        }
    }

    fn draw_image(&mut self, image: &RgbaImage, src: PixelRect, dst: PixelRect) {
        let src = src.clip_to(image.width(), image.height());
        if src.is_empty() || dst.is_empty() {
            return;
        }

        let sampled = imageops::crop_imm(image, src.x, src.y, src.width, src.height).to_image();
        let scaled = if (src.width, src.height) == (dst.width, dst.height) {
            sampled
        } else {
            log::trace!(
                "resampling {}x{} -> {}x{}",
                src.width,
                src.height,
                dst.width,
                dst.height
            );
            imageops::resize(&sampled, dst.width, dst.height, FilterType::Triangle)
        };

        imageops::overlay(
            &mut self.canvas,
            &scaled,
            i64::from(dst.x),
            i64::from(dst.y),
        );
    }

    fn encode(&self, format: OutputFormat, quality: f32) -> Result<Vec<u8>, ExportError> {
        let (width, height) = self.canvas.dimensions();
        let mut bytes = Vec::new();
        let result = match format {
            OutputFormat::Jpeg => {
                // JPEG has no alpha channel.
                let rgb = DynamicImage::ImageRgba8(self.canvas.clone()).to_rgb8();
                let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(
                    &mut bytes,
                    jpeg_quality(quality),
                );
                encoder.write_image(
                    rgb.as_raw(),
                    width,
                    height,
                    image::ExtendedColorType::Rgb8,
                )
            }
            OutputFormat::Png => {
                let encoder = image::codecs::png::PngEncoder::new(&mut bytes);
                encoder.write_image(
                    self.canvas.as_raw(),
                    width,
                    height,
                    image::ExtendedColorType::Rgba8,
                )
            }
        };

        result.map_err(|e| ExportError::Encode {
            format,
            source: Box::new(e),
        })?;
        if bytes.is_empty() {
            return Err(ExportError::Encode {
                format,
                source: "encoder produced no data".into(),
            });
        }
        Ok(bytes)
    }
}

/// Map a 0-1 quality onto the JPEG encoder's 1-100 scale.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn jpeg_quality(quality: f32) -> u8 {
    (quality * 100.0).round().clamp(1.0, 100.0) as u8
}
