//! Export layout: output size plus source and destination rectangles.
//!
//! Pure integer geometry, computed before any pixels are touched. The
//! output side is `min(base, max_output_size)` where `base` is the crop
//! side in [`Mode::Crop`] and the longer image side in [`Mode::Pad`].

use covercrop_geometry::{CropRegion, Dimensions, Mode};

use crate::types::PixelRect;

/// Where to sample from the source and where to draw it on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportPlan {
    /// Side length of the square output canvas.
    pub out_size: u32,
    /// Sampled area of the source image.
    pub source: PixelRect,
    /// Destination area on the canvas; the rest stays background.
    pub dest: PixelRect,
}

impl ExportPlan {
    /// Lay out a square export.
    ///
    /// In [`Mode::Crop`] a missing region falls back to the largest
    /// centered square. A `max_output_size` of zero is treated as one.
    #[must_use]
    pub fn compute(
        dimensions: Dimensions,
        region: Option<CropRegion>,
        mode: Mode,
        max_output_size: u32,
    ) -> Self {
        let ceiling = max_output_size.max(1);
        match mode {
            Mode::Crop => {
                let region = region.unwrap_or_else(|| CropRegion::centered(dimensions));
                let source = crop_source_rect(dimensions, region);
                let out_size = source.width.min(ceiling);
                Self {
                    out_size,
                    source,
                    dest: PixelRect::square(out_size),
                }
            }
            Mode::Pad => {
                let long_side = dimensions.max_side().max(1);
                let out_size = long_side.min(ceiling);
                let scale = f64::from(out_size) / f64::from(long_side);
                let width = scale_side(dimensions.width, scale, out_size);
                let height = scale_side(dimensions.height, scale, out_size);
                Self {
                    out_size,
                    source: PixelRect::new(0, 0, dimensions.width, dimensions.height),
                    dest: PixelRect::new(
                        (out_size - width) / 2,
                        (out_size - height) / 2,
                        width,
                        height,
                    ),
                }
            }
        }
    }
}

/// Round a crop region to whole pixels that stay inside the image.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn crop_source_rect(dimensions: Dimensions, region: CropRegion) -> PixelRect {
    let side = (region.size.round().max(1.0) as u32).min(dimensions.min_side().max(1));
    let x = (region.x.round().max(0.0) as u32).min(dimensions.width.saturating_sub(side));
    let y = (region.y.round().max(0.0) as u32).min(dimensions.height.saturating_sub(side));
    PixelRect::new(x, y, side, side)
}

/// Scale one image side, keeping at least one pixel and at most `limit`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn scale_side(side: u32, scale: f64, limit: u32) -> u32 {
    ((f64::from(side) * scale).round() as u32).clamp(1, limit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pad_landscape_within_ceiling() {
        let plan = ExportPlan::compute(Dimensions::new(2000, 1000), None, Mode::Pad, 2048);
        assert_eq!(plan.out_size, 2000);
        assert_eq!(plan.source, PixelRect::new(0, 0, 2000, 1000));
        assert_eq!(plan.dest, PixelRect::new(0, 500, 2000, 1000));
    }

    #[test]
    fn pad_portrait_above_ceiling() {
        let plan = ExportPlan::compute(Dimensions::new(1500, 4096), None, Mode::Pad, 2048);
        assert_eq!(plan.out_size, 2048);
        // 1500 * 0.5 = 750, centered horizontally.
        assert_eq!(plan.dest, PixelRect::new(649, 0, 750, 2048));
    }

    #[test]
    fn pad_ignores_region() {
        let region = Some(CropRegion {
            x: 10.0,
            y: 10.0,
            size: 50.0,
        });
        let with = ExportPlan::compute(Dimensions::new(300, 200), region, Mode::Pad, 2048);
        let without = ExportPlan::compute(Dimensions::new(300, 200), None, Mode::Pad, 2048);
        assert_eq!(with, without);
    }

    #[test]
    fn pad_extreme_aspect_keeps_one_pixel() {
        let plan = ExportPlan::compute(Dimensions::new(10_000, 1), None, Mode::Pad, 100);
        assert_eq!(plan.out_size, 100);
        assert_eq!(plan.dest.height, 1);
        assert_eq!(plan.dest.width, 100);
    }

    #[test]
    fn crop_applies_ceiling() {
        let region = CropRegion {
            x: 500.0,
            y: 0.0,
            size: 3000.0,
        };
        let plan = ExportPlan::compute(Dimensions::new(4000, 3000), Some(region), Mode::Crop, 2048);
        assert_eq!(plan.out_size, 2048);
        assert_eq!(plan.source, PixelRect::new(500, 0, 3000, 3000));
        assert_eq!(plan.dest, PixelRect::square(2048));
    }

    #[test]
    fn crop_small_region_is_not_upscaled() {
        let region = CropRegion {
            x: 40.0,
            y: 30.0,
            size: 120.0,
        };
        let plan = ExportPlan::compute(Dimensions::new(640, 480), Some(region), Mode::Crop, 2048);
        assert_eq!(plan.out_size, 120);
        assert_eq!(plan.source, PixelRect::new(40, 30, 120, 120));
    }

    #[test]
    fn crop_without_region_uses_centered_square() {
        let plan = ExportPlan::compute(Dimensions::new(640, 480), None, Mode::Crop, 2048);
        assert_eq!(plan.out_size, 480);
        assert_eq!(plan.source, PixelRect::new(80, 0, 480, 480));
    }

    #[test]
    fn crop_fractional_region_rounds_inside_image() {
        let region = CropRegion {
            x: 519.6,
            y: 359.6,
            size: 120.4,
        };
        let plan = ExportPlan::compute(Dimensions::new(640, 480), Some(region), Mode::Crop, 2048);
        // x rounds to 520 but 520 + 120 = 640 still fits; y 360 + 120 = 480 fits.
        assert_eq!(plan.source, PixelRect::new(520, 360, 120, 120));
    }

    #[test]
    fn zero_ceiling_is_one_pixel() {
        let plan = ExportPlan::compute(Dimensions::new(64, 64), None, Mode::Crop, 0);
        assert_eq!(plan.out_size, 1);
    }
}
