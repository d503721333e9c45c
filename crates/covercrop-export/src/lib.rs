//! covercrop-export: Square cover image rendering and encoding (sans-IO).
//!
//! Turns a decoded source image plus crop geometry into an encoded square:
//! plan -> white base layer -> blit (crop or pad) -> encode.
//!
//! This crate performs **no I/O** -- it operates on in-memory pixels and
//! returns encoded bytes. Drawing goes through the [`RasterSurface`] trait
//! so a platform with its own canvas can supply one; [`ImageSurface`] is
//! the in-memory implementation used by [`export`].

pub mod decode;
pub mod filename;
pub mod plan;
pub mod surface;
pub mod types;

use covercrop_geometry::{CropEngine, CropRegion, Dimensions, Mode};

pub use decode::{DecodedSource, decode};
pub use filename::suggested_filename;
pub use plan::ExportPlan;
pub use surface::{ImageSurface, RasterSurface};
pub use types::{ExportConfig, ExportError, ExportedImage, OutputFormat, PixelRect, Rgb, RgbaImage};

/// Draw `source` onto `surface` according to `plan`.
///
/// The whole canvas is first filled with `background` so transparent
/// sources and pad margins end up opaque.
pub fn render<S: RasterSurface>(
    surface: &mut S,
    source: &RgbaImage,
    plan: &ExportPlan,
    background: Rgb,
) {
    surface.fill_rect(PixelRect::square(surface.side()), background);
    surface.draw_image(source, plan.source, plan.dest);
}

/// Render and encode a square image using a caller-supplied surface.
///
/// `make_surface` receives the output side length and must return an
/// empty surface of that size. Output is a pure function of the inputs.
///
/// # Errors
///
/// Returns [`ExportError::InvalidConfig`] if `config` fails validation.
/// Returns [`ExportError::EmptySource`] if `source` has no pixels.
/// Returns [`ExportError::Encode`] if encoding fails.
pub fn export_with<S, F>(
    make_surface: F,
    source: &RgbaImage,
    region: Option<CropRegion>,
    mode: Mode,
    config: &ExportConfig,
    source_filename: &str,
) -> Result<ExportedImage, ExportError>
where
    S: RasterSurface,
    F: FnOnce(u32) -> S,
{
    config.validate()?;
    let (width, height) = source.dimensions();
    if width == 0 || height == 0 {
        return Err(ExportError::EmptySource);
    }

    let plan = ExportPlan::compute(
        Dimensions::new(width, height),
        region,
        mode,
        config.max_output_size,
    );
    log::trace!("{mode} export plan for {width}x{height}: {plan:?}");

    let mut surface = make_surface(plan.out_size);
    render(&mut surface, source, &plan, config.background);
    let bytes = surface.encode(config.format, config.quality)?;

    log::debug!(
        "exported {size}x{size} {format} ({len} bytes)",
        size = plan.out_size,
        format = config.format,
        len = bytes.len(),
    );
    Ok(ExportedImage {
        bytes,
        filename: suggested_filename(source_filename, config.format),
        mime_type: config.format.mime_type(),
        size: plan.out_size,
    })
}

/// Render and encode a square image in memory.
///
/// # Errors
///
/// See [`export_with`].
pub fn export(
    source: &RgbaImage,
    region: Option<CropRegion>,
    mode: Mode,
    config: &ExportConfig,
    source_filename: &str,
) -> Result<ExportedImage, ExportError> {
    export_with(
        ImageSurface::new,
        source,
        region,
        mode,
        config,
        source_filename,
    )
}

/// Export using the region and mode of an editing session.
///
/// # Errors
///
/// See [`export_with`].
pub fn export_session(
    source: &RgbaImage,
    engine: &CropEngine,
    config: &ExportConfig,
    source_filename: &str,
) -> Result<ExportedImage, ExportError> {
    export(
        source,
        engine.region(),
        engine.mode(),
        config,
        source_filename,
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use image::Rgba;

    const GREEN: Rgba<u8> = Rgba([0, 200, 0, 255]);
    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

    fn png_config() -> ExportConfig {
        ExportConfig {
            format: OutputFormat::Png,
            ..ExportConfig::default()
        }
    }

    #[test]
    fn render_pad_leaves_white_margins() {
        let source = RgbaImage::from_pixel(200, 100, GREEN);
        let plan = ExportPlan::compute(Dimensions::new(200, 100), None, Mode::Pad, 2048);
        let mut surface = ImageSurface::new(plan.out_size);
        render(&mut surface, &source, &plan, [255, 255, 255]);

        let canvas = surface.into_image();
        assert_eq!(canvas.dimensions(), (200, 200));
        for x in [0, 100, 199] {
            assert_eq!(canvas.get_pixel(x, 0), &WHITE);
            assert_eq!(canvas.get_pixel(x, 49), &WHITE);
            assert_eq!(canvas.get_pixel(x, 50), &GREEN);
            assert_eq!(canvas.get_pixel(x, 149), &GREEN);
            assert_eq!(canvas.get_pixel(x, 150), &WHITE);
            assert_eq!(canvas.get_pixel(x, 199), &WHITE);
        }
    }

    #[test]
    fn render_crop_samples_region() {
        // Top-left quadrant green, everything else transparent.
        let source = RgbaImage::from_fn(
            100,
            100,
            |x, y| {
                if x < 50 && y < 50 {
                    GREEN
                } else {
                    Rgba([0, 0, 0, 0])
                }
            },
        );
        let region = CropRegion {
            x: 0.0,
            y: 0.0,
            size: 50.0,
        };
        let plan = ExportPlan::compute(Dimensions::new(100, 100), Some(region), Mode::Crop, 2048);
        let mut surface = ImageSurface::new(plan.out_size);
        render(&mut surface, &source, &plan, [255, 255, 255]);
        assert!(surface.as_image().pixels().all(|p| *p == GREEN));

        // The transparent quadrant composites onto white.
        let region = CropRegion {
            x: 50.0,
            y: 50.0,
            size: 50.0,
        };
        let plan = ExportPlan::compute(Dimensions::new(100, 100), Some(region), Mode::Crop, 2048);
        let mut surface = ImageSurface::new(plan.out_size);
        render(&mut surface, &source, &plan, [255, 255, 255]);
        assert!(surface.as_image().pixels().all(|p| *p == WHITE));
    }

    #[test]
    fn export_reports_size_name_and_mime() {
        let source = RgbaImage::from_pixel(300, 120, GREEN);
        let out = export(&source, None, Mode::Pad, &png_config(), "show.png").unwrap();
        assert_eq!(out.size, 300);
        assert_eq!(out.filename, "show-square.png");
        assert_eq!(out.mime_type, "image/png");
        let decoded = image::load_from_memory(&out.bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (300, 300));
    }

    #[test]
    fn export_rejects_invalid_config() {
        let source = RgbaImage::from_pixel(4, 4, GREEN);
        let config = ExportConfig {
            quality: 0.0,
            ..ExportConfig::default()
        };
        assert!(matches!(
            export(&source, None, Mode::Crop, &config, "a.png"),
            Err(ExportError::InvalidConfig(_))
        ));
    }

    #[test]
    fn export_rejects_empty_source() {
        let source = RgbaImage::new(0, 10);
        assert!(matches!(
            export(&source, None, Mode::Crop, &ExportConfig::default(), "a.png"),
            Err(ExportError::EmptySource)
        ));
    }

    /// A surface whose encoder always fails.
    struct BrokenEncoder(ImageSurface);

    impl RasterSurface for BrokenEncoder {
        fn side(&self) -> u32 {
            self.0.side()
        }

        fn fill_rect(&mut self, rect: PixelRect, color: Rgb) {
            self.0.fill_rect(rect, color);
        }

        fn draw_image(&mut self, image: &RgbaImage, src: PixelRect, dst: PixelRect) {
            self.0.draw_image(image, src, dst);
        }

        fn encode(&self, format: OutputFormat, _quality: f32) -> Result<Vec<u8>, ExportError> {
            Err(ExportError::Encode {
                format,
                source: "canvas lost".into(),
            })
        }
    }

    #[test]
    fn export_with_propagates_encode_failure() {
        let source = RgbaImage::from_pixel(8, 8, GREEN);
        let result = export_with(
            |side| BrokenEncoder(ImageSurface::new(side)),
            &source,
            None,
            Mode::Crop,
            &ExportConfig::default(),
            "a.png",
        );
        let err = result.unwrap_err();
        assert!(matches!(err, ExportError::Encode { .. }));
        assert_eq!(err.to_string(), "failed to encode jpeg output: canvas lost");
    }
}
