//! The persisted crop string: `"x1,y1,x2,y2"`.
//!
//! Emitted without spaces. Parsing trims the whole string and each field,
//! so `"10, 20, 110, 120"` is accepted. Anything that is not exactly four
//! finite numbers parses to `None` rather than an error: stored strings may
//! be hand-edited or computed against an image that has since been
//! replaced, and the editor must keep working either way.

use std::fmt;

use crate::types::{CropRegion, Dimensions};

/// The four edges of a persisted crop, in natural pixels.
///
/// Well-formed bounds have `x2 > x1` and `y2 > y1`, but nothing here
/// relies on that; [`CropRegion::from_bounds`] clamps whatever it gets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropBounds {
    /// Left edge.
    pub x1: f64,
    /// Top edge.
    pub y1: f64,
    /// Right edge.
    pub x2: f64,
    /// Bottom edge.
    pub y2: f64,
}

impl CropBounds {
    /// Parse a crop string, returning `None` for malformed input.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let mut fields = s.trim().split(',').map(|field| {
            field
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|value| value.is_finite())
        });

        let x1 = fields.next()??;
        let y1 = fields.next()??;
        let x2 = fields.next()??;
        let y2 = fields.next()??;
        if fields.next().is_some() {
            return None;
        }

        Some(Self { x1, y1, x2, y2 })
    }

    /// Rounded edges of `region`.
    #[must_use]
    pub fn from_region(region: CropRegion) -> Self {
        Self {
            x1: region.x.round(),
            y1: region.y.round(),
            x2: region.right().round(),
            y2: region.bottom().round(),
        }
    }

    /// Width of the bounds (may be zero or negative when malformed).
    #[must_use]
    pub fn width(self) -> f64 {
        self.x2 - self.x1
    }

    /// Height of the bounds (may be zero or negative when malformed).
    #[must_use]
    pub fn height(self) -> f64 {
        self.y2 - self.y1
    }
}

impl fmt::Display for CropBounds {
    #[allow(clippy::cast_possible_truncation)]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Integer formatting so `-0.0` and fractional input never leak out.
        let [x1, y1, x2, y2] = [self.x1, self.y1, self.x2, self.y2].map(|v| v.round() as i64);
        write!(f, "{x1},{y1},{x2},{y2}")
    }
}

impl CropRegion {
    /// Rebuild a region from persisted bounds against the current image.
    ///
    /// The side is `min(width, height, x2 - x1, y2 - y1)`; the top-left
    /// corner is clamped to be non-negative and then pulled back inside
    /// the image if the stored square no longer fits.
    #[must_use]
    pub fn from_bounds(bounds: CropBounds, dimensions: Dimensions) -> Self {
        let size = f64::from(dimensions.min_side())
            .min(bounds.width())
            .min(bounds.height());
        Self::clamped(bounds.x1.max(0.0), bounds.y1.max(0.0), size, dimensions)
    }

    /// Parse a crop string directly into a clamped region.
    #[must_use]
    pub fn parse(s: &str, dimensions: Dimensions) -> Option<Self> {
        CropBounds::parse(s).map(|bounds| Self::from_bounds(bounds, dimensions))
    }

    /// Serialize as `"x1,y1,x2,y2"` with rounded edges.
    #[must_use]
    pub fn to_crop_string(self) -> String {
        CropBounds::from_region(self).to_string()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const DIMS: Dimensions = Dimensions::new(640, 480);

    #[test]
    fn parse_well_formed() {
        let b = CropBounds::parse("10,20,110,120").unwrap();
        assert_eq!(
            b,
            CropBounds {
                x1: 10.0,
                y1: 20.0,
                x2: 110.0,
                y2: 120.0
            }
        );
    }

    #[test]
    fn parse_accepts_surrounding_and_inner_whitespace() {
        let b = CropBounds::parse("  10, 20 ,110,  120 \n").unwrap();
        assert!((b.x2 - 110.0).abs() < f64::EPSILON);
        assert!((b.y2 - 120.0).abs() < f64::EPSILON);
    }

    #[test]
    fn parse_rejects_non_numeric_field() {
        assert_eq!(CropBounds::parse("10,10,abc,50"), None);
    }

    #[test]
    fn parse_rejects_wrong_field_count() {
        assert_eq!(CropBounds::parse("10,10,10"), None);
        assert_eq!(CropBounds::parse("1,2,3,4,5"), None);
        assert_eq!(CropBounds::parse(""), None);
        assert_eq!(CropBounds::parse(",,,"), None);
    }

    #[test]
    fn parse_rejects_non_finite() {
        assert_eq!(CropBounds::parse("0,0,inf,10"), None);
        assert_eq!(CropBounds::parse("NaN,0,10,10"), None);
    }

    #[test]
    fn display_has_no_spaces() {
        let b = CropBounds {
            x1: 1.0,
            y1: 2.0,
            x2: 301.0,
            y2: 302.0,
        };
        assert_eq!(b.to_string(), "1,2,301,302");
    }

    #[test]
    fn to_crop_string_rounds_edges() {
        let r = CropRegion {
            x: 10.4,
            y: 19.6,
            size: 100.2,
        };
        // x2 = round(110.6) = 111, y2 = round(119.8) = 120
        assert_eq!(r.to_crop_string(), "10,20,111,120");
    }

    #[test]
    fn from_bounds_uses_smallest_extent() {
        let b = CropBounds::parse("0,0,200,150").unwrap();
        let r = CropRegion::from_bounds(b, DIMS);
        assert_eq!(
            r,
            CropRegion {
                x: 0.0,
                y: 0.0,
                size: 150.0
            }
        );
    }

    #[test]
    fn from_bounds_clamps_negative_origin() {
        let r = CropRegion::parse("-30,-5,70,95", DIMS).unwrap();
        assert_eq!(
            r,
            CropRegion {
                x: 0.0,
                y: 0.0,
                size: 100.0
            }
        );
    }

    #[test]
    fn from_bounds_stale_string_fits_smaller_image() {
        // Computed against a 2000x2000 upload, applied to a 640x480 image.
        let r = CropRegion::parse("1000,1000,2000,2000", DIMS).unwrap();
        assert!(r.fits(DIMS));
        assert!((r.size - 480.0).abs() < f64::EPSILON);
        assert!((r.x - 160.0).abs() < f64::EPSILON);
        assert!(r.y.abs() < f64::EPSILON);
    }

    #[test]
    fn from_bounds_reversed_edges_still_valid() {
        let r = CropRegion::parse("100,100,50,50", DIMS).unwrap();
        assert!(r.fits(DIMS));
        assert!((r.size - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn integer_regions_round_trip() {
        for &(x, y, size) in &[
            (0.0, 0.0, 480.0),
            (160.0, 0.0, 480.0),
            (13.0, 57.0, 211.0),
            (630.0, 470.0, 10.0),
        ] {
            let original = CropRegion { x, y, size };
            let parsed = CropRegion::parse(&original.to_crop_string(), DIMS).unwrap();
            assert_eq!(parsed, original, "round trip of {original:?}");
        }
    }

    #[test]
    fn fractional_regions_round_trip_within_a_pixel() {
        let original = CropRegion {
            x: 80.5,
            y: 33.25,
            size: 300.75,
        };
        let parsed = CropRegion::parse(&original.to_crop_string(), DIMS).unwrap();
        assert!((parsed.x - original.x).abs() <= 1.0);
        assert!((parsed.y - original.y).abs() <= 1.0);
        assert!((parsed.size - original.size).abs() <= 1.0);
    }
}
