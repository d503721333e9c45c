//! Shared types for square crop geometry.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Smallest crop side length, in natural pixels.
///
/// Images whose short side is below this value use the short side instead.
pub const MIN_CROP_SIZE: f64 = 10.0;

/// A 2D point in natural-pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal position (pixels from left edge).
    pub x: f64,
    /// Vertical position (pixels from top edge).
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Natural (unscaled) image dimensions in pixels.
///
/// Both sides are expected to be positive; callers must not build an
/// engine before the source image has decoded successfully.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Dimensions {
    /// Create new dimensions.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// The shorter side, i.e. the largest square that fits.
    #[must_use]
    pub fn min_side(self) -> u32 {
        self.width.min(self.height)
    }

    /// The longer side, i.e. the square a padded image fills.
    #[must_use]
    pub fn max_side(self) -> u32 {
        self.width.max(self.height)
    }
}

/// Output mode for the square export.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Output the pixels inside the crop region.
    #[default]
    Crop,
    /// Output the whole image letterboxed into a square.
    Pad,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Crop => f.write_str("crop"),
            Self::Pad => f.write_str("pad"),
        }
    }
}

/// Error returned when parsing an unknown [`Mode`] name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown mode {0:?}, expected \"crop\" or \"pad\"")]
pub struct UnknownMode(pub String);

impl FromStr for Mode {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "crop" => Ok(Self::Crop),
            "pad" => Ok(Self::Pad),
            other => Err(UnknownMode(other.to_string())),
        }
    }
}

/// Where the image being edited came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Source {
    /// A freshly selected file; any previously persisted crop is stale.
    New,
    /// An image already stored remotely, edited via its persisted crop.
    Existing,
}

/// A square, axis-aligned region in natural-pixel coordinates.
///
/// Values produced by this crate always satisfy, for the image they were
/// clamped against:
///
/// - `size <= min(width, height)`
/// - `0 <= x <= width - size` and `0 <= y <= height - size`
/// - `size >= MIN_CROP_SIZE` (or the short side, for tiny images)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropRegion {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Side length.
    pub size: f64,
}

impl CropRegion {
    /// The largest square that fits `dimensions`, centered.
    #[must_use]
    pub fn centered(dimensions: Dimensions) -> Self {
        let size = f64::from(dimensions.min_side());
        Self {
            x: (f64::from(dimensions.width) - size) / 2.0,
            y: (f64::from(dimensions.height) - size) / 2.0,
            size,
        }
    }

    /// Build a region from raw values, clamped into `dimensions`.
    ///
    /// Size is clamped first, then the position is clamped so the square
    /// lies entirely inside the image.
    #[must_use]
    pub fn clamped(x: f64, y: f64, size: f64, dimensions: Dimensions) -> Self {
        let size = clamp_size(size, dimensions);
        Self::with_size(x, y, size, dimensions)
    }

    /// Clamp the position for an already-valid `size`.
    pub(crate) fn with_size(x: f64, y: f64, size: f64, dimensions: Dimensions) -> Self {
        Self {
            x: clamp_or_low(x, 0.0, f64::from(dimensions.width) - size),
            y: clamp_or_low(y, 0.0, f64::from(dimensions.height) - size),
            size,
        }
    }

    /// Center of the square.
    #[must_use]
    pub fn center(self) -> Point {
        Point::new(self.x + self.size / 2.0, self.y + self.size / 2.0)
    }

    /// Right edge (`x + size`).
    #[must_use]
    pub fn right(self) -> f64 {
        self.x + self.size
    }

    /// Bottom edge (`y + size`).
    #[must_use]
    pub fn bottom(self) -> f64 {
        self.y + self.size
    }

    /// Whether `point` lies inside the square, edges included.
    #[must_use]
    pub fn contains(self, point: Point) -> bool {
        point.x >= self.x
            && point.x <= self.right()
            && point.y >= self.y
            && point.y <= self.bottom()
    }

    /// Whether the region satisfies every invariant for `dimensions`.
    #[must_use]
    pub fn fits(self, dimensions: Dimensions) -> bool {
        let max_size = f64::from(dimensions.min_side());
        self.size >= MIN_CROP_SIZE.min(max_size)
            && self.size <= max_size
            && self.x >= 0.0
            && self.y >= 0.0
            && self.right() <= f64::from(dimensions.width)
            && self.bottom() <= f64::from(dimensions.height)
    }
}

/// Clamp a requested side length to `[MIN_CROP_SIZE, min(width, height)]`.
///
/// NaN resolves to the largest square.
pub(crate) fn clamp_size(size: f64, dimensions: Dimensions) -> f64 {
    let max = f64::from(dimensions.min_side());
    if size.is_nan() {
        return max;
    }
    size.clamp(MIN_CROP_SIZE.min(max), max)
}

/// `f64::clamp` that maps NaN to `low` and tolerates `high < low`.
fn clamp_or_low(value: f64, low: f64, high: f64) -> f64 {
    if value.is_nan() {
        return low;
    }
    value.clamp(low, high.max(low))
}
