//! Translation between on-screen pointer events and natural pixels.
//!
//! The engine works only in natural-pixel coordinates. A renderer shows
//! the image scaled to fit its container and reports pointer positions in
//! displayed pixels; [`DisplayTransform`] converts between the two and
//! [`DragController`] turns a down/move/up event stream into engine calls.

use serde::{Deserialize, Serialize};

use crate::engine::{CropEngine, DragSession};
use crate::types::{CropRegion, Point};

/// Uniform scale from natural pixels to displayed pixels.
///
/// Both directions are multipliers taken straight from the widths; a
/// pointer on a displayed box edge maps exactly onto the natural edge
/// whenever `natural / displayed` is exact.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplayTransform {
    scale: f64,
    inverse: f64,
}

impl Default for DisplayTransform {
    fn default() -> Self {
        Self {
            scale: 1.0,
            inverse: 1.0,
        }
    }
}

impl DisplayTransform {
    /// Scale derived from the rendered and natural image widths.
    ///
    /// The same factor is assumed for both axes. Degenerate widths
    /// (zero, negative, non-finite) fall back to a scale of 1.
    #[must_use]
    pub fn new(displayed_width: f64, natural_width: f64) -> Self {
        let scale = displayed_width / natural_width;
        let inverse = natural_width / displayed_width;
        if scale.is_finite() && scale > 0.0 && inverse.is_finite() && inverse > 0.0 {
            Self { scale, inverse }
        } else {
            Self::default()
        }
    }

    /// Displayed pixels per natural pixel.
    #[must_use]
    pub const fn scale(self) -> f64 {
        self.scale
    }

    /// Convert a displayed position to natural pixels.
    #[must_use]
    pub fn to_natural(self, point: Point) -> Point {
        Point::new(point.x * self.inverse, point.y * self.inverse)
    }

    /// Convert a natural position to displayed pixels.
    #[must_use]
    pub fn to_display(self, point: Point) -> Point {
        Point::new(point.x * self.scale, point.y * self.scale)
    }

    /// Where to paint the crop box, in displayed pixels.
    #[must_use]
    pub fn region_to_display(self, region: CropRegion) -> DisplayRect {
        DisplayRect {
            left: region.x * self.scale,
            top: region.y * self.scale,
            side: region.size * self.scale,
        }
    }
}

/// The crop box in displayed pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplayRect {
    /// Left edge.
    pub left: f64,
    /// Top edge.
    pub top: f64,
    /// Side length.
    pub side: f64,
}

/// Drives a [`CropEngine`] from raw pointer events.
///
/// Holds at most one active [`DragSession`]. A `pointer_down` outside the
/// crop box starts nothing, and moves without an active session are
/// ignored.
#[derive(Debug, Clone, Default)]
pub struct DragController {
    transform: DisplayTransform,
    session: Option<DragSession>,
}

impl DragController {
    /// Create a controller for an image displayed with `transform`.
    #[must_use]
    pub const fn new(transform: DisplayTransform) -> Self {
        Self {
            transform,
            session: None,
        }
    }

    /// Update the display scale, e.g. after the container was resized.
    pub const fn set_transform(&mut self, transform: DisplayTransform) {
        self.transform = transform;
    }

    /// Current display transform.
    #[must_use]
    pub const fn transform(&self) -> DisplayTransform {
        self.transform
    }

    /// Whether a drag is in progress.
    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    /// Pointer pressed at a displayed position. Returns whether a drag began.
    pub fn pointer_down(&mut self, engine: &CropEngine, display_pos: Point) -> bool {
        self.session = engine.begin_drag(self.transform.to_natural(display_pos));
        self.session.is_some()
    }

    /// Pointer moved to a displayed position.
    ///
    /// Returns the updated region, or `None` when no drag is active.
    pub fn pointer_move(
        &mut self,
        engine: &mut CropEngine,
        display_pos: Point,
    ) -> Option<CropRegion> {
        let session = self.session?;
        Some(engine.update_drag(&session, self.transform.to_natural(display_pos)))
    }

    /// Pointer released; ends any active drag.
    pub const fn pointer_up(&mut self) {
        self.session = None;
    }
}
