//! The crop geometry engine: one editing session over one source image.
//!
//! All operations are O(1) and infallible. Out-of-range pointer positions
//! and size requests are clamped to the nearest valid region, so the engine
//! can be driven directly from a high-frequency pointer-move stream.

use serde::{Deserialize, Serialize};

use crate::crop_string::CropBounds;
use crate::types::{CropRegion, Dimensions, Mode, Point, Source, clamp_size};

/// An in-progress drag, started from inside the crop box.
///
/// Captures the pointer's offset from the region's top-left corner so the
/// box does not jump to the pointer when the drag starts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DragSession {
    /// Horizontal offset of the pointer from the region's left edge.
    pub offset_x: f64,
    /// Vertical offset of the pointer from the region's top edge.
    pub offset_y: f64,
}

/// Square crop state for a single source image.
///
/// Deserialized state is re-clamped against its stored dimensions, so a
/// loaded engine satisfies the same invariants as a freshly built one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "EngineRecord")]
pub struct CropEngine {
    dimensions: Dimensions,
    region: Option<CropRegion>,
    mode: Mode,
}

impl CropEngine {
    /// Start an editing session.
    ///
    /// For [`Source::New`] the previous crop string is ignored and the
    /// largest centered square is used. For [`Source::Existing`] the
    /// previous string is parsed and clamped to `dimensions`; if it is
    /// missing or malformed the region stays undefined, meaning there is no
    /// crop to show yet.
    ///
    /// `mode` is the caller's last-known mode; the engine never persists it.
    #[must_use]
    pub fn initialize(
        dimensions: Dimensions,
        previous: Option<&str>,
        source: Source,
        mode: Mode,
    ) -> Self {
        let region = match source {
            Source::New => Some(CropRegion::centered(dimensions)),
            Source::Existing => previous.and_then(|s| {
                let parsed = CropBounds::parse(s);
                if parsed.is_none() {
                    log::debug!("ignoring malformed crop string {s:?}");
                }
                parsed.map(|bounds| {
                    let region = CropRegion::from_bounds(bounds, dimensions);
                    log::debug!("restored crop {bounds} as {region:?} for {dimensions:?}");
                    region
                })
            }),
        };

        Self {
            dimensions,
            region,
            mode,
        }
    }

    /// Replace the source image, discarding the current region and mode.
    pub fn replace_source(&mut self, dimensions: Dimensions, mode: Mode) {
        *self = Self::initialize(dimensions, None, Source::New, mode);
    }

    /// Natural dimensions of the source image.
    #[must_use]
    pub const fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    /// Current crop region, or `None` when no crop is available.
    #[must_use]
    pub const fn region(&self) -> Option<CropRegion> {
        self.region
    }

    /// Current output mode.
    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.mode
    }

    /// Start a drag if `pointer` (natural pixels) is inside the crop box.
    ///
    /// The hit-test includes the box edges. Returns `None` when the pointer
    /// is outside the box or there is no region.
    #[must_use]
    pub fn begin_drag(&self, pointer: Point) -> Option<DragSession> {
        let region = self.region?;
        region.contains(pointer).then(|| DragSession {
            offset_x: pointer.x - region.x,
            offset_y: pointer.y - region.y,
        })
    }

    /// Move the region so the drag offset stays under `pointer`.
    ///
    /// The size is whatever the region has now, so a resize made mid-drag
    /// sticks. Repeated calls with the same position yield the same region.
    pub fn update_drag(&mut self, session: &DragSession, pointer: Point) -> CropRegion {
        let size = clamp_size(
            self.region.map_or(f64::NAN, |region| region.size),
            self.dimensions,
        );
        let region = CropRegion::with_size(
            pointer.x - session.offset_x,
            pointer.y - session.offset_y,
            size,
            self.dimensions,
        );
        self.region = Some(region);
        region
    }

    /// Resize the region around its current center.
    ///
    /// `requested` is clamped to `[MIN_CROP_SIZE, min(width, height)]`. If
    /// the re-centered square would leave the image it is shifted back
    /// inside by the minimum amount. Does nothing when there is no region.
    pub fn resize(&mut self, requested: f64) -> Option<CropRegion> {
        let current = self.region?;
        let size = clamp_size(requested, self.dimensions);
        let center = current.center();
        let region = CropRegion::with_size(
            center.x - size / 2.0,
            center.y - size / 2.0,
            size,
            self.dimensions,
        );
        self.region = Some(region);
        Some(region)
    }

    /// Switch output mode. The region is kept so switching back restores it.
    pub const fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    /// The crop string to persist, if any.
    ///
    /// `None` in [`Mode::Pad`] (the whole image is always used) or when
    /// there is no region; callers should leave the stored value untouched.
    #[must_use]
    pub fn to_persist_string(&self) -> Option<String> {
        match self.mode {
            Mode::Pad => None,
            Mode::Crop => self.region.map(CropRegion::to_crop_string),
        }
    }
}

/// Unchecked wire form of [`CropEngine`].
#[derive(Deserialize)]
struct EngineRecord {
    dimensions: Dimensions,
    region: Option<CropRegion>,
    mode: Mode,
}

impl From<EngineRecord> for CropEngine {
    fn from(record: EngineRecord) -> Self {
        let dimensions = record.dimensions;
        let region = record.region.map(|r| {
            let clamped = CropRegion::clamped(r.x, r.y, r.size, dimensions);
            if clamped != r {
                log::debug!("clamped stored crop {r:?} to {clamped:?} for {dimensions:?}");
            }
            clamped
        });
        Self {
            dimensions,
            region,
            mode: record.mode,
        }
    }
}
