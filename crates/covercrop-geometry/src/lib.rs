//! covercrop-geometry: Square crop geometry for cover images (sans-IO).
//!
//! Maintains a square crop region over a source image in natural-pixel
//! coordinates:
//! initialize -> drag / resize (clamped) -> persist as `"x1,y1,x2,y2"`.
//!
//! This crate has **no raster or I/O dependencies** -- it never touches
//! pixels. Rendering the final square image lives in `covercrop-export`;
//! painting the crop box and reading pointer events belong to the caller,
//! which talks to the engine through [`adapter::DragController`].
//!
//! Every operation is infallible. Bad persisted strings, out-of-range
//! pointer positions and oversized resize requests are clamped to the
//! nearest valid state instead of producing errors.

pub mod adapter;
pub mod crop_string;
pub mod engine;
pub mod types;

pub use adapter::{DisplayRect, DisplayTransform, DragController};
pub use crop_string::CropBounds;
pub use engine::{CropEngine, DragSession};
pub use types::{CropRegion, Dimensions, MIN_CROP_SIZE, Mode, Point, Source, UnknownMode};
