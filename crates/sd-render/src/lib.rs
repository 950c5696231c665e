//! Raster side of Snapdraw.
//!
//! - `surface` — the live tiny-skia buffer with snapshot/restore
//! - `shapes` — pure tool geometry → `DrawCall`s
//! - `paint` — `DrawCall` → tiny-skia fill/stroke
//! - `preview` — restore-then-redraw for shape drags
//! - `composite` — contain-fit background images
//! - `codec` — PNG/JPEG decode, PNG export

pub mod codec;
pub mod composite;
pub mod paint;
pub mod preview;
pub mod shapes;
pub mod snapshot;
pub mod surface;

pub use composite::{Placement, fit_contain};
pub use preview::render_preview;
pub use shapes::{DrawCall, PaintMode, Primitive, ShapeRequest, shape_calls};
pub use snapshot::Snapshot;
pub use surface::Surface;
