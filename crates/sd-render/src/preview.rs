//! Shape preview: restore the pre-drag buffer, then draw the shape fresh.
//!
//! Every pointer move during a shape drag renders from the same
//! snapshot, so earlier previews never accumulate in the buffer.

use crate::shapes::{ShapeRequest, shape_calls};
use crate::snapshot::Snapshot;
use crate::surface::Surface;

/// Render `req` on top of `live` without touching it.
pub fn render_preview(live: &Snapshot, req: &ShapeRequest) -> Surface {
    let mut surface = Surface::from_snapshot(live);
    surface.draw_all(&shape_calls(req));
    log::trace!(
        "preview {} ({}, {}) → ({}, {})",
        req.tool,
        req.from.x,
        req.from.y,
        req.to.x,
        req.to.y
    );
    surface
}
