//! Immutable captures of the raster buffer.

use sd_core::model::Color;
use std::fmt;
use std::sync::Arc;
use tiny_skia::{Pixmap, PremultipliedColorU8};

/// Full copy of the surface at one instant.
///
/// The pixmap sits behind an `Arc` and is never handed out mutably, so a
/// snapshot moving between the undo and redo stacks keeps its contents
/// no matter what happens to the live surface.
#[derive(Clone)]
pub struct Snapshot {
    pixmap: Arc<Pixmap>,
}

impl Snapshot {
    pub(crate) fn capture(pixmap: &Pixmap) -> Self {
        Self {
            pixmap: Arc::new(pixmap.clone()),
        }
    }

    pub(crate) fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Premultiplied RGBA8 bytes, row-major.
    pub fn pixels(&self) -> &[u8] {
        self.pixmap.data()
    }

    pub fn same_size(&self, width: u32, height: u32) -> bool {
        self.width() == width && self.height() == height
    }

    /// Straight-alpha color of one pixel, `None` outside the buffer.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        self.pixmap.pixel(x, y).map(demultiply)
    }
}

impl PartialEq for Snapshot {
    fn eq(&self, other: &Self) -> bool {
        self.width() == other.width()
            && self.height() == other.height()
            && self.pixels() == other.pixels()
    }
}

impl Eq for Snapshot {}

impl fmt::Debug for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Snapshot")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish_non_exhaustive()
    }
}

pub(crate) fn demultiply(px: PremultipliedColorU8) -> Color {
    let c = px.demultiply();
    Color::rgba(c.red(), c.green(), c.blue(), c.alpha())
}
