//! The canvas surface: owner of the live raster buffer.

use crate::composite::{self, Placement};
use crate::paint::paint_call;
use crate::shapes::DrawCall;
use crate::snapshot::{Snapshot, demultiply};
use sd_core::model::Color;
use sd_core::{BackgroundImage, Result, SketchError};
use tiny_skia::{Color as SkiaColor, IntRect, Pixmap};

/// Fixed-size RGBA raster buffer. Starts fully transparent.
#[derive(Clone)]
pub struct Surface {
    pixmap: Pixmap,
}

impl Surface {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let pixmap =
            Pixmap::new(width, height).ok_or(SketchError::InvalidSurface { width, height })?;
        Ok(Self { pixmap })
    }

    /// A new surface holding a copy of `snapshot`.
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        Self {
            pixmap: snapshot.pixmap().clone(),
        }
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Copy of the current buffer. Later drawing never shows up in it.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.pixmap)
    }

    /// Replace the whole buffer with `snapshot`.
    ///
    /// Returns `false` and leaves the buffer untouched when the snapshot
    /// was taken at a different size.
    pub fn restore(&mut self, snapshot: &Snapshot) -> bool {
        if !snapshot.same_size(self.width(), self.height()) {
            log::warn!(
                "ignoring {}x{} snapshot on {}x{} surface",
                snapshot.width(),
                snapshot.height(),
                self.width(),
                self.height()
            );
            return false;
        }
        self.pixmap.data_mut().copy_from_slice(snapshot.pixels());
        true
    }

    pub fn draw(&mut self, call: &DrawCall) {
        paint_call(&mut self.pixmap, call);
    }

    pub fn draw_all(&mut self, calls: &[DrawCall]) {
        for call in calls {
            self.draw(call);
        }
    }

    /// Reset every pixel to transparent.
    pub fn clear(&mut self) {
        self.pixmap.fill(SkiaColor::TRANSPARENT);
    }

    /// Clear the buffer and draw `image` scaled to fit, centered.
    ///
    /// Dimensions are read at call time, so an image that arrives after a
    /// resize fits the new size.
    pub fn composite_image(&mut self, image: &BackgroundImage) -> Result<Placement> {
        composite::composite(&mut self.pixmap, image).ok_or_else(|| {
            SketchError::ResourceUnavailable(format!(
                "cannot rasterize {}x{} image",
                image.width(),
                image.height()
            ))
        })
    }

    /// Copy a region of the buffer out as a straight-alpha image.
    ///
    /// The rectangle may have negative extents and is clipped to the
    /// buffer. Returns `None` when nothing of it lies inside.
    pub fn crop(&self, x: f32, y: f32, width: f32, height: f32) -> Option<BackgroundImage> {
        let (x0, x1) = clip_span(x, width, self.width())?;
        let (y0, y1) = clip_span(y, height, self.height())?;
        let rect = IntRect::from_xywh(x0 as i32, y0 as i32, x1 - x0, y1 - y0)?;
        let region = self.pixmap.clone_rect(rect)?;

        let mut rgba = Vec::with_capacity(region.data().len());
        for px in region.pixels() {
            let c = demultiply(*px);
            rgba.extend_from_slice(&[c.r, c.g, c.b, c.a]);
        }
        BackgroundImage::from_rgba(region.width(), region.height(), rgba).ok()
    }

    /// Straight-alpha color of one pixel, `None` outside the buffer.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        self.pixmap.pixel(x, y).map(demultiply)
    }
}

/// Normalize `start..start+len` and clip it to `0..limit` in whole pixels.
fn clip_span(start: f32, len: f32, limit: u32) -> Option<(u32, u32)> {
    if !start.is_finite() || !len.is_finite() {
        return None;
    }
    let (lo, hi) = if len < 0.0 {
        (start + len, start)
    } else {
        (start, start + len)
    };
    let lo = lo.floor().max(0.0) as u32;
    let hi = (hi.ceil().max(0.0) as u32).min(limit);
    (hi > lo).then_some((lo, hi))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{PaintMode, Primitive};
    use pretty_assertions::assert_eq;
    use sd_core::model::Point;

    fn fill_rect(x: f32, y: f32, w: f32, h: f32, color: Color) -> DrawCall {
        DrawCall {
            primitive: Primitive::Rect {
                corner: Point::new(x, y),
                width: w,
                height: h,
            },
            mode: PaintMode::Fill,
            color,
            width: 1.0,
        }
    }

    #[test]
    fn zero_sized_surface_is_rejected() {
        assert!(matches!(
            Surface::new(0, 10),
            Err(SketchError::InvalidSurface { width: 0, height: 10 })
        ));
    }

    #[test]
    fn snapshot_does_not_alias_live_buffer() {
        let mut surface = Surface::new(8, 8).unwrap();
        let before = surface.snapshot();
        surface.draw(&fill_rect(0.0, 0.0, 8.0, 8.0, Color::BLACK));
        assert_eq!(before.pixel(4, 4), Some(Color::TRANSPARENT));
        assert_eq!(surface.pixel(4, 4), Some(Color::BLACK));
    }

    #[test]
    fn restore_replaces_buffer() {
        let mut surface = Surface::new(8, 8).unwrap();
        let blank = surface.snapshot();
        surface.draw(&fill_rect(0.0, 0.0, 8.0, 8.0, Color::BLACK));
        assert!(surface.restore(&blank));
        assert_eq!(surface.snapshot(), blank);
    }

    #[test]
    fn restore_ignores_mismatched_size() {
        let mut surface = Surface::new(8, 8).unwrap();
        surface.draw(&fill_rect(0.0, 0.0, 8.0, 8.0, Color::BLACK));
        let other = Surface::new(4, 4).unwrap().snapshot();
        assert!(!surface.restore(&other));
        assert_eq!(surface.pixel(1, 1), Some(Color::BLACK));
    }

    #[test]
    fn composite_letterboxes_wide_image() {
        let mut surface = Surface::new(300, 300).unwrap();
        surface.draw(&fill_rect(0.0, 0.0, 300.0, 300.0, Color::BLACK));
        let image = BackgroundImage::solid(600, 300, [255, 0, 0, 255]).unwrap();

        let placement = surface.composite_image(&image).unwrap();
        assert_eq!((placement.width, placement.height), (300.0, 150.0));
        assert_eq!((placement.x, placement.y), (0.0, 75.0));

        // Bands above and below the image are cleared, not left black.
        assert_eq!(surface.pixel(150, 10).map(|c| c.a), Some(0));
        assert_eq!(surface.pixel(150, 290).map(|c| c.a), Some(0));
        let inside = surface.pixel(150, 150).unwrap();
        assert!(inside.r > 250 && inside.g < 5 && inside.a > 250, "{inside:?}");
        let near_top = surface.pixel(10, 80).unwrap();
        assert!(near_top.r > 250 && near_top.a > 250, "{near_top:?}");
    }

    #[test]
    fn crop_extracts_clipped_region() {
        let mut surface = Surface::new(10, 10).unwrap();
        surface.draw(&fill_rect(0.0, 0.0, 5.0, 10.0, Color::rgb(0, 0, 255)));

        let image = surface.crop(8.0, 2.0, -6.0, 4.0).unwrap();
        assert_eq!((image.width(), image.height()), (6, 4));
        assert_eq!(&image.pixels()[0..4], &[0, 0, 255, 255]);
        let last = image.pixels().len() - 4;
        assert_eq!(&image.pixels()[last..], &[0, 0, 0, 0]);

        let clipped = surface.crop(-5.0, -5.0, 8.0, 8.0).unwrap();
        assert_eq!((clipped.width(), clipped.height()), (3, 3));
    }

    #[test]
    fn crop_outside_is_none() {
        let surface = Surface::new(10, 10).unwrap();
        assert!(surface.crop(20.0, 20.0, 5.0, 5.0).is_none());
        assert!(surface.crop(2.0, 2.0, 0.0, 5.0).is_none());
    }
}
