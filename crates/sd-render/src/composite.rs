//! Background compositing: contain-fit an image into the surface.

use sd_core::BackgroundImage;
use tiny_skia::{
    Color as SkiaColor, ColorU8, FilterQuality, Pixmap, PixmapPaint, Transform,
};

/// Where a contain-fitted image lands inside the surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub scale: f32,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Uniform scale that fits `src` entirely inside `dst`, centered.
pub fn fit_contain(dst_width: u32, dst_height: u32, src_width: u32, src_height: u32) -> Placement {
    let (dw, dh) = (dst_width as f32, dst_height as f32);
    let (sw, sh) = (src_width as f32, src_height as f32);
    let scale = (dw / sw).min(dh / sh);
    let width = sw * scale;
    let height = sh * scale;
    Placement {
        scale,
        x: (dw - width) / 2.0,
        y: (dh - height) / 2.0,
        width,
        height,
    }
}

/// Premultiply a straight-alpha image into a pixmap.
pub(crate) fn to_pixmap(image: &BackgroundImage) -> Option<Pixmap> {
    let mut pixmap = Pixmap::new(image.width(), image.height())?;
    for (dst, src) in pixmap
        .pixels_mut()
        .iter_mut()
        .zip(image.pixels().chunks_exact(4))
    {
        *dst = ColorU8::from_rgba(src[0], src[1], src[2], src[3]).premultiply();
    }
    Some(pixmap)
}

/// Clear `target` and draw `image` contain-fitted with smoothing.
///
/// Nothing is touched if the image cannot be turned into a pixmap.
pub(crate) fn composite(target: &mut Pixmap, image: &BackgroundImage) -> Option<Placement> {
    let source = to_pixmap(image)?;
    let placement = fit_contain(target.width(), target.height(), image.width(), image.height());

    target.fill(SkiaColor::TRANSPARENT);
    let paint = PixmapPaint {
        quality: FilterQuality::Bicubic,
        ..PixmapPaint::default()
    };
    let transform = Transform::from_row(
        placement.scale,
        0.0,
        0.0,
        placement.scale,
        placement.x,
        placement.y,
    );
    target.draw_pixmap(0, 0, source.as_ref(), &paint, transform, None);

    log::debug!(
        "composited {}x{} background at ({}, {}) scale {}",
        image.width(),
        image.height(),
        placement.x,
        placement.y,
        placement.scale
    );
    Some(placement)
}
