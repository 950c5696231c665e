//! Image decoding for backgrounds and PNG encoding for export.

use crate::snapshot::{Snapshot, demultiply};
use image::{ImageFormat, RgbaImage};
use sd_core::{BackgroundImage, Result, SketchError};
use std::io::Cursor;

/// Decode PNG or JPEG bytes into a background image.
pub fn decode_image(bytes: &[u8]) -> Result<BackgroundImage> {
    let decoded = image::load_from_memory(bytes)
        .map_err(|e| SketchError::ResourceUnavailable(e.to_string()))?
        .to_rgba8();
    let (width, height) = decoded.dimensions();
    BackgroundImage::from_rgba(width, height, decoded.into_raw())
}

/// Straight-alpha RGBA8 bytes, the layout `ImageData` and clipboards expect.
pub fn snapshot_to_rgba(snapshot: &Snapshot) -> Vec<u8> {
    let mut rgba = Vec::with_capacity(snapshot.pixels().len());
    for px in snapshot.pixmap().pixels() {
        let c = demultiply(*px);
        rgba.extend_from_slice(&[c.r, c.g, c.b, c.a]);
    }
    rgba
}

pub fn encode_png(snapshot: &Snapshot) -> Result<Vec<u8>> {
    let image = RgbaImage::from_raw(snapshot.width(), snapshot.height(), snapshot_to_rgba(snapshot))
        .ok_or_else(|| SketchError::Encode("pixel buffer size mismatch".to_string()))?;
    let mut out = Cursor::new(Vec::new());
    image
        .write_to(&mut out, ImageFormat::Png)
        .map_err(|e| SketchError::Encode(e.to_string()))?;
    Ok(out.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{DrawCall, PaintMode, Primitive};
    use crate::surface::Surface;
    use pretty_assertions::assert_eq;
    use sd_core::model::{Color, Point};

    #[test]
    fn exported_png_decodes_to_same_pixels() {
        let mut surface = Surface::new(16, 8).unwrap();
        surface.draw(&DrawCall {
            primitive: Primitive::Rect {
                corner: Point::new(0.0, 0.0),
                width: 8.0,
                height: 8.0,
            },
            mode: PaintMode::Fill,
            color: Color::rgb(0, 128, 255),
            width: 1.0,
        });

        let png = encode_png(&surface.snapshot()).unwrap();
        assert_eq!(&png[1..4], b"PNG");

        let decoded = decode_image(&png).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (16, 8));
        assert_eq!(&decoded.pixels()[0..4], &[0, 128, 255, 255]);
        assert_eq!(&decoded.pixels()[15 * 4..16 * 4], &[0, 0, 0, 0]);
    }

    #[test]
    fn garbage_bytes_are_unavailable() {
        assert!(matches!(
            decode_image(b"definitely not an image"),
            Err(SketchError::ResourceUnavailable(_))
        ));
    }
}
