//! Decoded images delivered by the host.

use crate::error::{Result, SketchError};
use std::fmt;

/// Byte length of a `width`x`height` RGBA8 buffer, `None` if it overflows `usize`.
fn rgba_len(width: u32, height: u32) -> Option<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(4))
}

fn check_len(width: u32, height: u32, len: usize) -> Result<()> {
    if rgba_len(width, height) != Some(len) {
        return Err(SketchError::InvalidImage { width, height, len });
    }
    Ok(())
}

// ─── Background image ────────────────────────────────────────────────────

/// A decoded image handed in by the host, straight-alpha RGBA8.
#[derive(Clone, PartialEq, Eq)]
pub struct BackgroundImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl BackgroundImage {
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(SketchError::ResourceUnavailable(format!(
                "image has no pixels ({width}x{height})"
            )));
        }
        check_len(width, height, pixels.len())?;
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// A single-color image, mostly useful for tests and placeholders.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Result<Self> {
        let len = rgba_len(width, height).ok_or(SketchError::InvalidImage {
            width,
            height,
            len: 0,
        })?;
        let pixels = rgba.iter().copied().cycle().take(len).collect();
        Self::from_rgba(width, height, pixels)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }
}

impl fmt::Debug for BackgroundImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackgroundImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}
