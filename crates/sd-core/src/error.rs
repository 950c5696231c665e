//! Error type shared by every Snapdraw crate.
//!
//! Empty undo/redo stacks are not errors: those calls return `false`.
//! Out-of-bounds drawing is clipped by the surface and never reported.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SketchError {
    /// A background image could not be loaded or decoded.
    #[error("image unavailable: {0}")]
    ResourceUnavailable(String),

    /// A pixel buffer whose length does not match `width * height * 4`.
    #[error("pixel buffer of {len} bytes does not match {width}x{height} RGBA")]
    InvalidImage { width: u32, height: u32, len: usize },

    /// The raster surface cannot have a zero dimension.
    #[error("cannot create a {width}x{height} surface")]
    InvalidSurface { width: u32, height: u32 },

    #[error("invalid style: {0}")]
    InvalidStyle(String),

    #[error("unknown tool `{0}`")]
    UnknownTool(String),

    #[error("unknown color `{0}`")]
    UnknownColor(String),

    #[error("encode failed: {0}")]
    Encode(String),

    #[error("invalid config: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, SketchError>;
