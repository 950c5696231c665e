//! Drawing model: colors, points, styles, and tool kinds.
//!
//! These types are plain values. The session copies the current `Style`
//! at pointer-down, so changing it mid-gesture never touches the shape
//! being drawn.

use crate::error::{Result, SketchError};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

// ─── Colors ──────────────────────────────────────────────────────────────

/// Straight (non-premultiplied) RGBA color, 8 bits per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// Helper to parse a single hex digit.
fn hex_val(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    /// Parse a CSS color as the host reports it: `#RGB`, `#RGBA`,
    /// `#RRGGBB`, `#RRGGBBAA`, `rgb(r, g, b)` or `rgba(r, g, b, a)`.
    pub fn parse(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let parsed = if trimmed.starts_with("rgb") {
            Self::from_css_rgb(trimmed)
        } else {
            Self::from_hex(trimmed)
        };
        parsed.ok_or_else(|| SketchError::UnknownColor(s.to_string()))
    }

    /// Parse a hex color string. The leading `#` is optional.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        let bytes = hex.as_bytes();

        match bytes.len() {
            3 | 4 => {
                let r = hex_val(bytes[0])? * 17;
                let g = hex_val(bytes[1])? * 17;
                let b = hex_val(bytes[2])? * 17;
                let a = match bytes.get(3) {
                    Some(&c) => hex_val(c)? * 17,
                    None => 255,
                };
                Some(Self::rgba(r, g, b, a))
            }
            6 | 8 => {
                let byte = |i: usize| -> Option<u8> {
                    Some(hex_val(bytes[i])? << 4 | hex_val(bytes[i + 1])?)
                };
                let a = if bytes.len() == 8 { byte(6)? } else { 255 };
                Some(Self::rgba(byte(0)?, byte(2)?, byte(4)?, a))
            }
            _ => None,
        }
    }

    /// Parse `rgb(r, g, b)` / `rgba(r, g, b, a)` with `a` in `0.0..=1.0`,
    /// which is what `getComputedStyle` hands back for swatches.
    fn from_css_rgb(s: &str) -> Option<Self> {
        let inner = s
            .strip_prefix("rgba")
            .or_else(|| s.strip_prefix("rgb"))?
            .trim()
            .strip_prefix('(')?
            .strip_suffix(')')?;
        let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
        let channel = |p: &str| -> Option<u8> { p.parse::<u8>().ok() };

        match parts.as_slice() {
            [r, g, b] => Some(Self::rgb(channel(*r)?, channel(*g)?, channel(*b)?)),
            [r, g, b, a] => {
                let alpha: f32 = a.parse().ok()?;
                if !(0.0..=1.0).contains(&alpha) {
                    return None;
                }
                Some(Self::rgba(
                    channel(*r)?,
                    channel(*g)?,
                    channel(*b)?,
                    (alpha * 255.0).round() as u8,
                ))
            }
            _ => None,
        }
    }

    /// Emit as `#RRGGBB`, or `#RRGGBBAA` when not fully opaque.
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            format!("#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Color::parse(&s).map_err(serde::de::Error::custom)
    }
}

// ─── Geometry ────────────────────────────────────────────────────────────

/// A position in buffer-local pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl From<(f32, f32)> for Point {
    fn from((x, y): (f32, f32)) -> Self {
        Self { x, y }
    }
}

// ─── Style ───────────────────────────────────────────────────────────────

/// Paint settings applied to the next gesture.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Style {
    pub stroke_color: Color,
    pub fill_color: Color,
    /// Stroke width in pixels. Always positive and finite.
    pub line_width: f32,
    /// Fill closed shapes instead of outlining them.
    pub fill_enabled: bool,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            stroke_color: Color::BLACK,
            fill_color: Color::BLACK,
            line_width: 5.0,
            fill_enabled: false,
        }
    }
}

impl Style {
    /// Use one color for both stroke and fill.
    pub fn with_color(mut self, color: Color) -> Self {
        self.stroke_color = color;
        self.fill_color = color;
        self
    }

    pub fn with_line_width(mut self, line_width: f32) -> Self {
        self.line_width = line_width;
        self
    }

    pub fn with_fill(mut self, fill_enabled: bool) -> Self {
        self.fill_enabled = fill_enabled;
        self
    }

    /// Reject widths the rasterizer cannot stroke.
    pub fn validate(&self) -> Result<()> {
        if !self.line_width.is_finite() || self.line_width <= 0.0 {
            return Err(SketchError::InvalidStyle(format!(
                "line width must be positive, got {}",
                self.line_width
            )));
        }
        Ok(())
    }
}

// ─── Tools ───────────────────────────────────────────────────────────────

/// The active tool. Exactly one is selected at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    #[default]
    Brush,
    Eraser,
    #[serde(alias = "rect")]
    Rectangle,
    #[serde(rename = "circle", alias = "ellipse")]
    Ellipse,
    Triangle,
    Arrow,
    Crop,
}

impl ToolKind {
    pub const ALL: [ToolKind; 7] = [
        ToolKind::Brush,
        ToolKind::Eraser,
        ToolKind::Rectangle,
        ToolKind::Ellipse,
        ToolKind::Triangle,
        ToolKind::Arrow,
        ToolKind::Crop,
    ];

    /// Resolve the identifier used by the toolbar buttons.
    pub fn from_name(name: &str) -> Result<Self> {
        match name {
            "brush" => Ok(Self::Brush),
            "eraser" => Ok(Self::Eraser),
            "rectangle" | "rect" => Ok(Self::Rectangle),
            "circle" | "ellipse" => Ok(Self::Ellipse),
            "triangle" => Ok(Self::Triangle),
            "arrow" => Ok(Self::Arrow),
            "crop" => Ok(Self::Crop),
            _ => Err(SketchError::UnknownTool(name.to_string())),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Brush => "brush",
            Self::Eraser => "eraser",
            Self::Rectangle => "rectangle",
            Self::Ellipse => "circle",
            Self::Triangle => "triangle",
            Self::Arrow => "arrow",
            Self::Crop => "crop",
        }
    }

    /// Freehand tools paint segment by segment without restoring.
    pub fn is_freehand(self) -> bool {
        matches!(self, Self::Brush | Self::Eraser)
    }

    /// Shape tools redraw from the pre-drag snapshot on every move.
    pub fn is_shape(self) -> bool {
        matches!(
            self,
            Self::Rectangle | Self::Ellipse | Self::Triangle | Self::Arrow
        )
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
