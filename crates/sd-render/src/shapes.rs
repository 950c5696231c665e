//! Shape renderer: tool geometry → primitive draw calls.
//!
//! Pure functions. Given a tool, two points, and a style, compute the
//! primitives the surface must rasterize:
//!
//! | Tool      | Geometry                                                  |
//! |-----------|-----------------------------------------------------------|
//! | Brush     | segment `from → to`, stroke color                         |
//! | Eraser    | segment `from → to`, eraser color                         |
//! | Rectangle | corners at `from` and `to` (extents may be negative)      |
//! | Circle    | center `from`, radius `|to - from|`                       |
//! | Triangle  | `from`, `to`, and `to` mirrored about `from.x`            |
//! | Arrow     | shaft `from → to` plus a filled head at `to`              |
//! | Crop      | nothing                                                   |

use sd_core::model::{Color, Point, Style, ToolKind};
use smallvec::{SmallVec, smallvec};
use std::f32::consts::PI;

/// Length of each arrowhead side.
pub const ARROW_HEAD_LENGTH: f32 = 30.0;
/// Angle between the shaft and each arrowhead side.
pub const ARROW_HEAD_ANGLE: f32 = PI / 6.0;

/// Geometry understood by the raster surface.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Line {
        from: Point,
        to: Point,
    },
    /// Axis-aligned rectangle from `corner` spanning `width × height`.
    /// Negative extents grow left/up.
    Rect {
        corner: Point,
        width: f32,
        height: f32,
    },
    Circle {
        center: Point,
        radius: f32,
    },
    /// Closed polygon.
    Polygon(SmallVec<[Point; 4]>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaintMode {
    Stroke,
    Fill,
}

/// One primitive plus how to paint it.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCall {
    pub primitive: Primitive,
    pub mode: PaintMode,
    pub color: Color,
    /// Stroke width; ignored for fills.
    pub width: f32,
}

pub type DrawCalls = SmallVec<[DrawCall; 2]>;

/// Everything needed to render one tool step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeRequest {
    pub tool: ToolKind,
    /// Drag anchor for shapes, previous pointer position for freehand.
    pub from: Point,
    pub to: Point,
    pub style: Style,
    pub eraser_color: Color,
}

/// Compute the draw calls for one tool step.
pub fn shape_calls(req: &ShapeRequest) -> DrawCalls {
    let ShapeRequest {
        tool,
        from,
        to,
        style,
        eraser_color,
    } = *req;

    match tool {
        ToolKind::Brush => smallvec![stroke(line(from, to), style.stroke_color, &style)],
        ToolKind::Eraser => smallvec![stroke(line(from, to), eraser_color, &style)],
        ToolKind::Rectangle => smallvec![closed(rect(from, to), &style)],
        ToolKind::Ellipse => smallvec![closed(circle(from, to), &style)],
        ToolKind::Triangle => smallvec![closed(triangle(from, to), &style)],
        ToolKind::Arrow => arrow(from, to, &style),
        ToolKind::Crop => SmallVec::new(),
    }
}

// ─── Geometry ────────────────────────────────────────────────────────────

fn line(from: Point, to: Point) -> Primitive {
    Primitive::Line { from, to }
}

/// The rectangle starts at the current point and extends back to the
/// anchor, so dragging up/left produces negative extents.
fn rect(anchor: Point, current: Point) -> Primitive {
    Primitive::Rect {
        corner: current,
        width: anchor.x - current.x,
        height: anchor.y - current.y,
    }
}

fn circle(anchor: Point, current: Point) -> Primitive {
    Primitive::Circle {
        center: anchor,
        radius: anchor.distance(current),
    }
}

fn triangle(anchor: Point, current: Point) -> Primitive {
    let mirrored = Point::new(2.0 * anchor.x - current.x, current.y);
    Primitive::Polygon(smallvec![anchor, current, mirrored])
}

fn arrow(anchor: Point, tip: Point, style: &Style) -> DrawCalls {
    let angle = (tip.y - anchor.y).atan2(tip.x - anchor.x);
    let side = |a: f32| {
        Point::new(
            tip.x - ARROW_HEAD_LENGTH * a.cos(),
            tip.y - ARROW_HEAD_LENGTH * a.sin(),
        )
    };
    let head = Primitive::Polygon(smallvec![
        side(angle - ARROW_HEAD_ANGLE),
        tip,
        side(angle + ARROW_HEAD_ANGLE),
    ]);

    smallvec![
        stroke(line(anchor, tip), style.stroke_color, style),
        DrawCall {
            primitive: head,
            mode: PaintMode::Fill,
            color: style.stroke_color,
            width: style.line_width,
        },
    ]
}

// ─── Paint selection ─────────────────────────────────────────────────────

fn stroke(primitive: Primitive, color: Color, style: &Style) -> DrawCall {
    DrawCall {
        primitive,
        mode: PaintMode::Stroke,
        color,
        width: style.line_width,
    }
}

/// Closed shapes are filled with the fill color or outlined with the
/// stroke color depending on `fill_enabled`.
fn closed(primitive: Primitive, style: &Style) -> DrawCall {
    if style.fill_enabled {
        DrawCall {
            primitive,
            mode: PaintMode::Fill,
            color: style.fill_color,
            width: style.line_width,
        }
    } else {
        stroke(primitive, style.stroke_color, style)
    }
}
