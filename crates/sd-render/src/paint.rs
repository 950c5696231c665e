//! Draw calls → tiny-skia raster operations.
//!
//! Geometry is built with kurbo shapes and flattened into a tiny-skia
//! path. Coordinates outside the pixmap are clipped by the rasterizer.

use crate::shapes::{DrawCall, PaintMode, Primitive};
use kurbo::{BezPath, Circle, Line, PathEl, Rect, Shape};
use sd_core::model::Point;
use tiny_skia::{FillRule, LineCap, LineJoin, Paint, PathBuilder, Pixmap, Stroke, Transform};

/// Flattening tolerance for curves, in pixels.
const PATH_TOLERANCE: f64 = 0.1;

/// Miter limit of an HTML canvas context.
const MITER_LIMIT: f32 = 10.0;

/// Rasterize one draw call onto the pixmap.
pub fn paint_call(pixmap: &mut Pixmap, call: &DrawCall) {
    let Some(path) = build_path(&call.primitive) else {
        log::trace!("skipping degenerate {:?}", call.primitive);
        return;
    };

    let mut paint = Paint::default();
    let c = call.color;
    paint.set_color_rgba8(c.r, c.g, c.b, c.a);
    paint.anti_alias = true;

    match call.mode {
        PaintMode::Fill => {
            pixmap.fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
        }
        PaintMode::Stroke => {
            let stroke = stroke_for(&call.primitive, call.width);
            pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
        }
    }
}

/// Freehand segments get round caps and joins so consecutive segments
/// meet without gaps. Outlines keep the canvas defaults.
fn stroke_for(primitive: &Primitive, width: f32) -> Stroke {
    let (line_cap, line_join) = match primitive {
        Primitive::Line { .. } => (LineCap::Round, LineJoin::Round),
        _ => (LineCap::Butt, LineJoin::Miter),
    };
    Stroke {
        width,
        miter_limit: MITER_LIMIT,
        line_cap,
        line_join,
        dash: None,
    }
}

fn build_path(primitive: &Primitive) -> Option<tiny_skia::Path> {
    match primitive {
        Primitive::Line { from, to } => flatten(&Line::new(kp(*from), kp(*to))),
        Primitive::Rect {
            corner,
            width,
            height,
        } => {
            let far = Point::new(corner.x + width, corner.y + height);
            flatten(&Rect::from_points(kp(*corner), kp(far)))
        }
        Primitive::Circle { center, radius } => {
            flatten(&Circle::new(kp(*center), f64::from(*radius)))
        }
        Primitive::Polygon(points) => {
            let (first, rest) = points.split_first()?;
            let mut bez = BezPath::new();
            bez.move_to(kp(*first));
            for p in rest {
                bez.line_to(kp(*p));
            }
            bez.close_path();
            flatten(&bez)
        }
    }
}

fn kp(p: Point) -> kurbo::Point {
    kurbo::Point::new(f64::from(p.x), f64::from(p.y))
}

fn flatten<S: Shape>(shape: &S) -> Option<tiny_skia::Path> {
    let mut pb = PathBuilder::new();
    for el in shape.path_elements(PATH_TOLERANCE) {
        match el {
            PathEl::MoveTo(p) => pb.move_to(p.x as f32, p.y as f32),
            PathEl::LineTo(p) => pb.line_to(p.x as f32, p.y as f32),
            PathEl::QuadTo(c, p) => pb.quad_to(c.x as f32, c.y as f32, p.x as f32, p.y as f32),
            PathEl::CurveTo(c1, c2, p) => pb.cubic_to(
                c1.x as f32,
                c1.y as f32,
                c2.x as f32,
                c2.y as f32,
                p.x as f32,
                p.y as f32,
            ),
            PathEl::ClosePath => pb.close(),
        }
    }
    pb.finish()
}
