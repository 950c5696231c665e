//! Tool state machine for canvas interactions.
//!
//! Interprets pointer events for the active tool and paints the result
//! onto the surface.
//!
//! | Tool family                         | Pointer move                           |
//! |-------------------------------------|----------------------------------------|
//! | Brush, Eraser                       | segment from previous point, no restore |
//! | Rectangle, Circle, Triangle, Arrow  | restore pre-drag snapshot, redraw shape |
//! | Crop                                | ignored (the host overlay owns it)      |
//!
//! Tool and style are locked at pointer-down for the whole gesture.

use crate::history::History;
use crate::input::InputEvent;
use sd_core::Result;
use sd_core::model::{Color, Point, Style, ToolKind};
use sd_render::{ShapeRequest, Snapshot, Surface, render_preview, shape_calls};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolState {
    Idle,
    Dragging,
}

/// Per-gesture state, alive between pointer-down and pointer-up.
#[derive(Debug, Clone)]
pub struct DragState {
    pub tool: ToolKind,
    pub style: Style,
    pub anchor: Point,
    /// Last pointer position seen during this gesture.
    pub last: Point,
    live: Snapshot,
}

impl DragState {
    /// Buffer as it was at pointer-down.
    pub fn live_snapshot(&self) -> &Snapshot {
        &self.live
    }
}

pub struct ToolMachine {
    active: ToolKind,
    style: Style,
    eraser_color: Color,
    drag: Option<DragState>,
}

impl ToolMachine {
    pub fn new(active: ToolKind, style: Style, eraser_color: Color) -> Self {
        Self {
            active,
            style,
            eraser_color,
            drag: None,
        }
    }

    pub fn active_tool(&self) -> ToolKind {
        self.active
    }

    pub fn style(&self) -> Style {
        self.style
    }

    pub fn eraser_color(&self) -> Color {
        self.eraser_color
    }

    pub fn state(&self) -> ToolState {
        if self.drag.is_some() {
            ToolState::Dragging
        } else {
            ToolState::Idle
        }
    }

    pub fn drag(&self) -> Option<&DragState> {
        self.drag.as_ref()
    }

    /// Switch tools. Ignored (returns `false`) while a gesture is in
    /// progress.
    pub fn set_tool(&mut self, tool: ToolKind) -> bool {
        if self.drag.is_some() {
            log::debug!("ignoring switch to {tool} mid-gesture");
            return false;
        }
        self.active = tool;
        true
    }

    /// Replace the style used by the next gesture.
    pub fn set_style(&mut self, style: Style) -> Result<()> {
        style.validate()?;
        self.style = style;
        Ok(())
    }

    /// Use `color` for both stroke and fill.
    pub fn set_color(&mut self, color: Color) {
        self.style = self.style.with_color(color);
    }

    pub fn set_fill_enabled(&mut self, enabled: bool) {
        self.style = self.style.with_fill(enabled);
    }

    /// Abandon the current gesture without touching the buffer.
    pub fn cancel(&mut self) {
        self.drag = None;
    }

    /// Handle a pointer event. Returns `true` if the buffer changed.
    pub fn handle(
        &mut self,
        event: &InputEvent,
        surface: &mut Surface,
        history: &mut History,
    ) -> bool {
        let point = event.position();
        match event {
            InputEvent::PointerDown { .. } => {
                self.begin_gesture(point, surface, history);
                false
            }
            InputEvent::PointerMove { .. } => self.drag_to(point, surface),
            InputEvent::PointerUp { .. } => {
                // The buffer already holds the finished shape.
                if let Some(drag) = self.drag.take() {
                    log::debug!("{} gesture finished", drag.tool);
                }
                false
            }
        }
    }

    fn begin_gesture(&mut self, anchor: Point, surface: &Surface, history: &mut History) {
        let tool = match &self.drag {
            Some(drag) => {
                log::debug!("pointer-down during {} gesture, restarting", drag.tool);
                drag.tool
            }
            None => self.active,
        };
        if tool == ToolKind::Crop {
            return;
        }

        let live = surface.snapshot();
        history.checkpoint(live.clone());
        self.drag = Some(DragState {
            tool,
            style: self.style,
            anchor,
            last: anchor,
            live,
        });
    }

    fn drag_to(&mut self, point: Point, surface: &mut Surface) -> bool {
        let Some(drag) = self.drag.as_mut() else {
            return false;
        };
        let mut req = ShapeRequest {
            tool: drag.tool,
            from: drag.anchor,
            to: point,
            style: drag.style,
            eraser_color: self.eraser_color,
        };

        match drag.tool {
            ToolKind::Brush | ToolKind::Eraser => {
                req.from = drag.last;
                surface.draw_all(&shape_calls(&req));
            }
            ToolKind::Rectangle | ToolKind::Ellipse | ToolKind::Triangle | ToolKind::Arrow => {
                *surface = render_preview(&drag.live, &req);
            }
            ToolKind::Crop => return false,
        }
        drag.last = point;
        true
    }
}
