//! Gesture scripts: a JSON array of steps replayed against a `Session`.
//!
//! ```json
//! [
//!   { "op": "tool", "name": "rectangle" },
//!   { "op": "color", "value": "#E53935" },
//!   { "op": "style", "line_width": 8, "fill_enabled": true },
//!   { "op": "down", "x": 40, "y": 40 },
//!   { "op": "move", "x": 160, "y": 120 },
//!   { "op": "up", "x": 160, "y": 120 },
//!   { "op": "undo" }
//! ]
//! ```

use sd_core::Result;
use sd_core::model::{Color, ToolKind};
use sd_editor::Session;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum Step {
    Tool {
        name: String,
    },
    Color {
        value: Color,
    },
    Style {
        #[serde(default)]
        line_width: Option<f32>,
        #[serde(default)]
        fill_enabled: Option<bool>,
    },
    Down {
        x: f32,
        y: f32,
    },
    Move {
        x: f32,
        y: f32,
    },
    Up {
        x: f32,
        y: f32,
    },
    Undo,
    Redo,
    Clear,
    Crop {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
}

pub fn parse_script(json: &str) -> serde_json::Result<Vec<Step>> {
    serde_json::from_str(json)
}

/// Apply one step. Returns `true` if the buffer changed.
pub fn apply(session: &mut Session, step: &Step) -> Result<bool> {
    let changed = match step {
        Step::Tool { name } => {
            let tool = ToolKind::from_name(name)?;
            if !session.set_tool(tool) {
                log::warn!("tool {tool} ignored mid-gesture");
            }
            false
        }
        Step::Color { value } => {
            session.set_color(*value);
            false
        }
        Step::Style {
            line_width,
            fill_enabled,
        } => {
            if let Some(width) = line_width {
                session.set_line_width(*width)?;
            }
            if let Some(fill) = fill_enabled {
                session.set_fill_enabled(*fill);
            }
            false
        }
        Step::Down { x, y } => session.pointer_down(*x, *y),
        Step::Move { x, y } => session.pointer_move(*x, *y),
        Step::Up { x, y } => session.pointer_up(*x, *y),
        Step::Undo => session.undo(),
        Step::Redo => session.redo(),
        Step::Clear => {
            session.clear_canvas()?;
            true
        }
        Step::Crop {
            x,
            y,
            width,
            height,
        } => session.apply_crop(*x, *y, *width, *height)?,
    };
    Ok(changed)
}

/// Replay every step in order. Returns how many changed the buffer.
pub fn replay(session: &mut Session, steps: &[Step]) -> Result<usize> {
    let mut changed = 0;
    for (i, step) in steps.iter().enumerate() {
        if apply(session, step)? {
            changed += 1;
        }
        log::trace!("step {i}: {step:?}");
    }
    Ok(changed)
}
