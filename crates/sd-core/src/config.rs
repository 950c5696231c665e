//! Editor configuration, loadable from JSON.
//!
//! Every field has a default, so `{}` is a valid config.

use crate::error::{Result, SketchError};
use crate::model::{Color, Style, ToolKind};
use serde::{Deserialize, Serialize};

/// Default number of undo checkpoints kept.
pub const DEFAULT_HISTORY_DEPTH: usize = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Maximum undo checkpoints; the oldest is dropped first. `0` = unbounded.
    ///
    /// Past this depth the earliest states are gone for good: N actions
    /// followed by N undos only return to the starting buffer while
    /// N <= `history_depth`. Each checkpoint is a full `width * height * 4`
    /// byte copy of the buffer (about 8 MB at 1920x1080), so the default of
    /// 100 can hold hundreds of MB for a screenshot-sized canvas. Lower it on
    /// memory-constrained hosts, or set `0` to keep every state.
    pub history_depth: usize,
    /// Color the eraser paints with.
    pub eraser_color: Color,
    pub default_style: Style,
    pub default_tool: ToolKind,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_depth: DEFAULT_HISTORY_DEPTH,
            eraser_color: Color::WHITE,
            default_style: Style::default(),
            default_tool: ToolKind::Brush,
        }
    }
}

impl EditorConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| SketchError::Config(e.to_string()))?;
        config
            .default_style
            .validate()
            .map_err(|e| SketchError::Config(e.to_string()))?;
        Ok(config)
    }
}
