//! Keyboard shortcut mapping.
//!
//! Maps key + modifier combos to semantic `ShortcutAction`s.
//! The shortcut map lives in Rust so it's shared across WASM and native.

use sd_core::model::ToolKind;

/// Actions that keyboard shortcuts can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    // ── Tool switching ──
    Tool(ToolKind),

    // ── Style ──
    ToggleFill,
    WidthUp,
    WidthDown,

    // ── Edit ──
    Undo,
    Redo,
    ClearCanvas,

    // ── Export (performed by the host) ──
    Save,
    CopyImage,
}

impl ShortcutAction {
    /// Actions the session cannot perform itself; the host owns the sink.
    pub fn is_host_action(self) -> bool {
        matches!(self, Self::Save | Self::CopyImage)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Tool(_) => "tool",
            Self::ToggleFill => "toggleFill",
            Self::WidthUp => "widthUp",
            Self::WidthDown => "widthDown",
            Self::Undo => "undo",
            Self::Redo => "redo",
            Self::ClearCanvas => "clearCanvas",
            Self::Save => "save",
            Self::CopyImage => "copyImage",
        }
    }
}

/// Resolves key events into shortcut actions.
///
/// Uses platform-aware modifier detection: on macOS `meta` is ⌘,
/// on other platforms `ctrl` serves the same role.
pub struct ShortcutMap;

impl ShortcutMap {
    /// Resolve a key event to an action.
    ///
    /// `key` is the `KeyboardEvent.key` value (e.g. `"z"`, `"Delete"`).
    /// Returns `None` if the key combo has no binding.
    pub fn resolve(
        key: &str,
        ctrl: bool,
        shift: bool,
        _alt: bool,
        meta: bool,
    ) -> Option<ShortcutAction> {
        let cmd = ctrl || meta;

        // ── Modifier combos first (most specific) ──
        if cmd && shift {
            return match key {
                "z" | "Z" => Some(ShortcutAction::Redo),
                _ => None,
            };
        }

        if cmd {
            return match key {
                "z" | "Z" => Some(ShortcutAction::Undo),
                "y" | "Y" => Some(ShortcutAction::Redo),
                "s" | "S" => Some(ShortcutAction::Save),
                "c" | "C" => Some(ShortcutAction::CopyImage),
                "Delete" | "Backspace" => Some(ShortcutAction::ClearCanvas),
                _ => None,
            };
        }

        if shift {
            return None;
        }

        // ── Single keys (no modifiers) ──
        match key {
            "b" | "B" => Some(ShortcutAction::Tool(ToolKind::Brush)),
            "e" | "E" => Some(ShortcutAction::Tool(ToolKind::Eraser)),
            "r" | "R" => Some(ShortcutAction::Tool(ToolKind::Rectangle)),
            "c" | "C" | "o" | "O" => Some(ShortcutAction::Tool(ToolKind::Ellipse)),
            "t" | "T" => Some(ShortcutAction::Tool(ToolKind::Triangle)),
            "a" | "A" => Some(ShortcutAction::Tool(ToolKind::Arrow)),
            "x" | "X" => Some(ShortcutAction::Tool(ToolKind::Crop)),
            "f" | "F" => Some(ShortcutAction::ToggleFill),
            "[" => Some(ShortcutAction::WidthDown),
            "]" => Some(ShortcutAction::WidthUp),
            _ => None,
        }
    }
}
