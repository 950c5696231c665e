//! Drawing session: the single owner of all editor state.
//!
//! A `Session` holds the surface, the tool machine, the history stacks and
//! the background loader. Hosts (the WASM bridge, the replay CLI) drive it
//! through this API only; nothing here is process-global.

use crate::background::{BackgroundLoader, BackgroundOutcome, BackgroundRequest};
use crate::history::History;
use crate::input::InputEvent;
use crate::shortcuts::ShortcutAction;
use crate::tools::ToolMachine;
use sd_core::model::{Color, Style, ToolKind};
use sd_core::{BackgroundImage, EditorConfig, Result};
use sd_render::{Snapshot, Surface};

/// Line width never drops below this through the width shortcuts.
const MIN_SHORTCUT_WIDTH: f32 = 1.0;

pub struct Session {
    surface: Surface,
    tools: ToolMachine,
    history: History,
    background: BackgroundLoader,
    config: EditorConfig,
}

impl Session {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        Self::with_config(width, height, EditorConfig::default())
    }

    pub fn with_config(width: u32, height: u32, config: EditorConfig) -> Result<Self> {
        config.default_style.validate()?;
        let surface = Surface::new(width, height)?;
        log::debug!(
            "session {width}x{height}, history depth {}",
            config.history_depth
        );
        Ok(Self {
            surface,
            tools: ToolMachine::new(
                config.default_tool,
                config.default_style,
                config.eraser_color,
            ),
            history: History::new(config.history_depth),
            background: BackgroundLoader::new(),
            config,
        })
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn tools(&self) -> &ToolMachine {
        &self.tools
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn width(&self) -> u32 {
        self.surface.width()
    }

    pub fn height(&self) -> u32 {
        self.surface.height()
    }

    pub fn is_dragging(&self) -> bool {
        self.tools.drag().is_some()
    }

    // ─── Pointer input ───────────────────────────────────────────────────

    /// Feed one pointer event. Returns `true` if the buffer changed.
    pub fn handle(&mut self, event: &InputEvent) -> bool {
        self.tools
            .handle(event, &mut self.surface, &mut self.history)
    }

    pub fn pointer_down(&mut self, x: f32, y: f32) -> bool {
        self.handle(&InputEvent::from_pointer_down(x, y))
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) -> bool {
        self.handle(&InputEvent::from_pointer_move(x, y))
    }

    pub fn pointer_up(&mut self, x: f32, y: f32) -> bool {
        self.handle(&InputEvent::from_pointer_up(x, y))
    }

    // ─── Tool & style ────────────────────────────────────────────────────

    /// Returns `false` when ignored because a gesture is in progress.
    pub fn set_tool(&mut self, tool: ToolKind) -> bool {
        self.tools.set_tool(tool)
    }

    pub fn tool(&self) -> ToolKind {
        self.tools.active_tool()
    }

    pub fn style(&self) -> Style {
        self.tools.style()
    }

    pub fn set_style(&mut self, style: Style) -> Result<()> {
        self.tools.set_style(style)
    }

    /// Select one colour for both stroke and fill.
    pub fn set_color(&mut self, color: Color) {
        self.tools.set_color(color);
    }

    pub fn set_line_width(&mut self, width: f32) -> Result<()> {
        let style = self.style().with_line_width(width);
        self.tools.set_style(style)
    }

    pub fn set_fill_enabled(&mut self, enabled: bool) {
        self.tools.set_fill_enabled(enabled);
    }

    // ─── History ─────────────────────────────────────────────────────────

    /// Checkpoint the buffer before a host-driven edit.
    pub fn begin_action(&mut self) {
        self.history.begin_action(&self.surface);
    }

    /// Step back one action. Ignored mid-gesture.
    pub fn undo(&mut self) -> bool {
        if self.is_dragging() {
            log::debug!("undo ignored during gesture");
            return false;
        }
        self.history.undo(&mut self.surface)
    }

    /// Re-apply one undone action. Ignored mid-gesture.
    pub fn redo(&mut self) -> bool {
        if self.is_dragging() {
            log::debug!("redo ignored during gesture");
            return false;
        }
        self.history.redo(&mut self.surface)
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // ─── Canvas reset ────────────────────────────────────────────────────

    /// Wipe the drawing and both stacks, then redraw the last host image.
    ///
    /// Crops never replace that image, so clearing after a crop brings
    /// back the full screenshot.
    pub fn clear_canvas(&mut self) -> Result<()> {
        self.tools.cancel();
        self.surface.clear();
        self.history.clear();
        if let Some(result) = self.background.recomposite(&mut self.surface) {
            result?;
        }
        log::info!("canvas cleared");
        Ok(())
    }

    /// Start over on a blank buffer of a new size.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        let surface = Surface::new(width, height)?;
        self.tools.cancel();
        self.surface = surface;
        self.history.clear();
        log::info!("canvas resized to {width}x{height}");
        Ok(())
    }

    // ─── Background ──────────────────────────────────────────────────────

    /// Issue a token for an image load the host is about to start.
    pub fn request_background(&mut self) -> BackgroundRequest {
        self.background.request()
    }

    /// Deliver a load result. Only the newest request is composited.
    pub fn complete_background(
        &mut self,
        request: BackgroundRequest,
        result: Result<BackgroundImage>,
    ) -> Result<BackgroundOutcome> {
        let outcome = self.background.complete(request, result, &mut self.surface)?;
        if matches!(outcome, BackgroundOutcome::Applied(_)) {
            // The composite replaced the buffer under any in-flight gesture.
            self.tools.cancel();
        }
        Ok(outcome)
    }

    /// Synchronous load: request and complete in one step.
    pub fn set_background(&mut self, image: BackgroundImage) -> Result<BackgroundOutcome> {
        let request = self.request_background();
        self.complete_background(request, Ok(image))
    }

    pub fn background(&self) -> Option<&BackgroundImage> {
        self.background.current()
    }

    /// Replace the buffer with a region of itself, contain-fitted.
    ///
    /// The remembered background is left alone, and any pending load is
    /// superseded. Returns `Ok(false)` when the rectangle misses the buffer.
    pub fn apply_crop(&mut self, x: f32, y: f32, width: f32, height: f32) -> Result<bool> {
        let Some(region) = self.surface.crop(x, y, width, height) else {
            log::debug!("crop ({x}, {y}, {width}, {height}) is empty");
            return Ok(false);
        };
        let placement = self.background.composite_crop(&region, &mut self.surface)?;
        self.tools.cancel();
        log::debug!("crop composited at {placement:?}");
        Ok(true)
    }

    // ─── Export ──────────────────────────────────────────────────────────

    pub fn snapshot_for_export(&self) -> Snapshot {
        self.surface.snapshot()
    }

    // ─── Shortcuts ───────────────────────────────────────────────────────

    /// Apply an editing shortcut. Returns `true` if state changed.
    ///
    /// Host actions (save, copy) are left to the caller and return `false`.
    pub fn dispatch(&mut self, action: ShortcutAction) -> bool {
        match action {
            ShortcutAction::Tool(tool) => self.set_tool(tool),
            ShortcutAction::ToggleFill => {
                let enabled = !self.style().fill_enabled;
                self.set_fill_enabled(enabled);
                true
            }
            ShortcutAction::WidthUp => {
                let width = self.style().line_width + 1.0;
                self.set_line_width(width).is_ok()
            }
            ShortcutAction::WidthDown => {
                let current = self.style().line_width;
                let width = (current - 1.0).max(MIN_SHORTCUT_WIDTH);
                width != current && self.set_line_width(width).is_ok()
            }
            ShortcutAction::Undo => self.undo(),
            ShortcutAction::Redo => self.redo(),
            ShortcutAction::ClearCanvas => match self.clear_canvas() {
                Ok(()) => true,
                Err(err) => {
                    log::warn!("clear canvas: {err}");
                    false
                }
            },
            ShortcutAction::Save | ShortcutAction::CopyImage => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sd_core::SketchError;

    #[test]
    fn new_session_uses_config_defaults() {
        let config = EditorConfig {
            default_tool: ToolKind::Arrow,
            ..EditorConfig::default()
        };
        let session = Session::with_config(20, 10, config).unwrap();
        assert_eq!(session.tool(), ToolKind::Arrow);
        assert_eq!((session.width(), session.height()), (20, 10));
        assert!(!session.can_undo());
    }

    #[test]
    fn invalid_default_style_is_rejected() {
        let config = EditorConfig {
            default_style: Style::default().with_line_width(0.0),
            ..EditorConfig::default()
        };
        assert!(matches!(
            Session::with_config(10, 10, config),
            Err(SketchError::InvalidStyle(_))
        ));
    }

    #[test]
    fn undo_is_ignored_mid_gesture() {
        let mut session = Session::new(16, 16).unwrap();
        session.pointer_down(2.0, 2.0);
        session.pointer_move(10.0, 10.0);
        assert!(session.can_undo());
        assert!(!session.undo());
        assert!(session.is_dragging());
        session.pointer_up(10.0, 10.0);
        assert!(session.undo());
    }

    #[test]
    fn resize_resets_history_and_buffer() {
        let mut session = Session::new(16, 16).unwrap();
        session.pointer_down(2.0, 2.0);
        session.pointer_move(10.0, 10.0);
        session.resize(32, 8).unwrap();
        assert!(!session.is_dragging());
        assert!(!session.can_undo());
        assert_eq!((session.width(), session.height()), (32, 8));
        assert_eq!(session.surface().pixel(5, 5), Some(Color::TRANSPARENT));
    }

    #[test]
    fn resize_to_zero_keeps_old_surface() {
        let mut session = Session::new(16, 16).unwrap();
        assert!(session.resize(0, 5).is_err());
        assert_eq!(session.width(), 16);
    }

    #[test]
    fn dispatch_style_shortcuts() {
        let mut session = Session::new(8, 8).unwrap();
        assert!(session.dispatch(ShortcutAction::ToggleFill));
        assert!(session.style().fill_enabled);
        assert!(session.dispatch(ShortcutAction::WidthUp));
        assert_eq!(session.style().line_width, 6.0);

        session.set_line_width(1.0).unwrap();
        assert!(!session.dispatch(ShortcutAction::WidthDown));
        assert_eq!(session.style().line_width, 1.0);
    }

    #[test]
    fn dispatch_leaves_host_actions_alone() {
        let mut session = Session::new(8, 8).unwrap();
        assert!(!session.dispatch(ShortcutAction::Save));
        assert!(!session.dispatch(ShortcutAction::CopyImage));
    }

    #[test]
    fn crop_cancels_gesture_without_checkpoint() {
        let mut session = Session::new(16, 16).unwrap();
        session.pointer_down(2.0, 2.0);
        session.pointer_move(10.0, 10.0);
        assert!(session.apply_crop(0.0, 0.0, 8.0, 8.0).unwrap());
        assert!(!session.is_dragging());
        assert_eq!(session.history().undo_depth(), 1);
        assert_eq!(session.background(), None);
    }

    #[test]
    fn set_color_updates_stroke_and_fill() {
        let mut session = Session::new(8, 8).unwrap();
        let red = Color::rgb(255, 0, 0);
        session.set_color(red);
        assert_eq!(session.style().stroke_color, red);
        assert_eq!(session.style().fill_color, red);
    }

    #[test]
    fn fill_toggle_keeps_color_and_width() {
        let mut session = Session::new(8, 8).unwrap();
        let red = Color::rgb(255, 0, 0);
        session.set_color(red);
        session.set_line_width(3.0).unwrap();
        session.set_fill_enabled(true);
        assert!(session.style().fill_enabled);
        assert_eq!(session.style().fill_color, red);
        assert_eq!(session.style().line_width, 3.0);
    }
}
