//! WASM bridge for Snapdraw — exposes the drawing session to JavaScript.
//!
//! Compiled via `wasm-pack build --target web`. The page owns the DOM
//! wiring (buttons, crop overlay, upload, clipboard); everything stateful
//! goes through `SketchCanvas`.

use sd_core::model::{Color, Style, ToolKind};
use sd_core::{BackgroundImage, EditorConfig, SketchError};
use sd_editor::shortcuts::{ShortcutAction, ShortcutMap};
use sd_editor::{BackgroundOutcome, BackgroundRequest, Session};
use sd_render::codec::{decode_image, encode_png, snapshot_to_rgba};
use serde::Deserialize;
use wasm_bindgen::Clamped;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, ImageData};

/// The main WASM-facing drawing controller.
#[wasm_bindgen]
pub struct SketchCanvas {
    session: Session,
}

#[wasm_bindgen]
impl SketchCanvas {
    /// Create a canvas with default configuration. Zero dimensions fall
    /// back to a 1×1 buffer.
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32) -> SketchCanvas {
        console_setup();
        let session = Session::new(width, height).or_else(|err| {
            log::warn!("{err}, using a 1x1 canvas");
            Session::new(1, 1)
        });
        match session {
            Ok(session) => Self { session },
            // 1x1 is always a valid surface.
            Err(err) => wasm_bindgen::throw_str(&err.to_string()),
        }
    }

    /// Create a canvas from a JSON `EditorConfig`.
    pub fn with_config(
        width: u32,
        height: u32,
        config_json: &str,
    ) -> Result<SketchCanvas, JsValue> {
        console_setup();
        let config = EditorConfig::from_json(config_json).map_err(to_js)?;
        let session = Session::with_config(width, height, config).map_err(to_js)?;
        Ok(Self { session })
    }

    pub fn width(&self) -> u32 {
        self.session.width()
    }

    pub fn height(&self) -> u32 {
        self.session.height()
    }

    /// Blit the buffer into a Canvas2D context at the origin.
    pub fn render(&self, ctx: &CanvasRenderingContext2d) -> bool {
        let rgba = snapshot_to_rgba(&self.session.snapshot_for_export());
        let image = match ImageData::new_with_u8_clamped_array_and_sh(
            Clamped(&rgba[..]),
            self.session.width(),
            self.session.height(),
        ) {
            Ok(image) => image,
            Err(err) => {
                log::error!("ImageData: {err:?}");
                return false;
            }
        };
        ctx.put_image_data(&image, 0.0, 0.0).is_ok()
    }

    /// Start over on a blank buffer. History is reset.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        report(self.session.resize(width, height)).is_some()
    }

    // ─── Pointer API ─────────────────────────────────────────────────────

    /// Returns true if the buffer changed.
    pub fn handle_pointer_down(&mut self, x: f32, y: f32) -> bool {
        self.session.pointer_down(x, y)
    }

    pub fn handle_pointer_move(&mut self, x: f32, y: f32) -> bool {
        self.session.pointer_move(x, y)
    }

    pub fn handle_pointer_up(&mut self, x: f32, y: f32) -> bool {
        self.session.pointer_up(x, y)
    }

    pub fn is_dragging(&self) -> bool {
        self.session.is_dragging()
    }

    // ─── Tool & style ────────────────────────────────────────────────────

    /// Switch tools by name (`brush`, `eraser`, `rectangle`, `circle`,
    /// `triangle`, `arrow`, `crop`). Unknown names and mid-gesture switches
    /// are ignored.
    pub fn set_tool(&mut self, name: &str) -> bool {
        match ToolKind::from_name(name) {
            Ok(tool) => self.session.set_tool(tool),
            Err(err) => {
                log::warn!("{err}");
                false
            }
        }
    }

    pub fn get_tool_name(&self) -> String {
        self.session.tool().name().to_string()
    }

    /// Accepts hex or CSS `rgb()` / `rgba()` strings.
    pub fn set_color(&mut self, css: &str) -> bool {
        match Color::parse(css) {
            Ok(color) => {
                self.session.set_color(color);
                true
            }
            Err(err) => {
                log::warn!("{err}");
                false
            }
        }
    }

    pub fn set_line_width(&mut self, width: f32) -> bool {
        report(self.session.set_line_width(width)).is_some()
    }

    pub fn set_fill_enabled(&mut self, enabled: bool) {
        self.session.set_fill_enabled(enabled);
    }

    /// Current style as JSON.
    pub fn get_style_json(&self) -> String {
        serde_json::to_string(&self.session.style()).unwrap_or_else(|_| "{}".to_string())
    }

    /// Replace the style from JSON; missing fields take their defaults.
    pub fn set_style_json(&mut self, json: &str) -> bool {
        let style: Style = match serde_json::from_str(json) {
            Ok(style) => style,
            Err(err) => {
                log::warn!("bad style JSON: {err}");
                return false;
            }
        };
        report(self.session.set_style(style)).is_some()
    }

    // ─── History ─────────────────────────────────────────────────────────

    pub fn undo(&mut self) -> bool {
        self.session.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.session.redo()
    }

    pub fn can_undo(&self) -> bool {
        self.session.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.session.can_redo()
    }

    /// Clear the drawing and history, keeping the background.
    pub fn clear(&mut self) -> bool {
        report(self.session.clear_canvas()).is_some()
    }

    // ─── Background ──────────────────────────────────────────────────────

    /// Announce an image load. Pass the returned token to
    /// `complete_background` when the bytes arrive.
    pub fn request_background(&mut self) -> f64 {
        self.session.request_background().id() as f64
    }

    /// Deliver encoded PNG/JPEG bytes for `token`. Returns JSON:
    /// `{"ok":bool,"applied":bool,"error":"..."}`.
    pub fn complete_background(&mut self, token: f64, bytes: &[u8]) -> String {
        let result = decode_image(bytes);
        self.finish_background(token, result)
    }

    /// Deliver already-decoded straight RGBA pixels for `token`.
    pub fn complete_background_rgba(
        &mut self,
        token: f64,
        width: u32,
        height: u32,
        rgba: Vec<u8>,
    ) -> String {
        let result = BackgroundImage::from_rgba(width, height, rgba);
        self.finish_background(token, result)
    }

    /// Report that the load for `token` failed on the JS side.
    pub fn fail_background(&mut self, token: f64, reason: &str) -> String {
        let result = Err(SketchError::ResourceUnavailable(reason.to_string()));
        self.finish_background(token, result)
    }

    /// Replace the buffer with a region of itself (crop overlay result).
    pub fn apply_crop(&mut self, x: f32, y: f32, width: f32, height: f32) -> bool {
        report(self.session.apply_crop(x, y, width, height)).unwrap_or(false)
    }

    // ─── Export ──────────────────────────────────────────────────────────

    /// PNG bytes of the current buffer; empty on failure.
    pub fn export_png(&self) -> Vec<u8> {
        report(encode_png(&self.session.snapshot_for_export())).unwrap_or_default()
    }

    /// Straight RGBA bytes of the current buffer.
    pub fn export_rgba(&self) -> Vec<u8> {
        snapshot_to_rgba(&self.session.snapshot_for_export())
    }

    // ─── Keyboard Shortcut API ───────────────────────────────────────────

    /// Handle a keyboard event. Returns a JSON string:
    /// `{"changed":bool,"action":"<action_name>","tool":"<tool_name>","host":bool}`
    ///
    /// `host` is true for actions the page must perform (save, copy).
    pub fn handle_key(
        &mut self,
        key: &str,
        ctrl: bool,
        shift: bool,
        alt: bool,
        meta: bool,
    ) -> String {
        let action = ShortcutMap::resolve(key, ctrl, shift, alt, meta);
        key_response(&mut self.session, action)
    }
}

impl SketchCanvas {
    fn finish_background(
        &mut self,
        token: f64,
        result: sd_core::Result<BackgroundImage>,
    ) -> String {
        let request = BackgroundRequest::from_id(token as u64);
        let reply = match self.session.complete_background(request, result) {
            Ok(outcome) => BackgroundReply {
                ok: true,
                applied: matches!(outcome, BackgroundOutcome::Applied(_)),
                error: None,
            },
            Err(err) => {
                log::warn!("background load {}: {err}", request.id());
                BackgroundReply {
                    ok: false,
                    applied: false,
                    error: Some(err.to_string()),
                }
            }
        };
        reply.to_json()
    }
}

#[derive(serde::Serialize)]
struct BackgroundReply {
    ok: bool,
    applied: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl BackgroundReply {
    fn to_json(&self) -> String {
        serde_json::to_string(self)
            .unwrap_or_else(|_| r#"{"ok":false,"applied":false}"#.to_string())
    }
}

fn key_response(session: &mut Session, action: Option<ShortcutAction>) -> String {
    let Some(action) = action else {
        return r#"{"changed":false,"action":"none","tool":"","host":false}"#.to_string();
    };
    let changed = session.dispatch(action);
    serde_json::json!({
        "changed": changed,
        "action": action.name(),
        "tool": session.tool().name(),
        "host": action.is_host_action(),
    })
    .to_string()
}

/// Log and drop an error, keeping the success value.
fn report<T>(result: sd_core::Result<T>) -> Option<T> {
    result.map_err(|err| log::warn!("{err}")).ok()
}

fn to_js(err: SketchError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

// ─── Export & sharing helpers ────────────────────────────────────────────

/// File name for a downloaded export: the timestamp in milliseconds.
#[wasm_bindgen]
pub fn download_file_name(now_ms: f64) -> String {
    format!("{}.jpg", now_ms.max(0.0) as u64)
}

/// `download_file_name` stamped with the current time.
#[wasm_bindgen]
pub fn download_file_name_now() -> String {
    download_file_name(js_sys::Date::now())
}

#[derive(Deserialize)]
struct UploadResponse {
    result: Option<String>,
}

/// Pull the share link out of the upload endpoint's JSON reply.
#[wasm_bindgen]
pub fn parse_upload_response(json: &str) -> Option<String> {
    serde_json::from_str::<UploadResponse>(json)
        .ok()
        .and_then(|r| r.result)
        .filter(|url| !url.is_empty())
}

// ─── Console logging & panic hook ────────────────────────────────────────

#[cfg(target_arch = "wasm32")]
struct ConsoleLogger;

#[cfg(target_arch = "wasm32")]
impl log::Log for ConsoleLogger {
    fn enabled(&self, _metadata: &log::Metadata) -> bool {
        true
    }

    fn log(&self, record: &log::Record) {
        let msg = JsValue::from_str(&format!("[{}] {}", record.target(), record.args()));
        match record.level() {
            log::Level::Error => web_sys::console::error_1(&msg),
            log::Level::Warn => web_sys::console::warn_1(&msg),
            log::Level::Info => web_sys::console::info_1(&msg),
            log::Level::Debug | log::Level::Trace => web_sys::console::debug_1(&msg),
        }
    }

    fn flush(&self) {}
}

fn console_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        static LOGGER: ConsoleLogger = ConsoleLogger;
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("Snapdraw WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
            if log::set_logger(&LOGGER).is_ok() {
                log::set_max_level(log::LevelFilter::Info);
            }
        });
    }
}
