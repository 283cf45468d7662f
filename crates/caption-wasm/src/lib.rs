//! WASM bridge for Caption: exposes the editor session to JavaScript.
//!
//! Compiled via `wasm-pack build --target web`. The page owns the DOM
//! (file picker, image decoding, dialogs) and forwards events here; every
//! method that can fail returns a JSON string the page can inspect.

mod host;
mod render2d;

use caption_core::config::EditorConfig;
use caption_core::error::EditorError;
use caption_core::id::LayerId;
use caption_core::model::LayerPatch;
use caption_core::store::Reorder;
use caption_core::transform::BoundBox;
use caption_editor::{
    DELETE_PROMPT, DecodedImage, Editor, InputEvent, Modifiers, ShortcutAction, TextEditDraft,
};
use caption_render::DisplayListSurface;
use host::{JsClock, WebFontLoader, WebStorage};
use render2d::Canvas2dSurface;
use serde_json::json;
use wasm_bindgen::prelude::*;
use web_sys::HtmlCanvasElement;

fn ok_json() -> String {
    json!({ "ok": true }).to_string()
}

fn error_json(e: &EditorError) -> String {
    json!({ "ok": false, "error": e.to_string() }).to_string()
}

fn result_json(result: caption_core::Result<()>) -> String {
    match result {
        Ok(()) => ok_json(),
        Err(e) => error_json(&e),
    }
}

/// Ask the user through `window.confirm`. Declines when no window exists.
fn confirm(prompt: &str) -> bool {
    web_sys::window().is_some_and(|w| w.confirm_with_message(prompt).unwrap_or(false))
}

fn action_name(action: ShortcutAction) -> &'static str {
    match action {
        ShortcutAction::Undo => "undo",
        ShortcutAction::Redo => "redo",
        ShortcutAction::Duplicate => "duplicate",
        ShortcutAction::Delete => "delete",
        ShortcutAction::Deselect => "deselect",
        ShortcutAction::Nudge { .. } => "nudge",
    }
}

fn parse_id(id: &str) -> Option<LayerId> {
    (!id.is_empty()).then(|| LayerId::intern(id))
}

/// The main WASM-facing controller: one editor session drawing to one
/// `<canvas>`.
#[wasm_bindgen]
pub struct CaptionCanvas {
    editor: Editor,
    surface: Canvas2dSurface,
}

#[wasm_bindgen]
impl CaptionCanvas {
    /// Create a session on `canvas`. `config_json` may be empty for the
    /// defaults; unknown keys are ignored and missing ones defaulted.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas: HtmlCanvasElement, config_json: &str) -> Result<CaptionCanvas, JsValue> {
        console_error_panic_hook_setup();
        let config = if config_json.trim().is_empty() {
            EditorConfig::default()
        } else {
            EditorConfig::from_json(config_json)
                .map_err(|e| JsValue::from_str(&format!("invalid config: {e}")))?
        };
        let surface = Canvas2dSurface::new(canvas)?;
        Ok(Self {
            editor: Editor::new(config, WebStorage, JsClock, WebFontLoader),
            surface,
        })
    }

    // ─── Lifecycle ───────────────────────────────────────────────────────

    /// Restore the saved session. Returns whether one was loaded.
    pub fn init(&mut self) -> bool {
        self.editor.init()
    }

    pub fn teardown(&mut self) {
        self.editor.teardown();
    }

    pub fn reset(&mut self) -> String {
        result_json(self.editor.reset())
    }

    /// Fire due timers. Returns the next due time in epoch millis, or -1
    /// when nothing is pending.
    pub fn tick(&mut self) -> f64 {
        self.editor.tick();
        self.editor.next_due().map_or(-1.0, |due| due as f64)
    }

    pub fn render(&mut self) {
        self.editor.render(&mut self.surface);
    }

    // ─── Pointer & transform input ───────────────────────────────────────

    /// Returns whether a layer was grabbed.
    pub fn handle_pointer_down(&mut self, x: f32, y: f32) -> bool {
        self.dispatch(InputEvent::PointerDown { x, y });
        self.editor.is_dragging()
    }

    pub fn handle_pointer_move(&mut self, x: f32, y: f32) {
        self.dispatch(InputEvent::PointerMove { x, y });
    }

    pub fn handle_pointer_up(&mut self, x: f32, y: f32) {
        self.dispatch(InputEvent::PointerUp { x, y });
    }

    /// Opens the text dialog on the layer under the pointer. Returns the
    /// draft JSON, or an empty string when nothing was hit.
    pub fn handle_double_click(&mut self, x: f32, y: f32) -> String {
        self.dispatch(InputEvent::DoubleClick { x, y });
        self.get_draft_json()
    }

    /// Returns the box the handles should show, as JSON.
    pub fn handle_transform_move(
        &mut self,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        rotation: f32,
    ) -> String {
        let proposed = BoundBox {
            x,
            y,
            width,
            height,
            rotation,
        };
        self.dispatch(InputEvent::TransformMove { proposed });
        match self.editor.transform_box() {
            Some(b) => json!({
                "x": b.x, "y": b.y, "width": b.width, "height": b.height, "rotation": b.rotation
            })
            .to_string(),
            None => "null".to_string(),
        }
    }

    pub fn handle_transform_end(&mut self, scale_y: f32, rotation: f32) {
        self.dispatch(InputEvent::TransformEnd { scale_y, rotation });
    }

    // ─── Keyboard ────────────────────────────────────────────────────────

    /// Handle a keydown. Returns `{"handled":bool,"action":"<name>"}`, plus
    /// `error` when the action failed.
    pub fn handle_key(&mut self, key: &str, ctrl: bool, shift: bool, alt: bool, meta: bool) -> String {
        let modifiers = Modifiers {
            shift,
            ctrl,
            alt,
            meta,
        };
        match self.editor.handle_key(key, modifiers, confirm) {
            Ok(Some(action)) => json!({ "handled": true, "action": action_name(action) }),
            Ok(None) => json!({ "handled": false, "action": "none" }),
            Err(e) => json!({ "handled": true, "action": "none", "error": e.to_string() }),
        }
        .to_string()
    }

    /// Returns the undone action label, or an empty string.
    pub fn undo(&mut self) -> String {
        self.editor.undo().unwrap_or_default()
    }

    /// Returns the redone action label, or an empty string.
    pub fn redo(&mut self) -> String {
        self.editor.redo().unwrap_or_default()
    }

    // ─── Layer API ───────────────────────────────────────────────────────

    /// Returns the new layer's id.
    pub fn add_layer(&mut self) -> String {
        match self.editor.add_layer() {
            Ok(id) => id.as_str().to_string(),
            Err(e) => {
                log::warn!("add layer failed: {e}");
                String::new()
            }
        }
    }

    /// Returns the copy's id, or an empty string.
    pub fn duplicate_layer(&mut self, id: &str) -> String {
        let Some(id) = parse_id(id) else {
            return String::new();
        };
        match self.editor.duplicate_layer(id) {
            Ok(new_id) => new_id.as_str().to_string(),
            Err(e) => {
                log::warn!("duplicate failed: {e}");
                String::new()
            }
        }
    }

    /// Delete after `window.confirm`. Returns whether the layer was removed.
    pub fn delete_layer(&mut self, id: &str) -> bool {
        let Some(id) = parse_id(id) else {
            return false;
        };
        self.editor
            .delete_layer(id, confirm)
            .unwrap_or(false)
    }

    /// `direction` is `"up"` or `"down"`. Returns whether the order changed.
    pub fn reorder_layer(&mut self, id: &str, direction: &str) -> bool {
        let direction = match direction {
            "up" => Reorder::Up,
            "down" => Reorder::Down,
            _ => return false,
        };
        parse_id(id).is_some_and(|id| self.editor.reorder_layer(id, direction).unwrap_or(false))
    }

    pub fn toggle_visibility(&mut self, id: &str) -> bool {
        parse_id(id).is_some_and(|id| self.editor.toggle_visibility(id).is_ok())
    }

    /// Select by id; an empty string clears the selection.
    pub fn select_by_id(&mut self, id: &str) -> bool {
        self.editor.select(parse_id(id)).is_ok()
    }

    /// Apply a camelCase `LayerPatch` JSON to one layer.
    pub fn edit_layer(&mut self, id: &str, patch_json: &str) -> String {
        let Some(id) = parse_id(id) else {
            return json!({ "ok": false, "error": "missing layer id" }).to_string();
        };
        let patch: LayerPatch = match serde_json::from_str(patch_json) {
            Ok(p) => p,
            Err(e) => return json!({ "ok": false, "error": e.to_string() }).to_string(),
        };
        result_json(self.editor.edit_layer(id, patch))
    }

    // ─── Text dialog ─────────────────────────────────────────────────────

    pub fn open_text_edit(&mut self, id: &str) -> String {
        let Some(id) = parse_id(id) else {
            return String::new();
        };
        match self.editor.open_text_edit(id) {
            Ok(draft) => serde_json::to_string(draft).unwrap_or_default(),
            Err(e) => {
                log::warn!("cannot edit text: {e}");
                String::new()
            }
        }
    }

    /// The open draft as JSON, or an empty string when the dialog is closed.
    pub fn get_draft_json(&self) -> String {
        self.editor
            .draft()
            .and_then(|d| serde_json::to_string(d).ok())
            .unwrap_or_default()
    }

    /// Replace the open draft's fields. The layer id cannot change.
    pub fn set_draft_json(&mut self, json: &str) -> bool {
        let Ok(update) = serde_json::from_str::<TextEditDraft>(json) else {
            return false;
        };
        match self.editor.draft_mut() {
            Some(draft) if draft.layer_id == update.layer_id => {
                *draft = update;
                true
            }
            _ => false,
        }
    }

    pub fn commit_text_edit(&mut self) -> String {
        match self.editor.commit_text_edit() {
            Ok(_) => ok_json(),
            Err(e) => error_json(&e),
        }
    }

    pub fn cancel_text_edit(&mut self) {
        self.editor.cancel_text_edit();
    }

    // ─── Canvas ──────────────────────────────────────────────────────────

    /// Use a decoded upload as the background.
    pub fn upload_image(&mut self, mime_type: &str, data_url: &str, width: u32, height: u32) -> String {
        result_json(self.editor.upload_image(DecodedImage {
            mime_type: mime_type.to_string(),
            data_url: data_url.to_string(),
            width,
            height,
        }))
    }

    /// Returns `{"ok":true,"dataUrl","width","height","fileName"}` or an error.
    pub fn export(&mut self) -> String {
        match self.editor.export(&mut self.surface) {
            Ok(image) => json!({
                "ok": true,
                "dataUrl": image.data_url,
                "width": image.width,
                "height": image.height,
                "fileName": image.file_name,
            })
            .to_string(),
            Err(e) => error_json(&e),
        }
    }

    // ─── Queries ─────────────────────────────────────────────────────────

    pub fn get_layers_json(&self) -> String {
        serde_json::to_string(self.editor.layers()).unwrap_or_else(|_| "[]".to_string())
    }

    pub fn get_selected_id(&self) -> String {
        self.editor
            .selected()
            .map(|id| id.as_str().to_string())
            .unwrap_or_default()
    }

    pub fn get_canvas_json(&self) -> String {
        let canvas = self.editor.canvas();
        json!({
            "width": canvas.width,
            "height": canvas.height,
            "scale": canvas.scale,
            "hasBackground": canvas.background.is_some(),
        })
        .to_string()
    }

    pub fn get_history_json(&self) -> String {
        let history = self.editor.history();
        let labels: Vec<&str> = history.entries().map(|e| e.action.as_str()).collect();
        json!({
            "labels": labels,
            "cursor": history.cursor(),
            "canUndo": history.can_undo(),
            "canRedo": history.can_redo(),
        })
        .to_string()
    }

    /// Snap guides of the current drag frame.
    pub fn get_guides_json(&self) -> String {
        let g = self.editor.guides();
        json!({ "vertical": g.vertical, "horizontal": g.horizontal, "show": g.show }).to_string()
    }

    /// The current frame as a display list, for debugging and tests.
    pub fn get_frame_json(&mut self) -> String {
        let mut surface = DisplayListSurface::new();
        self.editor.render(&mut surface);
        serde_json::to_string(&surface.frame()).unwrap_or_else(|_| "{}".to_string())
    }

    pub fn can_undo(&self) -> bool {
        self.editor.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.editor.can_redo()
    }

    pub fn delete_prompt(&self) -> String {
        DELETE_PROMPT.to_string()
    }

    // ─── Fonts ───────────────────────────────────────────────────────────

    /// Feed the font catalog response (`{"fonts": [...]}`).
    pub fn set_font_catalog(&mut self, json: &str) {
        self.editor.set_font_catalog(json);
    }

    pub fn get_font_catalog_json(&self) -> String {
        serde_json::to_string(&self.editor.font_catalog().fonts).unwrap_or_else(|_| "[]".to_string())
    }

    pub fn load_font(&mut self, family: &str) {
        self.editor.load_font(family);
    }

    /// Whether the selected layer's font is loaded.
    pub fn fonts_ready(&self) -> bool {
        self.editor.fonts_ready()
    }
}

impl CaptionCanvas {
    fn dispatch(&mut self, event: InputEvent) {
        if let Err(e) = self.editor.handle_event(&event, confirm) {
            log::warn!("{event:?} failed: {e}");
        }
    }
}

/// Set up a panic hook that logs to the browser console.
fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("Caption WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}
