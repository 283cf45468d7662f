//! The editor session.
//!
//! `Editor` owns everything one editing session needs: the layer store, the
//! history, canvas state, the active gesture tools, font loads, and the
//! storage backend. Hosts feed it input and call `tick` on a timer; nothing
//! runs in the background.
//!
//! Every user action is one store mutation plus at most one history entry.
//! Drag ends record after a settle delay; everything else records at once.
//! Store and canvas changes restart the autosave quiet period.

use crate::clock::Clock;
use crate::draft::TextEditDraft;
use crate::fonts::{FontCatalog, FontLoader, FontLoads};
use crate::history::HistoryEngine;
use crate::input::{InputEvent, Modifiers};
use crate::shortcuts::{ShortcutAction, ShortcutMap};
use crate::storage::SessionStorage;
use crate::tools::{DragTool, Tool, ToolContext, TransformTool};
use caption_core::config::EditorConfig;
use caption_core::error::{EditorError, Result};
use caption_core::id::LayerId;
use caption_core::model::{BackgroundImage, CanvasState, LayerPatch, TextLayer};
use caption_core::session::SessionRecord;
use caption_core::snap::SnapGuide;
use caption_core::store::{LayerMutation, LayerStore, Reorder};
use caption_core::surface::{ExportScale, RenderSurface};
use caption_core::transform::BoundBox;
use caption_render::hit_test;
use std::collections::BTreeSet;

/// Question put to the user before a layer is deleted.
pub const DELETE_PROMPT: &str = "Are you sure you want to delete this layer?";

/// The only upload type accepted.
pub const PNG_MIME: &str = "image/png";

/// An uploaded image after the host decoded it.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedImage {
    pub mime_type: String,
    pub data_url: String,
    pub width: u32,
    pub height: u32,
}

/// A finished export, ready to download.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportedImage {
    pub data_url: String,
    pub width: u32,
    pub height: u32,
    pub file_name: String,
}

/// Scale `(width, height)` down to fit inside `(max_width, max_height)`,
/// keeping the aspect ratio. Sizes that already fit are returned unchanged.
pub fn fit_within(width: f32, height: f32, max_width: f32, max_height: f32) -> (f32, f32) {
    if width > max_width || height > max_height {
        let ratio = (max_width / width).min(max_height / height);
        (width * ratio, height * ratio)
    } else {
        (width, height)
    }
}

pub struct Editor {
    config: EditorConfig,
    store: LayerStore,
    history: HistoryEngine,
    canvas: CanvasState,
    drag: DragTool,
    transform: TransformTool,
    draft: Option<TextEditDraft>,
    catalog: FontCatalog,
    fonts: FontLoads,
    font_loader: Box<dyn FontLoader>,
    storage: Box<dyn SessionStorage>,
    clock: Box<dyn Clock>,
    /// When the next autosave is due; `None` when nothing changed.
    autosave_due: Option<u64>,
}

impl Editor {
    pub fn new(
        config: EditorConfig,
        storage: impl SessionStorage + 'static,
        clock: impl Clock + 'static,
        font_loader: impl FontLoader + 'static,
    ) -> Self {
        Self {
            store: LayerStore::new(),
            history: HistoryEngine::from_config(&config),
            canvas: default_canvas(&config),
            drag: DragTool::new(),
            transform: TransformTool::new(),
            draft: None,
            catalog: FontCatalog::default(),
            fonts: FontLoads::from_config(&config),
            font_loader: Box::new(font_loader),
            storage: Box::new(storage),
            clock: Box::new(clock),
            autosave_due: None,
            config,
        }
    }

    // ─── Lifecycle ───────────────────────────────────────────────────────

    /// Restore the saved session, if there is a usable one.
    /// Returns whether a session was loaded.
    pub fn init(&mut self) -> bool {
        let stored = match self.storage.get(&self.config.storage_key) {
            Ok(stored) => stored,
            Err(e) => {
                log::warn!("could not read saved session: {e}");
                None
            }
        };
        let Some(record) = stored.as_deref().and_then(SessionRecord::from_json) else {
            log::debug!("no saved session");
            return false;
        };

        let (layers, canvas) = record.into_parts();
        let families: BTreeSet<String> = layers.iter().map(|l| l.font_family.clone()).collect();
        log::info!("restored session with {} layer(s)", layers.len());
        self.store.restore(layers, None);
        self.canvas = canvas;
        for family in &families {
            self.load_font(family);
        }
        true
    }

    /// End the session: write pending work, then cancel every timer.
    pub fn teardown(&mut self) {
        let now = self.now();
        self.history.flush(&self.store, now);
        if self.autosave_due.take().is_some()
            && let Err(e) = self.save_now()
        {
            log::warn!("final save failed: {e}");
        }
        self.fonts.cancel_all();
        self.drag.cancel();
        self.transform.cancel();
        self.draft = None;
    }

    /// Back to an empty canvas: layers, history, timers, and the saved
    /// session are all discarded.
    pub fn reset(&mut self) -> Result<()> {
        self.store.clear();
        self.canvas = default_canvas(&self.config);
        self.history.clear();
        self.drag.cancel();
        self.transform.cancel();
        self.draft = None;
        self.autosave_due = None;
        self.fonts.cancel_all();
        self.storage.remove(&self.config.storage_key)?;
        log::info!("session reset");
        Ok(())
    }

    /// Fire every due timer: deferred history records, font probes, and
    /// the autosave.
    pub fn tick(&mut self) {
        let now = self.now();
        self.sync();
        self.history.tick(&self.store, now);

        let settled = self.fonts.poll(self.font_loader.as_ref(), now);
        for (family, status) in settled {
            log::debug!("font {family:?} settled: {status:?}");
        }

        if self.autosave_due.is_some_and(|due| now >= due) {
            self.autosave_due = None;
            if let Err(e) = self.save_now() {
                log::warn!("autosave failed: {e}");
            }
        }
    }

    /// Write the session record immediately. Returns `Ok(false)` when there
    /// is nothing worth saving (no layers, no background).
    pub fn save_now(&mut self) -> Result<bool> {
        if !SessionRecord::has_content(&self.store, &self.canvas) {
            log::debug!("autosave skipped: empty session");
            return Ok(false);
        }
        let json = SessionRecord::capture(&self.store, &self.canvas, self.now()).to_json()?;
        self.storage.set(&self.config.storage_key, &json)?;
        log::debug!("session saved ({} bytes)", json.len());
        Ok(true)
    }

    // ─── Layer operations ────────────────────────────────────────────────

    /// Add a default-styled layer centered on the canvas and select it.
    pub fn add_layer(&mut self) -> Result<LayerId> {
        let id = self.store.next_id(self.now());
        let layer = TextLayer::centered(id, &self.canvas);
        let family = layer.font_family.clone();
        self.commit(LayerMutation::Add {
            layer: Box::new(layer),
        })?;
        self.load_font(&family);
        Ok(id)
    }

    /// Copy a layer, offset on both axes, and select the copy.
    pub fn duplicate_layer(&mut self, id: LayerId) -> Result<LayerId> {
        let new_id = self.store.next_id(self.now());
        let offset = self.config.duplicate_offset;
        self.commit(LayerMutation::Duplicate {
            id,
            new_id,
            dx: offset,
            dy: offset,
        })?;
        Ok(new_id)
    }

    /// Swap a layer with its neighbour. `Ok(false)` at either end of the
    /// list, in which case nothing is recorded.
    pub fn reorder_layer(&mut self, id: LayerId, direction: Reorder) -> Result<bool> {
        self.commit(LayerMutation::Reorder { id, direction })
    }

    pub fn toggle_visibility(&mut self, id: LayerId) -> Result<()> {
        self.commit(LayerMutation::ToggleVisibility { id })?;
        Ok(())
    }

    /// Delete a layer once `confirm` agrees to [`DELETE_PROMPT`].
    /// Returns whether the layer was removed.
    pub fn delete_layer(&mut self, id: LayerId, confirm: impl FnOnce(&str) -> bool) -> Result<bool> {
        if !self.store.contains(id) {
            return Err(EditorError::UnknownLayer(id));
        }
        if !confirm(DELETE_PROMPT) {
            log::debug!("delete of {id} declined");
            return Ok(false);
        }
        self.commit(LayerMutation::Remove { id })?;
        if self.draft.as_ref().is_some_and(|d| d.layer_id == id) {
            self.draft = None;
        }
        Ok(true)
    }

    /// Apply a batch of style/content changes to one layer.
    pub fn edit_layer(&mut self, id: LayerId, patch: LayerPatch) -> Result<()> {
        let family = patch.font_family.clone();
        self.commit(LayerMutation::Edit {
            id,
            patch: Box::new(patch),
        })?;
        if let Some(family) = family {
            self.load_font(&family);
        }
        Ok(())
    }

    /// Change the selection. Not recorded in history.
    pub fn select(&mut self, id: Option<LayerId>) -> Result<()> {
        self.sync();
        self.flush_pending();
        self.store.select(id)?;
        Ok(())
    }

    /// Move the selected layer by `(dx, dy)`. `Ok(false)` without a selection.
    pub fn nudge(&mut self, dx: f32, dy: f32) -> Result<bool> {
        let Some(layer) = self.store.selected_layer() else {
            return Ok(false);
        };
        let mutation = LayerMutation::Move {
            id: layer.id,
            x: layer.x + dx,
            y: layer.y + dy,
        };
        self.commit(mutation)
    }

    // ─── Text edit dialog ────────────────────────────────────────────────

    /// Open the edit dialog on a layer, replacing any open draft.
    pub fn open_text_edit(&mut self, id: LayerId) -> Result<&mut TextEditDraft> {
        let layer = self.store.get(id).ok_or(EditorError::UnknownLayer(id))?;
        let draft = TextEditDraft::from_layer(layer);
        Ok(self.draft.insert(draft))
    }

    pub fn draft(&self) -> Option<&TextEditDraft> {
        self.draft.as_ref()
    }

    pub fn draft_mut(&mut self) -> Option<&mut TextEditDraft> {
        self.draft.as_mut()
    }

    /// Save the open draft as one "Edit Text" entry. `Ok(false)` when no
    /// dialog is open. On error the draft stays open.
    pub fn commit_text_edit(&mut self) -> Result<bool> {
        let Some(draft) = self.draft.take() else {
            return Ok(false);
        };
        if let Err(e) = self.edit_layer(draft.layer_id, draft.to_patch()) {
            self.draft = Some(draft);
            return Err(e);
        }
        Ok(true)
    }

    pub fn cancel_text_edit(&mut self) {
        self.draft = None;
    }

    // ─── Input ───────────────────────────────────────────────────────────

    /// Dispatch one input event. `confirm` answers the delete prompt for
    /// Delete/Backspace key events.
    pub fn handle_event(
        &mut self,
        event: &InputEvent,
        confirm: impl FnOnce(&str) -> bool,
    ) -> Result<()> {
        self.sync();
        match event {
            InputEvent::PointerDown { x, y } => {
                let hit = hit_test(self.store.layers(), *x, *y);
                self.flush_pending();
                self.store.select(hit)?;
                self.route(event)
            }
            InputEvent::DoubleClick { x, y } => {
                if let Some(id) = hit_test(self.store.layers(), *x, *y) {
                    self.open_text_edit(id)?;
                }
                Ok(())
            }
            InputEvent::Key { key, modifiers } => {
                self.handle_key(key, *modifiers, confirm)?;
                Ok(())
            }
            _ => self.route(event),
        }
    }

    /// Resolve and run a keyboard shortcut. Keys are ignored while the text
    /// dialog is open. Returns the action that ran, if any.
    pub fn handle_key(
        &mut self,
        key: &str,
        modifiers: Modifiers,
        confirm: impl FnOnce(&str) -> bool,
    ) -> Result<Option<ShortcutAction>> {
        if self.draft.is_some() {
            return Ok(None);
        }
        let Some(action) = ShortcutMap::resolve(key, modifiers) else {
            return Ok(None);
        };
        let selected = self.store.selected();
        match action {
            ShortcutAction::Undo => {
                self.undo();
            }
            ShortcutAction::Redo => {
                self.redo();
            }
            ShortcutAction::Duplicate => {
                if let Some(id) = selected {
                    self.duplicate_layer(id)?;
                }
            }
            ShortcutAction::Delete => {
                if let Some(id) = selected {
                    self.delete_layer(id, confirm)?;
                }
            }
            ShortcutAction::Deselect => self.select(None)?,
            ShortcutAction::Nudge { dx, dy, large } => {
                let step = if large {
                    self.config.nudge_step_large
                } else {
                    self.config.nudge_step
                };
                self.nudge(dx as f32 * step, dy as f32 * step)?;
            }
        }
        Ok(Some(action))
    }

    pub fn undo(&mut self) -> Option<String> {
        self.sync();
        self.drag.cancel();
        self.transform.cancel();
        let now = self.now();
        let label = self.history.undo(&mut self.store, now)?;
        self.touch();
        Some(label)
    }

    pub fn redo(&mut self) -> Option<String> {
        self.sync();
        self.drag.cancel();
        self.transform.cancel();
        let now = self.now();
        let label = self.history.redo(&mut self.store, now)?;
        self.touch();
        Some(label)
    }

    fn route(&mut self, event: &InputEvent) -> Result<()> {
        let ctx = ToolContext {
            store: &self.store,
            canvas: &self.canvas,
            snap_threshold: self.config.snap_threshold,
            min_size: self.config.min_size(),
        };
        let mut mutations = self.drag.handle(event, &ctx);
        mutations.extend(self.transform.handle(event, &ctx));

        for mutation in mutations {
            match mutation {
                LayerMutation::Move { .. } => self.commit_drag(mutation)?,
                other => {
                    self.commit(other)?;
                }
            }
        }
        Ok(())
    }

    /// Drag end: write the final position now, record after the settle delay.
    fn commit_drag(&mut self, mutation: LayerMutation) -> Result<()> {
        let now = self.now();
        self.history.flush(&self.store, now);
        let label = mutation.label();
        if self.store.apply(mutation)? {
            self.history
                .schedule(label, now + self.config.history_settle_ms);
            self.touch();
        }
        Ok(())
    }

    // ─── Canvas ──────────────────────────────────────────────────────────

    /// Use an uploaded PNG as the background, fitted into the upload box.
    /// Layers are kept. Not recorded in history.
    pub fn upload_image(&mut self, image: DecodedImage) -> Result<()> {
        if image.mime_type != PNG_MIME {
            return Err(EditorError::InvalidUpload(image.mime_type));
        }
        if image.width == 0 || image.height == 0 {
            return Err(EditorError::EmptyImage {
                width: image.width,
                height: image.height,
            });
        }
        let (width, height) = fit_within(
            image.width as f32,
            image.height as f32,
            self.config.max_canvas_width,
            self.config.max_canvas_height,
        );
        log::info!(
            "background {}x{} shown at {width}x{height}",
            image.width,
            image.height
        );
        self.canvas = CanvasState {
            background: Some(BackgroundImage {
                data_url: image.data_url,
                natural_width: image.width,
                natural_height: image.height,
            }),
            width,
            height,
            scale: 1.0,
        };
        self.touch();
        Ok(())
    }

    /// Flatten the composition at the background's native resolution.
    pub fn export(&mut self, surface: &mut dyn RenderSurface) -> Result<ExportedImage> {
        let Some(background) = self.canvas.background.clone() else {
            return Err(EditorError::MissingBackground);
        };
        let scale = ExportScale::for_canvas(&self.canvas).ok_or(EditorError::MissingBackground)?;
        self.render(surface);
        let data_url = surface.export_snapshot(scale, true)?;
        Ok(ExportedImage {
            data_url,
            width: background.natural_width,
            height: background.natural_height,
            file_name: format!("image-text-composition-{}.png", self.now()),
        })
    }

    /// Paint the current state: background, visible layers (with the live
    /// drag position), selection chrome, and snap guides.
    pub fn render(&mut self, surface: &mut dyn RenderSurface) {
        self.sync();
        surface.begin_frame(&self.canvas);

        let live = self.drag.session().filter(|s| s.moved).copied();
        for layer in self.store.visible() {
            let family = self.fonts.resolve(&layer.font_family);
            let dragged = live.filter(|s| s.id == layer.id);
            if dragged.is_none() && family == layer.font_family {
                surface.draw(layer);
                continue;
            }
            let mut shown = layer.clone();
            shown.font_family = family.to_owned();
            if let Some(s) = dragged {
                shown.x = s.x;
                shown.y = s.y;
            }
            surface.draw(&shown);
        }

        match self.store.selected() {
            Some(id) => surface.set_selection(&[id]),
            None => surface.set_selection(&[]),
        }
        surface.draw_guides(&self.drag.guide(), &self.canvas);
    }

    // ─── Fonts ───────────────────────────────────────────────────────────

    pub fn set_font_catalog(&mut self, json: &str) {
        self.catalog = FontCatalog::parse(json);
        log::debug!("font catalog: {} families", self.catalog.fonts.len());
    }

    pub fn font_catalog(&self) -> &FontCatalog {
        &self.catalog
    }

    pub fn load_font(&mut self, family: &str) {
        let now = self.now();
        self.fonts.load(self.font_loader.as_mut(), family, now);
    }

    /// Whether the selected layer's font can be drawn. True without a
    /// selection.
    pub fn fonts_ready(&self) -> bool {
        self.store
            .selected_layer()
            .is_none_or(|l| self.fonts.is_ready(&l.font_family))
    }

    pub fn fonts(&self) -> &FontLoads {
        &self.fonts
    }

    // ─── Queries ─────────────────────────────────────────────────────────

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn store(&self) -> &LayerStore {
        &self.store
    }

    pub fn layers(&self) -> &[TextLayer] {
        self.store.layers()
    }

    pub fn selected(&self) -> Option<LayerId> {
        self.store.selected()
    }

    pub fn canvas(&self) -> &CanvasState {
        &self.canvas
    }

    pub fn history(&self) -> &HistoryEngine {
        &self.history
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Guide lines of the current drag frame.
    pub fn guides(&self) -> SnapGuide {
        self.drag.guide()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.session().is_some()
    }

    /// Live position of the layer being dragged.
    pub fn drag_position(&self) -> Option<(LayerId, f32, f32)> {
        self.drag.session().map(|s| (s.id, s.x, s.y))
    }

    /// The box the resize handles show during a transform gesture.
    pub fn transform_box(&self) -> Option<BoundBox> {
        self.transform.live_box()
    }

    pub fn autosave_due(&self) -> Option<u64> {
        self.autosave_due
    }

    /// Earliest pending timer, so hosts can schedule the next `tick`.
    pub fn next_due(&self) -> Option<u64> {
        [
            self.autosave_due,
            self.history.next_due(),
            self.fonts.next_due(),
        ]
        .into_iter()
        .flatten()
        .min()
    }

    // ─── Internals ───────────────────────────────────────────────────────

    fn now(&self) -> u64 {
        self.clock.now_ms()
    }

    /// Write deferred drag records before the selection moves on, so they
    /// keep the selection of the moment the drag ended.
    fn flush_pending(&mut self) {
        let now = self.now();
        self.history.flush(&self.store, now);
    }

    /// Report the store revision to the history's replay guard.
    fn sync(&mut self) {
        self.history.observe(self.store.revision());
    }

    /// Restart the autosave quiet period.
    fn touch(&mut self) {
        self.autosave_due = Some(self.now() + self.config.autosave_debounce_ms);
    }

    /// Apply one mutation and record it. Pending drag records are written
    /// first so they capture the state before this action.
    fn commit(&mut self, mutation: LayerMutation) -> Result<bool> {
        self.sync();
        let now = self.now();
        self.history.flush(&self.store, now);

        let label = mutation.label();
        if !self.store.apply(mutation)? {
            return Ok(false);
        }
        self.history.record(&self.store, label, now);
        self.touch();
        Ok(true)
    }
}

fn default_canvas(config: &EditorConfig) -> CanvasState {
    CanvasState {
        width: config.default_canvas_width,
        height: config.default_canvas_height,
        ..CanvasState::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::fonts::SystemFonts;
    use crate::storage::MemoryStorage;
    use pretty_assertions::assert_eq;

    fn editor() -> (Editor, ManualClock) {
        let clock = ManualClock::new(1_000);
        let editor = Editor::new(
            EditorConfig::default(),
            MemoryStorage::new(),
            clock.clone(),
            SystemFonts,
        );
        (editor, clock)
    }

    #[test]
    fn fit_within_keeps_aspect() {
        assert_eq!(fit_within(2000.0, 1000.0, 1000.0, 700.0), (1000.0, 500.0));
        assert_eq!(fit_within(700.0, 1400.0, 1000.0, 700.0), (350.0, 700.0));
        assert_eq!(fit_within(640.0, 480.0, 1000.0, 700.0), (640.0, 480.0));
    }

    #[test]
    fn upload_rejects_non_png() {
        let (mut editor, _) = editor();
        let err = editor.upload_image(DecodedImage {
            mime_type: "image/jpeg".into(),
            data_url: "data:image/jpeg;base64,AAAA".into(),
            width: 10,
            height: 10,
        });
        assert!(matches!(err, Err(EditorError::InvalidUpload(_))));
        assert!(editor.canvas().background.is_none());
        assert_eq!(editor.autosave_due(), None);
    }

    #[test]
    fn upload_fits_canvas_and_keeps_natural_size() {
        let (mut editor, _) = editor();
        editor
            .upload_image(DecodedImage {
                mime_type: PNG_MIME.into(),
                data_url: "data:image/png;base64,AAAA".into(),
                width: 3000,
                height: 1500,
            })
            .unwrap();
        let canvas = editor.canvas();
        assert_eq!((canvas.width, canvas.height), (1000.0, 500.0));
        let bg = canvas.background.as_ref().unwrap();
        assert_eq!((bg.natural_width, bg.natural_height), (3000, 1500));
    }

    #[test]
    fn delete_needs_confirmation() {
        let (mut editor, _) = editor();
        let id = editor.add_layer().unwrap();
        let mut asked = String::new();
        let removed = editor
            .delete_layer(id, |prompt| {
                asked = prompt.to_owned();
                false
            })
            .unwrap();
        assert!(!removed);
        assert_eq!(asked, DELETE_PROMPT);
        assert_eq!(editor.layers().len(), 1);
        assert_eq!(editor.history().len(), 1);

        assert!(editor.delete_layer(id, |_| true).unwrap());
        assert!(editor.layers().is_empty());
        assert_eq!(editor.history().entries().last().unwrap().action, "Delete Layer");
    }

    #[test]
    fn text_edit_commit_records_once() {
        let (mut editor, _) = editor();
        let id = editor.add_layer().unwrap();
        editor.open_text_edit(id).unwrap().text = "Hello".into();
        assert_eq!(editor.layers()[0].text, "Double click to edit");

        assert!(editor.commit_text_edit().unwrap());
        assert_eq!(editor.layers()[0].text, "Hello");
        assert_eq!(editor.history().len(), 2);
        assert!(editor.draft().is_none());
    }

    #[test]
    fn cancelled_text_edit_changes_nothing() {
        let (mut editor, _) = editor();
        let id = editor.add_layer().unwrap();
        editor.open_text_edit(id).unwrap().text = "Discard me".into();
        editor.cancel_text_edit();
        assert!(!editor.commit_text_edit().unwrap());
        assert_eq!(editor.layers()[0].text, "Double click to edit");
        assert_eq!(editor.history().len(), 1);
    }

    #[test]
    fn invalid_draft_stays_open() {
        let (mut editor, _) = editor();
        let id = editor.add_layer().unwrap();
        editor.open_text_edit(id).unwrap().opacity = 3.0;
        assert!(matches!(
            editor.commit_text_edit(),
            Err(EditorError::InvalidEdit(_))
        ));
        assert!(editor.draft().is_some());
        assert_eq!(editor.history().len(), 1);
    }

    #[test]
    fn export_requires_background() {
        let (mut editor, _) = editor();
        let mut surface = caption_render::DisplayListSurface::new();
        assert!(matches!(
            editor.export(&mut surface),
            Err(EditorError::MissingBackground)
        ));
    }

    #[test]
    fn nudge_steps_by_shift() {
        let (mut editor, _) = editor();
        editor.add_layer().unwrap();
        let x0 = editor.layers()[0].x;
        editor
            .handle_key("ArrowRight", Modifiers::NONE, |_| true)
            .unwrap();
        let shift = Modifiers {
            shift: true,
            ..Modifiers::NONE
        };
        editor.handle_key("ArrowRight", shift, |_| true).unwrap();
        assert_eq!(editor.layers()[0].x, x0 + 11.0);
        assert_eq!(editor.history().len(), 3);
    }

    #[test]
    fn keys_ignored_while_dialog_open() {
        let (mut editor, _) = editor();
        let id = editor.add_layer().unwrap();
        editor.open_text_edit(id).unwrap();
        let ctrl = Modifiers {
            ctrl: true,
            ..Modifiers::NONE
        };
        assert_eq!(editor.handle_key("d", ctrl, |_| true).unwrap(), None);
        assert_eq!(editor.layers().len(), 1);
    }
}
