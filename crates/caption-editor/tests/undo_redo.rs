//! Integration tests: editor actions → history → undo/redo (caption-editor).
//!
//! Drives the `Editor` the way a host does and checks the history it builds
//! across the core/editor crate boundary.

use caption_core::config::{EditorConfig, ReplayGuard};
use caption_core::model::LayerPatch;
use caption_core::store::Reorder;
use caption_editor::{Editor, ManualClock, MemoryStorage, SystemFonts};
use pretty_assertions::assert_eq;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn make_editor(config: EditorConfig) -> (Editor, ManualClock) {
    init_logger();
    let clock = ManualClock::new(1_700_000_000_000);
    let editor = Editor::new(config, MemoryStorage::new(), clock.clone(), SystemFonts);
    (editor, clock)
}

fn labels(editor: &Editor) -> Vec<String> {
    editor
        .history()
        .entries()
        .map(|e| e.action.clone())
        .collect()
}

fn text_patch(text: &str) -> LayerPatch {
    LayerPatch {
        text: Some(text.into()),
        ..Default::default()
    }
}

// ─── End to end ─────────────────────────────────────────────────────────

#[test]
fn add_edit_undo_add_truncates_redo_branch() {
    let (mut editor, clock) = make_editor(EditorConfig::default());

    let a = editor.add_layer().unwrap();
    assert_eq!(editor.history().len(), 1);

    clock.advance(10);
    editor.edit_layer(a, text_patch("Hello")).unwrap();
    assert_eq!(editor.history().len(), 2);

    clock.advance(10);
    assert_eq!(editor.undo().as_deref(), Some("Edit Text"));
    assert_eq!(editor.history().len(), 2);
    assert_eq!(editor.history().cursor(), Some(0));
    assert_eq!(editor.layers()[0].text, "Double click to edit");
    assert!(editor.can_redo());

    clock.advance(10);
    let b = editor.add_layer().unwrap();
    assert_ne!(a, b);
    assert_eq!(editor.history().len(), 2);
    assert_eq!(labels(&editor), vec!["Add Text Layer", "Add Text Layer"]);
    assert!(!editor.can_redo());

    assert_eq!(editor.redo(), None);
    assert_eq!(editor.layers().len(), 2);
}

#[test]
fn undo_then_redo_restores_layers_and_selection() {
    let (mut editor, clock) = make_editor(EditorConfig::default());
    let a = editor.add_layer().unwrap();
    clock.advance(1);
    editor.duplicate_layer(a).unwrap();
    clock.advance(1);
    editor.toggle_visibility(a).unwrap();

    let layers = editor.layers().to_vec();
    let selected = editor.selected();

    editor.undo().unwrap();
    assert!(editor.layers()[0].visible);
    editor.redo().unwrap();
    assert_eq!(editor.layers(), layers.as_slice());
    assert_eq!(editor.selected(), selected);
}

#[test]
fn undo_then_redo_round_trips_at_every_interior_cursor() {
    let (mut editor, clock) = make_editor(EditorConfig::default());
    let a = editor.add_layer().unwrap();
    clock.advance(1);
    editor.edit_layer(a, text_patch("one")).unwrap();
    clock.advance(1);
    let b = editor.add_layer().unwrap();
    clock.advance(1);
    let c = editor.duplicate_layer(b).unwrap();
    clock.advance(1);
    assert!(editor.reorder_layer(c, Reorder::Up).unwrap());
    clock.advance(1);
    editor.toggle_visibility(a).unwrap();
    clock.advance(1);
    editor.select(Some(a)).unwrap();
    editor.edit_layer(a, text_patch("two")).unwrap();

    let len = editor.history().len();
    assert_eq!(len, 7);
    for cursor in (1..len - 1).rev() {
        while editor.history().cursor() > Some(cursor) {
            editor.undo().unwrap();
        }
        let snapshot = editor.history().current().unwrap().clone();
        assert_eq!(editor.layers(), snapshot.layers.as_slice());
        assert_eq!(editor.selected(), snapshot.selected);

        editor.undo().unwrap();
        editor.redo().unwrap();
        assert_eq!(editor.history().cursor(), Some(cursor));
        assert_eq!(editor.layers(), snapshot.layers.as_slice());
        assert_eq!(editor.selected(), snapshot.selected);
    }
}

#[test]
fn undo_at_start_and_redo_at_end_are_noops() {
    let (mut editor, _) = make_editor(EditorConfig::default());
    assert_eq!(editor.undo(), None);
    editor.add_layer().unwrap();
    assert_eq!(editor.undo(), None);
    assert_eq!(editor.redo(), None);
    assert_eq!(editor.layers().len(), 1);
}

// ─── Capacity ───────────────────────────────────────────────────────────

#[test]
fn history_never_exceeds_capacity() {
    let (mut editor, clock) = make_editor(EditorConfig::default());
    let a = editor.add_layer().unwrap();
    for i in 0..40 {
        clock.advance(1);
        editor.edit_layer(a, text_patch(&format!("v{i}"))).unwrap();
        assert!(editor.history().len() <= 25);
    }
    assert_eq!(editor.history().len(), 25);
    // Oldest 16 entries (the add and v0..v14) were evicted.
    let first = editor.history().entries().next().unwrap();
    assert_eq!(first.layers[0].text, "v15");
    assert_eq!(editor.history().undo_steps(), 24);
}

// ─── Labels ─────────────────────────────────────────────────────────────

#[test]
fn every_action_records_its_label() {
    let (mut editor, clock) = make_editor(EditorConfig::default());
    let a = editor.add_layer().unwrap();
    clock.advance(1);
    let b = editor.duplicate_layer(a).unwrap();
    editor.reorder_layer(b, Reorder::Up).unwrap();
    editor.reorder_layer(b, Reorder::Down).unwrap();
    editor.toggle_visibility(b).unwrap();
    editor.edit_layer(b, text_patch("x")).unwrap();
    editor.delete_layer(b, |_| true).unwrap();

    assert_eq!(
        labels(&editor),
        vec![
            "Add Text Layer",
            "Duplicate Layer",
            "Move Layer Up",
            "Move Layer Down",
            "Toggle Layer Visibility",
            "Edit Text",
            "Delete Layer",
        ]
    );
}

#[test]
fn reorder_at_boundary_records_nothing() {
    let (mut editor, clock) = make_editor(EditorConfig::default());
    let a = editor.add_layer().unwrap();
    clock.advance(1);
    let b = editor.add_layer().unwrap();

    assert!(!editor.reorder_layer(a, Reorder::Up).unwrap());
    assert!(!editor.reorder_layer(b, Reorder::Down).unwrap());
    assert_eq!(editor.history().len(), 2);
}

#[test]
fn duplicate_offsets_and_selects_copy() {
    let (mut editor, clock) = make_editor(EditorConfig::default());
    let a = editor.add_layer().unwrap();
    clock.advance(1);
    let b = editor.duplicate_layer(a).unwrap();

    let src = editor.store().get(a).unwrap();
    let dup = editor.store().get(b).unwrap();
    assert_ne!(a, b);
    assert_eq!((dup.x, dup.y), (src.x + 20.0, src.y + 20.0));
    assert_eq!(editor.selected(), Some(b));
}

#[test]
fn deleting_other_layer_keeps_selection() {
    let (mut editor, clock) = make_editor(EditorConfig::default());
    let a = editor.add_layer().unwrap();
    clock.advance(1);
    let b = editor.add_layer().unwrap();
    assert_eq!(editor.selected(), Some(b));

    editor.delete_layer(a, |_| true).unwrap();
    assert_eq!(editor.selected(), Some(b));
    editor.delete_layer(b, |_| true).unwrap();
    assert_eq!(editor.selected(), None);
}

#[test]
fn failed_edit_leaves_history_alone() {
    let (mut editor, _) = make_editor(EditorConfig::default());
    let a = editor.add_layer().unwrap();
    let patch = LayerPatch {
        font_size: Some(0.0),
        ..Default::default()
    };
    assert!(editor.edit_layer(a, patch).is_err());
    assert_eq!(editor.history().len(), 1);
    assert_eq!(editor.autosave_due(), Some(1_700_000_001_000));
}

// ─── Replay guard ───────────────────────────────────────────────────────

#[test]
fn timed_guard_suppresses_records_inside_settle_window() {
    let config = EditorConfig {
        replay_guard: ReplayGuard::Timed { settle_ms: 100 },
        ..EditorConfig::default()
    };
    let (mut editor, clock) = make_editor(config);
    let a = editor.add_layer().unwrap();
    clock.advance(1);
    editor.edit_layer(a, text_patch("one")).unwrap();

    clock.advance(1);
    editor.undo().unwrap();
    assert!(editor.history().is_replaying());

    // Inside the window the change lands in the store but is not recorded.
    clock.advance(50);
    editor.edit_layer(a, text_patch("two")).unwrap();
    assert_eq!(editor.layers()[0].text, "two");
    assert_eq!(editor.history().len(), 2);

    clock.advance(50);
    editor.tick();
    assert!(!editor.history().is_replaying());
    editor.edit_layer(a, text_patch("three")).unwrap();
    assert_eq!(editor.history().len(), 2);
    assert_eq!(editor.history().current().unwrap().layers[0].text, "three");
}

#[test]
fn observed_guard_lets_next_action_record() {
    let (mut editor, clock) = make_editor(EditorConfig::default());
    let a = editor.add_layer().unwrap();
    clock.advance(1);
    editor.edit_layer(a, text_patch("one")).unwrap();
    editor.undo().unwrap();
    // No tick or render needed: the restore already bumped the store.
    editor.edit_layer(a, text_patch("two")).unwrap();
    assert_eq!(editor.history().len(), 2);
    assert!(!editor.history().is_replaying());
}
