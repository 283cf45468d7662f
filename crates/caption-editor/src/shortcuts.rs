//! Keyboard shortcut mapping.
//!
//! Maps key + modifier combos to semantic `ShortcutAction`s.
//! The shortcut map lives in Rust so it's shared across WASM and native.

use crate::input::Modifiers;

/// Actions that keyboard shortcuts can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    Undo,
    Redo,
    Duplicate,
    /// Delete the selected layer (asks for confirmation).
    Delete,
    Deselect,
    /// Move the selected layer one step; `large` is the Shift step.
    Nudge { dx: i8, dy: i8, large: bool },
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
    pub fn resolve(key: &str, modifiers: Modifiers) -> Option<ShortcutAction> {
        let cmd = modifiers.command();

        if cmd && modifiers.shift {
            return match key {
                "z" | "Z" => Some(ShortcutAction::Redo),
                _ => None,
            };
        }

        if cmd {
            return match key {
                "z" | "Z" => Some(ShortcutAction::Undo),
                "y" | "Y" => Some(ShortcutAction::Redo),
                "d" | "D" => Some(ShortcutAction::Duplicate),
                _ => None,
            };
        }

        let large = modifiers.shift;
        match key {
            "Delete" | "Backspace" if !large => Some(ShortcutAction::Delete),
            "Escape" => Some(ShortcutAction::Deselect),
            "ArrowLeft" => Some(ShortcutAction::Nudge { dx: -1, dy: 0, large }),
            "ArrowRight" => Some(ShortcutAction::Nudge { dx: 1, dy: 0, large }),
            "ArrowUp" => Some(ShortcutAction::Nudge { dx: 0, dy: -1, large }),
            "ArrowDown" => Some(ShortcutAction::Nudge { dx: 0, dy: 1, large }),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CTRL: Modifiers = Modifiers {
        ctrl: true,
        ..Modifiers::NONE
    };
    const META: Modifiers = Modifiers {
        meta: true,
        ..Modifiers::NONE
    };
    const SHIFT: Modifiers = Modifiers {
        shift: true,
        ..Modifiers::NONE
    };

    #[test]
    fn resolve_undo_redo() {
        // Cmd+Z → Undo
        assert_eq!(ShortcutMap::resolve("z", META), Some(ShortcutAction::Undo));
        // Ctrl+Z → Undo
        assert_eq!(ShortcutMap::resolve("z", CTRL), Some(ShortcutAction::Undo));
        // Cmd+Shift+Z → Redo
        let cmd_shift = Modifiers {
            shift: true,
            ..META
        };
        assert_eq!(
            ShortcutMap::resolve("Z", cmd_shift),
            Some(ShortcutAction::Redo)
        );
        // Ctrl+Y → Redo
        assert_eq!(ShortcutMap::resolve("y", CTRL), Some(ShortcutAction::Redo));
    }

    #[test]
    fn resolve_delete_and_escape() {
        assert_eq!(
            ShortcutMap::resolve("Delete", Modifiers::NONE),
            Some(ShortcutAction::Delete)
        );
        assert_eq!(
            ShortcutMap::resolve("Backspace", Modifiers::NONE),
            Some(ShortcutAction::Delete)
        );
        assert_eq!(
            ShortcutMap::resolve("Escape", Modifiers::NONE),
            Some(ShortcutAction::Deselect)
        );
        assert_eq!(ShortcutMap::resolve("Delete", CTRL), None);
    }

    #[test]
    fn resolve_arrow_nudges() {
        assert_eq!(
            ShortcutMap::resolve("ArrowLeft", Modifiers::NONE),
            Some(ShortcutAction::Nudge {
                dx: -1,
                dy: 0,
                large: false
            })
        );
        assert_eq!(
            ShortcutMap::resolve("ArrowDown", SHIFT),
            Some(ShortcutAction::Nudge {
                dx: 0,
                dy: 1,
                large: true
            })
        );
    }

    #[test]
    fn unbound_keys_resolve_to_none() {
        assert_eq!(ShortcutMap::resolve("q", Modifiers::NONE), None);
        assert_eq!(ShortcutMap::resolve("x", CTRL), None);
    }
}
