//! Input abstraction layer.
//!
//! Normalizes pointer, transform-handle, and keyboard events into one
//! `InputEvent` enum the editor dispatches on.

use caption_core::transform::BoundBox;

/// Modifier keys held during an event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    /// Ctrl on Windows/Linux, ⌘ on macOS.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Pointer pressed on the canvas.
    PointerDown { x: f32, y: f32 },
    /// Pointer moved (drag frame when a layer is grabbed).
    PointerMove { x: f32, y: f32 },
    /// Pointer released.
    PointerUp { x: f32, y: f32 },
    /// Double click, opens the text editor on the layer underneath.
    DoubleClick { x: f32, y: f32 },
    /// A resize handle proposes a new box for the selected layer.
    TransformMove { proposed: BoundBox },
    /// Resize/rotate gesture finished with the observed handle state.
    TransformEnd { scale_y: f32, rotation: f32 },
    Key { key: String, modifiers: Modifiers },
}
