//! The layer store: ordered text layers plus the current selection.
//!
//! Every change goes through `LayerStore::apply`, which validates the whole
//! mutation before writing anything. Each successful change bumps the store
//! revision, which the history replay guard and autosave watch.

use crate::error::{EditorError, Result};
use crate::id::{IdGenerator, LayerId};
use crate::model::{LayerPatch, TextLayer};

/// Which neighbour a layer swaps with when reordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reorder {
    /// Toward index 0 (painted earlier).
    Up,
    /// Toward the end of the list (painted later).
    Down,
}

/// A committed change to the layer store.
#[derive(Debug, Clone, PartialEq)]
pub enum LayerMutation {
    Add {
        layer: Box<TextLayer>,
    },
    /// Clone `id` as `new_id`, shifted by `(dx, dy)`.
    Duplicate {
        id: LayerId,
        new_id: LayerId,
        dx: f32,
        dy: f32,
    },
    Reorder {
        id: LayerId,
        direction: Reorder,
    },
    ToggleVisibility {
        id: LayerId,
    },
    Remove {
        id: LayerId,
    },
    Edit {
        id: LayerId,
        patch: Box<LayerPatch>,
    },
    /// Absolute position (drag end, nudge).
    Move {
        id: LayerId,
        x: f32,
        y: f32,
    },
    /// Resize/rotate gesture end.
    Transform {
        id: LayerId,
        font_size: f32,
        rotation: f32,
    },
}

impl LayerMutation {
    /// The user-visible history label for this kind of change.
    pub fn label(&self) -> &'static str {
        match self {
            LayerMutation::Add { .. } => "Add Text Layer",
            LayerMutation::Duplicate { .. } => "Duplicate Layer",
            LayerMutation::Reorder {
                direction: Reorder::Up,
                ..
            } => "Move Layer Up",
            LayerMutation::Reorder {
                direction: Reorder::Down,
                ..
            } => "Move Layer Down",
            LayerMutation::ToggleVisibility { .. } => "Toggle Layer Visibility",
            LayerMutation::Remove { .. } => "Delete Layer",
            LayerMutation::Edit { .. } => "Edit Text",
            LayerMutation::Move { .. } => "Move Layer",
            LayerMutation::Transform { .. } => "Transform Layer",
        }
    }
}

/// Ordered layer list (paint order ascending) and selection.
#[derive(Debug, Clone, Default)]
pub struct LayerStore {
    layers: Vec<TextLayer>,
    selected: Option<LayerId>,
    revision: u64,
    ids: IdGenerator,
}

impl LayerStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ─── Queries ─────────────────────────────────────────────────────────

    pub fn layers(&self) -> &[TextLayer] {
        &self.layers
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn get(&self, id: LayerId) -> Option<&TextLayer> {
        self.layers.iter().find(|l| l.id == id)
    }

    pub fn index_of(&self, id: LayerId) -> Option<usize> {
        self.layers.iter().position(|l| l.id == id)
    }

    pub fn contains(&self, id: LayerId) -> bool {
        self.index_of(id).is_some()
    }

    pub fn selected(&self) -> Option<LayerId> {
        self.selected
    }

    pub fn selected_layer(&self) -> Option<&TextLayer> {
        self.selected.and_then(|id| self.get(id))
    }

    /// Visible layers in paint order.
    pub fn visible(&self) -> impl Iterator<Item = &TextLayer> {
        self.layers.iter().filter(|l| l.visible)
    }

    /// Monotonic change counter; bumps on every successful mutation.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// A fresh time-based ID not used by any layer in the store.
    pub fn next_id(&mut self, now_ms: u64) -> LayerId {
        loop {
            let id = self.ids.next(now_ms);
            if !self.contains(id) {
                return id;
            }
        }
    }

    // ─── Mutations ───────────────────────────────────────────────────────

    /// Change the selection. Unknown IDs are rejected. Returns whether the
    /// selection changed.
    pub fn select(&mut self, id: Option<LayerId>) -> Result<bool> {
        if let Some(id) = id
            && !self.contains(id)
        {
            return Err(EditorError::UnknownLayer(id));
        }
        if self.selected == id {
            return Ok(false);
        }
        self.selected = id;
        self.bump();
        Ok(true)
    }

    /// Apply one mutation. Returns `Ok(false)` for a valid no-op (reorder at
    /// a boundary). On error nothing has been written.
    pub fn apply(&mut self, mutation: LayerMutation) -> Result<bool> {
        match mutation {
            LayerMutation::Add { layer } => {
                finite("x", layer.x)?;
                finite("y", layer.y)?;
                finite("rotation", layer.rotation)?;
                if self.contains(layer.id) {
                    return Err(EditorError::DuplicateId(layer.id));
                }
                self.ids.observe(layer.id);
                self.selected = Some(layer.id);
                self.layers.push(*layer);
            }
            LayerMutation::Duplicate { id, new_id, dx, dy } => {
                finite("dx", dx)?;
                finite("dy", dy)?;
                if self.contains(new_id) {
                    return Err(EditorError::DuplicateId(new_id));
                }
                let mut copy = self.require(id)?.clone();
                copy.id = new_id;
                copy.x += dx;
                copy.y += dy;
                self.ids.observe(new_id);
                self.selected = Some(new_id);
                self.layers.push(copy);
            }
            LayerMutation::Reorder { id, direction } => {
                let idx = self.index_of(id).ok_or(EditorError::UnknownLayer(id))?;
                let other = match direction {
                    Reorder::Up if idx > 0 => idx - 1,
                    Reorder::Down if idx + 1 < self.layers.len() => idx + 1,
                    _ => return Ok(false),
                };
                self.layers.swap(idx, other);
            }
            LayerMutation::ToggleVisibility { id } => {
                let layer = self.require_mut(id)?;
                layer.visible = !layer.visible;
            }
            LayerMutation::Remove { id } => {
                let idx = self.index_of(id).ok_or(EditorError::UnknownLayer(id))?;
                self.layers.remove(idx);
                if self.selected == Some(id) {
                    self.selected = None;
                }
            }
            LayerMutation::Edit { id, patch } => {
                patch.validate().map_err(EditorError::InvalidEdit)?;
                patch.apply_to(self.require_mut(id)?);
            }
            LayerMutation::Move { id, x, y } => {
                finite("x", x)?;
                finite("y", y)?;
                let layer = self.require_mut(id)?;
                layer.x = x;
                layer.y = y;
            }
            LayerMutation::Transform {
                id,
                font_size,
                rotation,
            } => {
                if !(font_size.is_finite() && font_size > 0.0) {
                    return Err(EditorError::InvalidEdit(format!(
                        "font size must be positive, got {font_size}"
                    )));
                }
                finite("rotation", rotation)?;
                let layer = self.require_mut(id)?;
                layer.font_size = font_size;
                layer.rotation = rotation;
            }
        }
        self.bump();
        Ok(true)
    }

    /// Replace the whole sequence and selection (undo/redo, session load).
    pub fn restore(&mut self, layers: Vec<TextLayer>, selected: Option<LayerId>) {
        for layer in &layers {
            self.ids.observe(layer.id);
        }
        self.selected = selected.filter(|id| layers.iter().any(|l| l.id == *id));
        self.layers = layers;
        self.bump();
    }

    /// Drop every layer and the selection.
    pub fn clear(&mut self) {
        self.layers.clear();
        self.selected = None;
        self.bump();
    }

    fn require(&self, id: LayerId) -> Result<&TextLayer> {
        self.get(id).ok_or(EditorError::UnknownLayer(id))
    }

    fn require_mut(&mut self, id: LayerId) -> Result<&mut TextLayer> {
        self.layers
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or(EditorError::UnknownLayer(id))
    }

    fn bump(&mut self) {
        self.revision += 1;
    }
}

fn finite(name: &str, value: f32) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(EditorError::InvalidEdit(format!("{name} must be finite, got {value}")))
    }
}
