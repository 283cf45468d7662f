//! Tool system for canvas interactions.
//!
//! Each tool translates input events into `LayerMutation`s which the editor
//! applies to the store. Live gesture frames never touch the store: the
//! drag tool keeps the in-flight position itself and the editor paints it
//! over the stored one until the gesture ends.

use crate::input::InputEvent;
use caption_core::id::LayerId;
use caption_core::model::CanvasState;
use caption_core::snap::{SnapGuide, snap_to_center};
use caption_core::store::{LayerMutation, LayerStore};
use caption_core::transform::{BoundBox, MinSize, TransformEnd, bound_box};
use caption_render::hit_test;

/// What a tool can see while handling an event.
pub struct ToolContext<'a> {
    pub store: &'a LayerStore,
    pub canvas: &'a CanvasState,
    pub snap_threshold: f32,
    pub min_size: MinSize,
}

/// Trait for tools that handle input and produce mutations.
pub trait Tool {
    /// Handle an input event, returning zero or more mutations.
    fn handle(&mut self, event: &InputEvent, ctx: &ToolContext<'_>) -> Vec<LayerMutation>;

    /// Abandon any gesture in progress.
    fn cancel(&mut self);
}

// ─── Drag Tool ───────────────────────────────────────────────────────────

/// A layer being dragged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    pub id: LayerId,
    /// Pointer offset from the layer origin at grab time.
    grab: (f32, f32),
    /// Live (snapped) position.
    pub x: f32,
    pub y: f32,
    pub moved: bool,
}

#[derive(Debug, Default)]
pub struct DragTool {
    session: Option<DragSession>,
    guide: SnapGuide,
}

impl DragTool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    /// Guide lines for the current drag frame.
    pub fn guide(&self) -> SnapGuide {
        self.guide
    }
}

impl Tool for DragTool {
    fn handle(&mut self, event: &InputEvent, ctx: &ToolContext<'_>) -> Vec<LayerMutation> {
        match *event {
            InputEvent::PointerDown { x, y } => {
                self.guide = SnapGuide::HIDDEN;
                self.session = hit_test(ctx.store.layers(), x, y)
                    .and_then(|id| ctx.store.get(id))
                    .map(|layer| DragSession {
                        id: layer.id,
                        grab: (x - layer.x, y - layer.y),
                        x: layer.x,
                        y: layer.y,
                        moved: false,
                    });
                vec![]
            }
            InputEvent::PointerMove { x, y } => {
                let Some(session) = self.session else {
                    return vec![];
                };
                let Some(layer) = ctx.store.get(session.id) else {
                    // Layer vanished mid-drag (undo, delete).
                    self.cancel();
                    return vec![];
                };
                let snapped = snap_to_center(
                    (x - session.grab.0, y - session.grab.1),
                    layer.footprint(),
                    (ctx.canvas.width, ctx.canvas.height),
                    ctx.snap_threshold,
                );
                self.session = Some(DragSession {
                    x: snapped.x,
                    y: snapped.y,
                    moved: true,
                    ..session
                });
                self.guide = snapped.guide;
                vec![]
            }
            InputEvent::PointerUp { .. } => {
                self.guide = SnapGuide::HIDDEN;
                match self.session.take() {
                    Some(s) if s.moved && ctx.store.contains(s.id) => {
                        vec![LayerMutation::Move {
                            id: s.id,
                            x: s.x,
                            y: s.y,
                        }]
                    }
                    _ => vec![],
                }
            }
            _ => vec![],
        }
    }

    fn cancel(&mut self) {
        self.session = None;
        self.guide = SnapGuide::HIDDEN;
    }
}

// ─── Transform Tool ──────────────────────────────────────────────────────

/// Resize/rotate handles on the selected layer.
#[derive(Debug, Default)]
pub struct TransformTool {
    live: Option<BoundBox>,
}

impl TransformTool {
    pub fn new() -> Self {
        Self::default()
    }

    /// The box the handles currently show, if a gesture is in progress.
    pub fn live_box(&self) -> Option<BoundBox> {
        self.live
    }
}

impl Tool for TransformTool {
    fn handle(&mut self, event: &InputEvent, ctx: &ToolContext<'_>) -> Vec<LayerMutation> {
        let Some(layer) = ctx.store.selected_layer() else {
            return vec![];
        };
        match *event {
            InputEvent::TransformMove { proposed } => {
                let previous = self.live.unwrap_or_else(|| BoundBox::of_layer(layer));
                self.live = Some(bound_box(previous, proposed, ctx.min_size));
                vec![]
            }
            InputEvent::TransformEnd { scale_y, rotation } => {
                self.live = None;
                let end = TransformEnd::from_handles(layer, scale_y, rotation);
                vec![LayerMutation::Transform {
                    id: layer.id,
                    font_size: end.font_size,
                    rotation: end.rotation,
                }]
            }
            _ => vec![],
        }
    }

    fn cancel(&mut self) {
        self.live = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use caption_core::model::TextLayer;
    use pretty_assertions::assert_eq;

    fn store_with_layer(id: &str, x: f32, y: f32) -> (LayerStore, LayerId) {
        let mut store = LayerStore::new();
        let id = LayerId::intern(id);
        store
            .apply(LayerMutation::Add {
                layer: Box::new(TextLayer::new(id, x, y)),
            })
            .unwrap();
        (store, id)
    }

    fn ctx<'a>(store: &'a LayerStore, canvas: &'a CanvasState) -> ToolContext<'a> {
        ToolContext {
            store,
            canvas,
            snap_threshold: 10.0,
            min_size: MinSize::default(),
        }
    }

    #[test]
    fn drag_snaps_and_commits_move() {
        let (store, id) = store_with_layer("drag", 0.0, 0.0);
        let canvas = CanvasState::default();
        let mut tool = DragTool::new();

        tool.handle(&InputEvent::PointerDown { x: 10.0, y: 10.0 }, &ctx(&store, &canvas));
        assert!(tool.session().is_some());

        // Layer origin lands at (304, 0): center x 404 → snaps to 300.
        tool.handle(&InputEvent::PointerMove { x: 314.0, y: 10.0 }, &ctx(&store, &canvas));
        let s = tool.session().unwrap();
        assert_eq!((s.x, s.y), (300.0, 0.0));
        assert_eq!(tool.guide().vertical, Some(400.0));

        let out = tool.handle(&InputEvent::PointerUp { x: 314.0, y: 10.0 }, &ctx(&store, &canvas));
        assert_eq!(out, vec![LayerMutation::Move { id, x: 300.0, y: 0.0 }]);
        assert_eq!(tool.guide(), SnapGuide::HIDDEN);
        assert!(tool.session().is_none());
    }

    #[test]
    fn click_without_move_commits_nothing() {
        let (store, _) = store_with_layer("click", 0.0, 0.0);
        let canvas = CanvasState::default();
        let mut tool = DragTool::new();
        tool.handle(&InputEvent::PointerDown { x: 5.0, y: 5.0 }, &ctx(&store, &canvas));
        let out = tool.handle(&InputEvent::PointerUp { x: 5.0, y: 5.0 }, &ctx(&store, &canvas));
        assert!(out.is_empty());
    }

    #[test]
    fn pointer_down_on_background_grabs_nothing() {
        let (store, _) = store_with_layer("bg", 0.0, 0.0);
        let canvas = CanvasState::default();
        let mut tool = DragTool::new();
        tool.handle(&InputEvent::PointerDown { x: 700.0, y: 500.0 }, &ctx(&store, &canvas));
        assert!(tool.session().is_none());
    }

    #[test]
    fn transform_refuses_tiny_boxes_then_commits_font_size() {
        let (store, id) = store_with_layer("tf", 0.0, 0.0);
        let canvas = CanvasState::default();
        let mut tool = TransformTool::new();

        let tiny = BoundBox {
            x: 0.0,
            y: 0.0,
            width: 5.0,
            height: 5.0,
            rotation: 0.0,
        };
        tool.handle(&InputEvent::TransformMove { proposed: tiny }, &ctx(&store, &canvas));
        let layer = store.get(id).unwrap();
        assert_eq!(tool.live_box(), Some(BoundBox::of_layer(layer)));

        let out = tool.handle(
            &InputEvent::TransformEnd {
                scale_y: 1.5,
                rotation: 30.0,
            },
            &ctx(&store, &canvas),
        );
        assert_eq!(
            out,
            vec![LayerMutation::Transform {
                id,
                font_size: 48.0,
                rotation: 30.0
            }]
        );
        assert_eq!(tool.live_box(), None);
    }
}
