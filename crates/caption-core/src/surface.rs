//! The render surface capability.
//!
//! The editor never touches pixels. It hands layers to a `RenderSurface`
//! each frame and asks it for an export snapshot. The WASM bridge implements
//! this over a Canvas2D context; `caption-render` provides a headless
//! display-list implementation.

use crate::error::SurfaceError;
use crate::id::LayerId;
use crate::model::{CanvasState, TextLayer};
use crate::snap::SnapGuide;

/// Per-axis export multiplier (natural image size / canvas size).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExportScale {
    pub x: f32,
    pub y: f32,
}

impl ExportScale {
    pub const IDENTITY: ExportScale = ExportScale { x: 1.0, y: 1.0 };

    /// Scale that maps the canvas back to the background's native resolution.
    pub fn for_canvas(canvas: &CanvasState) -> Option<Self> {
        let bg = canvas.background.as_ref()?;
        if canvas.width <= 0.0 || canvas.height <= 0.0 {
            return None;
        }
        Some(Self {
            x: bg.natural_width as f32 / canvas.width,
            y: bg.natural_height as f32 / canvas.height,
        })
    }
}

pub trait RenderSurface {
    /// Start a new frame: clear and paint the background.
    fn begin_frame(&mut self, _canvas: &CanvasState) {}

    /// Draw one visible layer. Called in paint order.
    fn draw(&mut self, layer: &TextLayer);

    /// Mark the layers that get selection chrome (transform handles).
    fn set_selection(&mut self, ids: &[LayerId]);

    /// Overlay the snap guide lines for the current drag frame.
    fn draw_guides(&mut self, _guide: &SnapGuide, _canvas: &CanvasState) {}

    /// Flatten the last frame at `scale` and return it as a data URL.
    fn export_snapshot(
        &mut self,
        scale: ExportScale,
        hide_selection_chrome: bool,
    ) -> Result<String, SurfaceError>;
}
