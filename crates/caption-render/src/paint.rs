//! Layer list → display list.
//!
//! `DisplayListSurface` is the headless `RenderSurface`: each frame it records
//! the paint operations a raster backend would perform (background, text runs
//! with their transforms and shadows, selection chrome, guide lines). Export
//! re-emits the retained frame at the requested scale as a JSON data URL.

use caption_core::error::SurfaceError;
use caption_core::id::LayerId;
use caption_core::model::{CanvasState, LINE_HEIGHT, TextAlign, TextLayer};
use caption_core::snap::SnapGuide;
use caption_core::surface::{ExportScale, RenderSurface};
use kurbo::{Affine, Vec2};
use serde::Serialize;

/// Layer-local → canvas transform: translate to (x, y), then rotate about
/// that origin (degrees, clockwise on a y-down canvas).
pub fn layer_transform(layer: &TextLayer) -> Affine {
    Affine::translate(Vec2::new(layer.x as f64, layer.y as f64))
        * Affine::rotate((layer.rotation as f64).to_radians())
}

/// X offset of the text anchor inside the footprint for the layer's
/// alignment.
pub fn text_anchor(layer: &TextLayer) -> f32 {
    let (w, _) = layer.footprint();
    match layer.align {
        TextAlign::Left => 0.0,
        TextAlign::Center => w / 2.0,
        TextAlign::Right => w,
    }
}

// ─── Paint operations ────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShadowOp {
    pub color: String,
    pub blur: f32,
    pub offset_x: f32,
    pub offset_y: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum PaintOp {
    #[serde(rename_all = "camelCase")]
    Background {
        width: f32,
        height: f32,
        has_image: bool,
    },
    #[serde(rename_all = "camelCase")]
    Text {
        id: LayerId,
        lines: Vec<String>,
        font: String,
        fill: String,
        opacity: f32,
        align: TextAlign,
        anchor_x: f32,
        line_height: f32,
        /// Affine coefficients `[a, b, c, d, e, f]`.
        transform: [f64; 6],
        #[serde(skip_serializing_if = "Option::is_none")]
        shadow: Option<ShadowOp>,
    },
    #[serde(rename_all = "camelCase")]
    Selection {
        id: LayerId,
        width: f32,
        height: f32,
        transform: [f64; 6],
    },
    Guide {
        from: (f32, f32),
        to: (f32, f32),
    },
}

impl PaintOp {
    fn text(layer: &TextLayer) -> Self {
        let shadow = layer.shadow.enabled.then(|| ShadowOp {
            color: layer.shadow.color.to_css_rgba(layer.shadow.opacity),
            blur: layer.shadow.blur,
            offset_x: layer.shadow.offset_x,
            offset_y: layer.shadow.offset_y,
        });
        PaintOp::Text {
            id: layer.id,
            lines: layer.text.lines().map(str::to_owned).collect(),
            font: layer.css_font(),
            fill: layer.fill.to_hex(),
            opacity: layer.opacity,
            align: layer.align,
            anchor_x: text_anchor(layer),
            line_height: layer.font_size * LINE_HEIGHT,
            transform: layer_transform(layer).as_coeffs(),
            shadow,
        }
    }

    /// The op as it appears in an export at `scale`.
    fn scaled(&self, scale: Affine) -> Self {
        let mut op = self.clone();
        match &mut op {
            PaintOp::Background { width, height, .. } => {
                let p = scale * kurbo::Point::new(*width as f64, *height as f64);
                *width = p.x as f32;
                *height = p.y as f32;
            }
            PaintOp::Text { transform, .. } | PaintOp::Selection { transform, .. } => {
                *transform = (scale * Affine::new(*transform)).as_coeffs();
            }
            PaintOp::Guide { from, to } => {
                for p in [from, to] {
                    let q = scale * kurbo::Point::new(p.0 as f64, p.1 as f64);
                    *p = (q.x as f32, q.y as f32);
                }
            }
        }
        op
    }
}

// ─── Frame ───────────────────────────────────────────────────────────────

/// One recorded frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Frame {
    pub ops: Vec<PaintOp>,
}

impl Frame {
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// IDs of the text runs in paint order.
    pub fn text_ids(&self) -> Vec<LayerId> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                PaintOp::Text { id, .. } => Some(*id),
                _ => None,
            })
            .collect()
    }
}

// ─── Surface ─────────────────────────────────────────────────────────────

/// Headless render surface recording a display list.
#[derive(Debug, Default)]
pub struct DisplayListSurface {
    frame: Frame,
    /// Layers drawn this frame, needed to place selection chrome.
    drawn: Vec<TextLayer>,
    selection: Vec<LayerId>,
    guides: Vec<PaintOp>,
}

impl DisplayListSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// The frame as currently displayed (with chrome and guides).
    pub fn frame(&self) -> Frame {
        self.compose(Affine::IDENTITY, false, true)
    }

    fn compose(&self, scale: Affine, hide_selection_chrome: bool, with_guides: bool) -> Frame {
        let mut ops: Vec<PaintOp> = self.frame.ops.iter().map(|op| op.scaled(scale)).collect();
        if !hide_selection_chrome {
            for layer in self.drawn.iter().filter(|l| self.selection.contains(&l.id)) {
                let (width, height) = layer.footprint();
                let chrome = PaintOp::Selection {
                    id: layer.id,
                    width,
                    height,
                    transform: layer_transform(layer).as_coeffs(),
                };
                ops.push(chrome.scaled(scale));
            }
        }
        if with_guides {
            ops.extend(self.guides.iter().map(|g| g.scaled(scale)));
        }
        Frame { ops }
    }
}

impl RenderSurface for DisplayListSurface {
    fn begin_frame(&mut self, canvas: &CanvasState) {
        self.frame.ops.clear();
        self.drawn.clear();
        self.guides.clear();
        self.frame.ops.push(PaintOp::Background {
            width: canvas.width,
            height: canvas.height,
            has_image: canvas.background.is_some(),
        });
    }

    fn draw(&mut self, layer: &TextLayer) {
        log::trace!("TEXT {} {:?} at ({}, {})", layer.id, layer.text, layer.x, layer.y);
        self.frame.ops.push(PaintOp::text(layer));
        self.drawn.push(layer.clone());
    }

    fn set_selection(&mut self, ids: &[LayerId]) {
        self.selection = ids.to_vec();
    }

    fn draw_guides(&mut self, guide: &SnapGuide, canvas: &CanvasState) {
        if !guide.show {
            return;
        }
        if let Some(x) = guide.vertical {
            self.guides.push(PaintOp::Guide {
                from: (x, 0.0),
                to: (x, canvas.height),
            });
        }
        if let Some(y) = guide.horizontal {
            self.guides.push(PaintOp::Guide {
                from: (0.0, y),
                to: (canvas.width, y),
            });
        }
    }

    fn export_snapshot(
        &mut self,
        scale: ExportScale,
        hide_selection_chrome: bool,
    ) -> Result<String, SurfaceError> {
        if self.frame.is_empty() {
            return Err(SurfaceError::EmptyFrame);
        }
        let affine = Affine::scale_non_uniform(scale.x as f64, scale.y as f64);
        let frame = self.compose(affine, hide_selection_chrome, false);
        let json =
            serde_json::to_string(&frame).map_err(|e| SurfaceError::Backend(e.to_string()))?;
        log::debug!(
            "exported display list: {} ops at {}x{}",
            frame.ops.len(),
            scale.x,
            scale.y
        );
        Ok(format!("data:application/json,{json}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use caption_core::model::BackgroundImage;
    use pretty_assertions::assert_eq;

    fn canvas() -> CanvasState {
        CanvasState {
            background: Some(BackgroundImage {
                data_url: "data:image/png;base64,AAAA".into(),
                natural_width: 1600,
                natural_height: 1200,
            }),
            ..CanvasState::default()
        }
    }

    #[test]
    fn export_before_any_frame_fails() {
        let mut surface = DisplayListSurface::new();
        assert_eq!(
            surface.export_snapshot(ExportScale::IDENTITY, true),
            Err(SurfaceError::EmptyFrame)
        );
    }

    #[test]
    fn selection_chrome_hidden_on_export() {
        let layer = TextLayer::new(LayerId::intern("sel"), 10.0, 20.0);
        let mut surface = DisplayListSurface::new();
        surface.begin_frame(&canvas());
        surface.draw(&layer);
        surface.set_selection(&[layer.id]);

        assert!(
            surface
                .frame()
                .ops
                .iter()
                .any(|op| matches!(op, PaintOp::Selection { .. }))
        );
        let url = surface
            .export_snapshot(ExportScale { x: 2.0, y: 2.0 }, true)
            .unwrap();
        assert!(url.starts_with("data:application/json,"));
        assert!(!url.contains("\"selection\""));
        assert!(url.contains("\"width\":1600.0"));
    }

    #[test]
    fn export_scales_text_transform() {
        let layer = TextLayer::new(LayerId::intern("scaled"), 10.0, 20.0);
        let mut surface = DisplayListSurface::new();
        surface.begin_frame(&canvas());
        surface.draw(&layer);
        let frame = surface.compose(Affine::scale(2.0), true, false);
        let PaintOp::Text { transform, .. } = &frame.ops[1] else {
            panic!("expected text op");
        };
        assert_eq!(transform, &[2.0, 0.0, 0.0, 2.0, 20.0, 40.0]);
    }

    #[test]
    fn guides_only_on_screen() {
        let mut surface = DisplayListSurface::new();
        let canvas = canvas();
        surface.begin_frame(&canvas);
        surface.draw_guides(
            &SnapGuide {
                vertical: Some(400.0),
                horizontal: None,
                show: true,
            },
            &canvas,
        );
        assert_eq!(
            surface.frame().ops.last(),
            Some(&PaintOp::Guide {
                from: (400.0, 0.0),
                to: (400.0, 600.0)
            })
        );
        let url = surface.export_snapshot(ExportScale::IDENTITY, true).unwrap();
        assert!(!url.contains("\"guide\""));
    }

    #[test]
    fn disabled_shadow_is_omitted() {
        let mut layer = TextLayer::new(LayerId::intern("noshadow"), 0.0, 0.0);
        layer.shadow.enabled = false;
        let PaintOp::Text { shadow, .. } = PaintOp::text(&layer) else {
            panic!("expected text op");
        };
        assert_eq!(shadow, None);
    }
}
