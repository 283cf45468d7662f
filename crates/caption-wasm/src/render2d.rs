//! Canvas2D render surface.
//!
//! Draws straight to an HTML `<canvas>` as the editor walks its layers, and
//! keeps what it drew so `export_snapshot` can replay the frame onto an
//! offscreen canvas at the background's native resolution.

use caption_core::error::SurfaceError;
use caption_core::id::LayerId;
use caption_core::model::{CanvasState, LINE_HEIGHT, TextLayer};
use caption_core::snap::SnapGuide;
use caption_core::surface::{ExportScale, RenderSurface};
use caption_render::{layer_transform, text_anchor};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

const CHROME_STROKE: &str = "#3b82f6";
const HANDLE_FILL: &str = "#ffffff";
const EMPTY_FILL: &str = "#f3f4f6";

fn backend(e: JsValue) -> SurfaceError {
    SurfaceError::Backend(format!("{e:?}"))
}

/// Render surface over a visible `<canvas>` element.
pub struct Canvas2dSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    /// Decoded background, keyed by its data URL.
    background: Option<(String, HtmlImageElement)>,
    /// Canvas state of the last frame; `None` before the first frame.
    frame: Option<CanvasState>,
    drawn: Vec<TextLayer>,
    selection: Vec<LayerId>,
}

impl Canvas2dSurface {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = context_2d(&canvas)?;
        Ok(Self {
            canvas,
            ctx,
            background: None,
            frame: None,
            drawn: Vec::new(),
            selection: Vec::new(),
        })
    }

    /// The image element for `data_url`, created on first use. Drawing is
    /// skipped until the browser has decoded it.
    fn background_image(&mut self, data_url: &str) -> Option<HtmlImageElement> {
        match &self.background {
            Some((url, img)) if url == data_url => return Some(img.clone()),
            _ => {}
        }
        let img = HtmlImageElement::new().ok()?;
        img.set_src(data_url);
        self.background = Some((data_url.to_owned(), img.clone()));
        Some(img)
    }
}

impl RenderSurface for Canvas2dSurface {
    fn begin_frame(&mut self, canvas: &CanvasState) {
        let (w, h) = (canvas.width.round() as u32, canvas.height.round() as u32);
        if self.canvas.width() != w || self.canvas.height() != h {
            self.canvas.set_width(w);
            self.canvas.set_height(h);
        }
        let image = canvas
            .background
            .as_ref()
            .and_then(|bg| self.background_image(&bg.data_url));
        if image.is_none() {
            self.background = None;
        }
        paint_background(&self.ctx, canvas, image.as_ref());

        self.frame = Some(canvas.clone());
        self.drawn.clear();
        self.selection.clear();
    }

    fn draw(&mut self, layer: &TextLayer) {
        paint_layer(&self.ctx, layer);
        self.drawn.push(layer.clone());
    }

    fn set_selection(&mut self, ids: &[LayerId]) {
        self.selection = ids.to_vec();
        for layer in self.drawn.iter().filter(|l| ids.contains(&l.id)) {
            paint_selection(&self.ctx, layer);
        }
    }

    fn draw_guides(&mut self, guide: &SnapGuide, canvas: &CanvasState) {
        if !guide.show {
            return;
        }
        let (w, h) = (canvas.width as f64, canvas.height as f64);
        if let Some(x) = guide.vertical {
            paint_guide(&self.ctx, (x as f64, 0.0), (x as f64, h));
        }
        if let Some(y) = guide.horizontal {
            paint_guide(&self.ctx, (0.0, y as f64), (w, y as f64));
        }
    }

    fn export_snapshot(
        &mut self,
        scale: ExportScale,
        hide_selection_chrome: bool,
    ) -> Result<String, SurfaceError> {
        let Some(canvas) = self.frame.clone() else {
            return Err(SurfaceError::EmptyFrame);
        };
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| SurfaceError::Backend("no document".into()))?;
        let offscreen: HtmlCanvasElement = document
            .create_element("canvas")
            .map_err(backend)?
            .dyn_into()
            .map_err(|_| SurfaceError::Backend("not a canvas element".into()))?;
        offscreen.set_width((canvas.width * scale.x).round() as u32);
        offscreen.set_height((canvas.height * scale.y).round() as u32);
        let ctx = context_2d(&offscreen).map_err(backend)?;
        ctx.scale(scale.x as f64, scale.y as f64).map_err(backend)?;

        let image = self.background.as_ref().map(|(_, img)| img);
        paint_background(&ctx, &canvas, image);
        for layer in &self.drawn {
            paint_layer(&ctx, layer);
        }
        if !hide_selection_chrome {
            for layer in self.drawn.iter().filter(|l| self.selection.contains(&l.id)) {
                paint_selection(&ctx, layer);
            }
        }

        let url = offscreen
            .to_data_url_with_type("image/png")
            .map_err(backend)?;
        log::debug!(
            "exported {}x{} png",
            offscreen.width(),
            offscreen.height()
        );
        Ok(url)
    }
}

fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, JsValue> {
    canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(|_| JsValue::from_str("not a 2d context"))
}

// ─── Drawing primitives ─────────────────────────────────────────────────

fn paint_background(
    ctx: &CanvasRenderingContext2d,
    canvas: &CanvasState,
    image: Option<&HtmlImageElement>,
) {
    let (w, h) = (canvas.width as f64, canvas.height as f64);
    ctx.clear_rect(0.0, 0.0, w, h);
    match image {
        Some(img) if img.complete() => {
            let _ = ctx.draw_image_with_html_image_element_and_dw_and_dh(img, 0.0, 0.0, w, h);
        }
        _ => {
            ctx.set_fill_style_str(EMPTY_FILL);
            ctx.fill_rect(0.0, 0.0, w, h);
        }
    }
}

fn paint_layer(ctx: &CanvasRenderingContext2d, layer: &TextLayer) {
    ctx.save();
    let [a, b, c, d, e, f] = layer_transform(layer).as_coeffs();
    let _ = ctx.transform(a, b, c, d, e, f);
    ctx.set_global_alpha(layer.opacity as f64);
    ctx.set_font(&layer.css_font());
    ctx.set_fill_style_str(&layer.fill.to_hex());
    ctx.set_text_align(layer.align.as_str());
    ctx.set_text_baseline("top");

    let shadow = &layer.shadow;
    if shadow.enabled {
        ctx.set_shadow_color(&shadow.color.to_css_rgba(shadow.opacity));
        ctx.set_shadow_blur(shadow.blur as f64);
        ctx.set_shadow_offset_x(shadow.offset_x as f64);
        ctx.set_shadow_offset_y(shadow.offset_y as f64);
    }

    let anchor = text_anchor(layer) as f64;
    let line_height = (layer.font_size * LINE_HEIGHT) as f64;
    for (i, line) in layer.text.lines().enumerate() {
        let _ = ctx.fill_text(line, anchor, i as f64 * line_height);
    }
    ctx.restore();
}

fn paint_selection(ctx: &CanvasRenderingContext2d, layer: &TextLayer) {
    let (w, h) = layer.footprint();
    let (w, h) = (w as f64, h as f64);
    let handle = 8.0;
    let half = handle / 2.0;

    ctx.save();
    let [a, b, c, d, e, f] = layer_transform(layer).as_coeffs();
    let _ = ctx.transform(a, b, c, d, e, f);
    ctx.set_stroke_style_str(CHROME_STROKE);
    ctx.set_line_width(2.0);
    ctx.stroke_rect(0.0, 0.0, w, h);

    ctx.set_fill_style_str(CHROME_STROKE);
    ctx.set_stroke_style_str(HANDLE_FILL);
    for (hx, hy) in [(0.0, 0.0), (w, 0.0), (0.0, h), (w, h)] {
        ctx.fill_rect(hx - half, hy - half, handle, handle);
        ctx.stroke_rect(hx - half, hy - half, handle, handle);
    }
    ctx.restore();
}

fn paint_guide(ctx: &CanvasRenderingContext2d, from: (f64, f64), to: (f64, f64)) {
    ctx.save();
    let dash = js_sys::Array::of2(&JsValue::from_f64(5.0), &JsValue::from_f64(5.0));
    let _ = ctx.set_line_dash(&dash);
    ctx.set_stroke_style_str(CHROME_STROKE);
    ctx.set_line_width(1.0);
    ctx.begin_path();
    ctx.move_to(from.0, from.1);
    ctx.line_to(to.0, to.1);
    ctx.stroke();
    ctx.restore();
}
