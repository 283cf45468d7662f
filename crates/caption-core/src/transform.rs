//! Resize and rotate math for the transform handles.
//!
//! During an interactive resize the handle proposes a new bounding box every
//! frame; boxes below the minimum size are refused and the previous box is
//! kept. When the gesture ends, the observed vertical scale is folded into the
//! font size (text is re-laid out at the new size rather than stretched) and
//! the handle's angle becomes the layer rotation.

use crate::model::TextLayer;

/// Smallest box width an interactive resize may produce.
pub const MIN_BOX_WIDTH: f32 = 20.0;
/// Smallest box height an interactive resize may produce.
pub const MIN_BOX_HEIGHT: f32 = 10.0;

/// An axis-aligned bounding box with a rotation, as reported by the
/// transform handles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Degrees.
    pub rotation: f32,
}

impl BoundBox {
    /// The box currently covering a layer's footprint.
    pub fn of_layer(layer: &TextLayer) -> Self {
        let (width, height) = layer.footprint();
        Self {
            x: layer.x,
            y: layer.y,
            width,
            height,
            rotation: layer.rotation,
        }
    }
}

/// Minimum box size accepted during interactive resize.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinSize {
    pub width: f32,
    pub height: f32,
}

impl Default for MinSize {
    fn default() -> Self {
        Self {
            width: MIN_BOX_WIDTH,
            height: MIN_BOX_HEIGHT,
        }
    }
}

/// Accept `proposed` unless it falls below `min` on either axis, in which
/// case the previous box is returned unchanged.
pub fn bound_box(previous: BoundBox, proposed: BoundBox, min: MinSize) -> BoundBox {
    if proposed.width < min.width || proposed.height < min.height {
        log::trace!("resize below floor {proposed:?}, keeping {previous:?}");
        previous
    } else {
        proposed
    }
}

/// Font size after a transform that scaled the layer vertically by `scale_y`,
/// rounded to the nearest whole unit. Never returns less than 1.
pub fn rescale_font(font_size: f32, scale_y: f32) -> f32 {
    (font_size * scale_y).round().max(1.0)
}

/// The committed outcome of a resize/rotate gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformEnd {
    pub font_size: f32,
    pub rotation: f32,
}

impl TransformEnd {
    /// Fold the handle state at gesture end into layer properties.
    pub fn from_handles(layer: &TextLayer, scale_y: f32, rotation: f32) -> Self {
        Self {
            font_size: rescale_font(layer.font_size, scale_y),
            rotation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::LayerId;

    fn bx(width: f32, height: f32) -> BoundBox {
        BoundBox {
            x: 0.0,
            y: 0.0,
            width,
            height,
            rotation: 0.0,
        }
    }

    #[test]
    fn small_boxes_are_refused() {
        let old = bx(100.0, 40.0);
        assert_eq!(bound_box(old, bx(19.0, 40.0), MinSize::default()), old);
        assert_eq!(bound_box(old, bx(100.0, 9.5), MinSize::default()), old);
        assert_eq!(
            bound_box(old, bx(20.0, 10.0), MinSize::default()),
            bx(20.0, 10.0)
        );
    }

    #[test]
    fn font_rescale_rounds() {
        assert_eq!(rescale_font(32.0, 1.5), 48.0);
        assert_eq!(rescale_font(32.0, 1.26), 40.0);
        assert_eq!(rescale_font(3.0, 0.1), 1.0);
    }

    #[test]
    fn transform_end_takes_handle_rotation() {
        let layer = TextLayer::new(LayerId::intern("t"), 0.0, 0.0);
        let end = TransformEnd::from_handles(&layer, 0.5, 45.0);
        assert_eq!(end.font_size, 16.0);
        assert_eq!(end.rotation, 45.0);
    }
}
