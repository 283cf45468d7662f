//! Hit testing: point → layer lookup.
//!
//! Reverse-walks the layer list (front-to-back) to find which visible layer
//! is under a given (x, y) canvas position. Each layer is tested against its
//! footprint in its own rotated frame.

use crate::paint::layer_transform;
use caption_core::id::LayerId;
use caption_core::model::TextLayer;
use kurbo::{Point, Rect};

/// Find the topmost visible layer at position (px, py).
/// Returns `None` when the point is over the background.
pub fn hit_test(layers: &[TextLayer], px: f32, py: f32) -> Option<LayerId> {
    // Last painted = topmost
    layers
        .iter()
        .rev()
        .filter(|l| l.visible)
        .find(|l| layer_contains(l, px, py))
        .map(|l| l.id)
}

/// Whether (px, py) falls inside the layer's rotated footprint.
pub fn layer_contains(layer: &TextLayer, px: f32, py: f32) -> bool {
    let local = layer_transform(layer).inverse() * Point::new(px as f64, py as f64);
    let (w, h) = layer.footprint();
    Rect::new(0.0, 0.0, w as f64, h as f64).contains(local)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layer(id: &str, x: f32, y: f32) -> TextLayer {
        TextLayer::new(LayerId::intern(id), x, y)
    }

    #[test]
    fn hit_test_prefers_topmost() {
        // Footprints are 200 x 38.4
        let layers = vec![layer("under", 100.0, 100.0), layer("over", 150.0, 110.0)];
        assert_eq!(hit_test(&layers, 160.0, 120.0), Some(LayerId::intern("over")));
        assert_eq!(hit_test(&layers, 110.0, 105.0), Some(LayerId::intern("under")));
        assert_eq!(hit_test(&layers, 700.0, 500.0), None);
    }

    #[test]
    fn hidden_layers_are_skipped() {
        let mut top = layer("hidden", 100.0, 100.0);
        top.visible = false;
        let layers = vec![layer("shown", 100.0, 100.0), top];
        assert_eq!(hit_test(&layers, 150.0, 110.0), Some(LayerId::intern("shown")));
    }

    #[test]
    fn rotation_moves_the_footprint() {
        let mut l = layer("rot", 100.0, 100.0);
        assert!(layer_contains(&l, 250.0, 110.0));
        // Rotated 90° clockwise about its origin the box hangs below (100, 100).
        l.rotation = 90.0;
        assert!(!layer_contains(&l, 250.0, 110.0));
        assert!(layer_contains(&l, 90.0, 250.0));
    }
}
