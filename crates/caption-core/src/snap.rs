//! Center snapping for dragged layers.
//!
//! Runs once per drag-move frame. Each axis is handled independently: when
//! the element's center comes within the threshold of the canvas center on
//! that axis, the position is pulled so the centers coincide exactly and a
//! guide line is reported at the canvas center coordinate.

/// Default snap distance in canvas units.
pub const SNAP_THRESHOLD: f32 = 10.0;

/// Transient guide-line overlay state for the current drag frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SnapGuide {
    /// X coordinate of the vertical guide line, if active.
    pub vertical: Option<f32>,
    /// Y coordinate of the horizontal guide line, if active.
    pub horizontal: Option<f32>,
    pub show: bool,
}

impl SnapGuide {
    /// No guides.
    pub const HIDDEN: SnapGuide = SnapGuide {
        vertical: None,
        horizontal: None,
        show: false,
    };

    fn new(vertical: Option<f32>, horizontal: Option<f32>) -> Self {
        Self {
            vertical,
            horizontal,
            show: vertical.is_some() || horizontal.is_some(),
        }
    }
}

/// Result of snapping one drag frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snapped {
    pub x: f32,
    pub y: f32,
    pub guide: SnapGuide,
}

/// Snap a dragged box at `(x, y)` with footprint `size` to the center lines
/// of a `canvas`-sized area.
pub fn snap_to_center(
    (x, y): (f32, f32),
    (width, height): (f32, f32),
    (canvas_width, canvas_height): (f32, f32),
    threshold: f32,
) -> Snapped {
    let (sx, vertical) = snap_axis(x, width, canvas_width / 2.0, threshold);
    let (sy, horizontal) = snap_axis(y, height, canvas_height / 2.0, threshold);

    let guide = SnapGuide::new(vertical, horizontal);
    log::trace!("snap ({x}, {y}) -> ({sx}, {sy}) guides {guide:?}");
    Snapped { x: sx, y: sy, guide }
}

fn snap_axis(pos: f32, extent: f32, center: f32, threshold: f32) -> (f32, Option<f32>) {
    let element_center = pos + extent / 2.0;
    if (element_center - center).abs() < threshold {
        (center - extent / 2.0, Some(center))
    } else {
        (pos, None)
    }
}
