pub mod hit;
pub mod paint;

pub use hit::{hit_test, layer_contains};
pub use paint::{DisplayListSurface, Frame, PaintOp, layer_transform, text_anchor};
