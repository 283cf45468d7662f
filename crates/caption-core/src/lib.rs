pub mod config;
pub mod error;
pub mod id;
pub mod lint;
pub mod model;
pub mod session;
pub mod snap;
pub mod store;
pub mod surface;
pub mod transform;

pub use config::{EditorConfig, ReplayGuard};
pub use error::{EditorError, Result, SurfaceError};
pub use id::LayerId;
pub use lint::{LintDiagnostic, LintSeverity, lint_layers, lint_session};
pub use model::*;
pub use session::SessionRecord;
pub use snap::{SnapGuide, Snapped, snap_to_center};
pub use store::{LayerMutation, LayerStore, Reorder};
pub use surface::{ExportScale, RenderSurface};
pub use transform::{BoundBox, MinSize, TransformEnd, bound_box};
