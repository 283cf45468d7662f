//! Error types shared across the workspace.

use crate::id::LayerId;
use thiserror::Error;

/// Failure reported by a render surface.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SurfaceError {
    /// The surface has nothing to draw from (no frame recorded yet).
    #[error("nothing has been drawn to the surface yet")]
    EmptyFrame,
    /// The backend (canvas, rasterizer) refused the request.
    #[error("renderer failed: {0}")]
    Backend(String),
}

/// Errors surfaced to the user by editor operations.
///
/// Every variant is raised before any state is written, so a returned error
/// means the layer store and the history are exactly as they were.
#[derive(Debug, Error)]
pub enum EditorError {
    #[error("unsupported image type `{0}`: please upload a PNG image only")]
    InvalidUpload(String),

    #[error("uploaded image has no pixels ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },

    #[error("no layer with id `{0}`")]
    UnknownLayer(LayerId),

    #[error("layer id `{0}` is already in use")]
    DuplicateId(LayerId),

    #[error("invalid edit: {0}")]
    InvalidEdit(String),

    #[error("please upload an image before exporting")]
    MissingBackground,

    #[error("export failed: {0}")]
    Export(#[from] SurfaceError),

    #[error("session storage failed: {0}")]
    Storage(String),

    #[error("session record could not be encoded: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("font `{family}` failed to load after {attempts} attempts")]
    FontTimeout { family: String, attempts: u32 },
}

pub type Result<T, E = EditorError> = std::result::Result<T, E>;
