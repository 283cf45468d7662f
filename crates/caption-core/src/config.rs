//! Editor configuration.
//!
//! Every field has a default matching the stock editor, so a host only needs
//! to spell out what it changes: `EditorConfig::from_json(r#"{"historyCapacity": 50}"#)`.

use crate::model::{DEFAULT_CANVAS_HEIGHT, DEFAULT_CANVAS_WIDTH};
use crate::snap::SNAP_THRESHOLD;
use crate::transform::{MIN_BOX_HEIGHT, MIN_BOX_WIDTH, MinSize};
use serde::{Deserialize, Serialize};

/// Storage key the session record is written under.
pub const DEFAULT_STORAGE_KEY: &str = "caption-editor-state";

/// How the history engine decides an undo/redo restore has finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "camelCase")]
pub enum ReplayGuard {
    /// Replay ends as soon as the store reports the restored revision.
    #[default]
    Observed,
    /// Replay ends `settle_ms` after it started (legacy fixed-delay timing).
    /// Records requested inside that window are dropped.
    Timed {
        #[serde(rename = "settleMs")]
        settle_ms: u64,
    },
}

/// Tunables for the editor controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorConfig {
    /// Maximum number of history snapshots. Default: **25**.
    pub history_capacity: usize,

    /// Distance (canvas units) at which a dragged layer snaps to the
    /// canvas center lines. Default: **10**.
    pub snap_threshold: f32,

    /// Delay between drag end and the "Move Layer" snapshot. Default: **100 ms**.
    pub history_settle_ms: u64,

    /// Quiet period before the session is written to storage. Default: **1000 ms**.
    pub autosave_debounce_ms: u64,

    pub replay_guard: ReplayGuard,

    /// Offset applied to duplicated layers on both axes. Default: **20**.
    pub duplicate_offset: f32,

    /// Arrow-key nudge step, and the step with Shift held.
    pub nudge_step: f32,
    pub nudge_step_large: f32,

    /// Resize floor for the transform handles. Default: **20 × 10**.
    pub min_box_width: f32,
    pub min_box_height: f32,

    /// Uploaded images larger than this box are scaled down to fit.
    pub max_canvas_width: f32,
    pub max_canvas_height: f32,

    /// Canvas size when no image is loaded.
    pub default_canvas_width: f32,
    pub default_canvas_height: f32,

    /// Font readiness probes: how many, and how far apart.
    pub font_retry_attempts: u32,
    pub font_retry_interval_ms: u64,

    /// Family used while a requested font is unavailable.
    pub fallback_font: String,

    pub storage_key: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_capacity: 25,
            snap_threshold: SNAP_THRESHOLD,
            history_settle_ms: 100,
            autosave_debounce_ms: 1_000,
            replay_guard: ReplayGuard::Observed,
            duplicate_offset: 20.0,
            nudge_step: 1.0,
            nudge_step_large: 10.0,
            min_box_width: MIN_BOX_WIDTH,
            min_box_height: MIN_BOX_HEIGHT,
            max_canvas_width: 1_000.0,
            max_canvas_height: 700.0,
            default_canvas_width: DEFAULT_CANVAS_WIDTH,
            default_canvas_height: DEFAULT_CANVAS_HEIGHT,
            font_retry_attempts: 20,
            font_retry_interval_ms: 100,
            fallback_font: "Inter".into(),
            storage_key: DEFAULT_STORAGE_KEY.into(),
        }
    }
}

impl EditorConfig {
    /// Parse a (possibly partial) JSON config; missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn min_size(&self) -> MinSize {
        MinSize {
            width: self.min_box_width,
            height: self.min_box_height,
        }
    }
}
