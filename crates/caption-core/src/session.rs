//! Persisted session record.
//!
//! The whole composition is written as one JSON document under a single
//! storage key and overwritten wholesale on every save:
//!
//! ```json
//! { "textLayers": [...],
//!   "canvasState": { "width": 800, "height": 600, "scale": 1,
//!                    "backgroundImageDataUrl": "data:image/png;base64,..." },
//!   "timestamp": 1718000000000 }
//! ```

use crate::lint::{LintSeverity, lint_session};
use crate::model::{BackgroundImage, CanvasState, TextLayer};
use crate::store::LayerStore;
use serde::{Deserialize, Serialize};

/// Canvas metadata as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasRecord {
    pub width: f32,
    pub height: f32,
    pub scale: f32,
    #[serde(default)]
    pub background_image_data_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub natural_width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub natural_height: Option<u32>,
}

impl From<&CanvasState> for CanvasRecord {
    fn from(canvas: &CanvasState) -> Self {
        let bg = canvas.background.as_ref();
        Self {
            width: canvas.width,
            height: canvas.height,
            scale: canvas.scale,
            background_image_data_url: bg.map(|b| b.data_url.clone()),
            natural_width: bg.map(|b| b.natural_width),
            natural_height: bg.map(|b| b.natural_height),
        }
    }
}

impl From<CanvasRecord> for CanvasState {
    fn from(record: CanvasRecord) -> Self {
        // Records written before natural sizes were stored fall back to the
        // display size, which exports at screen resolution.
        let background = record.background_image_data_url.map(|data_url| BackgroundImage {
            data_url,
            natural_width: record
                .natural_width
                .unwrap_or(record.width.round().max(0.0) as u32),
            natural_height: record
                .natural_height
                .unwrap_or(record.height.round().max(0.0) as u32),
        });
        Self {
            background,
            width: record.width,
            height: record.height,
            scale: record.scale,
        }
    }
}

/// One saved editor session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub text_layers: Vec<TextLayer>,
    pub canvas_state: CanvasRecord,
    pub timestamp: u64,
}

impl SessionRecord {
    /// Snapshot the live store and canvas.
    pub fn capture(store: &LayerStore, canvas: &CanvasState, now_ms: u64) -> Self {
        Self {
            text_layers: store.layers().to_vec(),
            canvas_state: canvas.into(),
            timestamp: now_ms,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parse and validate a stored record.
    ///
    /// Returns `None` ("no saved session") when the text is not a record or
    /// the record fails validation.
    pub fn from_json(json: &str) -> Option<Self> {
        let record: SessionRecord = match serde_json::from_str(json) {
            Ok(r) => r,
            Err(e) => {
                log::warn!("discarding unreadable session record: {e}");
                return None;
            }
        };

        let diags = lint_session(&record);
        for d in &diags {
            log::debug!("session lint [{}] {}: {}", d.rule, d.layer_id, d.message);
        }
        if let Some(bad) = diags.iter().find(|d| d.severity == LintSeverity::Error) {
            log::warn!("discarding invalid session record: {}", bad.message);
            return None;
        }
        Some(record)
    }

    /// Split into the parts the editor restores.
    pub fn into_parts(self) -> (Vec<TextLayer>, CanvasState) {
        (self.text_layers, self.canvas_state.into())
    }

    /// Whether the session holds anything worth saving.
    pub fn has_content(store: &LayerStore, canvas: &CanvasState) -> bool {
        !store.is_empty() || canvas.background.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::LayerId;
    use crate::store::LayerMutation;
    use pretty_assertions::assert_eq;

    fn sample_store() -> LayerStore {
        let mut store = LayerStore::new();
        store
            .apply(LayerMutation::Add {
                layer: Box::new(TextLayer::new(LayerId::intern("text-1"), 10.0, 20.0)),
            })
            .unwrap();
        store
    }

    #[test]
    fn record_roundtrips_through_json() {
        let store = sample_store();
        let canvas = CanvasState {
            background: Some(BackgroundImage {
                data_url: "data:image/png;base64,AAAA".into(),
                natural_width: 2000,
                natural_height: 1400,
            }),
            width: 1000.0,
            height: 700.0,
            scale: 1.0,
        };
        let record = SessionRecord::capture(&store, &canvas, 99);
        let json = record.to_json().unwrap();
        assert!(json.contains("\"textLayers\""));
        assert!(json.contains("\"backgroundImageDataUrl\""));
        assert!(json.contains("\"fontSize\":32"));

        let back = SessionRecord::from_json(&json).unwrap();
        let (layers, restored) = back.into_parts();
        assert_eq!(layers, store.layers().to_vec());
        assert_eq!(restored, canvas);
    }

    #[test]
    fn garbage_is_no_session() {
        assert!(SessionRecord::from_json("{not json").is_none());
        assert!(SessionRecord::from_json(r#"{"textLayers": 3}"#).is_none());
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let store = sample_store();
        let mut record = SessionRecord::capture(&store, &CanvasState::default(), 1);
        record.text_layers.push(record.text_layers[0].clone());
        let json = record.to_json().unwrap();
        assert!(SessionRecord::from_json(&json).is_none());
    }

    #[test]
    fn legacy_record_without_natural_size() {
        let json = r#"{
            "textLayers": [],
            "canvasState": { "width": 640, "height": 480, "scale": 1,
                             "backgroundImageDataUrl": "data:image/png;base64,AAAA" },
            "timestamp": 5
        }"#;
        let (_, canvas) = SessionRecord::from_json(json).unwrap().into_parts();
        let bg = canvas.background.unwrap();
        assert_eq!((bg.natural_width, bg.natural_height), (640, 480));
    }
}
