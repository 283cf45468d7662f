//! Text edit dialog state.
//!
//! Opening the dialog copies the editable fields of a layer into a draft the
//! host binds its form controls to. Saving turns the draft into one
//! `LayerPatch`; cancelling drops it. The layer is untouched until then.

use caption_core::id::LayerId;
use caption_core::model::{Color, FontWeight, LayerPatch, Shadow, ShadowPatch, TextLayer};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextEditDraft {
    pub layer_id: LayerId,
    pub text: String,
    pub font_family: String,
    pub font_size: f32,
    pub font_weight: FontWeight,
    pub fill: Color,
    pub opacity: f32,
    pub shadow: Shadow,
}

impl TextEditDraft {
    pub fn from_layer(layer: &TextLayer) -> Self {
        Self {
            layer_id: layer.id,
            text: layer.text.clone(),
            font_family: layer.font_family.clone(),
            font_size: layer.font_size,
            font_weight: layer.font_weight,
            fill: layer.fill,
            opacity: layer.opacity,
            shadow: layer.shadow.clone(),
        }
    }

    /// The full set of dialog fields as a patch.
    pub fn to_patch(&self) -> LayerPatch {
        let s = &self.shadow;
        LayerPatch {
            text: Some(self.text.clone()),
            font_family: Some(self.font_family.clone()),
            font_size: Some(self.font_size),
            font_weight: Some(self.font_weight),
            fill: Some(self.fill),
            opacity: Some(self.opacity),
            align: None,
            shadow: ShadowPatch {
                color: Some(s.color),
                opacity: Some(s.opacity),
                blur: Some(s.blur),
                offset_x: Some(s.offset_x),
                offset_y: Some(s.offset_y),
                enabled: Some(s.enabled),
            },
        }
    }
}
