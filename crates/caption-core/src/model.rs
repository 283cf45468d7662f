//! Text layer data model.
//!
//! A composition is a background image plus an ordered list of `TextLayer`
//! records. Order is paint order: index 0 is drawn first (bottom-most).
//! Layers are plain values: the store owns them, history snapshots own
//! copies.

use crate::id::LayerId;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

// ─── Colors ──────────────────────────────────────────────────────────────

/// RGBA color. Stored as 4 × f32 [0.0, 1.0].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

/// Helper to parse a single hex digit.
fn hex_val(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

impl Color {
    pub const BLACK: Color = Color::rgba(0.0, 0.0, 0.0, 1.0);

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Parse a hex color string: `#RGB`, `#RGBA`, `#RRGGBB`, `#RRGGBBAA`.
    /// The string may optionally start with `#`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        let bytes = hex.as_bytes();

        let short = |i: usize| hex_val(bytes[i]).map(|v| (v * 17) as f32 / 255.0);
        let long = |i: usize| -> Option<f32> {
            let hi = hex_val(bytes[i])?;
            let lo = hex_val(bytes[i + 1])?;
            Some((hi << 4 | lo) as f32 / 255.0)
        };

        match bytes.len() {
            3 => Some(Self::rgba(short(0)?, short(1)?, short(2)?, 1.0)),
            4 => Some(Self::rgba(short(0)?, short(1)?, short(2)?, short(3)?)),
            6 => Some(Self::rgba(long(0)?, long(2)?, long(4)?, 1.0)),
            8 => Some(Self::rgba(long(0)?, long(2)?, long(4)?, long(6)?)),
            _ => None,
        }
    }

    /// Emit as `#RRGGBB`, or `#RRGGBBAA` when not fully opaque.
    pub fn to_hex(&self) -> String {
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        let (r, g, b, a) = (
            channel(self.r),
            channel(self.g),
            channel(self.b),
            channel(self.a),
        );
        if a == 255 {
            format!("#{r:02X}{g:02X}{b:02X}")
        } else {
            format!("#{r:02X}{g:02X}{b:02X}{a:02X}")
        }
    }

    /// CSS `rgba()` with an extra opacity multiplier, for canvas shadow colors.
    pub fn to_css_rgba(&self, opacity: f32) -> String {
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!(
            "rgba({}, {}, {}, {})",
            channel(self.r),
            channel(self.g),
            channel(self.b),
            (self.a * opacity).clamp(0.0, 1.0)
        )
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Color::from_hex(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid hex color `{s}`")))
    }
}

// ─── Font ────────────────────────────────────────────────────────────────

/// CSS font weight, 100..=900.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontWeight(pub u16);

impl FontWeight {
    pub const NORMAL: FontWeight = FontWeight(400);
    pub const BOLD: FontWeight = FontWeight(700);

    /// Parse `normal`, `bold`, or a numeric weight in 100..=900.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "normal" => Some(Self::NORMAL),
            "bold" => Some(Self::BOLD),
            n => n
                .parse::<u16>()
                .ok()
                .filter(|w| (100..=900).contains(w))
                .map(FontWeight),
        }
    }
}

impl Default for FontWeight {
    fn default() -> Self {
        Self::NORMAL
    }
}

impl fmt::Display for FontWeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for FontWeight {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for FontWeight {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        FontWeight::parse(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid font weight `{s}`")))
    }
}

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

impl TextAlign {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
        }
    }
}

// ─── Shadow ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shadow {
    pub color: Color,
    /// 0.0 .. 1.0
    pub opacity: f32,
    pub blur: f32,
    pub offset_x: f32,
    pub offset_y: f32,
    pub enabled: bool,
}

impl Default for Shadow {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            opacity: 1.0,
            blur: 0.0,
            offset_x: 0.0,
            offset_y: 0.0,
            enabled: true,
        }
    }
}

// ─── Text layer ──────────────────────────────────────────────────────────

/// Footprint width used when a layer has no explicit bounding width.
pub const DEFAULT_FOOTPRINT_WIDTH: f32 = 200.0;
/// Footprint height used when the font size gives no usable height.
pub const FALLBACK_FOOTPRINT_HEIGHT: f32 = 50.0;
/// Line-height multiplier applied to the font size.
pub const LINE_HEIGHT: f32 = 1.2;

pub const DEFAULT_TEXT: &str = "Double click to edit";
pub const DEFAULT_FONT_FAMILY: &str = "Inter";
pub const DEFAULT_FONT_SIZE: f32 = 32.0;

/// One styled text element on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextLayer {
    pub id: LayerId,
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub font_size: f32,
    pub font_family: String,
    pub font_weight: FontWeight,
    pub fill: Color,
    /// 0.0 .. 1.0
    pub opacity: f32,
    pub align: TextAlign,
    /// Bounding width for wrapping/alignment; `None` = natural width.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f32>,
    /// Degrees, clockwise.
    pub rotation: f32,
    pub visible: bool,
    pub shadow: Shadow,
}

impl TextLayer {
    /// A layer with default styling at the given position.
    pub fn new(id: LayerId, x: f32, y: f32) -> Self {
        Self {
            id,
            text: DEFAULT_TEXT.into(),
            x,
            y,
            font_size: DEFAULT_FONT_SIZE,
            font_family: DEFAULT_FONT_FAMILY.into(),
            font_weight: FontWeight::NORMAL,
            fill: Color::rgba(0.6, 0.6, 0.6, 1.0),
            opacity: 1.0,
            align: TextAlign::Center,
            width: Some(DEFAULT_FOOTPRINT_WIDTH),
            rotation: 0.0,
            visible: true,
            shadow: Shadow::default(),
        }
    }

    /// A default-styled layer whose footprint is centered on the canvas.
    pub fn centered(id: LayerId, canvas: &CanvasState) -> Self {
        let mut layer = Self::new(id, 0.0, 0.0);
        let (w, h) = layer.footprint();
        layer.x = canvas.width / 2.0 - w / 2.0;
        layer.y = canvas.height / 2.0 - h / 2.0;
        layer
    }

    /// The (width, height) box used for snapping and hit testing.
    pub fn footprint(&self) -> (f32, f32) {
        let w = self.width.filter(|w| *w > 0.0).unwrap_or(DEFAULT_FOOTPRINT_WIDTH);
        let h = self.font_size * LINE_HEIGHT;
        let h = if h > 0.0 { h } else { FALLBACK_FOOTPRINT_HEIGHT };
        (w, h)
    }

    /// CSS font shorthand, e.g. `400 32px "Inter"`.
    pub fn css_font(&self) -> String {
        format!(
            "{} {}px \"{}\"",
            self.font_weight, self.font_size, self.font_family
        )
    }
}

// ─── Patches ─────────────────────────────────────────────────────────────

/// Partial update of a layer's shadow.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShadowPatch {
    pub color: Option<Color>,
    pub opacity: Option<f32>,
    pub blur: Option<f32>,
    pub offset_x: Option<f32>,
    pub offset_y: Option<f32>,
    pub enabled: Option<bool>,
}

impl ShadowPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// A batch of field updates applied to one layer as a unit.
///
/// Fields left `None` are untouched. `validate` must pass before any field
/// is written, so a rejected patch leaves the layer as it was.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayerPatch {
    pub text: Option<String>,
    pub font_family: Option<String>,
    pub font_size: Option<f32>,
    pub font_weight: Option<FontWeight>,
    pub fill: Option<Color>,
    pub opacity: Option<f32>,
    pub align: Option<TextAlign>,
    pub shadow: ShadowPatch,
}

impl LayerPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Check every field without touching the layer.
    pub fn validate(&self) -> Result<(), String> {
        let unit = |name: &str, v: Option<f32>| match v {
            Some(v) if !(0.0..=1.0).contains(&v) => {
                Err(format!("{name} must be within 0..=1, got {v}"))
            }
            _ => Ok(()),
        };
        unit("opacity", self.opacity)?;
        unit("shadow opacity", self.shadow.opacity)?;

        if let Some(size) = self.font_size
            && !(size.is_finite() && size > 0.0)
        {
            return Err(format!("font size must be positive, got {size}"));
        }
        if let Some(blur) = self.shadow.blur
            && !(blur.is_finite() && blur >= 0.0)
        {
            return Err(format!("shadow blur must be non-negative, got {blur}"));
        }
        if let Some(family) = &self.font_family
            && family.trim().is_empty()
        {
            return Err("font family must not be empty".into());
        }
        Ok(())
    }

    /// Write every set field into `layer`. Call `validate` first.
    pub fn apply_to(&self, layer: &mut TextLayer) {
        if let Some(text) = &self.text {
            layer.text = text.clone();
        }
        if let Some(family) = &self.font_family {
            layer.font_family = family.clone();
        }
        if let Some(size) = self.font_size {
            layer.font_size = size;
        }
        if let Some(weight) = self.font_weight {
            layer.font_weight = weight;
        }
        if let Some(fill) = self.fill {
            layer.fill = fill;
        }
        if let Some(opacity) = self.opacity {
            layer.opacity = opacity;
        }
        if let Some(align) = self.align {
            layer.align = align;
        }

        let sp = &self.shadow;
        let shadow = &mut layer.shadow;
        if let Some(color) = sp.color {
            shadow.color = color;
        }
        if let Some(opacity) = sp.opacity {
            shadow.opacity = opacity;
        }
        if let Some(blur) = sp.blur {
            shadow.blur = blur;
        }
        if let Some(dx) = sp.offset_x {
            shadow.offset_x = dx;
        }
        if let Some(dy) = sp.offset_y {
            shadow.offset_y = dy;
        }
        if let Some(enabled) = sp.enabled {
            shadow.enabled = enabled;
        }
    }
}

// ─── Canvas ──────────────────────────────────────────────────────────────

pub const DEFAULT_CANVAS_WIDTH: f32 = 800.0;
pub const DEFAULT_CANVAS_HEIGHT: f32 = 600.0;

/// The uploaded background image.
#[derive(Debug, Clone, PartialEq)]
pub struct BackgroundImage {
    /// `data:image/png;base64,...`
    pub data_url: String,
    /// Pixel size of the decoded image (export resolution).
    pub natural_width: u32,
    pub natural_height: u32,
}

/// Canvas metadata owned by the session.
#[derive(Debug, Clone, PartialEq)]
pub struct CanvasState {
    pub background: Option<BackgroundImage>,
    pub width: f32,
    pub height: f32,
    pub scale: f32,
}

impl Default for CanvasState {
    fn default() -> Self {
        Self {
            background: None,
            width: DEFAULT_CANVAS_WIDTH,
            height: DEFAULT_CANVAS_HEIGHT,
            scale: 1.0,
        }
    }
}

impl CanvasState {
    pub fn center(&self) -> (f32, f32) {
        (self.width / 2.0, self.height / 2.0)
    }
}
