//! Lint diagnostics for stored sessions.
//!
//! Reports structural issues without modifying the record. Findings at
//! `Error` severity make the record unusable and the session loader treats
//! it as absent.

use crate::id::LayerId;
use crate::model::TextLayer;
use crate::session::SessionRecord;
use std::collections::HashSet;

// ─── Diagnostic types ────────────────────────────────────────────────────

/// Severity of a lint finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LintSeverity {
    /// The record cannot be restored as-is.
    Error,
    /// Restorable, but probably not what the user meant.
    Warning,
    Info,
}

/// A single lint diagnostic for a layer.
#[derive(Debug, Clone)]
pub struct LintDiagnostic {
    /// The layer this diagnostic refers to.
    pub layer_id: LayerId,
    /// Human-readable message.
    pub message: String,
    pub severity: LintSeverity,
    /// Short rule identifier (e.g. "duplicate-id", "opacity-range").
    pub rule: &'static str,
}

// ─── Public API ──────────────────────────────────────────────────────────

/// Run all lint rules over a session record and return diagnostics.
#[must_use]
pub fn lint_session(record: &SessionRecord) -> Vec<LintDiagnostic> {
    let mut diags = lint_layers(&record.text_layers);
    let canvas = &record.canvas_state;
    lint_offscreen(&record.text_layers, (canvas.width, canvas.height), &mut diags);
    diags
}

/// Rules that only need the layer list.
#[must_use]
pub fn lint_layers(layers: &[TextLayer]) -> Vec<LintDiagnostic> {
    let mut diags = Vec::new();
    lint_duplicate_ids(layers, &mut diags);
    lint_ranges(layers, &mut diags);
    lint_empty_text(layers, &mut diags);
    diags
}

// ─── Rules ───────────────────────────────────────────────────────────────

fn lint_duplicate_ids(layers: &[TextLayer], diags: &mut Vec<LintDiagnostic>) {
    let mut seen = HashSet::new();
    for layer in layers {
        if !seen.insert(layer.id) {
            diags.push(LintDiagnostic {
                layer_id: layer.id,
                message: format!("Layer id `{}` appears more than once.", layer.id),
                severity: LintSeverity::Error,
                rule: "duplicate-id",
            });
        }
    }
}

fn lint_ranges(layers: &[TextLayer], diags: &mut Vec<LintDiagnostic>) {
    for layer in layers {
        let mut error = |rule: &'static str, message: String| {
            diags.push(LintDiagnostic {
                layer_id: layer.id,
                message,
                severity: LintSeverity::Error,
                rule,
            });
        };
        if !(0.0..=1.0).contains(&layer.opacity) {
            error(
                "opacity-range",
                format!("Layer `{}` has opacity {}.", layer.id, layer.opacity),
            );
        }
        if !(0.0..=1.0).contains(&layer.shadow.opacity) {
            error(
                "opacity-range",
                format!(
                    "Layer `{}` has shadow opacity {}.",
                    layer.id, layer.shadow.opacity
                ),
            );
        }
        if !(layer.font_size.is_finite() && layer.font_size > 0.0) {
            error(
                "font-size",
                format!("Layer `{}` has font size {}.", layer.id, layer.font_size),
            );
        }
        if !(layer.shadow.blur.is_finite() && layer.shadow.blur >= 0.0) {
            error(
                "shadow-blur",
                format!("Layer `{}` has shadow blur {}.", layer.id, layer.shadow.blur),
            );
        }
        if !(layer.x.is_finite() && layer.y.is_finite() && layer.rotation.is_finite()) {
            error(
                "non-finite",
                format!("Layer `{}` has a non-finite position or rotation.", layer.id),
            );
        }
    }
}

fn lint_empty_text(layers: &[TextLayer], diags: &mut Vec<LintDiagnostic>) {
    for layer in layers.iter().filter(|l| l.text.trim().is_empty()) {
        diags.push(LintDiagnostic {
            layer_id: layer.id,
            message: format!("Layer `{}` has no text and draws nothing.", layer.id),
            severity: LintSeverity::Info,
            rule: "empty-text",
        });
    }
}

/// Warn when a layer's footprint lies entirely outside the canvas.
fn lint_offscreen(
    layers: &[TextLayer],
    (canvas_width, canvas_height): (f32, f32),
    diags: &mut Vec<LintDiagnostic>,
) {
    for layer in layers {
        let (w, h) = layer.footprint();
        let outside = layer.x + w < 0.0
            || layer.y + h < 0.0
            || layer.x > canvas_width
            || layer.y > canvas_height;
        if outside && layer.rotation == 0.0 {
            diags.push(LintDiagnostic {
                layer_id: layer.id,
                message: format!("Layer `{}` is outside the canvas.", layer.id),
                severity: LintSeverity::Warning,
                rule: "offscreen",
            });
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────
