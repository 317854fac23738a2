//! Canvas configuration: brush defaults, overlay sizes, export padding, zoom limits.
//!
//! Every field has a default, so the host only supplies what it wants to
//! override. Unknown keys are rejected so typos surface at startup rather than
//! silently falling back to defaults.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::Deserialize;

use crate::consts::{DEFAULT_PRESSURE, EXPORT_PADDING, HANDLE_SIZE_PX, ZOOM_MAX, ZOOM_MIN, ZOOM_STEP};
use crate::error::CanvasError;

/// Tunable settings for a canvas session.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CanvasConfig {
    /// Initial brush size in world units.
    pub brush_size: f64,
    /// Initial brush color as a CSS color string.
    pub brush_color: String,
    /// Whether device pressure modulates pen width.
    pub pressure_sensitivity: bool,
    /// Pressure used when the device reports none or sensitivity is off.
    pub default_pressure: f64,
    /// Transform handle side length in screen pixels.
    pub handle_size_px: f64,
    /// Margin around the stroke union when exporting an image.
    pub export_padding: f64,
    /// Surface clear color.
    pub background: String,
    /// Smallest rectangle side that survives pointer-up.
    pub min_rect_size: f64,
    /// Extra world-unit slop for eraser hits.
    pub eraser_margin: f64,
    /// Lower zoom limit.
    pub zoom_min: f64,
    /// Upper zoom limit.
    pub zoom_max: f64,
    /// Zoom change per wheel notch.
    pub zoom_step: f64,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            brush_size: 5.0,
            brush_color: "#000000".to_owned(),
            pressure_sensitivity: true,
            default_pressure: DEFAULT_PRESSURE,
            handle_size_px: HANDLE_SIZE_PX,
            export_padding: EXPORT_PADDING,
            background: "#ffffff".to_owned(),
            min_rect_size: 1.0,
            eraser_margin: 0.0,
            zoom_min: ZOOM_MIN,
            zoom_max: ZOOM_MAX,
            zoom_step: ZOOM_STEP,
        }
    }
}

impl CanvasConfig {
    /// Parse a JSON object of overrides on top of the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::ConfigParse`] if the JSON is malformed, names an
    /// unknown field, or yields an inconsistent configuration.
    pub fn from_json(raw: &str) -> Result<Self, CanvasError> {
        let config: Self = serde_json::from_str(raw).map_err(|e| CanvasError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field consistency.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::ConfigParse`] describing the first violated rule.
    pub fn validate(&self) -> Result<(), CanvasError> {
        if self.brush_size.is_nan() || self.brush_size <= 0.0 {
            return Err(CanvasError::ConfigParse(format!("brush_size must be positive, got {}", self.brush_size)));
        }
        if !(0.0..=1.0).contains(&self.default_pressure) {
            return Err(CanvasError::ConfigParse(format!(
                "default_pressure must be within [0, 1], got {}",
                self.default_pressure
            )));
        }
        if self.zoom_min.is_nan() || self.zoom_min <= 0.0 || self.zoom_min > self.zoom_max {
            return Err(CanvasError::ConfigParse(format!(
                "zoom range is invalid: [{}, {}]",
                self.zoom_min, self.zoom_max
            )));
        }
        if !self.zoom_max.is_finite() {
            return Err(CanvasError::ConfigParse(format!("zoom_max must be finite, got {}", self.zoom_max)));
        }
        if !self.zoom_step.is_finite() || self.zoom_step <= 0.0 {
            return Err(CanvasError::ConfigParse(format!("zoom_step must be positive, got {}", self.zoom_step)));
        }
        if self.handle_size_px < 0.0 || self.export_padding < 0.0 || self.eraser_margin < 0.0 {
            return Err(CanvasError::ConfigParse("sizes and margins must not be negative".to_owned()));
        }
        Ok(())
    }
}
