//! The abstract 2D immediate-mode drawing surface.
//!
//! Rendering code talks only to [`Surface`]. Any backend that can clear, build
//! and stroke paths, and stroke or fill rectangles with a settable line style
//! and composite mode is enough. The browser backend lives in [`crate::web`];
//! [`RecordingSurface`] captures a display list, which hosts can replay and
//! tests can assert on.

#[cfg(test)]
#[path = "surface_test.rs"]
mod surface_test;

use serde::Serialize;

use crate::error::CanvasError;

/// How new paint combines with what is already on the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CompositeMode {
    /// Ordinary additive paint.
    SourceOver,
}

impl CompositeMode {
    /// Canvas2D `globalCompositeOperation` name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SourceOver => "source-over",
        }
    }
}

/// End cap style for stroked lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LineCap {
    Butt,
    Round,
}

impl LineCap {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Butt => "butt",
            Self::Round => "round",
        }
    }
}

/// Corner style where stroked segments meet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LineJoin {
    Miter,
    Round,
}

impl LineJoin {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Miter => "miter",
            Self::Round => "round",
        }
    }
}

/// Immediate-mode 2D drawing capability.
///
/// Coordinates are surface units after the current scale is applied. Calls
/// that can fail on a real backend return `Result` and are propagated by the
/// renderer.
pub trait Surface {
    /// Push the current style and transform state.
    fn save(&mut self);
    /// Pop the state pushed by the matching [`Surface::save`].
    fn restore(&mut self);

    /// Reset the transform and fill the whole `width` x `height` area with `color`.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::Surface`] if the backend rejects the transform reset.
    fn clear(&mut self, width: f64, height: f64, color: &str) -> Result<(), CanvasError>;

    /// Multiply the current transform by a scale.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::Surface`] if the backend rejects the transform.
    fn scale(&mut self, sx: f64, sy: f64) -> Result<(), CanvasError>;

    fn set_stroke_color(&mut self, color: &str);
    fn set_fill_color(&mut self, color: &str);
    fn set_line_width(&mut self, width: f64);
    fn set_line_cap(&mut self, cap: LineCap);
    fn set_line_join(&mut self, join: LineJoin);
    fn set_alpha(&mut self, alpha: f64);

    /// # Errors
    ///
    /// Returns [`CanvasError::Surface`] if the backend rejects the mode.
    fn set_composite(&mut self, mode: CompositeMode) -> Result<(), CanvasError>;

    /// Set the dash pattern; an empty slice means solid.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::Surface`] if the backend rejects the pattern.
    fn set_line_dash(&mut self, segments: &[f64]) -> Result<(), CanvasError>;

    fn begin_path(&mut self);
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    fn close_path(&mut self);

    /// # Errors
    ///
    /// Returns [`CanvasError::Surface`] if the backend rejects the arc.
    fn arc_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, radius: f64) -> Result<(), CanvasError>;

    /// Stroke the current path.
    fn stroke(&mut self);

    fn stroke_rect(&mut self, x: f64, y: f64, width: f64, height: f64);
    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64);

    /// Add a rounded rectangle subpath to the current path.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::Surface`] if any underlying arc fails.
    fn round_rect(&mut self, x: f64, y: f64, width: f64, height: f64, radius: f64) -> Result<(), CanvasError> {
        let r = radius.max(0.0).min(width.abs() / 2.0).min(height.abs() / 2.0);
        self.move_to(x + r, y);
        self.arc_to(x + width, y, x + width, y + height, r)?;
        self.arc_to(x + width, y + height, x, y + height, r)?;
        self.arc_to(x, y + height, x, y, r)?;
        self.arc_to(x, y, x + width, y, r)?;
        self.close_path();
        Ok(())
    }
}

/// One recorded drawing call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    Save,
    Restore,
    Clear { width: f64, height: f64, color: String },
    Scale { sx: f64, sy: f64 },
    StrokeColor { color: String },
    FillColor { color: String },
    LineWidth { width: f64 },
    LineCap { cap: LineCap },
    LineJoin { join: LineJoin },
    Alpha { alpha: f64 },
    Composite { mode: CompositeMode },
    LineDash { segments: Vec<f64> },
    BeginPath,
    MoveTo { x: f64, y: f64 },
    LineTo { x: f64, y: f64 },
    ClosePath,
    ArcTo { x1: f64, y1: f64, x2: f64, y2: f64, radius: f64 },
    RoundRect { x: f64, y: f64, width: f64, height: f64, radius: f64 },
    Stroke,
    StrokeRect { x: f64, y: f64, width: f64, height: f64 },
    FillRect { x: f64, y: f64, width: f64, height: f64 },
}

/// A surface that records every call as a [`DrawCommand`].
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every command recorded so far, in call order.
    #[must_use]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Drop everything recorded so far.
    pub fn reset(&mut self) {
        self.commands.clear();
    }

    /// The display list as JSON for replay by the host.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::Encode`] if serialization fails.
    pub fn to_json(&self) -> Result<String, CanvasError> {
        serde_json::to_string(&self.commands).map_err(|e| CanvasError::Encode(e.to_string()))
    }

    fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }
}

impl Surface for RecordingSurface {
    fn save(&mut self) {
        self.push(DrawCommand::Save);
    }

    fn restore(&mut self) {
        self.push(DrawCommand::Restore);
    }

    fn clear(&mut self, width: f64, height: f64, color: &str) -> Result<(), CanvasError> {
        self.push(DrawCommand::Clear { width, height, color: color.to_owned() });
        Ok(())
    }

    fn scale(&mut self, sx: f64, sy: f64) -> Result<(), CanvasError> {
        self.push(DrawCommand::Scale { sx, sy });
        Ok(())
    }

    fn set_stroke_color(&mut self, color: &str) {
        self.push(DrawCommand::StrokeColor { color: color.to_owned() });
    }

    fn set_fill_color(&mut self, color: &str) {
        self.push(DrawCommand::FillColor { color: color.to_owned() });
    }

    fn set_line_width(&mut self, width: f64) {
        self.push(DrawCommand::LineWidth { width });
    }

    fn set_line_cap(&mut self, cap: LineCap) {
        self.push(DrawCommand::LineCap { cap });
    }

    fn set_line_join(&mut self, join: LineJoin) {
        self.push(DrawCommand::LineJoin { join });
    }

    fn set_alpha(&mut self, alpha: f64) {
        self.push(DrawCommand::Alpha { alpha });
    }

    fn set_composite(&mut self, mode: CompositeMode) -> Result<(), CanvasError> {
        self.push(DrawCommand::Composite { mode });
        Ok(())
    }

    fn set_line_dash(&mut self, segments: &[f64]) -> Result<(), CanvasError> {
        self.push(DrawCommand::LineDash { segments: segments.to_vec() });
        Ok(())
    }

    fn begin_path(&mut self) {
        self.push(DrawCommand::BeginPath);
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.push(DrawCommand::MoveTo { x, y });
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.push(DrawCommand::LineTo { x, y });
    }

    fn close_path(&mut self) {
        self.push(DrawCommand::ClosePath);
    }

    fn arc_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, radius: f64) -> Result<(), CanvasError> {
        self.push(DrawCommand::ArcTo { x1, y1, x2, y2, radius });
        Ok(())
    }

    fn stroke(&mut self) {
        self.push(DrawCommand::Stroke);
    }

    fn stroke_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.push(DrawCommand::StrokeRect { x, y, width, height });
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.push(DrawCommand::FillRect { x, y, width, height });
    }

    fn round_rect(&mut self, x: f64, y: f64, width: f64, height: f64, radius: f64) -> Result<(), CanvasError> {
        self.push(DrawCommand::RoundRect { x, y, width, height, radius });
        Ok(())
    }
}
