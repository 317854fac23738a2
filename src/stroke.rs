//! Stroke variants and the per-kind dispatch table.
//!
//! A [`Stroke`] is one user-created vector object. Its kind is fixed at
//! creation and selects the geometry it carries: pen and eraser strokes hold
//! an ordered point sequence, rectangles hold a normalized [`Rect`]. Every
//! behavior that differs by kind (point append, rendering, hit testing, and
//! the move and resize transforms) is an exhaustive `match` here, so adding a
//! kind cannot silently fall through.
//!
//! Bounds are owned by the stroke and recomputed after every geometric
//! mutation. Callers never write them.

#[cfg(test)]
#[path = "stroke_test.rs"]
mod stroke_test;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::consts::{CORNER_RADIUS_RATIO, MIN_LINE_WIDTH};
use crate::error::CanvasError;
use crate::geom::{Bounds, Point, Rect};
use crate::surface::{CompositeMode, LineCap, LineJoin, Surface};

/// Unique identifier for a stroke.
pub type StrokeId = Uuid;

/// The closed set of stroke kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrokeKind {
    /// Freehand pressure-sensitive path.
    Pen,
    /// Path recorded with the eraser. Renders nothing; erasing deletes objects.
    Eraser,
    /// Outlined rounded rectangle.
    Rectangle,
}

impl StrokeKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pen => "pen",
            Self::Eraser => "eraser",
            Self::Rectangle => "rectangle",
        }
    }
}

impl fmt::Display for StrokeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StrokeKind {
    type Err = CanvasError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pen" => Ok(Self::Pen),
            "eraser" => Ok(Self::Eraser),
            "rectangle" => Ok(Self::Rectangle),
            other => Err(CanvasError::UnknownKind(other.to_owned())),
        }
    }
}

/// Kind-specific geometry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Geometry {
    /// Ordered samples of a pen or eraser path.
    Path(Vec<Point>),
    /// Rectangle outline; `None` until sized.
    Rect(Option<Rect>),
}

/// A vector object on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stroke {
    id: StrokeId,
    kind: StrokeKind,
    color: String,
    stroke_width: f64,
    layer: i32,
    z_index: u64,
    bounds: Bounds,
    geometry: Geometry,
}

impl Stroke {
    /// A stroke with no geometry yet and empty bounds.
    #[must_use]
    pub fn create(id: StrokeId, kind: StrokeKind, color: &str, stroke_width: f64, layer: i32, z_index: u64) -> Self {
        let geometry = match kind {
            StrokeKind::Pen | StrokeKind::Eraser => Geometry::Path(Vec::new()),
            StrokeKind::Rectangle => Geometry::Rect(None),
        };
        Self {
            id,
            kind,
            color: color.to_owned(),
            stroke_width,
            layer,
            z_index,
            bounds: Bounds::EMPTY,
            geometry,
        }
    }

    /// A rectangle stroke sized immediately. Negative extents are normalized.
    #[must_use]
    pub fn create_rectangle(id: StrokeId, rect: Rect, color: &str, stroke_width: f64, layer: i32, z_index: u64) -> Self {
        let rect = rect.normalized();
        Self {
            id,
            kind: StrokeKind::Rectangle,
            color: color.to_owned(),
            stroke_width,
            layer,
            z_index,
            bounds: rect.bounds(),
            geometry: Geometry::Rect(Some(rect)),
        }
    }

    #[must_use]
    pub fn id(&self) -> StrokeId {
        self.id
    }

    #[must_use]
    pub fn kind(&self) -> StrokeKind {
        self.kind
    }

    #[must_use]
    pub fn color(&self) -> &str {
        &self.color
    }

    #[must_use]
    pub fn stroke_width(&self) -> f64 {
        self.stroke_width
    }

    #[must_use]
    pub fn layer(&self) -> i32 {
        self.layer
    }

    #[must_use]
    pub fn z_index(&self) -> u64 {
        self.z_index
    }

    #[must_use]
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    #[must_use]
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Path samples, empty for rectangles.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        match &self.geometry {
            Geometry::Path(points) => points,
            Geometry::Rect(_) => &[],
        }
    }

    /// Rectangle geometry, `None` for paths and unsized rectangles.
    #[must_use]
    pub fn rect(&self) -> Option<Rect> {
        match &self.geometry {
            Geometry::Rect(rect) => *rect,
            Geometry::Path(_) => None,
        }
    }

    pub(crate) fn set_layer(&mut self, layer: i32) {
        self.layer = layer;
    }

    /// Append a sample stamped with the current time and grow the bounds.
    ///
    /// Returns `false` for rectangles, which have no point sequence.
    pub fn add_point(&mut self, x: f64, y: f64, pressure: f64) -> bool {
        match &mut self.geometry {
            Geometry::Path(points) => {
                let last = points.last().map_or(0, |p| p.timestamp);
                let timestamp = now_ms().max(last);
                points.push(Point::new(x, y, pressure.clamp(0.0, 1.0), timestamp));
                self.bounds = self.bounds.including(x, y);
                true
            }
            Geometry::Rect(_) => false,
        }
    }

    /// Draw the stroke with world coordinates shifted by `-offset`.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::Surface`] if a backend call fails.
    pub fn render<S: Surface + ?Sized>(&self, surface: &mut S, offset_x: f64, offset_y: f64) -> Result<(), CanvasError> {
        match (self.kind, &self.geometry) {
            (StrokeKind::Pen, Geometry::Path(points)) => self.render_pen(surface, points, offset_x, offset_y),
            (StrokeKind::Rectangle, Geometry::Rect(Some(rect))) => {
                self.render_rectangle(surface, *rect, offset_x, offset_y)
            }
            _ => Ok(()),
        }
    }

    fn render_pen<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        points: &[Point],
        offset_x: f64,
        offset_y: f64,
    ) -> Result<(), CanvasError> {
        if points.len() < 2 {
            return Ok(());
        }
        surface.save();
        surface.set_composite(CompositeMode::SourceOver)?;
        surface.set_stroke_color(&self.color);
        surface.set_line_cap(LineCap::Round);
        surface.set_line_join(LineJoin::Round);
        for pair in points.windows(2) {
            let (prev, cur) = (pair[0], pair[1]);
            surface.set_line_width((self.stroke_width * cur.pressure).max(MIN_LINE_WIDTH));
            surface.begin_path();
            surface.move_to(prev.x - offset_x, prev.y - offset_y);
            surface.line_to(cur.x - offset_x, cur.y - offset_y);
            surface.stroke();
        }
        surface.restore();
        Ok(())
    }

    fn render_rectangle<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        rect: Rect,
        offset_x: f64,
        offset_y: f64,
    ) -> Result<(), CanvasError> {
        let radius = rect.width.min(rect.height) * CORNER_RADIUS_RATIO;
        surface.save();
        surface.set_composite(CompositeMode::SourceOver)?;
        surface.set_stroke_color(&self.color);
        surface.set_line_width(self.stroke_width);
        surface.begin_path();
        surface.round_rect(rect.x - offset_x, rect.y - offset_y, rect.width, rect.height, radius)?;
        surface.stroke();
        surface.restore();
        Ok(())
    }

    /// World-space hit test with no extra slop.
    #[must_use]
    pub fn is_point_in_stroke(&self, x: f64, y: f64) -> bool {
        self.is_point_near(x, y, 0.0)
    }

    /// Hit test padded by `margin` world units.
    ///
    /// Paths hit when any sample lies within `stroke_width + margin`;
    /// rectangles hit inside their inclusive bounds grown by `margin`.
    #[must_use]
    pub fn is_point_near(&self, x: f64, y: f64, margin: f64) -> bool {
        match &self.geometry {
            Geometry::Path(points) => {
                let reach = self.stroke_width + margin;
                points.iter().any(|p| p.distance_to(x, y) <= reach)
            }
            Geometry::Rect(Some(rect)) => rect.bounds().padded(margin).contains(x, y),
            Geometry::Rect(None) => false,
        }
    }

    /// Translate all geometry and the bounds by `(dx, dy)`.
    pub fn move_by(&mut self, dx: f64, dy: f64) {
        match &mut self.geometry {
            Geometry::Path(points) => {
                for p in points.iter_mut() {
                    p.x += dx;
                    p.y += dy;
                }
            }
            Geometry::Rect(Some(rect)) => {
                rect.x += dx;
                rect.y += dy;
            }
            Geometry::Rect(None) => {}
        }
        self.bounds = self.bounds.translated(dx, dy);
    }

    /// Corner-anchored scale about the pre-transform bounds origin.
    ///
    /// Each coordinate becomes `min + offset + (v - min) * scale` on its axis.
    /// Bounds are recomputed from the result.
    pub fn resize(&mut self, scale_x: f64, scale_y: f64, offset_x: f64, offset_y: f64) {
        if self.bounds.is_empty() {
            return;
        }
        let (min_x, min_y) = (self.bounds.min_x, self.bounds.min_y);
        match &mut self.geometry {
            Geometry::Path(points) => {
                for p in points.iter_mut() {
                    p.x = min_x + offset_x + (p.x - min_x) * scale_x;
                    p.y = min_y + offset_y + (p.y - min_y) * scale_y;
                }
            }
            Geometry::Rect(Some(rect)) => {
                *rect = Rect::new(
                    min_x + offset_x + (rect.x - min_x) * scale_x,
                    min_y + offset_y + (rect.y - min_y) * scale_y,
                    rect.width * scale_x,
                    rect.height * scale_y,
                )
                .normalized();
            }
            Geometry::Rect(None) => {}
        }
        self.recompute_bounds();
    }

    /// Rebuild the bounds as the tight union of the current geometry.
    pub fn recompute_bounds(&mut self) {
        self.bounds = match &self.geometry {
            Geometry::Path(points) => Bounds::from_points(points),
            Geometry::Rect(Some(rect)) => rect.bounds(),
            Geometry::Rect(None) => Bounds::EMPTY,
        };
    }
}

// Date.now() is integral milliseconds well inside u64 range.
#[cfg(target_arch = "wasm32")]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn now_ms() -> u64 {
    js_sys::Date::now() as u64
}

#[cfg(not(target_arch = "wasm32"))]
fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
}
