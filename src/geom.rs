//! Geometry primitives: sampled points, axis-aligned bounds, and rectangles.
//!
//! `Bounds` carries an explicit empty sentinel (`+inf, +inf, -inf, -inf`) so a
//! stroke with no geometry yet has well-defined bounds that never intersect
//! anything. Unioning any real point into the sentinel yields that point's
//! degenerate box, which keeps incremental growth and full recomputation on
//! the same code path.

#[cfg(test)]
#[path = "geom_test.rs"]
mod geom_test;

use serde::Serialize;

/// A sampled input point in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    /// Normalized pen pressure in `[0, 1]`.
    pub pressure: f64,
    /// Milliseconds since the Unix epoch when the sample was taken.
    pub timestamp: u64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64, pressure: f64, timestamp: u64) -> Self {
        Self { x, y, pressure, timestamp }
    }

    /// Euclidean distance from this point to `(x, y)`.
    #[must_use]
    pub fn distance_to(&self, x: f64, y: f64) -> f64 {
        (self.x - x).hypot(self.y - y)
    }
}

/// Axis-aligned bounding box in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Default for Bounds {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Bounds {
    /// The box that contains nothing.
    pub const EMPTY: Self = Self {
        min_x: f64::INFINITY,
        min_y: f64::INFINITY,
        max_x: f64::NEG_INFINITY,
        max_y: f64::NEG_INFINITY,
    };

    #[must_use]
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self { min_x, min_y, max_x, max_y }
    }

    /// Bounds of a query rectangle given by origin and size.
    #[must_use]
    pub fn from_rect(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::from_corners(x, y, x + width, y + height)
    }

    /// Normalized bounds spanning two opposite corners in any order.
    #[must_use]
    pub fn from_corners(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self {
            min_x: x0.min(x1),
            min_y: y0.min(y1),
            max_x: x0.max(x1),
            max_y: y0.max(y1),
        }
    }

    /// Tight bounds of a point sequence. Empty input yields [`Bounds::EMPTY`].
    #[must_use]
    pub fn from_points<'a, I>(points: I) -> Self
    where
        I: IntoIterator<Item = &'a Point>,
    {
        points.into_iter().fold(Self::EMPTY, |acc, p| acc.including(p.x, p.y))
    }

    /// Whether this is the empty sentinel (or otherwise inverted).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.min_x > self.max_x || self.min_y > self.max_y
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        if self.is_empty() { 0.0 } else { self.max_x - self.min_x }
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        if self.is_empty() { 0.0 } else { self.max_y - self.min_y }
    }

    /// This box grown to include `(x, y)`.
    #[must_use]
    pub fn including(self, x: f64, y: f64) -> Self {
        Self {
            min_x: self.min_x.min(x),
            min_y: self.min_y.min(y),
            max_x: self.max_x.max(x),
            max_y: self.max_y.max(y),
        }
    }

    /// Smallest box containing both. The empty box is the identity.
    #[must_use]
    pub fn union(self, other: Self) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Closed-interval overlap test. An empty box never intersects.
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        !(self.max_x < other.min_x || self.min_x > other.max_x || self.max_y < other.min_y || self.min_y > other.max_y)
    }

    /// Inclusive point membership.
    #[must_use]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }

    /// This box grown by `margin` on every side. Empty stays empty.
    #[must_use]
    pub fn padded(self, margin: f64) -> Self {
        if self.is_empty() {
            return self;
        }
        Self {
            min_x: self.min_x - margin,
            min_y: self.min_y - margin,
            max_x: self.max_x + margin,
            max_y: self.max_y + margin,
        }
    }

    /// This box shifted by `(dx, dy)`. Empty stays empty.
    #[must_use]
    pub fn translated(self, dx: f64, dy: f64) -> Self {
        if self.is_empty() {
            return self;
        }
        Self {
            min_x: self.min_x + dx,
            min_y: self.min_y + dy,
            max_x: self.max_x + dx,
            max_y: self.max_y + dy,
        }
    }
}

/// An axis-aligned rectangle by origin and size.
///
/// Width and height are non-negative once constructed through
/// [`Rect::from_corners`] or [`Rect::normalized`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Rectangle spanning two opposite corners in any order.
    #[must_use]
    pub fn from_corners(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self {
            x: x0.min(x1),
            y: y0.min(y1),
            width: (x1 - x0).abs(),
            height: (y1 - y0).abs(),
        }
    }

    /// Same rectangle with any negative extent flipped to positive.
    #[must_use]
    pub fn normalized(self) -> Self {
        Self::from_corners(self.x, self.y, self.x + self.width, self.y + self.height)
    }

    /// Bounds of the rectangle's four corners.
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        Bounds::from_corners(self.x, self.y, self.x + self.width, self.y + self.height)
    }
}
