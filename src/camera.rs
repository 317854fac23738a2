#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use crate::geom::Bounds;

/// A position in either screen or world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coord {
    pub x: f64,
    pub y: f64,
}

impl Coord {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Viewport state for pan/zoom on the infinite canvas.
///
/// `offset_x` / `offset_y` are the world coordinates of the screen origin.
/// `zoom` is a scale factor (1.0 = no zoom), so
/// `world = screen / zoom + offset`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub offset_x: f64,
    pub offset_y: f64,
    pub zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self { offset_x: 0.0, offset_y: 0.0, zoom: 1.0 }
    }
}

impl Camera {
    /// Convert a screen-space point (CSS pixels) to world coordinates.
    #[must_use]
    pub fn screen_to_world(&self, screen: Coord) -> Coord {
        Coord {
            x: screen.x / self.zoom + self.offset_x,
            y: screen.y / self.zoom + self.offset_y,
        }
    }

    /// Convert a world-space point to screen coordinates (CSS pixels).
    #[must_use]
    pub fn world_to_screen(&self, world: Coord) -> Coord {
        Coord {
            x: (world.x - self.offset_x) * self.zoom,
            y: (world.y - self.offset_y) * self.zoom,
        }
    }

    /// Convert a screen-space distance (pixels) to world-space distance.
    #[must_use]
    pub fn screen_dist_to_world(&self, screen_dist: f64) -> f64 {
        screen_dist / self.zoom
    }

    /// World rectangle visible in a `width` x `height` pixel viewport.
    #[must_use]
    pub fn view_bounds(&self, width: f64, height: f64) -> Bounds {
        Bounds::from_rect(self.offset_x, self.offset_y, width / self.zoom, height / self.zoom)
    }

    /// Pan so content follows a pointer drag of `(dx, dy)` screen pixels.
    pub fn pan_by_screen(&mut self, dx: f64, dy: f64) {
        self.offset_x -= dx / self.zoom;
        self.offset_y -= dy / self.zoom;
    }

    /// Change zoom while keeping the world point under `anchor` fixed on screen.
    pub fn zoom_at(&mut self, anchor: Coord, zoom: f64) {
        let before = self.screen_to_world(anchor);
        self.zoom = zoom;
        self.offset_x = before.x - anchor.x / zoom;
        self.offset_y = before.y - anchor.y / zoom;
    }

    /// One wheel notch: step zoom toward the pointer, clamped to `[min, max]`.
    ///
    /// Positive `dy` (scrolling down) zooms out. An inverted range pins zoom
    /// to `max`; a step that would leave zoom non-positive or non-finite is
    /// ignored.
    pub fn wheel_zoom(&mut self, anchor: Coord, dy: f64, step: f64, min: f64, max: f64) {
        let target = if dy > 0.0 { self.zoom - step } else { self.zoom + step };
        let zoom = target.max(min).min(max);
        if zoom.is_finite() && zoom > 0.0 {
            self.zoom_at(anchor, zoom);
        }
    }
}
