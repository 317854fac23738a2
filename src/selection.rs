//! Selection and transform controller.
//!
//! At most one stroke is selected. The controller stores only its id plus the
//! bookkeeping of an active move or resize drag; the stroke itself stays in
//! the [`DocStore`], which the caller passes in for every operation that reads
//! or mutates geometry. Transform handles are derived on demand from the
//! selected stroke's bounds and the camera, never stored.
//!
//! Move deltas are incremental: each update moves the stroke by the distance
//! since the previous update. Resize deltas are also taken against the moving
//! anchor, but scale factors divide by the extents snapshotted at drag start.

#[cfg(test)]
#[path = "selection_test.rs"]
mod selection_test;

use tracing::debug;

use crate::camera::{Camera, Coord};
use crate::consts::{HANDLE_SIZE_PX, MIN_RESIZE_EXTENT};
use crate::doc::DocStore;
use crate::geom::Bounds;
use crate::stroke::{Stroke, StrokeId};

/// One of the four corner handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handle {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Handle {
    pub const ALL: [Self; 4] = [Self::TopLeft, Self::TopRight, Self::BottomLeft, Self::BottomRight];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TopLeft => "top-left",
            Self::TopRight => "top-right",
            Self::BottomLeft => "bottom-left",
            Self::BottomRight => "bottom-right",
        }
    }

    /// CSS cursor shown while hovering this handle.
    #[must_use]
    pub fn cursor(self) -> &'static str {
        match self {
            Self::TopLeft | Self::BottomRight => "nwse-resize",
            Self::TopRight | Self::BottomLeft => "nesw-resize",
        }
    }

    fn is_left(self) -> bool {
        matches!(self, Self::TopLeft | Self::BottomLeft)
    }

    fn is_top(self) -> bool {
        matches!(self, Self::TopLeft | Self::TopRight)
    }

    /// World position of this corner of `bounds`.
    #[must_use]
    pub fn corner(self, bounds: &Bounds) -> Coord {
        let x = if self.is_left() { bounds.min_x } else { bounds.max_x };
        let y = if self.is_top() { bounds.min_y } else { bounds.max_y };
        Coord::new(x, y)
    }
}

/// A handle square in screen space. `(x, y)` is its top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformHandle {
    pub handle: Handle,
    pub x: f64,
    pub y: f64,
    pub size: f64,
}

impl TransformHandle {
    /// Inclusive box membership of a screen point.
    #[must_use]
    pub fn contains(&self, screen: Coord) -> bool {
        screen.x >= self.x && screen.x <= self.x + self.size && screen.y >= self.y && screen.y <= self.y + self.size
    }
}

/// Selection state machine.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum SelectionState {
    /// Nothing selected.
    #[default]
    Idle,
    /// A stroke is selected and at rest.
    Selected { id: StrokeId },
    /// The selected stroke is being dragged.
    Moving {
        id: StrokeId,
        /// World position of the previous update.
        anchor: Coord,
        /// Bounds when the drag started.
        origin: Bounds,
    },
    /// The selected stroke is being resized from a corner.
    Resizing {
        id: StrokeId,
        handle: Handle,
        /// World position of the previous update.
        anchor: Coord,
        /// Bounds when the drag started; scale divides by these extents.
        origin: Bounds,
    },
}

/// Owns the selection and drives move/resize drags against the document.
#[derive(Debug, Clone)]
pub struct SelectionController {
    state: SelectionState,
    handle_size: f64,
}

impl Default for SelectionController {
    fn default() -> Self {
        Self::new(HANDLE_SIZE_PX)
    }
}

impl SelectionController {
    /// A controller with nothing selected and `handle_size` pixel handles.
    #[must_use]
    pub fn new(handle_size: f64) -> Self {
        Self { state: SelectionState::Idle, handle_size }
    }

    #[must_use]
    pub fn state(&self) -> SelectionState {
        self.state
    }

    /// Id of the selected stroke in any non-idle state.
    #[must_use]
    pub fn selected_id(&self) -> Option<StrokeId> {
        match self.state {
            SelectionState::Idle => None,
            SelectionState::Selected { id } | SelectionState::Moving { id, .. } | SelectionState::Resizing { id, .. } => {
                Some(id)
            }
        }
    }

    /// The selected stroke, if it still exists.
    #[must_use]
    pub fn selected<'a>(&self, doc: &'a DocStore) -> Option<&'a Stroke> {
        self.selected_id().and_then(|id| doc.get(&id))
    }

    #[must_use]
    pub fn is_moving(&self) -> bool {
        matches!(self.state, SelectionState::Moving { .. })
    }

    #[must_use]
    pub fn is_resizing(&self) -> bool {
        matches!(self.state, SelectionState::Resizing { .. })
    }

    /// Select `stroke`, abandoning any drag in progress.
    pub fn select(&mut self, stroke: &Stroke) {
        self.state = SelectionState::Selected { id: stroke.id() };
    }

    /// Select the topmost stroke under a world point, or clear on a miss.
    pub fn select_stroke_at_point(&mut self, doc: &DocStore, x: f64, y: f64) -> Option<StrokeId> {
        let hit = doc.render_order().into_iter().rev().find(|s| s.is_point_in_stroke(x, y));
        match hit {
            Some(stroke) => {
                debug!(id = %stroke.id(), "stroke selected");
                self.select(stroke);
                Some(stroke.id())
            }
            None => {
                self.clear_selection();
                None
            }
        }
    }

    pub fn clear_selection(&mut self) {
        self.state = SelectionState::Idle;
    }

    /// Drop the selection if it references `id`. Returns whether it did.
    pub fn on_stroke_deleted(&mut self, id: &StrokeId) -> bool {
        if self.selected_id().as_ref() == Some(id) {
            self.clear_selection();
            return true;
        }
        false
    }

    /// Screen-space handles around the selected stroke.
    #[must_use]
    pub fn handles(&self, doc: &DocStore, camera: &Camera) -> Vec<TransformHandle> {
        let Some(stroke) = self.selected(doc) else {
            return Vec::new();
        };
        let bounds = stroke.bounds();
        if bounds.is_empty() {
            return Vec::new();
        }
        let half = self.handle_size / 2.0;
        Handle::ALL
            .iter()
            .map(|&handle| {
                let c = camera.world_to_screen(handle.corner(&bounds));
                TransformHandle { handle, x: c.x - half, y: c.y - half, size: self.handle_size }
            })
            .collect()
    }

    /// The handle under a screen point, if any.
    #[must_use]
    pub fn handle_at(&self, doc: &DocStore, camera: &Camera, screen: Coord) -> Option<Handle> {
        self.handles(doc, camera).into_iter().find(|h| h.contains(screen)).map(|h| h.handle)
    }

    /// Whether a world point lies inside the selected stroke's bounds.
    #[must_use]
    pub fn contains_point(&self, doc: &DocStore, world: Coord) -> bool {
        self.selected(doc).is_some_and(|s| s.bounds().contains(world.x, world.y))
    }

    /// Begin dragging the selection from `world`. Requires `Selected`.
    pub fn start_move(&mut self, doc: &DocStore, world: Coord) -> bool {
        let SelectionState::Selected { id } = self.state else {
            return false;
        };
        let Some(stroke) = doc.get(&id) else {
            self.clear_selection();
            return false;
        };
        self.state = SelectionState::Moving { id, anchor: world, origin: stroke.bounds() };
        true
    }

    /// Move the stroke by the distance since the previous update.
    pub fn update_move(&mut self, doc: &mut DocStore, world: Coord) -> bool {
        let SelectionState::Moving { id, anchor, origin } = self.state else {
            return false;
        };
        let Some(stroke) = doc.get_mut(&id) else {
            self.clear_selection();
            return false;
        };
        stroke.move_by(world.x - anchor.x, world.y - anchor.y);
        self.state = SelectionState::Moving { id, anchor: world, origin };
        true
    }

    pub fn stop_move(&mut self) {
        if let SelectionState::Moving { id, .. } = self.state {
            self.state = SelectionState::Selected { id };
        }
    }

    /// Begin a corner resize from `world`. Requires `Selected`.
    pub fn start_resize(&mut self, doc: &DocStore, handle: Handle, world: Coord) -> bool {
        let SelectionState::Selected { id } = self.state else {
            return false;
        };
        let Some(stroke) = doc.get(&id) else {
            self.clear_selection();
            return false;
        };
        self.state = SelectionState::Resizing { id, handle, anchor: world, origin: stroke.bounds() };
        true
    }

    /// Apply one resize step. Returns `false` when nothing changed, including
    /// when the drag-start extents are too small to derive a finite scale.
    pub fn update_resize(&mut self, doc: &mut DocStore, world: Coord) -> bool {
        let SelectionState::Resizing { id, handle, anchor, origin } = self.state else {
            return false;
        };
        let Some(stroke) = doc.get_mut(&id) else {
            self.clear_selection();
            return false;
        };
        let dx = world.x - anchor.x;
        let dy = world.y - anchor.y;
        self.state = SelectionState::Resizing { id, handle, anchor: world, origin };

        let Some(step) = resize_step(handle, dx, dy, origin.width(), origin.height()) else {
            debug!(%id, "resize skipped on degenerate extents");
            return false;
        };
        stroke.resize(step.scale_x, step.scale_y, step.offset_x, step.offset_y);
        true
    }

    pub fn stop_resize(&mut self) {
        if let SelectionState::Resizing { id, .. } = self.state {
            self.state = SelectionState::Selected { id };
        }
    }
}

/// Scale and origin shift for one resize update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeStep {
    pub scale_x: f64,
    pub scale_y: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

/// Per-handle scale and origin offset for a drag of `(dx, dy)` against
/// drag-start extents `width` x `height`.
///
/// An axis whose extent is below [`MIN_RESIZE_EXTENT`] is pinned. Returns
/// `None` when both axes are pinned or any factor is not finite.
#[must_use]
pub fn resize_step(handle: Handle, dx: f64, dy: f64, width: f64, height: f64) -> Option<ResizeStep> {
    let x_live = width >= MIN_RESIZE_EXTENT;
    let y_live = height >= MIN_RESIZE_EXTENT;
    if !x_live && !y_live {
        return None;
    }

    let (scale_x, offset_x) = match (x_live, handle.is_left()) {
        (false, _) => (1.0, 0.0),
        (true, true) => ((width - dx) / width, dx),
        (true, false) => ((width + dx) / width, 0.0),
    };
    let (scale_y, offset_y) = match (y_live, handle.is_top()) {
        (false, _) => (1.0, 0.0),
        (true, true) => ((height - dy) / height, dy),
        (true, false) => ((height + dy) / height, 0.0),
    };

    let step = ResizeStep { scale_x, scale_y, offset_x, offset_y };
    [scale_x, scale_y, offset_x, offset_y].iter().all(|v| v.is_finite()).then_some(step)
}
