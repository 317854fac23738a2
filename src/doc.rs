//! Document model: the in-memory stroke store.
//!
//! `DocStore` owns every live stroke in insertion order together with the
//! global z-index counter, the current layer, and the set of layers that have
//! been used. The renderer reads from it through [`DocStore::query_viewport`],
//! which returns the strokes whose bounds touch a world rectangle sorted by
//! `(layer, z_index)`.
//!
//! Lookups by id are linear scans. Operations on an id that is not present are
//! silent no-ops.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::collections::BTreeSet;

use tracing::{debug, info};
use uuid::Uuid;

use crate::consts::DEFAULT_LAYER;
use crate::geom::{Bounds, Rect};
use crate::stroke::{Stroke, StrokeId, StrokeKind};

/// In-memory store of strokes.
#[derive(Debug)]
pub struct DocStore {
    strokes: Vec<Stroke>,
    next_z: u64,
    current_layer: i32,
    layers: BTreeSet<i32>,
}

impl DocStore {
    /// Create an empty store on the default layer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            strokes: Vec::new(),
            next_z: 0,
            current_layer: DEFAULT_LAYER,
            layers: BTreeSet::from([DEFAULT_LAYER]),
        }
    }

    fn next_z_index(&mut self) -> u64 {
        let z = self.next_z;
        self.next_z += 1;
        z
    }

    /// Append an empty stroke of `kind` on the current layer and return it.
    pub fn create_stroke(&mut self, kind: StrokeKind, color: &str, stroke_width: f64) -> &Stroke {
        let id = Uuid::new_v4();
        let z = self.next_z_index();
        debug!(%id, %kind, layer = self.current_layer, z, "stroke created");
        let stroke = Stroke::create(id, kind, color, stroke_width, self.current_layer, z);
        self.push(stroke)
    }

    /// Append a rectangle spanning `(x, y)` to `(x + width, y + height)` on
    /// the current layer. Negative sizes are normalized.
    pub fn create_rectangle(&mut self, x: f64, y: f64, width: f64, height: f64, color: &str, stroke_width: f64) -> &Stroke {
        let id = Uuid::new_v4();
        let z = self.next_z_index();
        debug!(%id, layer = self.current_layer, z, "rectangle created");
        let stroke = Stroke::create_rectangle(id, Rect::new(x, y, width, height), color, stroke_width, self.current_layer, z);
        self.push(stroke)
    }

    fn push(&mut self, stroke: Stroke) -> &Stroke {
        self.strokes.push(stroke);
        let last = self.strokes.len() - 1;
        &self.strokes[last]
    }

    /// Append a sample to a path stroke. Missing ids are ignored.
    ///
    /// Returns whether a point was actually appended.
    pub fn add_point_to_stroke(&mut self, id: &StrokeId, x: f64, y: f64, pressure: f64) -> bool {
        self.get_mut(id).is_some_and(|s| s.add_point(x, y, pressure))
    }

    /// Strokes whose bounds intersect the query rectangle, sorted by
    /// `(layer, z_index)`. Strokes with empty bounds never match.
    #[must_use]
    pub fn query_viewport(&self, x: f64, y: f64, width: f64, height: f64) -> Vec<&Stroke> {
        self.query_bounds(&Bounds::from_rect(x, y, width, height))
    }

    /// Same as [`DocStore::query_viewport`] for a prebuilt box.
    #[must_use]
    pub fn query_bounds(&self, view: &Bounds) -> Vec<&Stroke> {
        let mut hits: Vec<&Stroke> = self.strokes.iter().filter(|s| s.bounds().intersects(view)).collect();
        sort_for_render(&mut hits);
        hits
    }

    /// Every stroke in render order, including ones without geometry.
    #[must_use]
    pub fn render_order(&self) -> Vec<&Stroke> {
        let mut all: Vec<&Stroke> = self.strokes.iter().collect();
        sort_for_render(&mut all);
        all
    }

    #[must_use]
    pub fn get(&self, id: &StrokeId) -> Option<&Stroke> {
        self.strokes.iter().find(|s| s.id() == *id)
    }

    pub fn get_mut(&mut self, id: &StrokeId) -> Option<&mut Stroke> {
        self.strokes.iter_mut().find(|s| s.id() == *id)
    }

    /// Remove a stroke by id, returning it if it was present.
    ///
    /// The store has no notion of selection; callers clear it themselves.
    pub fn delete_stroke(&mut self, id: &StrokeId) -> Option<Stroke> {
        let index = self.strokes.iter().position(|s| s.id() == *id)?;
        debug!(%id, "stroke deleted");
        Some(self.strokes.remove(index))
    }

    /// Remove every stroke and restart the z-index counter.
    pub fn clear_all(&mut self) {
        info!(count = self.strokes.len(), "canvas cleared");
        self.strokes.clear();
        self.next_z = 0;
    }

    #[must_use]
    pub fn current_layer(&self) -> i32 {
        self.current_layer
    }

    /// Switch the layer new strokes land on. Any integer is valid.
    pub fn set_current_layer(&mut self, layer: i32) {
        self.current_layer = layer;
        self.layers.insert(layer);
    }

    /// Layers in ascending order.
    #[must_use]
    pub fn layers(&self) -> Vec<i32> {
        self.layers.iter().copied().collect()
    }

    /// Remove every stroke on `layer`. If it was current, fall back to the
    /// default layer. Returns the number of strokes removed.
    ///
    /// Refusing to delete the default layer is the caller's policy; here it
    /// only loses its strokes and stays enumerated.
    pub fn delete_layer(&mut self, layer: i32) -> usize {
        let before = self.strokes.len();
        self.strokes.retain(|s| s.layer() != layer);
        let removed = before - self.strokes.len();
        if layer != DEFAULT_LAYER {
            self.layers.remove(&layer);
        }
        if self.current_layer == layer {
            self.current_layer = DEFAULT_LAYER;
        }
        info!(layer, removed, "layer deleted");
        removed
    }

    /// Reassign a stroke's layer. Its z-index is unchanged.
    pub fn move_stroke_to_layer(&mut self, id: &StrokeId, layer: i32) -> bool {
        let Some(stroke) = self.get_mut(id) else {
            return false;
        };
        stroke.set_layer(layer);
        self.layers.insert(layer);
        true
    }

    /// Number of strokes currently in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.strokes.len()
    }

    /// Returns `true` if the store contains no strokes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }

    #[must_use]
    pub fn layer_stroke_count(&self, layer: i32) -> usize {
        self.strokes.iter().filter(|s| s.layer() == layer).count()
    }

    /// Union of all stroke bounds; empty when nothing has geometry.
    #[must_use]
    pub fn content_bounds(&self) -> Bounds {
        self.strokes.iter().fold(Bounds::EMPTY, |acc, s| acc.union(s.bounds()))
    }
}

impl Default for DocStore {
    fn default() -> Self {
        Self::new()
    }
}

fn sort_for_render(strokes: &mut [&Stroke]) {
    strokes.sort_by_key(|s| (s.layer(), s.z_index()));
}
