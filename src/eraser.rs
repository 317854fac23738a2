//! Eraser policy: object deletion.
//!
//! The eraser never records a stroke. Each pointer sample deletes every
//! visible stroke it hits.

#[cfg(test)]
#[path = "eraser_test.rs"]
mod eraser_test;

use tracing::debug;

use crate::doc::DocStore;
use crate::geom::Bounds;
use crate::stroke::StrokeId;

/// Delete every stroke in `view` hit at world `(x, y)` with `margin` slop.
///
/// Returns the deleted ids in render order. Repeating the call at the same
/// point deletes nothing further.
pub fn erase_at(doc: &mut DocStore, view: &Bounds, x: f64, y: f64, margin: f64) -> Vec<StrokeId> {
    let hits: Vec<StrokeId> = doc
        .query_bounds(view)
        .into_iter()
        .filter(|s| s.is_point_near(x, y, margin))
        .map(|s| s.id())
        .collect();
    for id in &hits {
        doc.delete_stroke(id);
    }
    if !hits.is_empty() {
        debug!(count = hits.len(), x, y, "erased strokes");
    }
    hits
}
