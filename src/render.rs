//! Rendering: draws the visible part of the document to a [`Surface`].
//!
//! The renderer reads document, selection, and camera state and issues
//! drawing calls. It never mutates application state.
//!
//! Layers of a frame, bottom first:
//! 1. background clear
//! 2. strokes from [`DocStore::query_bounds`] over the camera view, in
//!    `(layer, z_index)` order
//! 3. the dashed rectangle preview while one is being dragged
//! 4. the selection outline, then the transform handles in screen space

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use crate::camera::Camera;
use crate::consts::{
    ACCENT_COLOR, HANDLE_FILL, PREVIEW_ALPHA, PREVIEW_DASH_PX, PREVIEW_LINE_WIDTH_PX, SELECTION_DASH_PX,
};
use crate::doc::DocStore;
use crate::error::CanvasError;
use crate::geom::{Bounds, Rect};
use crate::selection::SelectionController;
use crate::surface::{LineCap, LineJoin, Surface};

/// Read-only inputs for one frame.
#[derive(Debug, Clone, Copy)]
pub struct Scene<'a> {
    pub doc: &'a DocStore,
    pub selection: &'a SelectionController,
    pub camera: &'a Camera,
    /// World-space rectangle being dragged out, if any.
    pub preview: Option<Rect>,
    /// Viewport width in CSS pixels.
    pub width: f64,
    /// Viewport height in CSS pixels.
    pub height: f64,
    /// Device pixels per CSS pixel.
    pub dpr: f64,
    /// Clear color.
    pub background: &'a str,
}

/// Draw the full frame.
///
/// # Errors
///
/// Returns [`CanvasError::Surface`] if any backend call fails.
pub fn draw<S: Surface + ?Sized>(surface: &mut S, scene: &Scene<'_>) -> Result<(), CanvasError> {
    let camera = scene.camera;
    let dpr = scene.dpr;
    surface.clear(scene.width * dpr, scene.height * dpr, scene.background)?;

    surface.save();
    surface.scale(dpr * camera.zoom, dpr * camera.zoom)?;

    let view = camera.view_bounds(scene.width, scene.height);
    for stroke in scene.doc.query_bounds(&view) {
        stroke.render(surface, camera.offset_x, camera.offset_y)?;
    }

    if let Some(rect) = scene.preview {
        draw_preview(surface, rect, camera)?;
    }

    if let Some(stroke) = scene.selection.selected(scene.doc) {
        draw_selection_outline(surface, stroke.bounds(), camera)?;
    }

    surface.restore();

    draw_handles(surface, scene)
}

/// Draw every stroke onto an export surface with `origin` at the top-left.
///
/// # Errors
///
/// Returns [`CanvasError::Surface`] if any backend call fails.
pub fn draw_region<S: Surface + ?Sized>(
    surface: &mut S,
    doc: &DocStore,
    origin: &Bounds,
    background: &str,
) -> Result<(), CanvasError> {
    surface.clear(origin.width(), origin.height(), background)?;
    for stroke in doc.query_bounds(origin) {
        stroke.render(surface, origin.min_x, origin.min_y)?;
    }
    Ok(())
}

/// Square dash ends and sharp corners for dashed overlay rectangles.
fn set_outline_style<S: Surface + ?Sized>(surface: &mut S) {
    surface.set_line_cap(LineCap::Butt);
    surface.set_line_join(LineJoin::Miter);
}

fn draw_preview<S: Surface + ?Sized>(surface: &mut S, rect: Rect, camera: &Camera) -> Result<(), CanvasError> {
    let dash = PREVIEW_DASH_PX / camera.zoom;
    surface.save();
    surface.set_stroke_color(ACCENT_COLOR);
    surface.set_line_width(PREVIEW_LINE_WIDTH_PX / camera.zoom);
    surface.set_alpha(PREVIEW_ALPHA);
    set_outline_style(surface);
    surface.set_line_dash(&[dash, dash])?;
    surface.stroke_rect(rect.x - camera.offset_x, rect.y - camera.offset_y, rect.width, rect.height);
    surface.set_line_dash(&[])?;
    surface.restore();
    Ok(())
}

fn draw_selection_outline<S: Surface + ?Sized>(
    surface: &mut S,
    bounds: Bounds,
    camera: &Camera,
) -> Result<(), CanvasError> {
    if bounds.is_empty() {
        return Ok(());
    }
    let dash = SELECTION_DASH_PX / camera.zoom;
    surface.save();
    surface.set_stroke_color(ACCENT_COLOR);
    surface.set_line_width(1.0 / camera.zoom);
    set_outline_style(surface);
    surface.set_line_dash(&[dash, dash])?;
    surface.stroke_rect(
        bounds.min_x - camera.offset_x,
        bounds.min_y - camera.offset_y,
        bounds.width(),
        bounds.height(),
    );
    surface.set_line_dash(&[])?;
    surface.restore();
    Ok(())
}

fn draw_handles<S: Surface + ?Sized>(surface: &mut S, scene: &Scene<'_>) -> Result<(), CanvasError> {
    let handles = scene.selection.handles(scene.doc, scene.camera);
    if handles.is_empty() {
        return Ok(());
    }
    surface.save();
    surface.scale(scene.dpr, scene.dpr)?;
    surface.set_fill_color(HANDLE_FILL);
    surface.set_stroke_color(ACCENT_COLOR);
    surface.set_line_width(1.0);
    for h in &handles {
        surface.fill_rect(h.x, h.y, h.size, h.size);
        surface.stroke_rect(h.x, h.y, h.size, h.size);
    }
    surface.restore();
    Ok(())
}
