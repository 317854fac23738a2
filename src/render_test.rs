#![allow(clippy::float_cmp)]

use super::*;
use crate::selection::SelectionController;
use crate::stroke::{StrokeId, StrokeKind};
use crate::surface::{DrawCommand, RecordingSurface};

fn scene<'a>(doc: &'a DocStore, selection: &'a SelectionController, camera: &'a Camera) -> Scene<'a> {
    Scene { doc, selection, camera, preview: None, width: 800.0, height: 600.0, dpr: 1.0, background: "#ffffff" }
}

fn pen(doc: &mut DocStore, pts: &[(f64, f64)]) -> StrokeId {
    let id = doc.create_stroke(StrokeKind::Pen, "#000", 4.0).id();
    for &(x, y) in pts {
        doc.add_point_to_stroke(&id, x, y, 0.5);
    }
    id
}

fn count(surface: &RecordingSurface, pred: impl Fn(&DrawCommand) -> bool) -> usize {
    surface.commands().iter().filter(|c| pred(*c)).count()
}

// =============================================================
// Frame structure
// =============================================================

#[test]
fn empty_doc_clears_and_scales_only() {
    let doc = DocStore::new();
    let sel = SelectionController::default();
    let cam = Camera { zoom: 2.0, ..Camera::default() };
    let mut surface = RecordingSurface::new();

    draw(&mut surface, &scene(&doc, &sel, &cam)).unwrap();

    assert_eq!(
        surface.commands(),
        &[
            DrawCommand::Clear { width: 800.0, height: 600.0, color: "#ffffff".into() },
            DrawCommand::Save,
            DrawCommand::Scale { sx: 2.0, sy: 2.0 },
            DrawCommand::Restore,
        ]
    );
}

#[test]
fn draws_only_strokes_in_view() {
    let mut doc = DocStore::new();
    pen(&mut doc, &[(10.0, 10.0), (20.0, 20.0)]);
    pen(&mut doc, &[(5000.0, 5000.0), (5010.0, 5010.0)]);
    let sel = SelectionController::default();
    let cam = Camera::default();
    let mut surface = RecordingSurface::new();

    draw(&mut surface, &scene(&doc, &sel, &cam)).unwrap();

    assert_eq!(count(&surface, |c| matches!(c, DrawCommand::Stroke)), 1);
}

#[test]
fn strokes_render_relative_to_camera_offset() {
    let mut doc = DocStore::new();
    pen(&mut doc, &[(110.0, 60.0), (120.0, 70.0)]);
    let sel = SelectionController::default();
    let cam = Camera { offset_x: 100.0, offset_y: 50.0, zoom: 1.0 };
    let mut surface = RecordingSurface::new();

    draw(&mut surface, &scene(&doc, &sel, &cam)).unwrap();

    assert!(surface.commands().contains(&DrawCommand::MoveTo { x: 10.0, y: 10.0 }));
}

#[test]
fn lower_layer_draws_first() {
    let mut doc = DocStore::new();
    doc.set_current_layer(1);
    doc.create_rectangle(0.0, 0.0, 10.0, 10.0, "#top", 1.0);
    doc.set_current_layer(0);
    doc.create_rectangle(0.0, 0.0, 10.0, 10.0, "#bottom", 1.0);
    let sel = SelectionController::default();
    let cam = Camera::default();
    let mut surface = RecordingSurface::new();

    draw(&mut surface, &scene(&doc, &sel, &cam)).unwrap();

    let colors: Vec<&str> = surface
        .commands()
        .iter()
        .filter_map(|c| match c {
            DrawCommand::StrokeColor { color } => Some(color.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(colors, vec!["#bottom", "#top"]);
}

// =============================================================
// Overlays
// =============================================================

#[test]
fn preview_is_dashed_accent_rect() {
    let doc = DocStore::new();
    let sel = SelectionController::default();
    let cam = Camera::default();
    let mut sc = scene(&doc, &sel, &cam);
    sc.preview = Some(Rect::new(10.0, 20.0, 30.0, 40.0));
    let mut surface = RecordingSurface::new();

    draw(&mut surface, &sc).unwrap();

    let cmds = surface.commands();
    assert!(cmds.contains(&DrawCommand::StrokeColor { color: ACCENT_COLOR.into() }));
    assert!(cmds.contains(&DrawCommand::LineDash { segments: vec![5.0, 5.0] }));
    assert!(cmds.contains(&DrawCommand::Alpha { alpha: 0.7 }));
    assert!(cmds.contains(&DrawCommand::LineWidth { width: 2.0 }));
    assert!(cmds.contains(&DrawCommand::StrokeRect { x: 10.0, y: 20.0, width: 30.0, height: 40.0 }));
    assert!(cmds.contains(&DrawCommand::LineDash { segments: vec![] }));
    assert!(cmds.contains(&DrawCommand::LineCap { cap: LineCap::Butt }));
    assert!(cmds.contains(&DrawCommand::LineJoin { join: LineJoin::Miter }));
}

#[test]
fn selection_draws_outline_and_four_handles() {
    let mut doc = DocStore::new();
    let id = doc.create_rectangle(0.0, 0.0, 100.0, 50.0, "#000", 1.0).id();
    let mut sel = SelectionController::default();
    sel.select(doc.get(&id).unwrap());
    let cam = Camera::default();
    let mut surface = RecordingSurface::new();

    draw(&mut surface, &scene(&doc, &sel, &cam)).unwrap();

    assert!(
        surface
            .commands()
            .contains(&DrawCommand::StrokeRect { x: 0.0, y: 0.0, width: 100.0, height: 50.0 })
    );
    assert_eq!(count(&surface, |c| matches!(c, DrawCommand::FillRect { .. })), 4);
    assert!(surface.commands().contains(&DrawCommand::FillRect { x: 96.0, y: 46.0, width: 8.0, height: 8.0 }));
}

#[test]
fn handles_drawn_after_restore_in_screen_space() {
    let mut doc = DocStore::new();
    let id = doc.create_rectangle(0.0, 0.0, 100.0, 50.0, "#000", 1.0).id();
    let mut sel = SelectionController::default();
    sel.select(doc.get(&id).unwrap());
    let cam = Camera { zoom: 2.0, ..Camera::default() };
    let mut surface = RecordingSurface::new();

    draw(&mut surface, &scene(&doc, &sel, &cam)).unwrap();

    let cmds = surface.commands();
    let first_restore = cmds.iter().position(|c| *c == DrawCommand::Restore).unwrap();
    let scale_at = cmds.iter().position(|c| *c == DrawCommand::Scale { sx: 2.0, sy: 2.0 }).unwrap();
    let first_handle = cmds.iter().position(|c| matches!(c, DrawCommand::FillRect { .. })).unwrap();
    assert!(scale_at < first_restore);
    assert!(first_handle > first_restore);
    assert!(cmds.contains(&DrawCommand::FillRect { x: 196.0, y: 96.0, width: 8.0, height: 8.0 }));
}

#[test]
fn device_pixel_ratio_scales_backing_store_and_handles() {
    let mut doc = DocStore::new();
    let id = doc.create_rectangle(0.0, 0.0, 100.0, 50.0, "#000", 1.0).id();
    let mut sel = SelectionController::default();
    sel.select(doc.get(&id).unwrap());
    let cam = Camera { zoom: 1.5, ..Camera::default() };
    let mut surface = RecordingSurface::new();

    draw(&mut surface, &Scene { dpr: 2.0, ..scene(&doc, &sel, &cam) }).unwrap();

    let cmds = surface.commands();
    assert_eq!(cmds[0], DrawCommand::Clear { width: 1600.0, height: 1200.0, color: "#ffffff".into() });
    assert_eq!(cmds[2], DrawCommand::Scale { sx: 3.0, sy: 3.0 });
    let handle_scale = cmds.iter().rposition(|c| *c == DrawCommand::Scale { sx: 2.0, sy: 2.0 }).unwrap();
    let first_handle = cmds.iter().position(|c| matches!(c, DrawCommand::FillRect { .. })).unwrap();
    assert!(handle_scale < first_handle);
}

// =============================================================
// Export region
// =============================================================

#[test]
fn region_draw_clears_to_region_size_and_offsets_origin() {
    let mut doc = DocStore::new();
    pen(&mut doc, &[(100.0, 100.0), (120.0, 110.0)]);
    let region = doc.content_bounds().padded(20.0);
    let mut surface = RecordingSurface::new();

    draw_region(&mut surface, &doc, &region, "#ffffff").unwrap();

    assert_eq!(
        surface.commands()[0],
        DrawCommand::Clear { width: 60.0, height: 50.0, color: "#ffffff".into() }
    );
    assert!(surface.commands().contains(&DrawCommand::MoveTo { x: 20.0, y: 20.0 }));
}
