#![allow(clippy::float_cmp)]

use super::*;

/// Surface that only keeps path calls and relies on the default `round_rect`.
#[derive(Default)]
struct PathLog {
    calls: Vec<String>,
}

impl Surface for PathLog {
    fn save(&mut self) {}
    fn restore(&mut self) {}
    fn clear(&mut self, _: f64, _: f64, _: &str) -> Result<(), CanvasError> {
        Ok(())
    }
    fn scale(&mut self, _: f64, _: f64) -> Result<(), CanvasError> {
        Ok(())
    }
    fn set_stroke_color(&mut self, _: &str) {}
    fn set_fill_color(&mut self, _: &str) {}
    fn set_line_width(&mut self, _: f64) {}
    fn set_line_cap(&mut self, _: LineCap) {}
    fn set_line_join(&mut self, _: LineJoin) {}
    fn set_alpha(&mut self, _: f64) {}
    fn set_composite(&mut self, _: CompositeMode) -> Result<(), CanvasError> {
        Ok(())
    }
    fn set_line_dash(&mut self, _: &[f64]) -> Result<(), CanvasError> {
        Ok(())
    }
    fn begin_path(&mut self) {
        self.calls.push("begin".into());
    }
    fn move_to(&mut self, x: f64, y: f64) {
        self.calls.push(format!("move {x} {y}"));
    }
    fn line_to(&mut self, x: f64, y: f64) {
        self.calls.push(format!("line {x} {y}"));
    }
    fn close_path(&mut self) {
        self.calls.push("close".into());
    }
    fn arc_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, radius: f64) -> Result<(), CanvasError> {
        self.calls.push(format!("arc {x1} {y1} {x2} {y2} {radius}"));
        Ok(())
    }
    fn stroke(&mut self) {}
    fn stroke_rect(&mut self, _: f64, _: f64, _: f64, _: f64) {}
    fn fill_rect(&mut self, _: f64, _: f64, _: f64, _: f64) {}
}

// =============================================================
// Default round_rect
// =============================================================

#[test]
fn default_round_rect_traces_four_arcs_and_closes() {
    let mut s = PathLog::default();
    s.round_rect(0.0, 0.0, 100.0, 40.0, 4.0).unwrap();
    assert_eq!(
        s.calls,
        vec![
            "move 4 0",
            "arc 100 0 100 40 4",
            "arc 100 40 0 40 4",
            "arc 0 40 0 0 4",
            "arc 0 0 100 0 4",
            "close",
        ]
    );
}

#[test]
fn default_round_rect_clamps_radius_to_half_side() {
    let mut s = PathLog::default();
    s.round_rect(0.0, 0.0, 10.0, 6.0, 50.0).unwrap();
    assert_eq!(s.calls[0], "move 3 0");
    assert!(s.calls[1].ends_with(" 3"));
}

// =============================================================
// RecordingSurface
// =============================================================

#[test]
fn recording_keeps_call_order() {
    let mut s = RecordingSurface::new();
    s.save();
    s.set_line_width(2.0);
    s.begin_path();
    s.move_to(1.0, 2.0);
    s.line_to(3.0, 4.0);
    s.stroke();
    s.restore();
    assert_eq!(
        s.commands(),
        &[
            DrawCommand::Save,
            DrawCommand::LineWidth { width: 2.0 },
            DrawCommand::BeginPath,
            DrawCommand::MoveTo { x: 1.0, y: 2.0 },
            DrawCommand::LineTo { x: 3.0, y: 4.0 },
            DrawCommand::Stroke,
            DrawCommand::Restore,
        ]
    );
}

#[test]
fn recording_round_rect_is_single_command() {
    let mut s = RecordingSurface::new();
    s.round_rect(1.0, 2.0, 3.0, 4.0, 0.3).unwrap();
    assert_eq!(s.commands().len(), 1);
}

#[test]
fn recording_reset_drops_commands() {
    let mut s = RecordingSurface::new();
    s.begin_path();
    s.reset();
    assert!(s.commands().is_empty());
}

#[test]
fn recording_serializes_tagged_ops() {
    let mut s = RecordingSurface::new();
    s.set_composite(CompositeMode::SourceOver).unwrap();
    s.set_line_cap(LineCap::Round);
    let json = s.to_json().unwrap();
    assert_eq!(
        json,
        r#"[{"op":"composite","mode":"source-over"},{"op":"line_cap","cap":"round"}]"#
    );
}

#[test]
fn style_names_match_canvas2d() {
    assert_eq!(CompositeMode::SourceOver.as_str(), "source-over");
    assert_eq!(LineCap::Butt.as_str(), "butt");
    assert_eq!(LineJoin::Miter.as_str(), "miter");
}
