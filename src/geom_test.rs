#![allow(clippy::float_cmp)]

use super::*;

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y, 0.5, 0)
}

// =============================================================
// Bounds: empty sentinel
// =============================================================

#[test]
fn empty_is_empty() {
    assert!(Bounds::EMPTY.is_empty());
    assert!(Bounds::default().is_empty());
    assert_eq!(Bounds::EMPTY.width(), 0.0);
    assert_eq!(Bounds::EMPTY.height(), 0.0);
}

#[test]
fn empty_never_intersects() {
    let everything = Bounds::new(-1e9, -1e9, 1e9, 1e9);
    assert!(!Bounds::EMPTY.intersects(&everything));
    assert!(!everything.intersects(&Bounds::EMPTY));
    assert!(!Bounds::EMPTY.intersects(&Bounds::EMPTY));
}

#[test]
fn empty_contains_nothing() {
    assert!(!Bounds::EMPTY.contains(0.0, 0.0));
}

#[test]
fn including_into_empty_yields_degenerate_point_box() {
    let b = Bounds::EMPTY.including(3.0, 4.0);
    assert_eq!(b, Bounds::new(3.0, 4.0, 3.0, 4.0));
    assert!(!b.is_empty());
}

#[test]
fn union_with_empty_is_identity() {
    let b = Bounds::new(0.0, 0.0, 10.0, 5.0);
    assert_eq!(b.union(Bounds::EMPTY), b);
    assert_eq!(Bounds::EMPTY.union(b), b);
}

#[test]
fn padded_and_translated_keep_empty() {
    assert!(Bounds::EMPTY.padded(20.0).is_empty());
    assert!(Bounds::EMPTY.translated(5.0, 5.0).is_empty());
}

// =============================================================
// Bounds: construction and math
// =============================================================

#[test]
fn from_corners_normalizes_order() {
    let b = Bounds::from_corners(10.0, 20.0, 0.0, 5.0);
    assert_eq!(b, Bounds::new(0.0, 5.0, 10.0, 20.0));
}

#[test]
fn from_points_is_tight_union() {
    let pts = [pt(1.0, 9.0), pt(-4.0, 2.0), pt(7.0, -3.0)];
    let b = Bounds::from_points(&pts);
    assert_eq!(b, Bounds::new(-4.0, -3.0, 7.0, 9.0));
}

#[test]
fn from_points_empty_is_sentinel() {
    let pts: [Point; 0] = [];
    assert!(Bounds::from_points(&pts).is_empty());
}

#[test]
fn union_spans_both() {
    let a = Bounds::new(0.0, 0.0, 1.0, 1.0);
    let b = Bounds::new(5.0, -2.0, 6.0, 0.5);
    assert_eq!(a.union(b), Bounds::new(0.0, -2.0, 6.0, 1.0));
}

#[test]
fn intersects_overlapping() {
    let a = Bounds::new(0.0, 0.0, 10.0, 10.0);
    let b = Bounds::new(5.0, 5.0, 15.0, 15.0);
    assert!(a.intersects(&b));
    assert!(b.intersects(&a));
}

#[test]
fn intersects_touching_edges_counts() {
    let a = Bounds::new(0.0, 0.0, 10.0, 10.0);
    let b = Bounds::new(10.0, 0.0, 20.0, 10.0);
    assert!(a.intersects(&b));
}

#[test]
fn intersects_strictly_separated_fails() {
    let a = Bounds::new(0.0, 0.0, 10.0, 10.0);
    assert!(!a.intersects(&Bounds::new(10.1, 0.0, 20.0, 10.0)));
    assert!(!a.intersects(&Bounds::new(-20.0, 0.0, -0.1, 10.0)));
    assert!(!a.intersects(&Bounds::new(0.0, 10.1, 10.0, 20.0)));
    assert!(!a.intersects(&Bounds::new(0.0, -20.0, 10.0, -0.1)));
}

#[test]
fn degenerate_point_box_intersects_containing_box() {
    let p = Bounds::EMPTY.including(5.0, 5.0);
    assert!(p.intersects(&Bounds::new(0.0, 0.0, 10.0, 10.0)));
}

#[test]
fn contains_is_inclusive() {
    let b = Bounds::new(0.0, 0.0, 10.0, 10.0);
    assert!(b.contains(0.0, 0.0));
    assert!(b.contains(10.0, 10.0));
    assert!(!b.contains(10.01, 5.0));
}

#[test]
fn padded_grows_every_side() {
    let b = Bounds::new(0.0, 0.0, 10.0, 10.0).padded(2.0);
    assert_eq!(b, Bounds::new(-2.0, -2.0, 12.0, 12.0));
}

#[test]
fn from_rect_uses_origin_and_size() {
    assert_eq!(Bounds::from_rect(5.0, 5.0, 10.0, 20.0), Bounds::new(5.0, 5.0, 15.0, 25.0));
}

// =============================================================
// Point
// =============================================================

#[test]
fn point_distance() {
    assert_eq!(pt(0.0, 0.0).distance_to(3.0, 4.0), 5.0);
}

// =============================================================
// Rect
// =============================================================

#[test]
fn rect_from_corners_normalizes() {
    let r = Rect::from_corners(100.0, 50.0, 0.0, 0.0);
    assert_eq!(r, Rect::new(0.0, 0.0, 100.0, 50.0));
}

#[test]
fn rect_normalized_flips_negative_extents() {
    let r = Rect::new(10.0, 10.0, -4.0, -6.0).normalized();
    assert_eq!(r, Rect::new(6.0, 4.0, 4.0, 6.0));
}

#[test]
fn rect_bounds_are_corners() {
    let r = Rect::new(1.0, 2.0, 3.0, 4.0);
    assert_eq!(r.bounds(), Bounds::new(1.0, 2.0, 4.0, 6.0));
}
