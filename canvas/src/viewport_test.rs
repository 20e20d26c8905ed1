#![allow(clippy::float_cmp)]

use super::*;

// =============================================================
// to_canvas
// =============================================================

#[test]
fn identity_when_rendered_at_logical_size() {
    let rect = ViewRect::new(0.0, 0.0, 2048.0, 1024.0);
    assert_eq!(rect.to_canvas(Point::new(505.0, 505.0)), Point::new(505.0, 505.0));
}

#[test]
fn scales_by_logical_over_rendered_size() {
    let rect = ViewRect::new(0.0, 0.0, 1024.0, 512.0);
    assert_eq!(rect.to_canvas(Point::new(100.0, 50.0)), Point::new(200.0, 100.0));
}

#[test]
fn subtracts_element_origin_before_scaling() {
    let rect = ViewRect::new(40.0, 60.0, 512.0, 256.0);
    let p = rect.to_canvas(Point::new(40.0 + 128.0, 60.0 + 64.0));
    assert_eq!(p, Point::new(512.0, 256.0));
}

#[test]
fn clamps_points_outside_the_element() {
    let rect = ViewRect::new(10.0, 10.0, 1024.0, 512.0);
    assert_eq!(rect.to_canvas(Point::new(-500.0, -500.0)), Point::new(0.0, 0.0));
    assert_eq!(rect.to_canvas(Point::new(5000.0, 5000.0)), Point::new(2048.0, 1024.0));
    assert_eq!(rect.to_canvas(Point::new(5000.0, 20.0)).y, 20.0);
}

#[test]
fn collapsed_element_maps_to_origin() {
    let rect = ViewRect::new(0.0, 0.0, 0.0, 300.0);
    assert_eq!(rect.to_canvas(Point::new(50.0, 50.0)), Point::default());
}

#[test]
fn non_uniform_scaling_is_per_axis() {
    // Element stretched to 1:1 on screen; logical space stays 2:1.
    let rect = ViewRect::new(0.0, 0.0, 1000.0, 1000.0);
    let p = rect.to_canvas(Point::new(500.0, 500.0));
    assert!((p.x - 1024.0).abs() < 1e-9);
    assert!((p.y - 512.0).abs() < 1e-9);
}

// =============================================================
// to_client
// =============================================================

#[test]
fn to_client_inverts_to_canvas_inside_bounds() {
    let rect = ViewRect::new(30.0, 20.0, 800.0, 400.0);
    let canvas = Point::new(1500.0, 300.0);
    let back = rect.to_canvas(rect.to_client(canvas));
    assert!((back.x - canvas.x).abs() < 1e-9);
    assert!((back.y - canvas.y).abs() < 1e-9);
}
