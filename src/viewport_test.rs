#![allow(clippy::float_cmp)]

use super::*;

const EPSILON: f64 = 1e-9;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn point_approx_eq(a: Point, b: Point) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y)
}

fn viewport() -> Viewport {
    Viewport::new(&EditorConfig::default(), CursorStyle::Grab)
}

/// Surface offset inside the page by (10, 20), at 2x device zoom.
fn screen() -> Affine {
    Affine::translate(10.0, 20.0).compose(&Affine::scale(2.0, 2.0))
}

fn touch(id: i32, x: f64, y: f64) -> TouchPoint {
    TouchPoint { id, client: Point::new(x, y) }
}

fn wheel_up() -> WheelDelta {
    WheelDelta { dx: 0.0, dy: -100.0 }
}

fn wheel_down() -> WheelDelta {
    WheelDelta { dx: 0.0, dy: 100.0 }
}

// =============================================================
// Pan
// =============================================================

#[test]
fn pan_moves_by_client_delta_over_screen_scale() {
    let mut vp = viewport();
    vp.begin_pan(Point::new(100.0, 100.0));
    vp.pan_to(Point::new(120.0, 90.0), &screen()).unwrap();
    assert_eq!(vp.transform(), Affine::translate(10.0, -5.0));
}

#[test]
fn pan_there_and_back_restores_transform() {
    let mut vp = viewport();
    vp.wheel(Point::new(50.0, 60.0), wheel_up(), Modifiers::default(), &screen()).unwrap();
    let before = vp.transform();
    vp.begin_pan(Point::new(0.0, 0.0));
    vp.pan_to(Point::new(37.0, -12.5), &screen()).unwrap();
    vp.pan_to(Point::new(0.0, 0.0), &screen()).unwrap();
    vp.end_pan();
    assert!(vp.transform().approx_eq(&before, 1e-9));
}

#[test]
fn pan_keeps_grabbed_point_under_pointer() {
    let mut vp = viewport();
    let screen = screen();
    let grab = Point::new(200.0, 150.0);
    let under = vp.client_to_view(grab, &screen).unwrap();
    vp.begin_pan(grab);
    let release = Point::new(260.0, 110.0);
    vp.pan_to(release, &screen).unwrap();
    assert!(point_approx_eq(vp.view_to_client(&screen).apply(under), release));
}

#[test]
fn pan_without_begin_is_noop() {
    let mut vp = viewport();
    vp.pan_to(Point::new(5.0, 5.0), &screen()).unwrap();
    assert_eq!(vp.transform(), Affine::IDENTITY);
    assert!(!vp.is_panning());
}

#[test]
fn pan_with_zero_scale_screen_fails() {
    let mut vp = viewport();
    vp.begin_pan(Point::new(0.0, 0.0));
    let err = vp.pan_to(Point::new(5.0, 5.0), &Affine::scale(0.0, 0.0)).unwrap_err();
    assert!(matches!(err, EditorError::SingularTransform { .. }));
    assert_eq!(vp.transform(), Affine::IDENTITY);
}

// =============================================================
// Wheel
// =============================================================

#[test]
fn wheel_up_zooms_in_by_factor() {
    let mut vp = viewport();
    assert!(vp.wheel(Point::new(10.0, 20.0), wheel_up(), Modifiers::default(), &screen()).unwrap());
    assert!(approx_eq(vp.transform().scale_factor(), 1.05));
}

#[test]
fn zoom_in_then_out_restores_scale_and_cursor_point() {
    let mut vp = viewport();
    let screen = screen();
    let cursor = Point::new(333.0, 121.0);
    let under = vp.client_to_view(cursor, &screen).unwrap();

    vp.wheel(cursor, wheel_up(), Modifiers::default(), &screen).unwrap();
    assert!(point_approx_eq(vp.view_to_client(&screen).apply(under), cursor));
    vp.wheel(cursor, wheel_down(), Modifiers::default(), &screen).unwrap();

    assert!(approx_eq(vp.transform().scale_factor(), 1.0));
    assert!(point_approx_eq(vp.view_to_client(&screen).apply(under), cursor));
    assert!(vp.transform().approx_eq(&Affine::IDENTITY, 1e-9));
}

#[test]
fn shift_wheel_rotates_about_cursor() {
    let mut vp = viewport();
    let screen = screen();
    let cursor = Point::new(90.0, 40.0);
    let under = vp.client_to_view(cursor, &screen).unwrap();
    let shift = Modifiers { shift: true, ..Modifiers::default() };
    vp.wheel(cursor, wheel_up(), shift, &screen).unwrap();
    let t = vp.transform();
    assert!(approx_eq(t.scale_factor(), 1.0));
    assert!(approx_eq(t.b.atan2(t.a).to_degrees(), 5.0));
    assert!(point_approx_eq(vp.view_to_client(&screen).apply(under), cursor));
}

#[test]
fn zero_wheel_delta_is_ignored() {
    let mut vp = viewport();
    let changed = vp.wheel(Point::new(0.0, 0.0), WheelDelta { dx: 40.0, dy: 0.0 }, Modifiers::default(), &screen()).unwrap();
    assert!(!changed);
    assert_eq!(vp.transform(), Affine::IDENTITY);
}

#[test]
fn wheel_with_singular_screen_fails_without_change() {
    let mut vp = viewport();
    let result = vp.wheel(Point::new(0.0, 0.0), wheel_up(), Modifiers::default(), &Affine::scale(0.0, 1.0));
    assert!(result.is_err());
    assert_eq!(vp.transform(), Affine::IDENTITY);
}

#[test]
fn reset_returns_to_identity() {
    let mut vp = viewport();
    vp.wheel(Point::new(3.0, 3.0), wheel_up(), Modifiers::default(), &screen()).unwrap();
    vp.reset();
    assert_eq!(vp.transform(), Affine::IDENTITY);
}

// =============================================================
// Touch
// =============================================================

#[test]
fn two_finger_spread_scales_about_start_midpoint() {
    let mut vp = viewport();
    let screen = Affine::IDENTITY;
    assert!(vp.touch_start(&[touch(1, 90.0, 100.0), touch(2, 110.0, 100.0)], &screen, 0.0).unwrap());
    vp.touch_move(&[touch(1, 80.0, 100.0), touch(2, 120.0, 100.0)], &screen, 16.0).unwrap();
    let t = vp.effective_transform();
    assert!(approx_eq(t.scale_factor(), 2.0));
    assert!(point_approx_eq(t.apply(Point::new(100.0, 100.0)), Point::new(100.0, 100.0)));
    assert_eq!(vp.transform(), Affine::IDENTITY);
}

#[test]
fn two_finger_twist_and_drag_combine() {
    let mut vp = viewport();
    let screen = Affine::IDENTITY;
    vp.touch_start(&[touch(1, -10.0, 0.0), touch(2, 10.0, 0.0)], &screen, 0.0).unwrap();
    vp.touch_move(&[touch(1, 5.0, -10.0), touch(2, 5.0, 10.0)], &screen, 16.0).unwrap();
    let t = vp.effective_transform();
    assert!(approx_eq(t.scale_factor(), 1.0));
    assert!(approx_eq(t.b.atan2(t.a).to_degrees(), 90.0));
    assert!(point_approx_eq(t.apply(Point::new(0.0, 0.0)), Point::new(5.0, 0.0)));
    assert!(point_approx_eq(t.apply(Point::new(-10.0, 0.0)), Point::new(5.0, -10.0)));
}

#[test]
fn touch_end_commits_gesture() {
    let mut vp = viewport();
    let screen = Affine::IDENTITY;
    vp.touch_start(&[touch(1, 0.0, 0.0), touch(2, 10.0, 0.0)], &screen, 0.0).unwrap();
    vp.touch_move(&[touch(1, 0.0, 0.0), touch(2, 20.0, 0.0)], &screen, 10.0).unwrap();
    let during = vp.effective_transform();
    assert!(vp.touch_end(20.0));
    assert!(!vp.touch_active());
    assert!(vp.transform().approx_eq(&during, 1e-12));
}

#[test]
fn lifting_one_finger_blocks_new_gestures_for_debounce_window() {
    let mut vp = viewport();
    let screen = Affine::IDENTITY;
    vp.touch_start(&[touch(1, 0.0, 0.0), touch(2, 10.0, 0.0)], &screen, 1000.0).unwrap();
    vp.touch_move(&[touch(1, 0.0, 0.0), touch(2, 30.0, 0.0)], &screen, 1010.0).unwrap();
    vp.touch_end(1020.0);
    let committed = vp.transform();

    // A new two-finger sequence inside the window has no effect, via start or move.
    assert!(!vp.touch_start(&[touch(3, 0.0, 0.0), touch(4, 10.0, 0.0)], &screen, 1030.0).unwrap());
    assert!(!vp.touch_move(&[touch(3, 0.0, 0.0), touch(4, 50.0, 0.0)], &screen, 1100.0).unwrap());
    assert!(!vp.touch_end(1150.0));
    assert_eq!(vp.effective_transform(), committed);
    assert_eq!(vp.transform(), committed);

    // After the window a new gesture starts normally.
    assert!(vp.touch_start(&[touch(5, 0.0, 0.0), touch(6, 10.0, 0.0)], &screen, 1220.0).unwrap());
}

#[test]
fn single_touch_does_not_start_gesture() {
    let mut vp = viewport();
    assert!(!vp.touch_start(&[touch(1, 0.0, 0.0)], &Affine::IDENTITY, 0.0).unwrap());
    assert!(!vp.touch_end(5.0));
}

#[test]
fn coincident_fingers_do_not_start_gesture() {
    let mut vp = viewport();
    assert!(!vp.touch_start(&[touch(1, 4.0, 4.0), touch(2, 4.0, 4.0)], &Affine::IDENTITY, 0.0).unwrap());
}

#[test]
fn pinch_to_a_point_is_singular() {
    let mut vp = viewport();
    let screen = Affine::IDENTITY;
    vp.touch_start(&[touch(1, 0.0, 0.0), touch(2, 10.0, 0.0)], &screen, 0.0).unwrap();
    let err = vp.touch_move(&[touch(1, 5.0, 0.0), touch(2, 5.0, 0.0)], &screen, 5.0).unwrap_err();
    assert!(matches!(err, EditorError::SingularTransform { .. }));
}

// =============================================================
// Cursor slot
// =============================================================

#[test]
fn pan_pushes_and_pops_grabbing() {
    let mut vp = viewport();
    assert_eq!(vp.begin_pan(Point::new(0.0, 0.0)), Some(CursorStyle::Grabbing));
    assert_eq!(vp.cursor(), CursorStyle::Grabbing);
    assert_eq!(vp.end_pan(), Some(CursorStyle::Grab));
    assert_eq!(vp.cursor(), CursorStyle::Grab);
}

#[test]
fn nested_push_keeps_first_saved_cursor() {
    let mut vp = viewport();
    vp.push_cursor(CursorStyle::Grabbing);
    vp.push_cursor(CursorStyle::Crosshair);
    assert_eq!(vp.pop_cursor(), Some(CursorStyle::Grab));
    assert_eq!(vp.pop_cursor(), None);
}

#[test]
fn resting_cursor_change_during_override_applies_on_pop() {
    let mut vp = viewport();
    vp.push_cursor(CursorStyle::Grabbing);
    assert_eq!(vp.set_resting_cursor(CursorStyle::Crosshair), None);
    assert_eq!(vp.cursor(), CursorStyle::Grabbing);
    assert_eq!(vp.pop_cursor(), Some(CursorStyle::Crosshair));
}
