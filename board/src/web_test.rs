#![allow(clippy::float_cmp)]

use super::*;

#[test]
fn window_extent_wins_over_container() {
    assert_eq!(surface_extent(Some(1280.0), 150), 1280.0);
}

#[test]
fn unusable_window_extent_falls_back_to_container() {
    assert_eq!(surface_extent(None, 640), 640.0);
    assert_eq!(surface_extent(Some(0.0), 640), 640.0);
    assert_eq!(surface_extent(Some(f64::NAN), 640), 640.0);
    assert_eq!(surface_extent(Some(-5.0), -1), 0.0);
}

#[test]
fn page_origin_adds_scroll() {
    let origin = page_origin(Point::new(40.0, 120.0), Point::new(0.0, 300.0));
    assert_eq!(origin.client, Point::new(40.0, 120.0));
    assert_eq!(origin.page, Point::new(40.0, 420.0));
}

#[test]
fn scrolled_page_tap_lands_in_surface_cell() {
    let origin = page_origin(Point::new(40.0, 120.0), Point::new(0.0, 300.0));
    let tap = PointerSample { page: Some(Point::new(190.0, 570.0)), ..PointerSample::default() };
    let input = PointerInput::Touch { touches: vec![tap], changed: Vec::new() };
    assert_eq!(normalize(&input, origin), Some(Point::new(150.0, 150.0)));
}
