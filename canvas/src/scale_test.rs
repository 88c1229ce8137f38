#![allow(clippy::float_cmp)]

use super::*;

// =============================================================
// Point / Viewport
// =============================================================

#[test]
fn point_distance_and_midpoint() {
    let a = Point::new(0.0, 0.0);
    let b = Point::new(30.0, 40.0);
    assert_eq!(a.distance_to(b), 50.0);
    assert_eq!(a.midpoint(b), Point::new(15.0, 20.0));
    assert_eq!(a.offset(1.0, -1.0), Point::new(1.0, -1.0));
}

#[test]
fn viewport_mounted_needs_both_dimensions() {
    assert!(Viewport::new(800.0, 600.0).is_mounted());
    assert!(!Viewport::new(0.0, 600.0).is_mounted());
    assert!(!Viewport::default().is_mounted());
    assert_eq!(Viewport::new(800.0, 600.0).center(), Point::new(400.0, 300.0));
}

// =============================================================
// Scale
// =============================================================

#[test]
fn scale_effective_is_product() {
    let s = Scale { pixels_per_foot: 20.0, auto_fit: 1.5 };
    assert_eq!(s.effective(), 30.0);
    assert_eq!(s.feet_to_px(2.0), 60.0);
    assert_eq!(s.px_to_feet(60.0), 2.0);
}

#[test]
fn scale_degenerate_converts_to_zero_feet() {
    let s = Scale { pixels_per_foot: 0.0, auto_fit: 1.0 };
    assert_eq!(s.px_to_feet(100.0), 0.0);
}

#[test]
fn scale_point_conversion_roundtrip_with_origin() {
    let s = Scale::new(10.0);
    let origin = Point::new(100.0, 50.0);
    let ft = s.point_to_feet(Point::new(200.0, 150.0), origin);
    assert_eq!(ft, Point::new(10.0, 10.0));
    assert_eq!(s.point_to_px(ft, origin), Point::new(200.0, 150.0));
}

#[test]
fn scale_default_is_twenty_ppf() {
    assert_eq!(Scale::default(), Scale { pixels_per_foot: 20.0, auto_fit: 1.0 });
}

// =============================================================
// Auto-fit
// =============================================================

#[test]
fn auto_fit_limited_by_tighter_axis() {
    // avail = 720 x 520; 16 ft * 20 = 320 -> 2.25; 12 ft * 20 = 240 -> 2.1667; cap 3.
    let fit = auto_fit_scale(16.0, 12.0, 20.0, Viewport::new(800.0, 600.0), 40.0, 3.0);
    assert!((fit - 520.0 / 240.0).abs() < 1e-12);
}

#[test]
fn auto_fit_respects_cap() {
    let fit = auto_fit_scale(2.0, 2.0, 20.0, Viewport::new(800.0, 600.0), 40.0, 2.0);
    assert_eq!(fit, 2.0);
}

#[test]
fn auto_fit_shrinks_large_decks() {
    let fit = auto_fit_scale(100.0, 10.0, 20.0, Viewport::new(800.0, 600.0), 40.0, 2.0);
    assert_eq!(fit, 720.0 / 2000.0);
}

#[test]
fn auto_fit_falls_back_on_unmounted_canvas() {
    assert_eq!(auto_fit_scale(16.0, 12.0, 20.0, Viewport::new(0.0, 0.0), 40.0, 2.0), 1.0);
}

#[test]
fn auto_fit_falls_back_on_empty_deck() {
    // Both ratios infinite, capped to 2.0 -- still finite and positive.
    assert_eq!(auto_fit_scale(0.0, 0.0, 20.0, Viewport::new(800.0, 600.0), 40.0, 2.0), 2.0);
    // Infinite cap leaves no finite answer.
    assert_eq!(auto_fit_scale(0.0, 0.0, 20.0, Viewport::new(800.0, 600.0), 40.0, f64::INFINITY), 1.0);
}

// =============================================================
// Labels
// =============================================================

#[test]
fn format_feet_uses_precision() {
    assert_eq!(format_feet(10.0, 1), "10.0'");
    assert_eq!(format_feet(16.25, 2), "16.25'");
    assert_eq!(format_feet(3.4, 0), "3'");
}
