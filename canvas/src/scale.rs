//! Points, viewport size, and the feet/pixel scale model.

#[cfg(test)]
#[path = "scale_test.rs"]
mod scale_test;

use serde::{Deserialize, Serialize};

/// A point in canvas pixels or in feet, depending on context.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance_to(self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// This point shifted by `(dx, dy)`.
    #[must_use]
    pub fn offset(self, dx: f64, dy: f64) -> Point {
        Point::new(self.x + dx, self.y + dy)
    }

    /// Midpoint between this point and `other`.
    #[must_use]
    pub fn midpoint(self, other: Point) -> Point {
        Point::new((self.x + other.x) * 0.5, (self.y + other.y) * 0.5)
    }
}

/// Canvas size in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Center of the viewport.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.width * 0.5, self.height * 0.5)
    }

    /// `true` once the host has given the canvas a real size.
    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

/// Feet-to-pixel scale.
///
/// `pixels_per_foot` is the base conversion; `auto_fit` is the multiplier
/// chosen so an auto-generated diagram fills the viewport. Every conversion
/// uses their product.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scale {
    pub pixels_per_foot: f64,
    pub auto_fit: f64,
}

impl Default for Scale {
    fn default() -> Self {
        Self { pixels_per_foot: crate::consts::DEFAULT_PIXELS_PER_FOOT, auto_fit: 1.0 }
    }
}

impl Scale {
    #[must_use]
    pub fn new(pixels_per_foot: f64) -> Self {
        Self { pixels_per_foot, auto_fit: 1.0 }
    }

    /// Pixels per foot after the auto-fit multiplier.
    #[must_use]
    pub fn effective(&self) -> f64 {
        self.pixels_per_foot * self.auto_fit
    }

    /// Convert a pixel distance to feet. Returns `0.0` for a degenerate scale.
    #[must_use]
    pub fn px_to_feet(&self, px: f64) -> f64 {
        let ppf = self.effective();
        if ppf <= 0.0 { 0.0 } else { px / ppf }
    }

    /// Convert a distance in feet to pixels.
    #[must_use]
    pub fn feet_to_px(&self, feet: f64) -> f64 {
        feet * self.effective()
    }

    /// Convert a pixel-space point to feet relative to `origin`.
    #[must_use]
    pub fn point_to_feet(&self, px: Point, origin: Point) -> Point {
        Point::new(self.px_to_feet(px.x - origin.x), self.px_to_feet(px.y - origin.y))
    }

    /// Convert a point in feet to pixels relative to `origin`.
    #[must_use]
    pub fn point_to_px(&self, feet: Point, origin: Point) -> Point {
        Point::new(origin.x + self.feet_to_px(feet.x), origin.y + self.feet_to_px(feet.y))
    }
}

/// Multiplier that fits a `length_ft × width_ft` diagram inside the viewport
/// minus `padding` on every side, never exceeding `cap`.
///
/// Falls back to `1.0` when the inputs leave no finite positive answer
/// (for example an unmounted canvas).
#[must_use]
pub fn auto_fit_scale(
    length_ft: f64,
    width_ft: f64,
    pixels_per_foot: f64,
    viewport: Viewport,
    padding: f64,
    cap: f64,
) -> f64 {
    let avail_w = viewport.width - 2.0 * padding;
    let avail_h = viewport.height - 2.0 * padding;
    let fit_w = ratio(avail_w, length_ft * pixels_per_foot);
    let fit_h = ratio(avail_h, width_ft * pixels_per_foot);
    let fit = fit_w.min(fit_h).min(cap);
    if fit.is_finite() && fit > 0.0 { fit } else { 1.0 }
}

fn ratio(available: f64, extent: f64) -> f64 {
    if extent > 0.0 { available / extent } else { f64::INFINITY }
}

/// Format a length in feet with `precision` decimals and a foot mark.
#[must_use]
pub fn format_feet(feet: f64, precision: usize) -> String {
    format!("{feet:.precision$}'")
}
