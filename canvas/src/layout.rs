//! Deterministic layout for auto-generated deck diagrams.
//!
//! DESIGN
//! ======
//! The surrounding estimator form hands over plain measurements
//! ([`DeckInput`]). From them this module derives, in feet: section outlines
//! laid left to right, a post grid that favors the perimeter, a stair run
//! whose step count comes from the deck height, and dimension lines for each
//! edge. [`generate`] then picks an auto-fit scale and emits pixel-space
//! entities ready to seed a scene.
//!
//! Two step-count formulas coexist on purpose: [`stair_step_count`] uses a
//! 7.5" standard rise, while [`stair_steps_from_railing`] back-calculates from
//! a stair railing length with the 7"/10" rise:run hypotenuse. They feed
//! different inputs and are kept separate.

#[cfg(test)]
#[path = "layout_test.rs"]
mod layout_test;

use serde::{Deserialize, Serialize};

use crate::config::EditorConfig;
use crate::consts::{
    DIMENSION_GAP_PX, DIMENSION_TICK_PX, POST_SIZE_FT, RAILING_RISE_IN, RAILING_RUN_IN, STAIR_RUN_IN,
    STAIR_WIDTH_FT, STANDARD_RISE_IN,
};
use crate::doc::{Color, Entity, Rect, Shape, Style, StructuralRole};
use crate::scale::{Point, Scale, Viewport, auto_fit_scale, format_feet};

// =============================================================
// Input
// =============================================================

/// One rectangular deck section, in feet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeckSection {
    /// Horizontal extent.
    pub length_ft: f64,
    /// Vertical extent.
    pub width_ft: f64,
}

/// Measurements supplied by the estimator form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeckInput {
    pub sections: Vec<DeckSection>,
    pub post_count: u32,
    /// Draw railings and a stair run.
    pub has_railing: bool,
    pub deck_height_ft: f64,
    /// Stair railing length, used for the step count when no height is given.
    pub stair_railing_ft: Option<f64>,
    /// Decimals shown on dimension labels.
    pub precision: usize,
}

impl Default for DeckInput {
    fn default() -> Self {
        Self {
            sections: Vec::new(),
            post_count: 0,
            has_railing: false,
            deck_height_ft: 0.0,
            stair_railing_ft: None,
            precision: 1,
        }
    }
}

// =============================================================
// Posts
// =============================================================

/// Grid dimensions `(cols, rows)` for `n` posts over a `width × height` box.
#[must_use]
pub fn post_grid(n: u32, width: f64, height: f64) -> (u32, u32) {
    if n == 0 {
        return (0, 0);
    }
    let aspect = if height > 0.0 { width / height } else { 1.0 };
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let cols = ((f64::from(n) * aspect).sqrt().ceil() as u32).clamp(1, n);
    let rows = n.div_ceil(cols);
    (cols, rows)
}

/// Place `n` posts over `bounds` (feet), row-major.
///
/// The first and last column and row sit exactly on the bounding edges and
/// interior lines are evenly spaced. A lone column or row is centered.
#[must_use]
pub fn place_posts(n: u32, bounds: Rect) -> Vec<Point> {
    let (cols, rows) = post_grid(n, bounds.width, bounds.height);
    (0..n)
        .map(|k| {
            let col = k % cols;
            let row = k / cols;
            Point::new(
                grid_line(col, cols, bounds.x, bounds.width),
                grid_line(row, rows, bounds.y, bounds.height),
            )
        })
        .collect()
}

fn grid_line(index: u32, count: u32, start: f64, extent: f64) -> f64 {
    if count <= 1 {
        start + extent * 0.5
    } else {
        start + extent * f64::from(index) / f64::from(count - 1)
    }
}

// =============================================================
// Stairs
// =============================================================

/// Steps needed to descend `deck_height_ft` at the standard 7.5" rise.
#[must_use]
pub fn stair_step_count(deck_height_ft: f64) -> u32 {
    if deck_height_ft <= 0.0 {
        return 0;
    }
    let steps = (deck_height_ft * 12.0 / STANDARD_RISE_IN).ceil();
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let steps = steps as u32;
    steps
}

/// Steps implied by a stair railing of `railing_length_in` inches, one step
/// per 7"/10" rise:run hypotenuse.
#[must_use]
pub fn stair_steps_from_railing(railing_length_in: f64) -> u32 {
    if railing_length_in <= 0.0 {
        return 0;
    }
    let per_step = RAILING_RISE_IN.hypot(RAILING_RUN_IN);
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let steps = (railing_length_in / per_step).round() as u32;
    steps
}

/// Step count and run depth of a stair, in feet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StairPlan {
    pub step_count: u32,
    pub total_depth_ft: f64,
}

impl StairPlan {
    /// Plan for `step_count` treads at the standard run.
    #[must_use]
    pub fn with_steps(step_count: u32) -> Self {
        Self { step_count, total_depth_ft: f64::from(step_count) * STAIR_RUN_IN / 12.0 }
    }

    /// Depth of one step's slot.
    #[must_use]
    pub fn step_slot(&self) -> f64 {
        if self.step_count == 0 { 0.0 } else { self.total_depth_ft / f64::from(self.step_count) }
    }
}

/// Plan the stair run for `input`: deck height first, stair railing length
/// as the fallback.
#[must_use]
pub fn plan_stairs(input: &DeckInput) -> Option<StairPlan> {
    if !input.has_railing {
        return None;
    }
    let steps = if input.deck_height_ft > 0.0 {
        stair_step_count(input.deck_height_ft)
    } else {
        input.stair_railing_ft.map_or(0, |ft| stair_steps_from_railing(ft * 12.0))
    };
    (steps > 0).then(|| StairPlan::with_steps(steps))
}

// =============================================================
// Dimension lines
// =============================================================

/// Drawn geometry of a dimension line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DimensionLine {
    pub start: Point,
    pub end: Point,
    /// Perpendicular end ticks, one per endpoint.
    pub ticks: [(Point, Point); 2],
    /// Label anchor, centered on the line.
    pub label_at: Point,
    /// Line direction in degrees, for label rotation.
    pub angle_deg: f64,
}

/// Dimension line for the edge `from → to`, shifted `offset` units along the
/// edge's left-hand normal (upward for a left-to-right edge in screen space).
#[must_use]
pub fn dimension_line(from: Point, to: Point, offset: f64) -> DimensionLine {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    let len = dx.hypot(dy);
    let (nx, ny) = if len > 0.0 { (dy / len, -dx / len) } else { (0.0, -1.0) };
    let start = from.offset(nx * offset, ny * offset);
    let end = to.offset(nx * offset, ny * offset);
    let tick = |p: Point| {
        (
            p.offset(nx * DIMENSION_TICK_PX, ny * DIMENSION_TICK_PX),
            p.offset(-nx * DIMENSION_TICK_PX, -ny * DIMENSION_TICK_PX),
        )
    };
    DimensionLine {
        start,
        end,
        ticks: [tick(start), tick(end)],
        label_at: start.midpoint(end),
        angle_deg: dy.atan2(dx).to_degrees(),
    }
}

// =============================================================
// Diagram generation
// =============================================================

/// Output of [`generate`]: pixel-space entities plus the scale used.
#[derive(Debug, Clone)]
pub struct Diagram {
    pub entities: Vec<Entity>,
    pub scale: Scale,
    /// Pixel bounds of the structure (sections plus stairs).
    pub bounds: Rect,
    pub stairs: Option<StairPlan>,
}

const SECTION_FILL: Color = Color::rgb(0xE8, 0xD3, 0xB0);
const POST_FILL: Color = Color::rgb(0x6B, 0x4F, 0x35);
const RAILING_STROKE: Color = Color::rgb(0x55, 0x55, 0x55);
const DIMENSION_STROKE: Color = Color::rgb(0x1E, 0x5A, 0xA8);

/// Build the auto-generated diagram for `input`, fitted into `viewport`.
#[must_use]
pub fn generate(input: &DeckInput, viewport: Viewport, config: &EditorConfig) -> Diagram {
    // Section rectangles in feet, left to right, top-aligned.
    let mut sections_ft = Vec::with_capacity(input.sections.len());
    let mut cursor = 0.0;
    for section in &input.sections {
        sections_ft.push(Rect::new(cursor, 0.0, section.length_ft, section.width_ft));
        cursor += section.length_ft;
    }
    let total_length = cursor;
    let deck_width = input.sections.iter().map(|s| s.width_ft).fold(0.0, f64::max);

    let stairs = plan_stairs(input);
    let stairs_ft = stairs.zip(sections_ft.first()).map(|(plan, first)| {
        Rect::new(first.x + first.width * 0.5 - STAIR_WIDTH_FT * 0.5, first.height, STAIR_WIDTH_FT, plan.total_depth_ft)
    });
    let total_height = deck_width + stairs.map_or(0.0, |p| p.total_depth_ft);

    let auto_fit = auto_fit_scale(
        total_length,
        total_height,
        config.pixels_per_foot,
        viewport,
        config.viewport_padding,
        config.auto_fit_cap,
    );
    let scale = Scale { pixels_per_foot: config.pixels_per_foot, auto_fit };
    let origin = Point::new(
        (viewport.width - scale.feet_to_px(total_length)) * 0.5,
        (viewport.height - scale.feet_to_px(total_height)) * 0.5,
    );
    let to_px = |r: Rect| {
        let tl = scale.point_to_px(r.top_left(), origin);
        Rect::new(tl.x, tl.y, scale.feet_to_px(r.width), scale.feet_to_px(r.height))
    };

    let mut entities = Vec::new();

    for rect in &sections_ft {
        let style = Style { fill: Some(SECTION_FILL), ..Style::default() };
        entities.push(Entity::new(
            Shape::Structural { role: StructuralRole::Section, rect: to_px(*rect), steps: 0 },
            style,
        ));
    }

    if input.has_railing {
        for rect in &sections_ft {
            let style = Style { stroke: RAILING_STROKE, stroke_width: 3.0, ..Style::default() };
            entities.push(Entity::new(
                Shape::Structural { role: StructuralRole::Railing, rect: to_px(*rect), steps: 0 },
                style,
            ));
        }
    }

    if let (Some(plan), Some(rect)) = (stairs, stairs_ft) {
        let style = Style { fill: Some(SECTION_FILL), ..Style::default() };
        entities.push(Entity::new(
            Shape::Structural { role: StructuralRole::Stairs, rect: to_px(rect), steps: plan.step_count },
            style,
        ));
    }

    let deck_ft = Rect::new(0.0, 0.0, total_length, deck_width);
    for post in place_posts(input.post_count, deck_ft) {
        let half = POST_SIZE_FT * 0.5;
        let rect = Rect::new(post.x - half, post.y - half, POST_SIZE_FT, POST_SIZE_FT);
        let style = Style { fill: Some(POST_FILL), stroke_width: 1.0, ..Style::default() };
        entities.push(Entity::new(Shape::Structural { role: StructuralRole::Post, rect: to_px(rect), steps: 0 }, style));
    }

    for (i, rect) in sections_ft.iter().enumerate() {
        let px = to_px(*rect);
        let top = (px.top_left(), Point::new(px.x + px.width, px.y));
        entities.push(dimension_entity(top.0, top.1, format_feet(rect.width, input.precision)));
        if i == 0 {
            let left = (Point::new(px.x, px.y + px.height), px.top_left());
            entities.push(dimension_entity(left.0, left.1, format_feet(rect.height, input.precision)));
        }
    }

    let structure_ft = stairs_ft.map_or(deck_ft, |s| deck_ft.union(&s));
    Diagram { entities, scale, bounds: to_px(structure_ft), stairs }
}

fn dimension_entity(from: Point, to: Point, label: String) -> Entity {
    let style = Style { stroke: DIMENSION_STROKE, stroke_width: 1.0, ..Style::default() };
    Entity::new(Shape::Measurement { from, to, offset: DIMENSION_GAP_PX, label }, style)
}
