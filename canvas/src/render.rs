//! Rendering: turns the scene into a backend-neutral display list.
//!
//! [`draw`] receives read-only views of the scene and input state and returns
//! [`DrawOp`]s in canvas coordinates, bottom-most first. It never mutates
//! application state. Backends implement [`Painter`]: the raster exporter in
//! [`crate::export`] and, behind the `web` feature, the HTML canvas painter in
//! `crate::web`.
//!
//! Entity transforms are baked in here: every point goes through
//! [`Entity::apply_transform`], and ellipses are flattened to paths so a
//! painter only ever sees polylines and text.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use std::f64::consts::{PI, TAU};

use crate::consts::{ARROW_ANGLE, ARROW_SIZE, CALLOUT_PADDING, HANDLE_RADIUS_PX};
use crate::doc::{Color, Entity, Rect, Scene, Shape, StructuralRole, Style, flat_points};
use crate::hit::resize_handle_position;
use crate::input::InputState;
use crate::layout::dimension_line;
use crate::scale::Point;

/// Selection dash segment length in canvas pixels.
const SELECTION_DASH_PX: f64 = 4.0;

/// Railing dash pattern.
const RAILING_DASH: [f64; 2] = [8.0, 4.0];

/// Segments used to flatten an ellipse.
const ELLIPSE_SEGMENTS: u32 = 64;

/// Radius of the pending-measurement marker.
const PENDING_MARKER_RADIUS: f64 = 4.0;

/// Stroke parameters for a path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeSpec {
    pub color: Color,
    pub width: f64,
    /// `[on, off]` dash lengths; `None` draws a solid line.
    pub dash: Option<[f64; 2]>,
}

/// Horizontal placement of a text op relative to its anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    /// Anchor is the top-left of the line box.
    Start,
    /// Anchor is the center of the line box.
    Center,
}

/// One backend-neutral drawing instruction.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    /// Polyline, optionally closed, stroked and/or filled.
    Path { points: Vec<Point>, closed: bool, stroke: Option<StrokeSpec>, fill: Option<Color> },
    /// One line of text.
    Text {
        anchor: Point,
        content: String,
        size: f64,
        color: Color,
        align: TextAlign,
        /// Clockwise rotation in degrees around the anchor.
        rotation: f64,
        bold: bool,
    },
}

/// What to include beyond the committed entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Selection outline, resize handle and pending-gesture markers.
    pub decorations: bool,
    /// The entity currently being drawn.
    pub provisional: bool,
}

impl RenderOptions {
    /// Everything, for an on-screen paint.
    #[must_use]
    pub fn interactive() -> Self {
        Self { decorations: true, provisional: true }
    }

    /// Committed entities only, for export.
    #[must_use]
    pub fn export() -> Self {
        Self { decorations: false, provisional: false }
    }
}

/// A backend that can execute draw ops.
pub trait Painter {
    type Error;

    /// Execute one op.
    ///
    /// # Errors
    ///
    /// Backend-specific failures.
    fn paint(&mut self, op: &DrawOp) -> Result<(), Self::Error>;
}

/// Execute `ops` in order, stopping at the first failure.
///
/// # Errors
///
/// The first error returned by `painter`.
pub fn paint_all<P: Painter>(painter: &mut P, ops: &[DrawOp]) -> Result<(), P::Error> {
    for op in ops {
        painter.paint(op)?;
    }
    Ok(())
}

/// Build the display list for the scene.
#[must_use]
pub fn draw(scene: &Scene, input: &InputState, options: RenderOptions) -> Vec<DrawOp> {
    let mut ops = Vec::new();

    // Layer 1: entities in z-order (bottom first).
    for entity in scene.sorted_entities() {
        if entity.visible {
            draw_entity(&mut ops, entity);
        }
    }

    // Layer 2: the shape being drawn.
    if options.provisional {
        if let Some(entity) = input.provisional() {
            draw_entity(&mut ops, entity);
        }
    }

    // Layer 3: selection UI.
    if options.decorations {
        if let Some(selected) = scene.selected().filter(|e| e.visible) {
            draw_selection(&mut ops, selected);
        }
        if let Some(start) = input.pending_measurement() {
            ops.push(DrawOp::Path {
                points: circle_points(start, PENDING_MARKER_RADIUS, PENDING_MARKER_RADIUS, 16),
                closed: true,
                stroke: None,
                fill: Some(Color::SELECTION),
            });
        }
    }

    ops
}

// =============================================================
// Entity dispatch
// =============================================================

/// Append the ops for one entity.
pub fn draw_entity(ops: &mut Vec<DrawOp>, entity: &Entity) {
    let style = &entity.style;
    let t = |p: Point| entity.apply_transform(p);
    let stroke = stroke_of(style, None);
    let fill = style.fill.map(|c| c.with_opacity(style.opacity));

    match &entity.shape {
        Shape::Structural { role, rect, steps } => draw_structural(ops, entity, *role, *rect, *steps),
        Shape::Freehand { points, .. } => {
            let points: Vec<Point> = flat_points(points).map(t).collect();
            ops.push(DrawOp::Path { points, closed: false, stroke: Some(stroke), fill: None });
        }
        Shape::Line { from, to } => {
            ops.push(DrawOp::Path { points: vec![t(*from), t(*to)], closed: false, stroke: Some(stroke), fill: None });
        }
        Shape::Arrow { from, to } => {
            let (a, b) = (t(*from), t(*to));
            ops.push(DrawOp::Path { points: vec![a, b], closed: false, stroke: Some(stroke), fill: None });
            ops.push(arrowhead(a, b, stroke.color));
        }
        Shape::Rectangle { rect } => {
            ops.push(DrawOp::Path { points: rect.corners().map(t).to_vec(), closed: true, stroke: Some(stroke), fill });
        }
        Shape::Ellipse { center, rx, ry } => {
            let points = circle_points(*center, *rx, *ry, ELLIPSE_SEGMENTS).into_iter().map(t).collect();
            ops.push(DrawOp::Path { points, closed: true, stroke: Some(stroke), fill });
        }
        Shape::Polygon { center, radius, sides } => {
            let points = polygon_points(*center, *radius, *sides).into_iter().map(t).collect();
            ops.push(DrawOp::Path { points, closed: true, stroke: Some(stroke), fill });
        }
        Shape::Text { at, content } => draw_text_lines(ops, entity, *at, content, TextAlign::Start),
        Shape::Measurement { from, to, offset, label } => {
            let dim = dimension_line(*from, *to, *offset);
            ops.push(DrawOp::Path { points: vec![t(dim.start), t(dim.end)], closed: false, stroke: Some(stroke), fill: None });
            for (a, b) in dim.ticks {
                ops.push(DrawOp::Path { points: vec![t(a), t(b)], closed: false, stroke: Some(stroke), fill: None });
            }
            ops.push(DrawOp::Text {
                anchor: t(dim.label_at),
                content: label.clone(),
                size: style.font.size * entity.transform.scale,
                color: stroke.color,
                align: TextAlign::Center,
                rotation: upright(dim.angle_deg + entity.transform.rotation),
                bold: style.font.bold,
            });
        }
        Shape::Callout { anchor, target, text } => {
            let box_fill = fill.or(Some(Color::WHITE.with_opacity(style.opacity)));
            ops.push(DrawOp::Path {
                points: anchor.corners().map(t).to_vec(),
                closed: true,
                stroke: Some(stroke),
                fill: box_fill,
            });
            let from = t(anchor.clamp_point(*target));
            let tip = t(*target);
            if from.distance_to(tip) > 0.0 {
                ops.push(DrawOp::Path { points: vec![from, tip], closed: false, stroke: Some(stroke), fill: None });
                ops.push(arrowhead(from, tip, stroke.color));
            }
            let inner = anchor.top_left().offset(CALLOUT_PADDING, CALLOUT_PADDING);
            draw_text_lines(ops, entity, inner, text, TextAlign::Start);
        }
        Shape::Component { rect, label, .. } => {
            ops.push(DrawOp::Path { points: rect.corners().map(t).to_vec(), closed: true, stroke: Some(stroke), fill });
            ops.push(DrawOp::Text {
                anchor: t(rect.center()),
                content: label.clone(),
                size: style.font.size * entity.transform.scale,
                color: stroke.color,
                align: TextAlign::Center,
                rotation: upright(entity.transform.rotation),
                bold: style.font.bold,
            });
        }
    }
}

fn draw_structural(ops: &mut Vec<DrawOp>, entity: &Entity, role: StructuralRole, rect: Rect, steps: u32) {
    let style = &entity.style;
    let t = |p: Point| entity.apply_transform(p);
    let fill = style.fill.map(|c| c.with_opacity(style.opacity));
    let outline = rect.corners().map(t).to_vec();

    match role {
        StructuralRole::Section | StructuralRole::Post => {
            ops.push(DrawOp::Path { points: outline, closed: true, stroke: Some(stroke_of(style, None)), fill });
        }
        StructuralRole::Railing => {
            ops.push(DrawOp::Path {
                points: outline,
                closed: true,
                stroke: Some(stroke_of(style, Some(RAILING_DASH))),
                fill: None,
            });
        }
        StructuralRole::Stairs => {
            let stroke = stroke_of(style, None);
            ops.push(DrawOp::Path { points: outline, closed: true, stroke: Some(stroke), fill });
            if steps > 1 {
                let slot = rect.height / f64::from(steps);
                for i in 1..steps {
                    let y = rect.y + slot * f64::from(i);
                    ops.push(DrawOp::Path {
                        points: vec![t(Point::new(rect.x, y)), t(Point::new(rect.x + rect.width, y))],
                        closed: false,
                        stroke: Some(stroke),
                        fill: None,
                    });
                }
            }
        }
    }
}

fn draw_text_lines(ops: &mut Vec<DrawOp>, entity: &Entity, at: Point, content: &str, align: TextAlign) {
    let style = &entity.style;
    let line_height = style.font.size * 1.25;
    for (i, line) in content.lines().enumerate() {
        #[allow(clippy::cast_precision_loss)]
        let y = at.y + line_height * i as f64;
        ops.push(DrawOp::Text {
            anchor: entity.apply_transform(Point::new(at.x, y)),
            content: line.to_owned(),
            size: style.font.size * entity.transform.scale,
            color: style.stroke.with_opacity(style.opacity),
            align,
            rotation: entity.transform.rotation,
            bold: style.font.bold,
        });
    }
}

// =============================================================
// Selection UI
// =============================================================

fn draw_selection(ops: &mut Vec<DrawOp>, entity: &Entity) {
    let bounds = entity.visual_bounds();
    ops.push(DrawOp::Path {
        points: bounds.corners().to_vec(),
        closed: true,
        stroke: Some(StrokeSpec {
            color: Color::SELECTION,
            width: 1.0,
            dash: Some([SELECTION_DASH_PX, SELECTION_DASH_PX]),
        }),
        fill: None,
    });

    if let Some(handle) = resize_handle_position(entity).filter(|_| !entity.locked) {
        let half = HANDLE_RADIUS_PX * 0.5;
        ops.push(DrawOp::Path {
            points: Rect::new(handle.x - half, handle.y - half, HANDLE_RADIUS_PX, HANDLE_RADIUS_PX).corners().to_vec(),
            closed: true,
            stroke: Some(StrokeSpec { color: Color::SELECTION, width: 1.0, dash: None }),
            fill: Some(Color::WHITE),
        });
    }
}

// =============================================================
// Geometry helpers
// =============================================================

fn stroke_of(style: &Style, dash: Option<[f64; 2]>) -> StrokeSpec {
    StrokeSpec { color: style.stroke.with_opacity(style.opacity), width: style.stroke_width, dash }
}

/// Filled arrowhead with its tip at `tip`, pointing away from `from`.
fn arrowhead(from: Point, tip: Point, color: Color) -> DrawOp {
    let angle = (tip.y - from.y).atan2(tip.x - from.x);
    let left = Point::new(
        tip.x - ARROW_SIZE * (angle - ARROW_ANGLE).cos(),
        tip.y - ARROW_SIZE * (angle - ARROW_ANGLE).sin(),
    );
    let right = Point::new(
        tip.x - ARROW_SIZE * (angle + ARROW_ANGLE).cos(),
        tip.y - ARROW_SIZE * (angle + ARROW_ANGLE).sin(),
    );
    DrawOp::Path { points: vec![tip, left, right], closed: true, stroke: None, fill: Some(color) }
}

fn circle_points(center: Point, rx: f64, ry: f64, segments: u32) -> Vec<Point> {
    (0..segments)
        .map(|i| {
            let a = TAU * f64::from(i) / f64::from(segments);
            Point::new(center.x + rx * a.cos(), center.y + ry * a.sin())
        })
        .collect()
}

/// Vertices of a regular polygon, first vertex straight up, clockwise.
#[must_use]
pub fn polygon_points(center: Point, radius: f64, sides: u32) -> Vec<Point> {
    (0..sides)
        .map(|i| {
            let a = -PI / 2.0 + TAU * f64::from(i) / f64::from(sides);
            Point::new(center.x + radius * a.cos(), center.y + radius * a.sin())
        })
        .collect()
}

/// Keep label rotation within `(-90, 90]` so text never reads upside down.
fn upright(degrees: f64) -> f64 {
    let d = (degrees + 180.0).rem_euclid(360.0) - 180.0;
    if d > 90.0 {
        d - 180.0
    } else if d <= -90.0 {
        d + 180.0
    } else {
        d
    }
}
