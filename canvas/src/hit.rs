#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::consts::{HANDLE_RADIUS_PX, HIT_SLOP_PX};
use crate::doc::{Entity, EntityId, Scene, Shape, flat_points};
use crate::scale::Point;

/// Which part of an entity was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitPart {
    Body,
    ResizeHandle,
}

/// Result of a hit test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub entity_id: EntityId,
    pub part: HitPart,
}

/// Canvas position of the resize handle: bottom-right of the visual resize
/// box. `None` for shapes that cannot be resized.
#[must_use]
pub fn resize_handle_position(entity: &Entity) -> Option<Point> {
    entity.visual_resize_box().map(|b| b.bottom_right())
}

/// Test which entity (if any) is under `pt`, checking the selected entity's
/// resize handle first, then visible bodies top-most first.
#[must_use]
pub fn hit_test(scene: &Scene, pt: Point) -> Option<Hit> {
    if let Some(selected) = scene.selected() {
        if selected.visible
            && !selected.locked
            && resize_handle_position(selected).is_some_and(|h| pt.distance_to(h) <= HANDLE_RADIUS_PX)
        {
            return Some(Hit { entity_id: selected.id, part: HitPart::ResizeHandle });
        }
    }

    scene
        .sorted_entities()
        .into_iter()
        .rev()
        .filter(|e| e.visible)
        .find(|e| hits_body(e, pt))
        .map(|e| Hit { entity_id: e.id, part: HitPart::Body })
}

fn hits_body(entity: &Entity, pt: Point) -> bool {
    let slop = HIT_SLOP_PX.max(entity.style.stroke_width * 0.5);
    match &entity.shape {
        Shape::Line { from, to } | Shape::Arrow { from, to } => {
            distance_to_segment(pt, entity.apply_transform(*from), entity.apply_transform(*to)) <= slop
        }
        Shape::Measurement { offset, .. } => entity.visual_bounds().inflate(slop + offset.abs()).contains(pt),
        Shape::Freehand { points, .. } => {
            let pts: Vec<Point> = flat_points(points).map(|p| entity.apply_transform(p)).collect();
            match pts.as_slice() {
                [] => false,
                [only] => pt.distance_to(*only) <= slop,
                _ => pts.windows(2).any(|w| distance_to_segment(pt, w[0], w[1]) <= slop),
            }
        }
        Shape::Structural { .. }
        | Shape::Rectangle { .. }
        | Shape::Ellipse { .. }
        | Shape::Polygon { .. }
        | Shape::Text { .. }
        | Shape::Callout { .. }
        | Shape::Component { .. } => entity.visual_bounds().contains(pt),
    }
}

/// Shortest distance from `p` to the segment `a–b`.
#[must_use]
pub fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len_sq = dx * dx + dy * dy;
    if len_sq <= f64::EPSILON {
        return p.distance_to(a);
    }
    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
    p.distance_to(Point::new(a.x + t * dx, a.y + t * dy))
}
