//! Selection transforms: grid snap, drag and resize geometry, rotation,
//! re-layering, duplication, lock and visibility.
//!
//! The geometry helpers are pure. The scene operations mutate a [`Scene`]
//! and report whether anything changed; callers commit history on `true`.

#[cfg(test)]
#[path = "transform_test.rs"]
mod transform_test;

use tracing::debug;
use uuid::Uuid;

use crate::consts::ROTATION_STEP_DEG;
use crate::doc::{Entity, EntityId, EntityPatch, Scene, Shape, ZOrder};
use crate::scale::Point;

/// Round `v` to the nearest multiple of `pitch`. A non-positive pitch leaves
/// `v` unchanged.
#[must_use]
pub fn snap(v: f64, pitch: f64) -> f64 {
    if pitch <= 0.0 { v } else { (v / pitch).round() * pitch }
}

#[must_use]
pub fn snap_point(p: Point, pitch: f64) -> Point {
    Point::new(snap(p.x, pitch), snap(p.y, pitch))
}

/// `orig_shape` moved by `delta` with its top-left snapped to the grid.
#[must_use]
pub fn dragged_shape(orig_shape: &Shape, orig_pos: Point, delta: Point, pitch: f64, font_size: f64) -> Shape {
    let target = snap_point(orig_pos.offset(delta.x, delta.y), pitch);
    let current = orig_shape.bounds(font_size).top_left();
    let mut shape = orig_shape.clone();
    shape.translate(target.x - current.x, target.y - current.y);
    shape
}

/// New `(width, height)` after dragging the corner handle by `(dx, dy)`,
/// floored on both axes.
#[must_use]
pub fn resized_dims(orig_w: f64, orig_h: f64, dx: f64, dy: f64, floor: f64) -> (f64, f64) {
    ((orig_w + dx).max(floor), (orig_h + dy).max(floor))
}

/// Shape of `entity` after its resize handle moves by `(dx, dy)` on the
/// canvas. The handle sits at the bottom-right of the visual resize box and
/// the opposite visual corner stays put, so a quarter turn swaps which local
/// axis a canvas axis drives. `None` for shapes without a resize box.
#[must_use]
pub fn resized_shape(entity: &Entity, dx: f64, dy: f64, floor: f64) -> Option<Shape> {
    let rect = entity.shape.resize_box()?;
    let before = entity.visual_resize_box()?;
    let scale = if entity.transform.scale > 0.0 { entity.transform.scale } else { 1.0 };
    let (local_dx, local_dy) = if is_odd_quarter_turn(entity.transform.rotation) { (dy, dx) } else { (dx, dy) };
    let (width, height) = resized_dims(rect.width, rect.height, local_dx / scale, local_dy / scale, floor);

    let mut resized = entity.clone();
    resized.shape.resize_to(width, height);
    let after = resized.visual_resize_box()?;
    resized.shape.translate(before.x - after.x, before.y - after.y);
    Some(resized.shape)
}

fn is_odd_quarter_turn(degrees: f64) -> bool {
    ((degrees / ROTATION_STEP_DEG).round().rem_euclid(2.0) - 1.0).abs() < 0.5
}

/// Next rotation in the 0 → 90 → 180 → 270 → 0 cycle.
#[must_use]
pub fn next_rotation(degrees: f64) -> f64 {
    (degrees + ROTATION_STEP_DEG).rem_euclid(360.0)
}

// =============================================================
// Scene operations
// =============================================================

/// Rotate an unlocked entity one step clockwise.
pub fn rotate(scene: &mut Scene, id: &EntityId) -> bool {
    let Some(entity) = scene.get(id) else {
        return false;
    };
    if entity.locked {
        debug!(%id, "rotate ignored: entity locked");
        return false;
    }
    let rotation = next_rotation(entity.transform.rotation);
    scene.update_entity(id, &EntityPatch { rotation: Some(rotation), ..EntityPatch::default() })
}

pub fn bring_to_front(scene: &mut Scene, id: &EntityId) -> bool {
    scene.reorder(id, ZOrder::Front)
}

pub fn send_to_back(scene: &mut Scene, id: &EntityId) -> bool {
    scene.reorder(id, ZOrder::Back)
}

/// Clone an entity under a new id, shifted by `offset` on both axes, and
/// select the clone. The clone is never locked.
pub fn duplicate(scene: &mut Scene, id: &EntityId, offset: f64) -> Option<EntityId> {
    let mut clone = scene.get(id)?.clone();
    clone.id = Uuid::new_v4();
    clone.locked = false;
    clone.shape.translate(offset, offset);
    let new_id = scene.add_entity(clone);
    scene.select(Some(new_id));
    Some(new_id)
}

/// Flip the lock flag. Lock only gates drag, resize and rotate.
pub fn toggle_lock(scene: &mut Scene, id: &EntityId) -> bool {
    let Some(locked) = scene.get(id).map(|e| e.locked) else {
        return false;
    };
    scene.update_entity(id, &EntityPatch { locked: Some(!locked), ..EntityPatch::default() })
}

/// Flip visibility. Hiding the selected entity clears the selection.
pub fn toggle_visibility(scene: &mut Scene, id: &EntityId) -> bool {
    let Some(visible) = scene.get(id).map(|e| e.visible) else {
        return false;
    };
    scene.update_entity(id, &EntityPatch { visible: Some(!visible), ..EntityPatch::default() })
}

pub fn delete(scene: &mut Scene, id: &EntityId) -> bool {
    scene.remove_entity(id).is_some()
}
