//! Scene model: entities, their geometry and style, and the in-memory store.
//!
//! This module defines what is on the canvas (`Entity`, `Shape`), a sparse
//! update type for edits (`EntityPatch`), and the store that owns all live
//! entities plus the current selection (`Scene`).
//!
//! The scene is a plain data container with no history awareness. The engine
//! follows every user-visible mutation with exactly one history commit. The
//! renderer reads from `Scene` via `sorted_entities` to determine paint order.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::catalog::ComponentKind;
use crate::consts::{DEFAULT_FONT_SIZE, GLYPH_ADVANCE_RATIO};
use crate::history::Snapshot;
use crate::scale::Point;

/// Unique identifier for an entity. Never reused within a session.
pub type EntityId = Uuid;

const EPSILON: f64 = 1e-9;

// =============================================================
// Geometry primitives
// =============================================================

/// Axis-aligned rectangle in canvas units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Normalized rectangle spanning two opposite corners.
    #[must_use]
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            x: a.x.min(b.x),
            y: a.y.min(b.y),
            width: (b.x - a.x).abs(),
            height: (b.y - a.y).abs(),
        }
    }

    /// Smallest rectangle containing every point, or `None` for an empty set.
    pub fn bounding(points: impl IntoIterator<Item = Point>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
        for p in iter {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        Some(Self::from_corners(Point::new(min_x, min_y), Point::new(max_x, max_y)))
    }

    #[must_use]
    pub fn top_left(&self) -> Point {
        Point::new(self.x, self.y)
    }

    #[must_use]
    pub fn bottom_right(&self) -> Point {
        Point::new(self.x + self.width, self.y + self.height)
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    /// Corners clockwise from the top-left.
    #[must_use]
    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.x, self.y),
            Point::new(self.x + self.width, self.y),
            Point::new(self.x + self.width, self.y + self.height),
            Point::new(self.x, self.y + self.height),
        ]
    }

    /// Inclusive containment test.
    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
    }

    /// This rectangle grown by `d` on every side.
    #[must_use]
    pub fn inflate(&self, d: f64) -> Self {
        Self::new(self.x - d, self.y - d, self.width + 2.0 * d, self.height + 2.0 * d)
    }

    #[must_use]
    pub fn union(&self, other: &Rect) -> Self {
        let tl = Point::new(self.x.min(other.x), self.y.min(other.y));
        let br = Point::new(
            (self.x + self.width).max(other.x + other.width),
            (self.y + self.height).max(other.y + other.height),
        );
        Self::from_corners(tl, br)
    }

    /// The point of this rectangle closest to `p` (on the border when `p` is outside).
    #[must_use]
    pub fn clamp_point(&self, p: Point) -> Point {
        Point::new(p.x.clamp(self.x, self.x + self.width), p.y.clamp(self.y, self.y + self.height))
    }
}

/// Rotate `p` clockwise (in screen space) around `center` by `degrees`.
///
/// Quarter turns are computed exactly so discrete rotations never drift.
#[must_use]
pub fn rotate_about(p: Point, center: Point, degrees: f64) -> Point {
    let dx = p.x - center.x;
    let dy = p.y - center.y;
    let quarters = degrees / 90.0;
    if (quarters - quarters.round()).abs() < EPSILON {
        #[allow(clippy::cast_possible_truncation)]
        let q = (quarters.round() as i64).rem_euclid(4);
        let (rx, ry) = match q {
            1 => (-dy, dx),
            2 => (-dx, -dy),
            3 => (dy, -dx),
            _ => (dx, dy),
        };
        return Point::new(center.x + rx, center.y + ry);
    }
    let (sin, cos) = degrees.to_radians().sin_cos();
    Point::new(center.x + dx * cos - dy * sin, center.y + dx * sin + dy * cos)
}

// =============================================================
// Style
// =============================================================

/// 8-bit RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0x1F, 0x1A, 0x17);
    pub const WHITE: Color = Color::rgb(0xFF, 0xFF, 0xFF);
    pub const SELECTION: Color = Color::rgb(0x1E, 0x90, 0xFF);

    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    #[must_use]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#RRGGBB` or `#RRGGBBAA` (leading `#` optional).
    #[must_use]
    pub fn from_hex(s: &str) -> Option<Self> {
        let hex = s.trim().trim_start_matches('#');
        if !hex.is_ascii() || (hex.len() != 6 && hex.len() != 8) {
            return None;
        }
        let r = hex_byte(&hex[0..2])?;
        let g = hex_byte(&hex[2..4])?;
        let b = hex_byte(&hex[4..6])?;
        let a = if hex.len() == 8 { hex_byte(&hex[6..8])? } else { 255 };
        Some(Self { r, g, b, a })
    }

    /// `#RRGGBB`, or `#RRGGBBAA` when not fully opaque.
    #[must_use]
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            format!("#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }

    /// This color with its alpha multiplied by `opacity` (clamped to `0..=1`).
    #[must_use]
    pub fn with_opacity(self, opacity: f64) -> Self {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let a = (f64::from(self.a) * opacity.clamp(0.0, 1.0)).round() as u8;
        Self { a, ..self }
    }
}

fn hex_byte(s: &str) -> Option<u8> {
    match u8::from_str_radix(s, 16) {
        Ok(v) => Some(v),
        Err(_) => None,
    }
}

/// Font attributes for text-bearing entities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontStyle {
    pub family: String,
    pub size: f64,
    pub bold: bool,
    pub italic: bool,
}

impl Default for FontStyle {
    fn default() -> Self {
        Self { family: "sans-serif".to_owned(), size: DEFAULT_FONT_SIZE, bold: false, italic: false }
    }
}

/// Visual style shared by every entity kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Style {
    pub stroke: Color,
    pub fill: Option<Color>,
    pub stroke_width: f64,
    /// Multiplier applied to both stroke and fill alpha.
    pub opacity: f64,
    pub font: FontStyle,
}

impl Default for Style {
    fn default() -> Self {
        Self { stroke: Color::BLACK, fill: None, stroke_width: 2.0, opacity: 1.0, font: FontStyle::default() }
    }
}

/// Rotation and uniform scale, both applied around the entity's bounds center.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// Clockwise rotation in degrees.
    pub rotation: f64,
    pub scale: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self { rotation: 0.0, scale: 1.0 }
    }
}

// =============================================================
// Shapes
// =============================================================

/// Role of a structural shape in an auto-generated diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StructuralRole {
    /// Deck surface outline.
    Section,
    /// Support post.
    Post,
    /// Stair run; `steps` treads are drawn inside.
    Stairs,
    /// Railing run around a section.
    Railing,
}

/// Fieldless discriminant of [`Shape`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Structural,
    Freehand,
    Line,
    Arrow,
    Rectangle,
    Ellipse,
    Polygon,
    Text,
    Measurement,
    Callout,
    Component,
}

/// Kind-specific geometry. Adding a kind means extending this enum and the
/// render switch in [`crate::render`] together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Shape {
    /// Part of an auto-generated structure.
    Structural { role: StructuralRole, rect: Rect, steps: u32 },
    /// Pen or highlighter stroke as a flat `[x0, y0, x1, y1, ...]` list.
    Freehand { points: Vec<f64>, highlighter: bool },
    Line { from: Point, to: Point },
    Arrow { from: Point, to: Point },
    Rectangle { rect: Rect },
    /// Ellipse inscribed in the box `center ± (rx, ry)`.
    Ellipse { center: Point, rx: f64, ry: f64 },
    /// Regular polygon with its first vertex straight up.
    Polygon { center: Point, radius: f64, sides: u32 },
    /// Text whose box starts at `at` (top-left).
    Text { at: Point, content: String },
    /// Frozen distance annotation. `offset` shifts the drawn line off the
    /// measured edge; `label` is computed once and never recomputed.
    Measurement { from: Point, to: Point, offset: f64, label: String },
    /// Text box at `anchor` with an arrow pointing to `target`.
    Callout { anchor: Rect, target: Point, text: String },
    /// Catalog component initialised from a template.
    Component { component: ComponentKind, rect: Rect, material: String, label: String },
}

impl Shape {
    #[must_use]
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Structural { .. } => EntityKind::Structural,
            Self::Freehand { .. } => EntityKind::Freehand,
            Self::Line { .. } => EntityKind::Line,
            Self::Arrow { .. } => EntityKind::Arrow,
            Self::Rectangle { .. } => EntityKind::Rectangle,
            Self::Ellipse { .. } => EntityKind::Ellipse,
            Self::Polygon { .. } => EntityKind::Polygon,
            Self::Text { .. } => EntityKind::Text,
            Self::Measurement { .. } => EntityKind::Measurement,
            Self::Callout { .. } => EntityKind::Callout,
            Self::Component { .. } => EntityKind::Component,
        }
    }

    /// Untransformed bounding box. Text extents are estimated from `font_size`.
    #[must_use]
    pub fn bounds(&self, font_size: f64) -> Rect {
        match self {
            Self::Structural { rect, .. } | Self::Rectangle { rect } | Self::Component { rect, .. } => *rect,
            Self::Freehand { points, .. } => Rect::bounding(flat_points(points)).unwrap_or_default(),
            Self::Line { from, to } | Self::Arrow { from, to } | Self::Measurement { from, to, .. } => {
                Rect::from_corners(*from, *to)
            }
            Self::Ellipse { center, rx, ry } => Rect::new(center.x - rx, center.y - ry, rx * 2.0, ry * 2.0),
            Self::Polygon { center, radius, .. } => {
                Rect::new(center.x - radius, center.y - radius, radius * 2.0, radius * 2.0)
            }
            Self::Text { at, content } => Rect::new(
                at.x,
                at.y,
                estimate_text_width(content, font_size),
                estimate_text_height(content, font_size),
            ),
            Self::Callout { anchor, target, .. } => anchor.union(&Rect::new(target.x, target.y, 0.0, 0.0)),
        }
    }

    /// Move every coordinate by `(dx, dy)`.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        match self {
            Self::Structural { rect, .. } | Self::Rectangle { rect } | Self::Component { rect, .. } => {
                rect.x += dx;
                rect.y += dy;
            }
            Self::Freehand { points, .. } => {
                for pair in points.chunks_exact_mut(2) {
                    pair[0] += dx;
                    pair[1] += dy;
                }
            }
            Self::Line { from, to } | Self::Arrow { from, to } | Self::Measurement { from, to, .. } => {
                *from = from.offset(dx, dy);
                *to = to.offset(dx, dy);
            }
            Self::Ellipse { center, .. } | Self::Polygon { center, .. } => {
                *center = center.offset(dx, dy);
            }
            Self::Text { at, .. } => *at = at.offset(dx, dy),
            Self::Callout { anchor, target, .. } => {
                anchor.x += dx;
                anchor.y += dy;
                *target = target.offset(dx, dy);
            }
        }
    }

    /// Whether the corner handle can resize this shape.
    #[must_use]
    pub fn is_resizable(&self) -> bool {
        self.resize_box().is_some()
    }

    /// The untransformed box the corner handle acts on. For a callout this is
    /// the text box alone, without the arrow target.
    #[must_use]
    pub fn resize_box(&self) -> Option<Rect> {
        match self {
            Self::Callout { anchor, .. } => Some(*anchor),
            Self::Structural { .. }
            | Self::Rectangle { .. }
            | Self::Component { .. }
            | Self::Ellipse { .. }
            | Self::Polygon { .. } => Some(self.bounds(0.0)),
            Self::Freehand { .. }
            | Self::Line { .. }
            | Self::Arrow { .. }
            | Self::Text { .. }
            | Self::Measurement { .. } => None,
        }
    }

    /// Set the box size keeping the top-left corner fixed. Returns `false`
    /// for shapes without a resizable box.
    pub fn resize_to(&mut self, width: f64, height: f64) -> bool {
        match self {
            Self::Structural { rect, .. } | Self::Rectangle { rect } | Self::Component { rect, .. } => {
                rect.width = width;
                rect.height = height;
                true
            }
            Self::Ellipse { center, rx, ry } => {
                let left = center.x - *rx;
                let top = center.y - *ry;
                *rx = width * 0.5;
                *ry = height * 0.5;
                *center = Point::new(left + *rx, top + *ry);
                true
            }
            Self::Polygon { center, radius, .. } => {
                let left = center.x - *radius;
                let top = center.y - *radius;
                *radius = width.min(height) * 0.5;
                *center = Point::new(left + *radius, top + *radius);
                true
            }
            Self::Callout { anchor, .. } => {
                anchor.width = width;
                anchor.height = height;
                true
            }
            Self::Freehand { .. }
            | Self::Line { .. }
            | Self::Arrow { .. }
            | Self::Text { .. }
            | Self::Measurement { .. } => false,
        }
    }

    /// Zero-length or zero-area geometry that should never be committed.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        match self {
            Self::Structural { rect, .. } | Self::Rectangle { rect } | Self::Component { rect, .. } => {
                rect.width <= EPSILON || rect.height <= EPSILON
            }
            Self::Freehand { points, .. } => points.len() < 4,
            Self::Line { from, to } | Self::Arrow { from, to } | Self::Measurement { from, to, .. } => {
                from.distance_to(*to) <= EPSILON
            }
            Self::Ellipse { rx, ry, .. } => *rx <= EPSILON || *ry <= EPSILON,
            Self::Polygon { radius, sides, .. } => *radius <= EPSILON || *sides < 3,
            Self::Text { content, .. } => content.trim().is_empty(),
            Self::Callout { text, .. } => text.trim().is_empty(),
        }
    }
}

/// Iterate a flat `[x0, y0, x1, y1, ...]` list as points. A trailing odd
/// value is ignored.
pub fn flat_points(points: &[f64]) -> impl Iterator<Item = Point> + '_ {
    points.chunks_exact(2).map(|pair| Point::new(pair[0], pair[1]))
}

/// Estimated width of `text` at `font_size`, for bounds and hit-testing.
#[must_use]
pub fn estimate_text_width(text: &str, font_size: f64) -> f64 {
    let longest = text.lines().map(|l| l.chars().count()).max().unwrap_or(0);
    #[allow(clippy::cast_precision_loss)]
    let chars = longest as f64;
    chars * font_size * GLYPH_ADVANCE_RATIO
}

/// Estimated height of `text` at `font_size` (1.25 line height).
#[must_use]
pub fn estimate_text_height(text: &str, font_size: f64) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let lines = text.lines().count().max(1) as f64;
    lines * font_size * 1.25
}

// =============================================================
// Entity
// =============================================================

/// One drawable unit in the scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub shape: Shape,
    pub style: Style,
    pub transform: Transform,
    /// Paint order; lower values are drawn beneath higher values.
    pub z_index: i64,
    /// Locked entities cannot be dragged, resized, or rotated.
    pub locked: bool,
    /// Hidden entities are skipped by hit-testing and paint.
    pub visible: bool,
}

impl Entity {
    /// A new visible, unlocked entity with a fresh id.
    #[must_use]
    pub fn new(shape: Shape, style: Style) -> Self {
        Self {
            id: Uuid::new_v4(),
            shape,
            style,
            transform: Transform::default(),
            z_index: 0,
            locked: false,
            visible: true,
        }
    }

    #[must_use]
    pub fn kind(&self) -> EntityKind {
        self.shape.kind()
    }

    /// Untransformed bounding box.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        self.shape.bounds(self.style.font.size)
    }

    /// Top-left of the untransformed bounds; the point drags snap.
    #[must_use]
    pub fn position(&self) -> Point {
        self.bounds().top_left()
    }

    /// Map a point from the entity's local geometry to the canvas by applying
    /// rotation and scale around the bounds center.
    #[must_use]
    pub fn apply_transform(&self, p: Point) -> Point {
        let center = self.bounds().center();
        let rotated = rotate_about(p, center, self.transform.rotation);
        let s = self.transform.scale;
        Point::new(center.x + (rotated.x - center.x) * s, center.y + (rotated.y - center.y) * s)
    }

    /// Axis-aligned bounds after rotation and scale.
    #[must_use]
    pub fn visual_bounds(&self) -> Rect {
        let bounds = self.bounds();
        Rect::bounding(bounds.corners().map(|c| self.apply_transform(c))).unwrap_or(bounds)
    }

    #[must_use]
    pub fn is_resizable(&self) -> bool {
        self.shape.is_resizable()
    }

    /// Canvas-space bounds of the resize box after rotation and scale.
    #[must_use]
    pub fn visual_resize_box(&self) -> Option<Rect> {
        let rect = self.shape.resize_box()?;
        Rect::bounding(rect.corners().map(|c| self.apply_transform(c)))
    }
}

/// Sparse update for an entity. Only present fields are applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityPatch {
    pub shape: Option<Shape>,
    pub style: Option<Style>,
    pub rotation: Option<f64>,
    pub scale: Option<f64>,
    pub z_index: Option<i64>,
    pub locked: Option<bool>,
    pub visible: Option<bool>,
}

/// Target of a re-layer operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZOrder {
    /// One above the current maximum.
    Front,
    /// One below the current minimum.
    Back,
}

// =============================================================
// Scene
// =============================================================

/// Insertion-ordered entity store plus the current selection.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    entities: HashMap<EntityId, Entity>,
    order: Vec<EntityId>,
    selected_id: Option<EntityId>,
}

impl Scene {
    /// Create an empty scene.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entity above everything else and return its id.
    ///
    /// An id that is already present is left untouched.
    pub fn add_entity(&mut self, mut entity: Entity) -> EntityId {
        let id = entity.id;
        if self.entities.contains_key(&id) {
            debug!(%id, "add_entity ignored: id already present");
            return id;
        }
        entity.z_index = self.max_z().map_or(0, |z| z + 1);
        self.order.push(id);
        self.entities.insert(id, entity);
        id
    }

    /// Apply a partial update. Returns `false` if the entity doesn't exist.
    pub fn update_entity(&mut self, id: &EntityId, patch: &EntityPatch) -> bool {
        let Some(entity) = self.entities.get_mut(id) else {
            debug!(%id, "update_entity ignored: unknown id");
            return false;
        };
        if let Some(shape) = &patch.shape {
            entity.shape = shape.clone();
        }
        if let Some(style) = &patch.style {
            entity.style = style.clone();
        }
        if let Some(rotation) = patch.rotation {
            entity.transform.rotation = rotation;
        }
        if let Some(scale) = patch.scale {
            entity.transform.scale = scale;
        }
        if let Some(z) = patch.z_index {
            entity.z_index = z;
        }
        if let Some(locked) = patch.locked {
            entity.locked = locked;
        }
        if let Some(visible) = patch.visible {
            entity.visible = visible;
            if !visible && self.selected_id == Some(*id) {
                self.selected_id = None;
            }
        }
        true
    }

    /// Remove an entity, clearing the selection if it was selected.
    pub fn remove_entity(&mut self, id: &EntityId) -> Option<Entity> {
        let removed = self.entities.remove(id)?;
        self.order.retain(|other| other != id);
        if self.selected_id == Some(*id) {
            self.selected_id = None;
        }
        Some(removed)
    }

    /// Move an entity one past the current maximum or minimum `z_index`.
    pub fn reorder(&mut self, id: &EntityId, to: ZOrder) -> bool {
        let target = match to {
            ZOrder::Front => self.max_z().map(|z| z + 1),
            ZOrder::Back => self.min_z().map(|z| z - 1),
        };
        match (self.entities.get_mut(id), target) {
            (Some(entity), Some(z)) => {
                entity.z_index = z;
                true
            }
            _ => false,
        }
    }

    /// Set or clear the selection. Selecting an unknown or hidden entity is
    /// refused and returns `false`.
    pub fn select(&mut self, id: Option<EntityId>) -> bool {
        match id {
            None => {
                self.selected_id = None;
                true
            }
            Some(id) if self.entities.get(&id).is_some_and(|e| e.visible) => {
                self.selected_id = Some(id);
                true
            }
            Some(_) => false,
        }
    }

    #[must_use]
    pub fn selected_id(&self) -> Option<EntityId> {
        self.selected_id
    }

    /// The selected entity, resolved once from the selection handle.
    #[must_use]
    pub fn selected(&self) -> Option<&Entity> {
        self.selected_id.and_then(|id| self.entities.get(&id))
    }

    #[must_use]
    pub fn get(&self, id: &EntityId) -> Option<&Entity> {
        self.entities.get(id)
    }

    #[must_use]
    pub fn contains(&self, id: &EntityId) -> bool {
        self.entities.contains_key(id)
    }

    /// Entities in insertion order.
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.order.iter().filter_map(|id| self.entities.get(id))
    }

    /// All entities sorted by `z_index`, ties in insertion order.
    #[must_use]
    pub fn sorted_entities(&self) -> Vec<&Entity> {
        let mut entities: Vec<&Entity> = self.entities().collect();
        entities.sort_by_key(|e| e.z_index);
        entities
    }

    #[must_use]
    pub fn max_z(&self) -> Option<i64> {
        self.entities.values().map(|e| e.z_index).max()
    }

    #[must_use]
    pub fn min_z(&self) -> Option<i64> {
        self.entities.values().map(|e| e.z_index).min()
    }

    /// Deep copy of the entity collection for the history.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::new(self.entities().cloned().collect())
    }

    /// Replace every entity with the snapshot's contents and clear the selection.
    pub fn restore(&mut self, snapshot: &Snapshot) {
        self.entities.clear();
        self.order.clear();
        self.selected_id = None;
        for entity in snapshot.entities() {
            self.order.push(entity.id);
            self.entities.insert(entity.id, entity.clone());
        }
    }

    /// Number of entities in the scene, hidden ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Returns `true` if the scene contains no entities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}
