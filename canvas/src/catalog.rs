//! Parametric component catalog for builder mode.
//!
//! Templates are static and read-only. A template is used only to initialise
//! a new component entity; the entity copies every value it needs and keeps
//! no reference back to the template.

#[cfg(test)]
#[path = "catalog_test.rs"]
mod catalog_test;

use serde::{Deserialize, Serialize};

use crate::doc::{Color, Entity, Rect, Shape, Style};
use crate::scale::Point;

/// Component types available in builder mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentKind {
    Post,
    Beam,
    Joist,
    Ledger,
    Footing,
    Stairs,
    Railing,
    Bench,
    Planter,
    Table,
    Chair,
    Grill,
}

impl ComponentKind {
    /// Every kind, in catalog display order.
    pub const ALL: [ComponentKind; 12] = [
        Self::Post,
        Self::Beam,
        Self::Joist,
        Self::Ledger,
        Self::Footing,
        Self::Stairs,
        Self::Railing,
        Self::Bench,
        Self::Planter,
        Self::Table,
        Self::Chair,
        Self::Grill,
    ];
}

/// Default geometry, material, color and label for one component kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComponentTemplate {
    pub kind: ComponentKind,
    pub label: &'static str,
    /// Default width in canvas units.
    pub width: f64,
    /// Default height in canvas units.
    pub height: f64,
    pub material: &'static str,
    pub color: Color,
}

const LUMBER: Color = Color::rgb(0xC8, 0x9B, 0x6D);
const TREATED: Color = Color::rgb(0x9C, 0x7A, 0x4F);
const CONCRETE: Color = Color::rgb(0xA8, 0xA8, 0xA8);
const METAL: Color = Color::rgb(0x5A, 0x5F, 0x66);
const FURNITURE: Color = Color::rgb(0x7E, 0x9C, 0x86);

/// Look up the template for `kind`.
#[must_use]
pub fn template(kind: ComponentKind) -> ComponentTemplate {
    let (label, width, height, material, color) = match kind {
        ComponentKind::Post => ("6x6 Post", 30.0, 30.0, "pressure-treated pine", TREATED),
        ComponentKind::Beam => ("Beam", 240.0, 24.0, "pressure-treated pine", TREATED),
        ComponentKind::Joist => ("Joist", 200.0, 12.0, "pressure-treated pine", LUMBER),
        ComponentKind::Ledger => ("Ledger", 240.0, 16.0, "pressure-treated pine", LUMBER),
        ComponentKind::Footing => ("Footing", 40.0, 40.0, "concrete", CONCRETE),
        ComponentKind::Stairs => ("Stairs", 80.0, 100.0, "composite", LUMBER),
        ComponentKind::Railing => ("Railing", 200.0, 20.0, "aluminum", METAL),
        ComponentKind::Bench => ("Bench", 120.0, 40.0, "cedar", FURNITURE),
        ComponentKind::Planter => ("Planter", 60.0, 60.0, "cedar", FURNITURE),
        ComponentKind::Table => ("Table", 100.0, 100.0, "teak", FURNITURE),
        ComponentKind::Chair => ("Chair", 40.0, 40.0, "teak", FURNITURE),
        ComponentKind::Grill => ("Grill", 70.0, 50.0, "stainless steel", METAL),
    };
    ComponentTemplate { kind, label, width, height, material, color }
}

/// The whole catalog, in display order.
#[must_use]
pub fn catalog() -> Vec<ComponentTemplate> {
    ComponentKind::ALL.iter().map(|k| template(*k)).collect()
}

impl ComponentTemplate {
    /// A new component entity of this template's size, centered on `center`.
    #[must_use]
    pub fn instantiate(&self, center: Point) -> Entity {
        let rect = Rect::new(center.x - self.width * 0.5, center.y - self.height * 0.5, self.width, self.height);
        let style = Style { fill: Some(self.color), ..Style::default() };
        Entity::new(
            Shape::Component {
                component: self.kind,
                rect,
                material: self.material.to_owned(),
                label: self.label.to_owned(),
            },
            style,
        )
    }
}
