//! Input model: tools, editor mode, and the gesture state machine.
//!
//! `Tool` and `EditorState` capture the user's intent at the time of a
//! pointer event. `InputState` is the active gesture tracked between
//! pointer-down and pointer-up (or across clicks for multi-step tools),
//! carrying all context needed to build the final scene mutation.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use serde::{Deserialize, Serialize};

use crate::catalog::ComponentKind;
use crate::config::EditorConfig;
use crate::consts::DEFAULT_POLYGON_SIDES;
use crate::doc::{Entity, EntityId, Rect, Shape, Style};
use crate::scale::{Point, Scale};

/// Which tool is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tool {
    /// Pointer / selection tool (default).
    #[default]
    Select,
    Pen,
    /// Pen with reduced opacity and a wider stroke.
    Highlighter,
    Line,
    Arrow,
    Rectangle,
    Ellipse,
    Polygon,
    Text,
    /// Two clicks measure a distance in feet.
    Measurement,
    /// Click, type, click: a text box with an arrow.
    Callout,
    /// Builder-mode placement of a catalog component.
    Placement(ComponentKind),
}

impl Tool {
    /// Whether this tool draws a provisional entity between down and up.
    #[must_use]
    pub fn is_drag_drawing(self) -> bool {
        matches!(
            self,
            Self::Pen | Self::Highlighter | Self::Line | Self::Arrow | Self::Rectangle | Self::Ellipse | Self::Polygon
        )
    }

    /// Whether this tool leaves freehand strokes.
    #[must_use]
    pub fn is_freehand(self) -> bool {
        matches!(self, Self::Pen | Self::Highlighter)
    }
}

/// Which kind of diagram the session produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditorMode {
    /// Generated from entered measurements, then annotated.
    AutoGenerated,
    /// Freehand annotation over a background photo.
    #[default]
    Annotation,
    /// Assembled from catalog components.
    Builder,
}

/// Persistent editor state visible to every gesture and to the renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorState {
    pub mode: EditorMode,
    pub tool: Tool,
    /// Style applied to newly created entities.
    pub style: Style,
    /// Side count for the polygon tool.
    pub polygon_sides: u32,
    pub scale: Scale,
    pub config: EditorConfig,
}

impl EditorState {
    #[must_use]
    pub fn new(mode: EditorMode, config: EditorConfig) -> Self {
        Self {
            mode,
            tool: Tool::Select,
            style: Style::default(),
            polygon_sides: DEFAULT_POLYGON_SIDES,
            scale: Scale::new(config.pixels_per_foot),
            config,
        }
    }
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new(EditorMode::default(), EditorConfig::default())
    }
}

/// Why the engine asked the host for text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextPurpose {
    Text,
    Callout,
}

/// Internal state for the input state machine.
#[derive(Debug, Clone, Default)]
pub enum InputState {
    /// No gesture in progress.
    #[default]
    Idle,
    /// A provisional entity is being drawn. It lives here, not in the scene,
    /// until pointer-up commits it.
    Drawing {
        entity: Box<Entity>,
        /// Pointer-down position.
        origin: Point,
    },
    /// An existing entity is being moved.
    Dragging {
        id: EntityId,
        /// Pointer position at pointer-down.
        start: Point,
        /// Top-left of the entity's bounds at pointer-down.
        orig_pos: Point,
        /// Shape at pointer-down, used to recompute and to revert.
        orig_shape: Shape,
    },
    /// An entity is being resized by its corner handle.
    Resizing {
        id: EntityId,
        start: Point,
        /// Shape at pointer-down; its resize box is the baseline.
        orig_shape: Shape,
    },
    /// Waiting for the host to submit text for a new text entity.
    TextPending { at: Point },
    /// First measurement click recorded.
    MeasurePending { start: Point },
    /// Callout anchor placed; waiting for its text.
    CalloutAwaitingText { anchor: Point },
    /// Callout text submitted; the next click places the arrow target.
    CalloutArmed { anchor: Point, text: String },
}

impl InputState {
    /// The provisional entity being drawn, if any.
    #[must_use]
    pub fn provisional(&self) -> Option<&Entity> {
        match self {
            Self::Drawing { entity, .. } => Some(entity),
            _ => None,
        }
    }

    /// Start point of a pending measurement, if any.
    #[must_use]
    pub fn pending_measurement(&self) -> Option<Point> {
        match self {
            Self::MeasurePending { start } => Some(*start),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}

/// Geometry for a drag-drawn shape spanning `origin → current`.
#[must_use]
pub fn drawn_shape(tool: Tool, origin: Point, current: Point, polygon_sides: u32) -> Option<Shape> {
    let shape = match tool {
        Tool::Pen | Tool::Highlighter => {
            Shape::Freehand { points: vec![origin.x, origin.y], highlighter: tool == Tool::Highlighter }
        }
        Tool::Line => Shape::Line { from: origin, to: current },
        Tool::Arrow => Shape::Arrow { from: origin, to: current },
        Tool::Rectangle => Shape::Rectangle { rect: Rect::from_corners(origin, current) },
        Tool::Ellipse => {
            let rect = Rect::from_corners(origin, current);
            Shape::Ellipse { center: rect.center(), rx: rect.width * 0.5, ry: rect.height * 0.5 }
        }
        Tool::Polygon => Shape::Polygon { center: origin, radius: origin.distance_to(current), sides: polygon_sides },
        Tool::Select
        | Tool::Text
        | Tool::Measurement
        | Tool::Callout
        | Tool::Placement(_) => return None,
    };
    Some(shape)
}
