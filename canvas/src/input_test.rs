#![allow(clippy::float_cmp)]

use super::*;

// =============================================================
// Tool
// =============================================================

#[test]
fn tool_default_is_select() {
    assert_eq!(Tool::default(), Tool::Select);
}

#[test]
fn tool_drag_drawing_classification() {
    for tool in [Tool::Pen, Tool::Highlighter, Tool::Line, Tool::Arrow, Tool::Rectangle, Tool::Ellipse, Tool::Polygon] {
        assert!(tool.is_drag_drawing(), "{tool:?}");
    }
    for tool in [Tool::Select, Tool::Text, Tool::Measurement, Tool::Callout, Tool::Placement(ComponentKind::Bench)] {
        assert!(!tool.is_drag_drawing(), "{tool:?}");
    }
}

#[test]
fn tool_freehand_only_pen_and_highlighter() {
    assert!(Tool::Pen.is_freehand());
    assert!(Tool::Highlighter.is_freehand());
    assert!(!Tool::Line.is_freehand());
}

#[test]
fn tool_serde_snake_case() {
    assert_eq!(serde_json::to_string(&Tool::Highlighter).unwrap(), "\"highlighter\"");
    let placement: Tool = serde_json::from_str(r#"{"placement":"grill"}"#).unwrap();
    assert_eq!(placement, Tool::Placement(ComponentKind::Grill));
}

#[test]
fn editor_mode_serde() {
    assert_eq!(serde_json::to_string(&EditorMode::AutoGenerated).unwrap(), "\"auto_generated\"");
    let mode: EditorMode = serde_json::from_str("\"builder\"").unwrap();
    assert_eq!(mode, EditorMode::Builder);
}

// =============================================================
// EditorState
// =============================================================

#[test]
fn editor_state_defaults() {
    let state = EditorState::default();
    assert_eq!(state.tool, Tool::Select);
    assert_eq!(state.polygon_sides, DEFAULT_POLYGON_SIDES);
    assert_eq!(state.scale.pixels_per_foot, state.config.pixels_per_foot);
    assert_eq!(state.scale.auto_fit, 1.0);
}

#[test]
fn editor_state_scale_follows_config() {
    let config = EditorConfig { pixels_per_foot: 10.0, ..EditorConfig::default() };
    let state = EditorState::new(EditorMode::Builder, config);
    assert_eq!(state.scale.effective(), 10.0);
    assert_eq!(state.mode, EditorMode::Builder);
}

// =============================================================
// InputState
// =============================================================

#[test]
fn input_state_default_is_idle() {
    assert!(InputState::default().is_idle());
}

#[test]
fn input_state_provisional_only_while_drawing() {
    let entity = Entity::new(Shape::Line { from: Point::new(0.0, 0.0), to: Point::new(5.0, 5.0) }, Style::default());
    let id = entity.id;
    let drawing = InputState::Drawing { entity: Box::new(entity), origin: Point::new(0.0, 0.0) };
    assert_eq!(drawing.provisional().map(|e| e.id), Some(id));
    assert!(InputState::TextPending { at: Point::new(0.0, 0.0) }.provisional().is_none());
}

#[test]
fn input_state_pending_measurement() {
    let s = InputState::MeasurePending { start: Point::new(3.0, 4.0) };
    assert_eq!(s.pending_measurement(), Some(Point::new(3.0, 4.0)));
    assert!(InputState::Idle.pending_measurement().is_none());
}

// =============================================================
// drawn_shape
// =============================================================

#[test]
fn drawn_shape_rectangle_normalizes_corners() {
    let s = drawn_shape(Tool::Rectangle, Point::new(50.0, 50.0), Point::new(10.0, 20.0), 6).unwrap();
    assert_eq!(s, Shape::Rectangle { rect: Rect::new(10.0, 20.0, 40.0, 30.0) });
}

#[test]
fn drawn_shape_ellipse_inscribed_in_drag_box() {
    let s = drawn_shape(Tool::Ellipse, Point::new(0.0, 0.0), Point::new(40.0, 20.0), 6).unwrap();
    assert_eq!(s, Shape::Ellipse { center: Point::new(20.0, 10.0), rx: 20.0, ry: 10.0 });
}

#[test]
fn drawn_shape_polygon_radius_is_drag_distance() {
    let s = drawn_shape(Tool::Polygon, Point::new(0.0, 0.0), Point::new(30.0, 40.0), 5).unwrap();
    assert_eq!(s, Shape::Polygon { center: Point::new(0.0, 0.0), radius: 50.0, sides: 5 });
}

#[test]
fn drawn_shape_pen_starts_with_origin_only() {
    let s = drawn_shape(Tool::Highlighter, Point::new(1.0, 2.0), Point::new(9.0, 9.0), 6).unwrap();
    assert_eq!(s, Shape::Freehand { points: vec![1.0, 2.0], highlighter: true });
}

#[test]
fn drawn_shape_none_for_click_tools() {
    assert!(drawn_shape(Tool::Select, Point::new(0.0, 0.0), Point::new(1.0, 1.0), 6).is_none());
    assert!(drawn_shape(Tool::Measurement, Point::new(0.0, 0.0), Point::new(1.0, 1.0), 6).is_none());
    assert!(drawn_shape(Tool::Placement(ComponentKind::Post), Point::new(0.0, 0.0), Point::new(1.0, 1.0), 6).is_none());
}
