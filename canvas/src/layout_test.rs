#![allow(clippy::float_cmp)]

use super::*;
use crate::doc::EntityKind;

fn deck(sections: &[(f64, f64)], posts: u32, railing: bool, height: f64) -> DeckInput {
    DeckInput {
        sections: sections.iter().map(|&(length_ft, width_ft)| DeckSection { length_ft, width_ft }).collect(),
        post_count: posts,
        has_railing: railing,
        deck_height_ft: height,
        ..DeckInput::default()
    }
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn role_count(diagram: &Diagram, role: StructuralRole) -> usize {
    diagram
        .entities
        .iter()
        .filter(|e| matches!(e.shape, Shape::Structural { role: r, .. } if r == role))
        .count()
}

fn labels(diagram: &Diagram) -> Vec<String> {
    diagram
        .entities
        .iter()
        .filter_map(|e| match &e.shape {
            Shape::Measurement { label, .. } => Some(label.clone()),
            _ => None,
        })
        .collect()
}

// =============================================================
// Posts
// =============================================================

#[test]
fn post_grid_follows_aspect() {
    assert_eq!(post_grid(4, 16.0, 12.0), (3, 2));
    assert_eq!(post_grid(6, 20.0, 10.0), (4, 2));
    assert_eq!(post_grid(9, 10.0, 10.0), (3, 3));
}

#[test]
fn post_grid_single_and_zero() {
    assert_eq!(post_grid(1, 16.0, 12.0), (1, 1));
    assert_eq!(post_grid(0, 16.0, 12.0), (0, 0));
}

#[test]
fn place_posts_pins_edges_row_major() {
    let posts = place_posts(4, Rect::new(0.0, 0.0, 16.0, 12.0));
    assert_eq!(
        posts,
        vec![Point::new(0.0, 0.0), Point::new(8.0, 0.0), Point::new(16.0, 0.0), Point::new(0.0, 12.0)]
    );
}

#[test]
fn place_posts_single_is_centered() {
    assert_eq!(place_posts(1, Rect::new(0.0, 0.0, 16.0, 12.0)), vec![Point::new(8.0, 6.0)]);
}

#[test]
fn place_posts_single_row_is_vertically_centered() {
    // A very wide box gives one row.
    let posts = place_posts(3, Rect::new(0.0, 0.0, 30.0, 2.0));
    assert_eq!(posts, vec![Point::new(0.0, 1.0), Point::new(15.0, 1.0), Point::new(30.0, 1.0)]);
}

#[test]
fn place_posts_count_matches_request() {
    for n in 0..20 {
        assert_eq!(place_posts(n, Rect::new(0.0, 0.0, 24.0, 14.0)).len(), n as usize);
    }
}

// =============================================================
// Stairs
// =============================================================

#[test]
fn stair_step_count_three_feet_is_five() {
    assert_eq!(stair_step_count(3.0), 5);
}

#[test]
fn stair_step_count_zero_and_negative() {
    assert_eq!(stair_step_count(0.0), 0);
    assert_eq!(stair_step_count(-2.0), 0);
}

#[test]
fn stair_step_count_is_monotone() {
    let mut prev = 0;
    for i in 0..200 {
        let steps = stair_step_count(f64::from(i) * 0.1);
        assert!(steps >= prev, "step count fell at {i}");
        prev = steps;
    }
}

#[test]
fn stair_steps_from_railing_uses_hypotenuse() {
    // 120" / sqrt(49 + 100) = 9.83 -> 10
    assert_eq!(stair_steps_from_railing(120.0), 10);
    assert_eq!(stair_steps_from_railing(0.0), 0);
}

#[test]
fn stair_plan_depth_and_slot() {
    let plan = StairPlan::with_steps(5);
    assert!(approx(plan.total_depth_ft, 50.0 / 12.0));
    assert!(approx(plan.step_slot(), 10.0 / 12.0));
    assert_eq!(StairPlan::with_steps(0).step_slot(), 0.0);
}

#[test]
fn plan_stairs_needs_railing() {
    assert!(plan_stairs(&deck(&[(16.0, 12.0)], 0, false, 3.0)).is_none());
    assert_eq!(plan_stairs(&deck(&[(16.0, 12.0)], 0, true, 3.0)).map(|p| p.step_count), Some(5));
}

#[test]
fn plan_stairs_falls_back_to_railing_length() {
    let mut input = deck(&[(16.0, 12.0)], 0, true, 0.0);
    assert!(plan_stairs(&input).is_none());
    input.stair_railing_ft = Some(10.0);
    assert_eq!(plan_stairs(&input).map(|p| p.step_count), Some(10));
}

#[test]
fn plan_stairs_prefers_deck_height() {
    let mut input = deck(&[(16.0, 12.0)], 0, true, 3.0);
    input.stair_railing_ft = Some(10.0);
    assert_eq!(plan_stairs(&input).map(|p| p.step_count), Some(5));
}

// =============================================================
// Dimension lines
// =============================================================

#[test]
fn dimension_line_top_edge_offsets_upward() {
    let d = dimension_line(Point::new(0.0, 0.0), Point::new(100.0, 0.0), 20.0);
    assert_eq!(d.start, Point::new(0.0, -20.0));
    assert_eq!(d.end, Point::new(100.0, -20.0));
    assert_eq!(d.label_at, Point::new(50.0, -20.0));
    assert_eq!(d.angle_deg, 0.0);
    assert_eq!(d.ticks[0], (Point::new(0.0, -26.0), Point::new(0.0, -14.0)));
}

#[test]
fn dimension_line_left_edge_offsets_left() {
    let d = dimension_line(Point::new(0.0, 100.0), Point::new(0.0, 0.0), 20.0);
    assert!(approx(d.start.x, -20.0) && approx(d.start.y, 100.0));
    assert!(approx(d.end.x, -20.0) && approx(d.end.y, 0.0));
    assert!(approx(d.angle_deg, -90.0));
}

#[test]
fn dimension_line_zero_offset_sits_on_edge() {
    let d = dimension_line(Point::new(0.0, 0.0), Point::new(30.0, 40.0), 0.0);
    assert_eq!(d.start, Point::new(0.0, 0.0));
    assert_eq!(d.end, Point::new(30.0, 40.0));
}

// =============================================================
// Diagram generation
// =============================================================

#[test]
fn generate_sixteen_by_twelve_fits_viewport() {
    let input = deck(&[(16.0, 12.0)], 4, true, 3.0);
    let viewport = Viewport::new(800.0, 600.0);
    let config = EditorConfig::default();
    let diagram = generate(&input, viewport, &config);

    assert_eq!(diagram.stairs.map(|s| s.step_count), Some(5));
    let b = diagram.bounds;
    let eps = 1e-6;
    assert!(b.x >= config.viewport_padding - eps);
    assert!(b.y >= config.viewport_padding - eps);
    assert!(b.x + b.width <= viewport.width - config.viewport_padding + eps);
    assert!(b.y + b.height <= viewport.height - config.viewport_padding + eps);
    assert!(diagram.scale.auto_fit <= config.auto_fit_cap);
    // Height is the binding axis: deck plus stair run fills the padded height.
    assert!(approx(b.height, 520.0));
}

#[test]
fn generate_emits_expected_entities() {
    let diagram = generate(&deck(&[(16.0, 12.0)], 4, true, 3.0), Viewport::new(800.0, 600.0), &EditorConfig::default());
    assert_eq!(role_count(&diagram, StructuralRole::Section), 1);
    assert_eq!(role_count(&diagram, StructuralRole::Railing), 1);
    assert_eq!(role_count(&diagram, StructuralRole::Stairs), 1);
    assert_eq!(role_count(&diagram, StructuralRole::Post), 4);
    assert_eq!(labels(&diagram), vec!["16.0'".to_owned(), "12.0'".to_owned()]);
    assert!(diagram
        .entities
        .iter()
        .filter(|e| e.kind() == EntityKind::Measurement)
        .all(|e| matches!(e.shape, Shape::Measurement { offset, .. } if offset == DIMENSION_GAP_PX)));
}

#[test]
fn generate_stairs_centered_below_first_section() {
    let diagram = generate(&deck(&[(16.0, 12.0)], 0, true, 3.0), Viewport::new(800.0, 600.0), &EditorConfig::default());
    let section = diagram.entities.iter().find_map(|e| match e.shape {
        Shape::Structural { role: StructuralRole::Section, rect, .. } => Some(rect),
        _ => None,
    });
    let stairs = diagram.entities.iter().find_map(|e| match e.shape {
        Shape::Structural { role: StructuralRole::Stairs, rect, steps } => Some((rect, steps)),
        _ => None,
    });
    let (section, (stairs, steps)) = (section.unwrap(), stairs.unwrap());
    assert_eq!(steps, 5);
    assert!(approx(stairs.center().x, section.center().x));
    assert!(approx(stairs.y, section.y + section.height));
    assert!(approx(stairs.width, diagram.scale.feet_to_px(STAIR_WIDTH_FT)));
}

#[test]
fn generate_without_railing_has_no_stairs_or_railing() {
    let diagram = generate(&deck(&[(16.0, 12.0)], 2, false, 3.0), Viewport::new(800.0, 600.0), &EditorConfig::default());
    assert!(diagram.stairs.is_none());
    assert_eq!(role_count(&diagram, StructuralRole::Railing), 0);
    assert_eq!(role_count(&diagram, StructuralRole::Stairs), 0);
}

#[test]
fn generate_lays_sections_left_to_right() {
    let input = DeckInput { precision: 2, ..deck(&[(10.0, 8.0), (6.0, 12.0)], 0, false, 0.0) };
    let diagram = generate(&input, Viewport::new(800.0, 600.0), &EditorConfig::default());
    let rects: Vec<Rect> = diagram
        .entities
        .iter()
        .filter_map(|e| match e.shape {
            Shape::Structural { role: StructuralRole::Section, rect, .. } => Some(rect),
            _ => None,
        })
        .collect();
    assert_eq!(rects.len(), 2);
    assert!(approx(rects[1].x, rects[0].x + rects[0].width));
    assert!(approx(rects[0].y, rects[1].y));
    assert_eq!(labels(&diagram), vec!["10.00'".to_owned(), "8.00'".to_owned(), "6.00'".to_owned()]);
}

#[test]
fn generate_empty_input_is_empty() {
    let diagram = generate(&DeckInput::default(), Viewport::new(800.0, 600.0), &EditorConfig::default());
    assert!(diagram.entities.is_empty());
}

#[test]
fn deck_input_deserializes_with_defaults() {
    let input: DeckInput =
        serde_json::from_str(r#"{"sections":[{"length_ft":16,"width_ft":12}],"has_railing":true}"#).unwrap();
    assert_eq!(input.precision, 1);
    assert_eq!(input.post_count, 0);
    assert!(input.stair_railing_ft.is_none());
}
