#![allow(clippy::float_cmp)]

use canvas::config::EditorConfig;
use canvas::doc::Shape;
use canvas::scale::Viewport;

use super::*;

fn session(script: &Script) -> EngineCore {
    EngineCore::new(script.mode, Viewport::new(800.0, 600.0), EditorConfig::default())
}

fn replay(json: &str) -> (EngineCore, ReplaySummary) {
    let script = Script::parse(json).unwrap();
    let mut core = session(&script);
    let summary = run(&mut core, &script.steps).unwrap();
    (core, summary)
}

// =============================================================================
// Parsing
// =============================================================================

#[test]
fn parse_defaults_to_annotation_with_no_steps() {
    let script = Script::parse("{}").unwrap();
    assert_eq!(script.mode, EditorMode::Annotation);
    assert!(script.steps.is_empty());
}

#[test]
fn parse_tagged_steps() {
    let script = Script::parse(
        r##"{"mode":"builder","steps":[
            {"op":"tool","tool":{"placement":"bench"}},
            {"op":"down","x":1,"y":2},
            {"op":"cancel_text"},
            {"op":"style","stroke":"#FF0000"}
        ]}"##,
    )
    .unwrap();
    assert_eq!(script.mode, EditorMode::Builder);
    assert_eq!(script.steps[0], Step::Tool { tool: Tool::Placement(ComponentKind::Bench) });
    assert_eq!(script.steps[1], Step::Down { x: 1.0, y: 2.0 });
    assert_eq!(script.steps[2], Step::CancelText);
    assert!(matches!(&script.steps[3], Step::Style { stroke: Some(s), fill: None, .. } if s == "#FF0000"));
}

#[test]
fn parse_rejects_auto_generated_mode() {
    assert!(matches!(Script::parse(r#"{"mode":"auto_generated"}"#), Err(ScriptError::UnsupportedMode)));
}

#[test]
fn parse_rejects_unknown_op() {
    assert!(matches!(Script::parse(r#"{"steps":[{"op":"teleport"}]}"#), Err(ScriptError::Json(_))));
}

// =============================================================================
// Replay
// =============================================================================

#[test]
fn stroke_replays_as_one_commit() {
    let (core, summary) = replay(
        r#"{"steps":[
            {"op":"tool","tool":"pen"},
            {"op":"stroke","points":[[10,10],[50,10],[50,50]]}
        ]}"#,
    );
    assert_eq!(summary, ReplaySummary { steps: 2, commits: 1 });
    let shapes: Vec<&Shape> = core.scene.entities().map(|e| &e.shape).collect();
    assert_eq!(
        shapes,
        vec![&Shape::Freehand { points: vec![10.0, 10.0, 50.0, 10.0, 50.0, 50.0], highlighter: false }]
    );
}

#[test]
fn empty_stroke_is_an_error() {
    let script = Script::parse(r#"{"steps":[{"op":"stroke","points":[]}]}"#).unwrap();
    let mut core = session(&script);
    assert!(matches!(run(&mut core, &script.steps), Err(ScriptError::EmptyStroke { step: 0 })));
}

#[test]
fn text_and_undo() {
    let (core, summary) = replay(
        r#"{"steps":[
            {"op":"tool","tool":"text"},
            {"op":"down","x":20,"y":30},
            {"op":"text","text":"Replace ledger"},
            {"op":"tool","tool":"line"},
            {"op":"stroke","points":[[0,0],[100,0]]},
            {"op":"undo"}
        ]}"#,
    );
    assert_eq!(summary.commits, 2);
    assert_eq!(core.scene.len(), 1);
    assert!(core.scene.entities().all(|e| matches!(e.shape, Shape::Text { .. })));
}

#[test]
fn builder_commands_act_on_selection() {
    let (core, _) = replay(
        r#"{"mode":"builder","steps":[
            {"op":"component","kind":"planter"},
            {"op":"rotate"},
            {"op":"duplicate"},
            {"op":"lock"},
            {"op":"rotate"},
            {"op":"hide"}
        ]}"#,
    );
    assert_eq!(core.scene.len(), 2);
    let clone = core.scene.entities().nth(1).unwrap();
    assert!(clone.locked);
    assert!(!clone.visible);
    assert_eq!(clone.transform.rotation, 90.0);
    assert_eq!(core.selection(), None);
}

#[test]
fn hide_without_selection_is_noop() {
    let (core, summary) = replay(r#"{"steps":[{"op":"hide"},{"op":"delete"},{"op":"front"},{"op":"back"}]}"#);
    assert_eq!(summary.commits, 0);
    assert!(core.scene.is_empty());
}

#[test]
fn style_applies_to_later_shapes() {
    let (core, _) = replay(
        r##"{"steps":[
            {"op":"style","stroke":"#336699","fill":"#FFFFFF","width":4,"opacity":2},
            {"op":"tool","tool":"rectangle"},
            {"op":"stroke","points":[[0,0],[40,40]]}
        ]}"##,
    );
    let style = &core.scene.entities().next().unwrap().style;
    assert_eq!(style.stroke, Color::rgb(0x33, 0x66, 0x99));
    assert_eq!(style.fill, Some(Color::WHITE));
    assert_eq!(style.stroke_width, 4.0);
    assert_eq!(style.opacity, 1.0);
}

#[test]
fn bad_color_names_the_step() {
    let script = Script::parse(r#"{"steps":[{"op":"undo"},{"op":"style","fill":"beige"}]}"#).unwrap();
    let mut core = session(&script);
    match run(&mut core, &script.steps) {
        Err(ScriptError::InvalidColor { step, value }) => {
            assert_eq!(step, 1);
            assert_eq!(value, "beige");
        }
        other => panic!("expected invalid color, got {other:?}"),
    }
}
