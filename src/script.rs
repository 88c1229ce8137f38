//! Scripted editor sessions.
//!
//! A script is JSON: an editor mode plus a list of steps tagged by `op`.
//! Each step maps onto one [`EngineCore`] call, so a replay exercises the
//! same gesture and command paths a host would drive interactively.
//!
//! ```json
//! { "mode": "annotation", "steps": [
//!     { "op": "tool", "tool": "pen" },
//!     { "op": "stroke", "points": [[10, 10], [50, 10], [50, 50]] },
//!     { "op": "undo" }
//! ] }
//! ```

#[cfg(test)]
#[path = "script_test.rs"]
mod script_test;

use canvas::catalog::ComponentKind;
use canvas::doc::Color;
use canvas::engine::{Action, EngineCore};
use canvas::input::{EditorMode, Tool};
use canvas::scale::Point;
use serde::Deserialize;
use tracing::{debug, info};

#[derive(Debug, thiserror::Error)]
pub(crate) enum ScriptError {
    #[error("invalid script JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("auto-generated diagrams come from `generate`, not a script")]
    UnsupportedMode,
    #[error("step {step}: invalid color `{value}`")]
    InvalidColor { step: usize, value: String },
    #[error("step {step}: stroke needs at least one point")]
    EmptyStroke { step: usize },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct Script {
    #[serde(default)]
    pub(crate) mode: EditorMode,
    #[serde(default)]
    pub(crate) steps: Vec<Step>,
}

impl Script {
    pub(crate) fn parse(json: &str) -> Result<Self, ScriptError> {
        let script: Script = serde_json::from_str(json)?;
        if script.mode == EditorMode::AutoGenerated {
            return Err(ScriptError::UnsupportedMode);
        }
        Ok(script)
    }
}

/// One editor interaction.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub(crate) enum Step {
    Tool { tool: Tool },
    Down { x: f64, y: f64 },
    Move { x: f64, y: f64 },
    Up { x: f64, y: f64 },
    /// Pointer down on the first point, moves through the rest, up on the last.
    Stroke { points: Vec<[f64; 2]> },
    Text { text: String },
    CancelText,
    Component { kind: ComponentKind },
    Undo,
    Redo,
    Rotate,
    Front,
    Back,
    Duplicate,
    Lock,
    /// Toggle visibility of the selection.
    Hide,
    Delete,
    /// Change the current style; absent fields keep their value.
    Style {
        #[serde(default)]
        stroke: Option<String>,
        #[serde(default)]
        fill: Option<String>,
        #[serde(default)]
        width: Option<f64>,
        #[serde(default)]
        opacity: Option<f64>,
        #[serde(default)]
        font_size: Option<f64>,
    },
}

/// Totals for a finished replay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct ReplaySummary {
    pub(crate) steps: usize,
    pub(crate) commits: usize,
}

/// Drive `core` through `steps` in order.
pub(crate) fn run(core: &mut EngineCore, steps: &[Step]) -> Result<ReplaySummary, ScriptError> {
    let mut summary = ReplaySummary::default();
    for (index, step) in steps.iter().enumerate() {
        let actions = apply(core, index, step)?;
        let commits = actions.iter().filter(|a| **a == Action::HistoryCommitted).count();
        debug!(index, ?step, commits, "script step applied");
        summary.steps += 1;
        summary.commits += commits;
    }
    info!(steps = summary.steps, commits = summary.commits, entities = core.scene.len(), "script replayed");
    Ok(summary)
}

fn apply(core: &mut EngineCore, index: usize, step: &Step) -> Result<Vec<Action>, ScriptError> {
    let actions = match step {
        Step::Tool { tool } => core.set_tool(*tool),
        Step::Down { x, y } => core.on_pointer_down(Point::new(*x, *y)),
        Step::Move { x, y } => core.on_pointer_move(Point::new(*x, *y)),
        Step::Up { x, y } => core.on_pointer_up(Point::new(*x, *y)),
        Step::Stroke { points } => {
            let Some(([x0, y0], rest)) = points.split_first() else {
                return Err(ScriptError::EmptyStroke { step: index });
            };
            let mut actions = core.on_pointer_down(Point::new(*x0, *y0));
            let last = rest.last().copied().unwrap_or([*x0, *y0]);
            for [x, y] in rest {
                actions.extend(core.on_pointer_move(Point::new(*x, *y)));
            }
            actions.extend(core.on_pointer_up(Point::new(last[0], last[1])));
            actions
        }
        Step::Text { text } => core.submit_text(text),
        Step::CancelText => {
            core.cancel_text();
            Vec::new()
        }
        Step::Component { kind } => core.add_component(*kind),
        Step::Undo => core.undo(),
        Step::Redo => core.redo(),
        Step::Rotate => core.rotate_selected(),
        Step::Front => core.bring_to_front(),
        Step::Back => core.send_to_back(),
        Step::Duplicate => core.duplicate_selected(),
        Step::Lock => core.toggle_lock(),
        Step::Hide => match core.selection() {
            Some(id) => core.toggle_visibility(&id),
            None => {
                debug!(index, "hide ignored: nothing selected");
                Vec::new()
            }
        },
        Step::Delete => core.delete_selected(),
        Step::Style { stroke, fill, width, opacity, font_size } => {
            let mut style = core.editor.style.clone();
            if let Some(hex) = stroke {
                style.stroke = parse_color(index, hex)?;
            }
            if let Some(hex) = fill {
                style.fill = Some(parse_color(index, hex)?);
            }
            if let Some(width) = width {
                style.stroke_width = *width;
            }
            if let Some(opacity) = opacity {
                style.opacity = opacity.clamp(0.0, 1.0);
            }
            if let Some(size) = font_size {
                style.font.size = *size;
            }
            core.set_style(style);
            Vec::new()
        }
    };
    Ok(actions)
}

fn parse_color(step: usize, hex: &str) -> Result<Color, ScriptError> {
    Color::from_hex(hex).ok_or_else(|| ScriptError::InvalidColor { step, value: hex.to_owned() })
}
