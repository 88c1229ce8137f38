use ab_glyph::FontArc;
use image::RgbaImage;
use tracing::{debug, info, warn};

use crate::catalog::{self, ComponentKind};
use crate::config::EditorConfig;
use crate::consts::{CALLOUT_PADDING, HIGHLIGHTER_OPACITY, HIGHLIGHTER_WIDTH_FACTOR, MEASUREMENT_PRECISION};
use crate::doc::{
    Entity, EntityId, EntityPatch, Rect, Scene, Shape, Style, estimate_text_height, estimate_text_width,
};
use crate::export::{self, ExportError};
use crate::history::History;
use crate::hit::{self, HitPart};
use crate::input::{EditorMode, EditorState, InputState, TextPurpose, Tool, drawn_shape};
use crate::layout::{self, DeckInput};
use crate::render::{self, DrawOp, RenderOptions};
use crate::scale::{Point, Viewport, format_feet};
use crate::transform;

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    EntityCreated(EntityId),
    EntityUpdated(EntityId),
    EntityDeleted(EntityId),
    SelectionChanged(Option<EntityId>),
    /// The host should collect text and call `submit_text` or `cancel_text`.
    TextInputRequested { at: Point, purpose: TextPurpose },
    HistoryCommitted,
    RenderNeeded,
}

/// Background photo state.
#[derive(Debug, Clone, Default)]
pub enum Background {
    #[default]
    None,
    /// Bytes are being fetched or decoded; the editor keeps working meanwhile.
    Loading,
    Ready(RgbaImage),
}

impl Background {
    #[must_use]
    pub fn image(&self) -> Option<&RgbaImage> {
        match self {
            Self::Ready(img) => Some(img),
            Self::None | Self::Loading => None,
        }
    }
}

/// Core engine state: everything that doesn't depend on a browser canvas.
///
/// Separated from the `web` wrapper so it can be tested natively.
pub struct EngineCore {
    pub scene: Scene,
    pub history: History,
    pub editor: EditorState,
    pub input: InputState,
    pub viewport: Viewport,
    pub background: Background,
    /// Host-loaded label font; `None` rasterizes with the bundled font.
    pub font: Option<FontArc>,
}

impl EngineCore {
    /// An empty editor session.
    #[must_use]
    pub fn new(mode: EditorMode, viewport: Viewport, config: EditorConfig) -> Self {
        let scene = Scene::new();
        let history = History::new(scene.snapshot(), config.history_limit);
        Self {
            scene,
            history,
            editor: EditorState::new(mode, config),
            input: InputState::Idle,
            viewport,
            background: Background::None,
            font: None,
        }
    }

    /// A session seeded with the auto-generated diagram for `input`. The
    /// generated entities form the oldest history state.
    #[must_use]
    pub fn auto_generated(input: &DeckInput, viewport: Viewport, config: EditorConfig) -> Self {
        let diagram = layout::generate(input, viewport, &config);
        let mut core = Self::new(EditorMode::AutoGenerated, viewport, config);
        for entity in diagram.entities {
            core.scene.add_entity(entity);
        }
        core.editor.scale = diagram.scale;
        core.history = History::new(core.scene.snapshot(), config.history_limit);
        info!(
            entities = core.scene.len(),
            auto_fit = diagram.scale.auto_fit,
            steps = diagram.stairs.map_or(0, |s| s.step_count),
            "diagram generated"
        );
        core
    }

    // --- Tool / style ---

    /// Switch tools. Any gesture in progress is cancelled without a commit,
    /// and leaving the select tool clears the selection. The placement tool
    /// has no gesture: choosing it is [`EngineCore::add_component`].
    pub fn set_tool(&mut self, tool: Tool) -> Vec<Action> {
        if let Tool::Placement(kind) = tool {
            return self.add_component(kind);
        }
        let mut actions = self.cancel_gesture();
        if self.editor.tool == Tool::Select && tool != Tool::Select && self.scene.selected_id().is_some() {
            self.scene.select(None);
            actions.push(Action::SelectionChanged(None));
        }
        self.editor.tool = tool;
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Style applied to entities created from now on.
    pub fn set_style(&mut self, style: Style) {
        self.editor.style = style;
    }

    /// Side count for the polygon tool, at least 3.
    pub fn set_polygon_sides(&mut self, sides: u32) {
        self.editor.polygon_sides = sides.max(3);
    }

    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.viewport = Viewport::new(width, height);
    }

    // --- Pointer input ---

    pub fn on_pointer_down(&mut self, pt: Point) -> Vec<Action> {
        match self.editor.tool {
            Tool::Select => self.select_down(pt),
            Tool::Pen
            | Tool::Highlighter
            | Tool::Line
            | Tool::Arrow
            | Tool::Rectangle
            | Tool::Ellipse
            | Tool::Polygon => self.start_drawing(pt),
            Tool::Text => {
                self.input = InputState::TextPending { at: pt };
                vec![Action::TextInputRequested { at: pt, purpose: TextPurpose::Text }]
            }
            Tool::Measurement => self.measure_click(pt),
            Tool::Callout => self.callout_click(pt),
            Tool::Placement(kind) => {
                debug!(?kind, "pointer ignored: placement needs no gesture");
                Vec::new()
            }
        }
    }

    pub fn on_pointer_move(&mut self, pt: Point) -> Vec<Action> {
        match &mut self.input {
            InputState::Drawing { entity, origin } => {
                reshape_provisional(entity, *origin, pt, self.editor.tool, self.editor.polygon_sides);
                vec![Action::RenderNeeded]
            }
            InputState::Dragging { id, start, orig_pos, orig_shape } => {
                let delta = Point::new(pt.x - start.x, pt.y - start.y);
                let font_size = self.scene.get(id).map_or(0.0, |e| e.style.font.size);
                let shape = transform::dragged_shape(orig_shape, *orig_pos, delta, self.editor.config.grid_pitch, font_size);
                self.scene.update_entity(id, &EntityPatch { shape: Some(shape), ..EntityPatch::default() });
                vec![Action::RenderNeeded]
            }
            InputState::Resizing { id, start, orig_shape } => {
                let Some(entity) = self.scene.get(id) else {
                    return Vec::new();
                };
                let baseline = Entity { shape: orig_shape.clone(), ..entity.clone() };
                let Some(shape) =
                    transform::resized_shape(&baseline, pt.x - start.x, pt.y - start.y, self.editor.config.min_size)
                else {
                    return Vec::new();
                };
                self.scene.update_entity(id, &EntityPatch { shape: Some(shape), ..EntityPatch::default() });
                vec![Action::RenderNeeded]
            }
            InputState::Idle
            | InputState::TextPending { .. }
            | InputState::MeasurePending { .. }
            | InputState::CalloutAwaitingText { .. }
            | InputState::CalloutArmed { .. } => Vec::new(),
        }
    }

    pub fn on_pointer_up(&mut self, pt: Point) -> Vec<Action> {
        if !matches!(
            self.input,
            InputState::Drawing { .. } | InputState::Dragging { .. } | InputState::Resizing { .. }
        ) {
            return Vec::new();
        }
        let mut actions = self.on_pointer_move(pt);
        match std::mem::take(&mut self.input) {
            InputState::Drawing { entity, .. } => {
                if entity.shape.is_degenerate() {
                    debug!(kind = ?entity.kind(), "degenerate shape discarded");
                    return vec![Action::RenderNeeded];
                }
                let id = self.scene.add_entity(*entity);
                actions.push(Action::EntityCreated(id));
                self.commit(&mut actions);
            }
            InputState::Dragging { id, orig_shape, .. } | InputState::Resizing { id, orig_shape, .. } => {
                if self.scene.get(&id).is_some_and(|e| e.shape != orig_shape) {
                    actions.push(Action::EntityUpdated(id));
                    self.commit(&mut actions);
                }
            }
            other => self.input = other,
        }
        actions
    }

    // --- Text ---

    /// Deliver text requested by [`Action::TextInputRequested`]. Empty text
    /// behaves like [`EngineCore::cancel_text`].
    pub fn submit_text(&mut self, text: &str) -> Vec<Action> {
        match std::mem::take(&mut self.input) {
            InputState::TextPending { at } => {
                if text.trim().is_empty() {
                    debug!("empty text submission cancelled");
                    return Vec::new();
                }
                let entity = Entity::new(Shape::Text { at, content: text.to_owned() }, self.editor.style.clone());
                let mut actions = vec![Action::EntityCreated(self.scene.add_entity(entity))];
                self.commit(&mut actions);
                actions
            }
            InputState::CalloutAwaitingText { anchor } => {
                if text.trim().is_empty() {
                    debug!("empty callout text cancelled");
                    return Vec::new();
                }
                self.input = InputState::CalloutArmed { anchor, text: text.to_owned() };
                vec![Action::RenderNeeded]
            }
            other => {
                debug!("submit_text ignored: no text requested");
                self.input = other;
                Vec::new()
            }
        }
    }

    /// Abandon a pending text request without touching the scene.
    pub fn cancel_text(&mut self) {
        if matches!(self.input, InputState::TextPending { .. } | InputState::CalloutAwaitingText { .. }) {
            self.input = InputState::Idle;
        }
    }

    // --- Builder ---

    /// Place a catalog component centered in the viewport. Builder mode only.
    pub fn add_component(&mut self, kind: ComponentKind) -> Vec<Action> {
        if self.editor.mode != EditorMode::Builder {
            debug!(?kind, mode = ?self.editor.mode, "add_component ignored: not in builder mode");
            return Vec::new();
        }
        let mut actions = self.cancel_gesture();
        let mut entity = catalog::template(kind).instantiate(self.viewport.center());
        entity.style.font = self.editor.style.font.clone();
        let id = self.scene.add_entity(entity);
        self.scene.select(Some(id));
        actions.push(Action::EntityCreated(id));
        actions.push(Action::SelectionChanged(Some(id)));
        self.commit(&mut actions);
        self.editor.tool = Tool::Select;
        actions
    }

    // --- History ---

    pub fn undo(&mut self) -> Vec<Action> {
        let mut actions = self.cancel_gesture();
        let had_selection = self.scene.selected_id().is_some();
        let Some(snapshot) = self.history.undo().cloned() else {
            debug!("undo ignored: at oldest snapshot");
            return actions;
        };
        self.scene.restore(&snapshot);
        if had_selection {
            actions.push(Action::SelectionChanged(None));
        }
        actions.push(Action::RenderNeeded);
        actions
    }

    pub fn redo(&mut self) -> Vec<Action> {
        let mut actions = self.cancel_gesture();
        let had_selection = self.scene.selected_id().is_some();
        let Some(snapshot) = self.history.redo().cloned() else {
            debug!("redo ignored: at newest snapshot");
            return actions;
        };
        self.scene.restore(&snapshot);
        if had_selection {
            actions.push(Action::SelectionChanged(None));
        }
        actions.push(Action::RenderNeeded);
        actions
    }

    // --- Selection commands ---

    /// Set the selection directly. Unknown or hidden ids are refused.
    pub fn select(&mut self, id: Option<EntityId>) -> Vec<Action> {
        if self.scene.selected_id() == id || !self.scene.select(id) {
            return Vec::new();
        }
        vec![Action::SelectionChanged(id), Action::RenderNeeded]
    }

    pub fn delete_selected(&mut self) -> Vec<Action> {
        let Some(id) = self.scene.selected_id() else {
            return Vec::new();
        };
        if !transform::delete(&mut self.scene, &id) {
            return Vec::new();
        }
        let mut actions = vec![Action::EntityDeleted(id), Action::SelectionChanged(None)];
        self.commit(&mut actions);
        actions
    }

    /// Rotate the selection 90° clockwise. Locked entities don't rotate.
    pub fn rotate_selected(&mut self) -> Vec<Action> {
        self.selected_command(transform::rotate)
    }

    pub fn bring_to_front(&mut self) -> Vec<Action> {
        self.selected_command(transform::bring_to_front)
    }

    pub fn send_to_back(&mut self) -> Vec<Action> {
        self.selected_command(transform::send_to_back)
    }

    pub fn toggle_lock(&mut self) -> Vec<Action> {
        self.selected_command(transform::toggle_lock)
    }

    /// Clone the selection with a fixed offset and select the clone.
    pub fn duplicate_selected(&mut self) -> Vec<Action> {
        let Some(id) = self.scene.selected_id() else {
            return Vec::new();
        };
        let Some(new_id) = transform::duplicate(&mut self.scene, &id, self.editor.config.duplicate_offset) else {
            return Vec::new();
        };
        let mut actions = vec![Action::EntityCreated(new_id), Action::SelectionChanged(Some(new_id))];
        self.commit(&mut actions);
        actions
    }

    /// Show or hide any entity. Hiding the selected entity clears the selection.
    pub fn toggle_visibility(&mut self, id: &EntityId) -> Vec<Action> {
        let was_selected = self.scene.selected_id() == Some(*id);
        if !transform::toggle_visibility(&mut self.scene, id) {
            return Vec::new();
        }
        let mut actions = vec![Action::EntityUpdated(*id)];
        if was_selected && self.scene.selected_id().is_none() {
            actions.push(Action::SelectionChanged(None));
        }
        self.commit(&mut actions);
        actions
    }

    /// Apply a sparse edit to one entity as a single undo step.
    pub fn update_entity(&mut self, id: &EntityId, patch: &EntityPatch) -> Vec<Action> {
        let was_selected = self.scene.selected_id() == Some(*id);
        if !self.scene.update_entity(id, patch) {
            return Vec::new();
        }
        let mut actions = vec![Action::EntityUpdated(*id)];
        if was_selected && self.scene.selected_id().is_none() {
            actions.push(Action::SelectionChanged(None));
        }
        self.commit(&mut actions);
        actions
    }

    // --- Assets ---

    /// Mark the background photo as loading.
    pub fn begin_photo_load(&mut self) {
        self.background = Background::Loading;
    }

    /// Finish a photo load. Undecodable bytes leave a blank background.
    pub fn finish_photo_load(&mut self, bytes: &[u8]) -> Vec<Action> {
        match export::decode_photo(bytes) {
            Ok(img) => {
                info!(width = img.width(), height = img.height(), "background photo loaded");
                self.background = Background::Ready(img);
            }
            Err(e) => {
                warn!(error = %e, "background photo failed to decode; continuing without it");
                self.background = Background::None;
            }
        }
        vec![Action::RenderNeeded]
    }

    /// Load a font for label rasterization, replacing the bundled one.
    ///
    /// # Errors
    ///
    /// [`ExportError::Font`] for unusable font bytes.
    pub fn load_font(&mut self, bytes: Vec<u8>) -> Result<(), ExportError> {
        self.font = Some(export::load_font(bytes)?);
        Ok(())
    }

    // --- Output ---

    /// Display list for an interactive paint.
    #[must_use]
    pub fn display_list(&self) -> Vec<DrawOp> {
        render::draw(&self.scene, &self.input, RenderOptions::interactive())
    }

    /// Rasterize the full canvas at `viewport × density` to PNG. The selection
    /// is cleared for the paint and restored afterwards.
    ///
    /// # Errors
    ///
    /// See [`ExportError`].
    pub fn export(&mut self, density: f64) -> Result<Vec<u8>, ExportError> {
        let font = match &self.font {
            Some(font) => font.clone(),
            None => export::bundled_font()?,
        };
        let selected = self.scene.selected_id();
        self.scene.select(None);
        let ops = render::draw(&self.scene, &self.input, RenderOptions::export());
        let result = export::rasterize(&ops, self.viewport, density, self.background.image(), &font);
        self.scene.select(selected);
        result
    }

    // --- Queries ---

    #[must_use]
    pub fn selection(&self) -> Option<EntityId> {
        self.scene.selected_id()
    }

    #[must_use]
    pub fn entity(&self, id: &EntityId) -> Option<&Entity> {
        self.scene.get(id)
    }

    #[must_use]
    pub fn tool(&self) -> Tool {
        self.editor.tool
    }

    #[must_use]
    pub fn mode(&self) -> EditorMode {
        self.editor.mode
    }

    // --- Internals ---

    fn commit(&mut self, actions: &mut Vec<Action>) {
        self.history.commit(self.scene.snapshot());
        actions.push(Action::HistoryCommitted);
        actions.push(Action::RenderNeeded);
    }

    /// Drop the gesture in progress, reverting a live drag or resize.
    fn cancel_gesture(&mut self) -> Vec<Action> {
        match std::mem::take(&mut self.input) {
            InputState::Dragging { id, orig_shape, .. } | InputState::Resizing { id, orig_shape, .. } => {
                debug!(%id, "gesture cancelled: reverting");
                self.scene.update_entity(&id, &EntityPatch { shape: Some(orig_shape), ..EntityPatch::default() });
                vec![Action::RenderNeeded]
            }
            InputState::Drawing { .. } | InputState::MeasurePending { .. } | InputState::CalloutArmed { .. } => {
                vec![Action::RenderNeeded]
            }
            InputState::Idle | InputState::TextPending { .. } | InputState::CalloutAwaitingText { .. } => Vec::new(),
        }
    }

    fn selected_command(&mut self, op: fn(&mut Scene, &EntityId) -> bool) -> Vec<Action> {
        let Some(id) = self.scene.selected_id() else {
            return Vec::new();
        };
        if !op(&mut self.scene, &id) {
            return Vec::new();
        }
        let mut actions = vec![Action::EntityUpdated(id)];
        self.commit(&mut actions);
        actions
    }

    fn select_down(&mut self, pt: Point) -> Vec<Action> {
        let mut actions = Vec::new();
        let Some(hit) = hit::hit_test(&self.scene, pt) else {
            if self.scene.selected_id().is_some() {
                self.scene.select(None);
                actions.push(Action::SelectionChanged(None));
                actions.push(Action::RenderNeeded);
            }
            return actions;
        };
        let Some(entity) = self.scene.get(&hit.entity_id) else {
            return actions;
        };
        let id = entity.id;

        match hit.part {
            HitPart::ResizeHandle => {
                self.input = InputState::Resizing { id, start: pt, orig_shape: entity.shape.clone() };
            }
            HitPart::Body => {
                if !entity.locked {
                    self.input =
                        InputState::Dragging { id, start: pt, orig_pos: entity.position(), orig_shape: entity.shape.clone() };
                }
                if self.scene.selected_id() != Some(id) {
                    self.scene.select(Some(id));
                    actions.push(Action::SelectionChanged(Some(id)));
                }
            }
        }
        actions.push(Action::RenderNeeded);
        actions
    }

    fn start_drawing(&mut self, pt: Point) -> Vec<Action> {
        let tool = self.editor.tool;
        let Some(shape) = drawn_shape(tool, pt, pt, self.editor.polygon_sides) else {
            return Vec::new();
        };
        let mut style = self.editor.style.clone();
        if tool == Tool::Highlighter {
            style.opacity *= HIGHLIGHTER_OPACITY;
            style.stroke_width *= HIGHLIGHTER_WIDTH_FACTOR;
        }
        self.input = InputState::Drawing { entity: Box::new(Entity::new(shape, style)), origin: pt };
        vec![Action::RenderNeeded]
    }

    fn measure_click(&mut self, pt: Point) -> Vec<Action> {
        match std::mem::take(&mut self.input) {
            InputState::MeasurePending { start } if start != pt => {
                let feet = self.editor.scale.px_to_feet(start.distance_to(pt));
                let label = format_feet(feet, MEASUREMENT_PRECISION);
                let shape = Shape::Measurement { from: start, to: pt, offset: 0.0, label };
                let entity = Entity::new(shape, self.editor.style.clone());
                let mut actions = vec![Action::EntityCreated(self.scene.add_entity(entity))];
                self.commit(&mut actions);
                actions
            }
            _ => {
                self.input = InputState::MeasurePending { start: pt };
                vec![Action::RenderNeeded]
            }
        }
    }

    fn callout_click(&mut self, pt: Point) -> Vec<Action> {
        match std::mem::take(&mut self.input) {
            InputState::CalloutArmed { anchor, text } => {
                let size = self.editor.style.font.size;
                let rect = Rect::new(
                    anchor.x,
                    anchor.y,
                    estimate_text_width(&text, size) + CALLOUT_PADDING * 2.0,
                    estimate_text_height(&text, size) + CALLOUT_PADDING * 2.0,
                );
                let entity = Entity::new(Shape::Callout { anchor: rect, target: pt, text }, self.editor.style.clone());
                let mut actions = vec![Action::EntityCreated(self.scene.add_entity(entity))];
                self.commit(&mut actions);
                actions
            }
            _ => {
                self.input = InputState::CalloutAwaitingText { anchor: pt };
                vec![Action::TextInputRequested { at: pt, purpose: TextPurpose::Callout }]
            }
        }
    }
}

/// Reshape the provisional entity to follow the pointer.
fn reshape_provisional(entity: &mut Entity, origin: Point, pt: Point, tool: Tool, polygon_sides: u32) {
    if let Shape::Freehand { points, .. } = &mut entity.shape {
        let last = (points.len() >= 2).then(|| Point::new(points[points.len() - 2], points[points.len() - 1]));
        if last != Some(pt) {
            points.push(pt.x);
            points.push(pt.y);
        }
        return;
    }
    if let Some(shape) = drawn_shape(tool, origin, pt, polygon_sides) {
        entity.shape = shape;
    }
}
