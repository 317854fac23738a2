//! Engine: turns host input events into document and selection changes.
//!
//! [`EngineCore`] owns every piece of session state and contains all of the
//! event logic, so it can be driven from tests without a browser. [`Engine`]
//! wraps it with the on-screen canvas, the export canvas, and the download
//! fallback.
//!
//! Every handler returns a list of [`Action`]s describing what changed. The
//! host reacts to them (repaint, update the cursor, refresh readouts) but
//! never needs to inspect engine internals to do so.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use serde::Serialize;
use tracing::{debug, info};
use web_sys::{Document, HtmlCanvasElement};

use crate::camera::{Camera, Coord};
use crate::config::CanvasConfig;
use crate::consts::DEFAULT_LAYER;
use crate::doc::DocStore;
use crate::eraser;
use crate::error::CanvasError;
use crate::export::{self, CaptureOptions, ImageBlob, ImageSink, ImageSurface, SaveOutcome};
use crate::geom::Rect;
use crate::input::{Button, InputState, Key, Modifiers, Tool, UiState, WheelDelta};
use crate::render::{self, Scene};
use crate::selection::SelectionController;
use crate::stroke::{Stroke, StrokeId, StrokeKind};
use crate::surface::Surface;
use crate::web::{self, CanvasCapture, CanvasSurface, DownloadSink};

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// A stroke was added to the document.
    StrokeCreated(Stroke),
    /// A stroke's geometry changed.
    StrokeUpdated { id: StrokeId },
    /// A stroke was removed from the document.
    StrokeDeleted { id: StrokeId },
    /// The selected stroke changed.
    SelectionChanged(Option<StrokeId>),
    /// The canvas cursor should change to this CSS cursor name.
    SetCursor(String),
    /// The scene changed and should be redrawn.
    RenderNeeded,
    /// The user asked to save the drawing.
    SaveRequested,
    /// The active tool changed.
    ToolChanged(Tool),
    /// The layer list or current layer changed.
    LayersChanged { layers: Vec<i32>, current: i32 },
    /// Deleting the default layer was refused.
    LayerDeleteRefused,
}

/// Live values for the host's status readouts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Readout {
    pub world_x: f64,
    pub world_y: f64,
    /// Pressure of the latest pen sample, 0 to 100.
    pub pressure_pct: u32,
    pub stroke_count: usize,
    pub tool_name: &'static str,
    pub layer: i32,
}

/// Core engine state. All logic that doesn't depend on the canvas element.
///
/// Separated from `Engine` so it can be tested without WASM/browser dependencies.
#[derive(Debug)]
pub struct EngineCore {
    pub doc: DocStore,
    pub selection: SelectionController,
    pub camera: Camera,
    pub ui: UiState,
    pub input: InputState,
    pub config: CanvasConfig,
    pub viewport_width: f64,
    pub viewport_height: f64,
    /// Device pixels per CSS pixel.
    pub dpr: f64,
    cursor: &'static str,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self::new(CanvasConfig::default())
    }
}

impl EngineCore {
    #[must_use]
    pub fn new(config: CanvasConfig) -> Self {
        let ui = UiState::from_config(&config);
        Self {
            doc: DocStore::new(),
            selection: SelectionController::new(config.handle_size_px),
            camera: Camera::default(),
            cursor: ui.tool.cursor(),
            ui,
            input: InputState::default(),
            config,
            viewport_width: 0.0,
            viewport_height: 0.0,
            dpr: 1.0,
        }
    }

    /// Update viewport dimensions in CSS pixels and the device pixel ratio.
    /// A non-positive or non-finite `dpr` is treated as 1.
    pub fn set_viewport(&mut self, width: f64, height: f64, dpr: f64) {
        self.viewport_width = width;
        self.viewport_height = height;
        self.dpr = if dpr.is_finite() && dpr > 0.0 { dpr } else { 1.0 };
    }

    // --- Input events ---

    /// Pointer pressed. `pressure` is the device reading, if it reports one.
    pub fn on_pointer_down(
        &mut self,
        screen: Coord,
        button: Button,
        _modifiers: Modifiers,
        pressure: Option<f64>,
    ) -> Vec<Action> {
        let world = self.camera.screen_to_world(screen);
        self.ui.cursor_world = world;

        match button {
            Button::Middle => {
                self.input = InputState::Panning { last_screen: screen };
                return Vec::new();
            }
            Button::Secondary => return Vec::new(),
            Button::Primary => {}
        }

        match self.ui.tool {
            Tool::Pen => self.begin_pen(world, pressure),
            Tool::Eraser => {
                self.input = InputState::Erasing;
                self.erase(world)
            }
            Tool::Rectangle => {
                self.input = InputState::DrawingRectangle { start: world, end: world };
                vec![Action::RenderNeeded]
            }
            Tool::Select => self.select_down(screen, world),
        }
    }

    /// Pointer moved, with or without a button held.
    pub fn on_pointer_move(&mut self, screen: Coord, _modifiers: Modifiers, pressure: Option<f64>) -> Vec<Action> {
        let world = self.camera.screen_to_world(screen);
        self.ui.cursor_world = world;

        match self.input {
            InputState::Idle => self.hover(screen, world),
            InputState::Panning { last_screen } => {
                self.camera.pan_by_screen(screen.x - last_screen.x, screen.y - last_screen.y);
                self.input = InputState::Panning { last_screen: screen };
                vec![Action::RenderNeeded]
            }
            InputState::Drawing { id } => {
                let p = self.sample_pressure(pressure);
                if !self.doc.add_point_to_stroke(&id, world.x, world.y, p) {
                    return Vec::new();
                }
                self.ui.last_pressure = p;
                vec![Action::StrokeUpdated { id }, Action::RenderNeeded]
            }
            InputState::DrawingRectangle { start, .. } => {
                self.input = InputState::DrawingRectangle { start, end: world };
                vec![Action::RenderNeeded]
            }
            InputState::Erasing => self.erase(world),
            InputState::Transforming => {
                let changed = if self.selection.is_moving() {
                    self.selection.update_move(&mut self.doc, world)
                } else {
                    self.selection.update_resize(&mut self.doc, world)
                };
                match self.selection.selected_id() {
                    Some(id) if changed => vec![Action::StrokeUpdated { id }, Action::RenderNeeded],
                    _ => Vec::new(),
                }
            }
        }
    }

    /// Pointer released.
    pub fn on_pointer_up(&mut self, screen: Coord, _button: Button, _modifiers: Modifiers) -> Vec<Action> {
        let world = self.camera.screen_to_world(screen);
        self.ui.cursor_world = world;
        if let InputState::DrawingRectangle { start, .. } = self.input {
            self.input = InputState::DrawingRectangle { start, end: world };
        }
        self.finish_gesture()
    }

    /// Pointer left the canvas. Ends the gesture at the last known position.
    pub fn on_pointer_leave(&mut self) -> Vec<Action> {
        self.finish_gesture()
    }

    /// Wheel zoom toward the pointer.
    pub fn on_wheel(&mut self, screen: Coord, delta: WheelDelta, _modifiers: Modifiers) -> Vec<Action> {
        if delta.dy == 0.0 {
            return Vec::new();
        }
        let cfg = &self.config;
        self.camera.wheel_zoom(screen, delta.dy, cfg.zoom_step, cfg.zoom_min, cfg.zoom_max);
        vec![Action::RenderNeeded]
    }

    /// Keyboard shortcuts.
    pub fn on_key_down(&mut self, key: Key, modifiers: Modifiers) -> Vec<Action> {
        if modifiers.command() {
            return match key.0.to_ascii_lowercase().as_str() {
                "b" => self.set_tool(Tool::Pen),
                "e" => self.set_tool(Tool::Eraser),
                "r" => self.set_tool(Tool::Rectangle),
                "v" => self.set_tool(Tool::Select),
                "delete" | "backspace" => self.clear_all(),
                "s" => vec![Action::SaveRequested],
                _ => Vec::new(),
            };
        }
        match key.0.as_str() {
            "Escape" => {
                if self.selection.selected_id().is_none() {
                    return Vec::new();
                }
                self.selection.clear_selection();
                vec![Action::SelectionChanged(None), Action::RenderNeeded]
            }
            "Delete" | "Backspace" => match self.selection.selected_id() {
                Some(id) => self.delete_stroke(&id),
                None => Vec::new(),
            },
            _ => Vec::new(),
        }
    }

    // --- Tool / brush ---

    /// Switch tools. Any gesture in progress ends; leaving the selection tool
    /// drops the selection.
    pub fn set_tool(&mut self, tool: Tool) -> Vec<Action> {
        let mut actions = self.finish_gesture();
        if tool != Tool::Select && self.selection.selected_id().is_some() {
            self.selection.clear_selection();
            actions.push(Action::SelectionChanged(None));
        }
        self.ui.tool = tool;
        self.cursor = tool.cursor();
        debug!(%tool, "tool changed");
        actions.push(Action::ToolChanged(tool));
        actions.push(Action::SetCursor(self.cursor.to_owned()));
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Ignored unless `size` is a positive number.
    pub fn set_brush_size(&mut self, size: f64) {
        if size > 0.0 && size.is_finite() {
            self.ui.brush_size = size;
        }
    }

    pub fn set_brush_color(&mut self, color: impl Into<String>) {
        self.ui.brush_color = color.into();
    }

    pub fn set_pressure_sensitivity(&mut self, enabled: bool) {
        self.ui.pressure_sensitivity = enabled;
    }

    // --- Layers ---

    /// Create a layer above every existing one and make it current.
    pub fn add_layer(&mut self) -> Vec<Action> {
        let next = self.doc.layers().into_iter().max().unwrap_or(DEFAULT_LAYER) + 1;
        self.set_current_layer(next)
    }

    pub fn set_current_layer(&mut self, layer: i32) -> Vec<Action> {
        self.doc.set_current_layer(layer);
        vec![self.layers_changed()]
    }

    /// Delete the current layer and its strokes. The default layer is refused.
    pub fn delete_current_layer(&mut self) -> Vec<Action> {
        let layer = self.doc.current_layer();
        if layer == DEFAULT_LAYER {
            info!("refused to delete the default layer");
            return vec![Action::LayerDeleteRefused];
        }
        let mut actions = Vec::new();
        if self.selection.selected(&self.doc).is_some_and(|s| s.layer() == layer) {
            self.selection.clear_selection();
            actions.push(Action::SelectionChanged(None));
        }
        self.doc.delete_layer(layer);
        actions.push(self.layers_changed());
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Reassign a stroke to `layer`. Missing ids are ignored.
    pub fn move_stroke_to_layer(&mut self, id: &StrokeId, layer: i32) -> Vec<Action> {
        if !self.doc.move_stroke_to_layer(id, layer) {
            return Vec::new();
        }
        vec![Action::StrokeUpdated { id: *id }, self.layers_changed(), Action::RenderNeeded]
    }

    fn layers_changed(&self) -> Action {
        Action::LayersChanged { layers: self.doc.layers(), current: self.doc.current_layer() }
    }

    // --- Document ---

    /// Remove every stroke and reset the z counter.
    pub fn clear_all(&mut self) -> Vec<Action> {
        let mut actions = Vec::new();
        if self.selection.selected_id().is_some() {
            actions.push(Action::SelectionChanged(None));
        }
        self.selection.clear_selection();
        self.input = InputState::Idle;
        self.doc.clear_all();
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Delete one stroke, dropping the selection if it pointed at it.
    pub fn delete_stroke(&mut self, id: &StrokeId) -> Vec<Action> {
        if self.doc.delete_stroke(id).is_none() {
            return Vec::new();
        }
        let mut actions = vec![Action::StrokeDeleted { id: *id }];
        if self.selection.on_stroke_deleted(id) {
            actions.push(Action::SelectionChanged(None));
        }
        actions.push(Action::RenderNeeded);
        actions
    }

    // --- Queries ---

    #[must_use]
    pub fn readout(&self) -> Readout {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let pressure_pct = (self.ui.last_pressure.clamp(0.0, 1.0) * 100.0).round() as u32;
        Readout {
            world_x: self.ui.cursor_world.x,
            world_y: self.ui.cursor_world.y,
            pressure_pct,
            stroke_count: self.doc.len(),
            tool_name: self.ui.tool.name(),
            layer: self.doc.current_layer(),
        }
    }

    /// World rectangle being dragged out, if any.
    #[must_use]
    pub fn preview_rect(&self) -> Option<Rect> {
        match self.input {
            InputState::DrawingRectangle { start, end } => Some(Rect::from_corners(start.x, start.y, end.x, end.y)),
            _ => None,
        }
    }

    #[must_use]
    pub fn selected(&self) -> Option<StrokeId> {
        self.selection.selected_id()
    }

    #[must_use]
    pub fn stroke(&self, id: &StrokeId) -> Option<&Stroke> {
        self.doc.get(id)
    }

    // --- Output ---

    /// Draw the current frame.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::Surface`] if a drawing call fails.
    pub fn render<S: Surface + ?Sized>(&self, surface: &mut S) -> Result<(), CanvasError> {
        let scene = Scene {
            doc: &self.doc,
            selection: &self.selection,
            camera: &self.camera,
            preview: self.preview_rect(),
            width: self.viewport_width,
            height: self.viewport_height,
            dpr: self.dpr,
            background: &self.config.background,
        };
        render::draw(surface, &scene)
    }

    /// Capture the whole drawing into `image`.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::Surface`] or [`CanvasError::Encode`] if capture fails.
    pub fn capture<I: ImageSurface + ?Sized>(&self, image: &mut I) -> Result<ImageBlob, CanvasError> {
        let options = CaptureOptions {
            viewport_w: self.viewport_width,
            viewport_h: self.viewport_height,
            padding: self.config.export_padding,
            background: &self.config.background,
        };
        export::capture_image(image, &self.doc, &self.camera, &options)
    }

    // --- Gesture helpers ---

    fn sample_pressure(&self, device: Option<f64>) -> f64 {
        if !self.ui.pressure_sensitivity {
            return self.config.default_pressure;
        }
        device.filter(|p| *p > 0.0).unwrap_or(self.config.default_pressure)
    }

    fn begin_pen(&mut self, world: Coord, pressure: Option<f64>) -> Vec<Action> {
        let p = self.sample_pressure(pressure);
        let id = self.doc.create_stroke(StrokeKind::Pen, &self.ui.brush_color, self.ui.brush_size).id();
        self.doc.add_point_to_stroke(&id, world.x, world.y, p);
        self.ui.last_pressure = p;
        self.input = InputState::Drawing { id };
        let mut actions: Vec<Action> = self.doc.get(&id).cloned().map(Action::StrokeCreated).into_iter().collect();
        actions.push(Action::RenderNeeded);
        actions
    }

    fn erase(&mut self, world: Coord) -> Vec<Action> {
        let view = self.camera.view_bounds(self.viewport_width, self.viewport_height);
        let erased = eraser::erase_at(&mut self.doc, &view, world.x, world.y, self.config.eraser_margin);
        if erased.is_empty() {
            return Vec::new();
        }
        let mut actions = Vec::with_capacity(erased.len() + 2);
        for id in erased {
            if self.selection.on_stroke_deleted(&id) {
                actions.push(Action::SelectionChanged(None));
            }
            actions.push(Action::StrokeDeleted { id });
        }
        actions.push(Action::RenderNeeded);
        actions
    }

    fn select_down(&mut self, screen: Coord, world: Coord) -> Vec<Action> {
        if let Some(handle) = self.selection.handle_at(&self.doc, &self.camera, screen) {
            if self.selection.start_resize(&self.doc, handle, world) {
                self.input = InputState::Transforming;
                return self.cursor_action(handle.cursor()).into_iter().collect();
            }
        }
        if self.selection.contains_point(&self.doc, world) && self.selection.start_move(&self.doc, world) {
            self.input = InputState::Transforming;
            return self.cursor_action("move").into_iter().collect();
        }

        let before = self.selection.selected_id();
        let after = self.selection.select_stroke_at_point(&self.doc, world.x, world.y);
        if before == after {
            return Vec::new();
        }
        vec![Action::SelectionChanged(after), Action::RenderNeeded]
    }

    fn hover(&mut self, screen: Coord, world: Coord) -> Vec<Action> {
        if self.ui.tool != Tool::Select {
            return Vec::new();
        }
        let cursor = if let Some(handle) = self.selection.handle_at(&self.doc, &self.camera, screen) {
            handle.cursor()
        } else if self.selection.contains_point(&self.doc, world) {
            "move"
        } else {
            Tool::Select.cursor()
        };
        self.cursor_action(cursor).into_iter().collect()
    }

    /// Record `cursor` and return an action only when it differs from the current one.
    fn cursor_action(&mut self, cursor: &'static str) -> Option<Action> {
        if self.cursor == cursor {
            return None;
        }
        self.cursor = cursor;
        Some(Action::SetCursor(cursor.to_owned()))
    }

    fn finish_gesture(&mut self) -> Vec<Action> {
        let input = std::mem::take(&mut self.input);
        match input {
            InputState::Idle | InputState::Panning { .. } | InputState::Erasing => Vec::new(),
            InputState::Drawing { id } => {
                self.ui.last_pressure = 0.0;
                debug!(%id, "pen stroke finished");
                Vec::new()
            }
            InputState::DrawingRectangle { start, end } => {
                let rect = Rect::from_corners(start.x, start.y, end.x, end.y);
                let min = self.config.min_rect_size;
                let mut actions = Vec::new();
                if rect.width > min && rect.height > min {
                    let stroke = self
                        .doc
                        .create_rectangle(rect.x, rect.y, rect.width, rect.height, &self.ui.brush_color, self.ui.brush_size)
                        .clone();
                    actions.push(Action::StrokeCreated(stroke));
                }
                actions.push(Action::RenderNeeded);
                actions
            }
            InputState::Transforming => {
                self.selection.stop_move();
                self.selection.stop_resize();
                vec![Action::RenderNeeded]
            }
        }
    }
}

/// The full canvas engine. Wraps `EngineCore` and owns the browser canvas element.
pub struct Engine {
    canvas: HtmlCanvasElement,
    surface: CanvasSurface,
    pub core: EngineCore,
}

impl Engine {
    /// Create a new engine bound to the given canvas element.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::ConfigParse`] if `config` fails validation, or
    /// [`CanvasError::Surface`] if the canvas has no 2D context.
    pub fn new(canvas: HtmlCanvasElement, config: CanvasConfig) -> Result<Self, CanvasError> {
        config.validate()?;
        let surface = CanvasSurface::new(web::context_2d(&canvas)?);
        Ok(Self { canvas, surface, core: EngineCore::new(config) })
    }

    /// Resize the backing store to the CSS size of the canvas times `dpr`.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn set_viewport(&mut self, width_css: f64, height_css: f64, dpr: f64) {
        self.core.set_viewport(width_css, height_css, dpr);
        let dpr = self.core.dpr;
        self.canvas.set_width((width_css * dpr).max(0.0).round() as u32);
        self.canvas.set_height((height_css * dpr).max(0.0).round() as u32);
    }

    // --- Delegated input events ---

    pub fn on_pointer_down(
        &mut self,
        screen: Coord,
        button: Button,
        modifiers: Modifiers,
        pressure: Option<f64>,
    ) -> Vec<Action> {
        self.core.on_pointer_down(screen, button, modifiers, pressure)
    }

    pub fn on_pointer_move(&mut self, screen: Coord, modifiers: Modifiers, pressure: Option<f64>) -> Vec<Action> {
        self.core.on_pointer_move(screen, modifiers, pressure)
    }

    pub fn on_pointer_up(&mut self, screen: Coord, button: Button, modifiers: Modifiers) -> Vec<Action> {
        self.core.on_pointer_up(screen, button, modifiers)
    }

    pub fn on_pointer_leave(&mut self) -> Vec<Action> {
        self.core.on_pointer_leave()
    }

    pub fn on_wheel(&mut self, screen: Coord, delta: WheelDelta, modifiers: Modifiers) -> Vec<Action> {
        self.core.on_wheel(screen, delta, modifiers)
    }

    pub fn on_key_down(&mut self, key: Key, modifiers: Modifiers) -> Vec<Action> {
        self.core.on_key_down(key, modifiers)
    }

    // --- Output ---

    /// Draw the current state to the canvas.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::Surface`] if a `Canvas2D` call fails.
    pub fn render(&mut self) -> Result<(), CanvasError> {
        self.core.render(&mut self.surface)
    }

    /// Render the drawing into an offscreen canvas and encode it as PNG.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError`] if the offscreen canvas cannot be created or encoded.
    pub fn export_image(&self) -> Result<ImageBlob, CanvasError> {
        let mut capture = CanvasCapture::new(&self.document()?)?;
        self.core.capture(&mut capture)
    }

    /// Export and persist the drawing, preferring `native` and falling back
    /// to a browser download.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError`] if export fails or the download fallback fails.
    pub async fn save(&self, native: Option<&dyn ImageSink>) -> Result<SaveOutcome, CanvasError> {
        let blob = self.export_image()?;
        let fallback = DownloadSink::new(self.document()?);
        let outcome = export::save_image(&blob, native, &fallback).await?;
        info!(sink = outcome.sink, "drawing saved");
        Ok(outcome)
    }

    fn document(&self) -> Result<Document, CanvasError> {
        self.canvas
            .owner_document()
            .ok_or_else(|| CanvasError::Surface("canvas is not attached to a document".to_owned()))
    }
}
