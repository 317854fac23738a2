//! Input model: tools, modifier keys, mouse buttons, brush settings, and the
//! gesture state machine.
//!
//! `Tool` and `Modifiers` capture the user's intent at the time of a pointer
//! event. `UiState` holds the brush and readout values the host UI displays
//! and edits. `InputState` is the active gesture being tracked between
//! pointer-down and pointer-up.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::camera::Coord;
use crate::config::CanvasConfig;
use crate::error::CanvasError;
use crate::stroke::StrokeId;

/// Which tool is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    /// Freehand pressure-sensitive pen (default).
    #[default]
    Pen,
    /// Deletes whole strokes under the pointer.
    Eraser,
    /// Drag out a rounded rectangle.
    Rectangle,
    /// Select, move, and resize strokes.
    Select,
}

impl Tool {
    /// Display name for the tool readout.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Pen => "Pen Tool",
            Self::Eraser => "Eraser Tool",
            Self::Rectangle => "Rectangle Tool",
            Self::Select => "Selection Tool",
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pen => "pen",
            Self::Eraser => "eraser",
            Self::Rectangle => "rectangle",
            Self::Select => "select",
        }
    }

    /// Cursor shown over the canvas while this tool is idle.
    #[must_use]
    pub fn cursor(self) -> &'static str {
        match self {
            Self::Pen | Self::Eraser | Self::Rectangle => "crosshair",
            Self::Select => "default",
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tool {
    type Err = CanvasError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pen" => Ok(Self::Pen),
            "eraser" => Ok(Self::Eraser),
            "rectangle" => Ok(Self::Rectangle),
            "select" | "selection" => Ok(Self::Select),
            other => Err(CanvasError::UnknownTool(other.to_owned())),
        }
    }
}

/// Keyboard/mouse modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Modifiers {
    /// Shift key is held.
    pub shift: bool,
    /// Ctrl key is held.
    pub ctrl: bool,
    /// Alt / Option key is held.
    pub alt: bool,
    /// Meta / Command key is held.
    pub meta: bool,
}

impl Modifiers {
    /// Ctrl on most platforms, Command on macOS.
    #[must_use]
    pub fn command(self) -> bool {
        self.ctrl || self.meta
    }
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button, pen contact, or single-finger touch.
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button.
    Secondary,
}

/// A keyboard key.
///
/// The inner string holds the key name as reported by the browser (e.g. `"Delete"`, `"b"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

/// Wheel / trackpad scroll delta.
#[derive(Debug, Clone, Copy)]
pub struct WheelDelta {
    /// Horizontal scroll amount in pixels.
    pub dx: f64,
    /// Vertical scroll amount in pixels (positive = down).
    pub dy: f64,
}

/// Brush settings and live readout values visible to the host UI.
#[derive(Debug, Clone, PartialEq)]
pub struct UiState {
    /// Currently active tool.
    pub tool: Tool,
    /// Pen width before pressure scaling, in world units.
    pub brush_size: f64,
    /// Pen and rectangle color.
    pub brush_color: String,
    /// Whether device pressure modulates pen width.
    pub pressure_sensitivity: bool,
    /// Pressure of the most recent pen sample; zero when not drawing.
    pub last_pressure: f64,
    /// World position of the most recent pointer event.
    pub cursor_world: Coord,
}

impl Default for UiState {
    fn default() -> Self {
        Self::from_config(&CanvasConfig::default())
    }
}

impl UiState {
    /// Initial UI state from configured brush defaults.
    #[must_use]
    pub fn from_config(config: &CanvasConfig) -> Self {
        Self {
            tool: Tool::default(),
            brush_size: config.brush_size,
            brush_color: config.brush_color.clone(),
            pressure_sensitivity: config.pressure_sensitivity,
            last_pressure: 0.0,
            cursor_world: Coord::new(0.0, 0.0),
        }
    }
}

/// Internal state for the input state machine.
///
/// Each active variant carries the gesture context needed between
/// pointer-down and pointer-up. Selection drags are tracked by the
/// [`crate::selection::SelectionController`]; `Transforming` only marks that
/// one is in progress.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InputState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// The pen is down and samples are appended to `id`.
    Drawing {
        /// Id of the stroke receiving samples.
        id: StrokeId,
    },
    /// A rectangle is being dragged out; nothing is in the document yet.
    DrawingRectangle {
        /// World-space corner where the drag started.
        start: Coord,
        /// World-space corner under the pointer.
        end: Coord,
    },
    /// The eraser is down; each move deletes what it touches.
    Erasing,
    /// The selected stroke is being moved or resized.
    Transforming,
    /// The viewport is being dragged.
    Panning {
        /// Screen-space position of the previous pointer event.
        last_screen: Coord,
    },
}
