//! Shared numeric constants for the canvas crate.

// ── Input ───────────────────────────────────────────────────────

/// Pressure assumed when the input device does not report one.
pub const DEFAULT_PRESSURE: f64 = 0.5;

/// Layer every document starts on. Never removable through the UI.
pub const DEFAULT_LAYER: i32 = 0;

// ── Rendering ───────────────────────────────────────────────────

/// Thinnest line a pressure-scaled pen segment may be drawn with.
pub const MIN_LINE_WIDTH: f64 = 1.0;

/// Rectangle corner radius as a fraction of its shorter side.
pub const CORNER_RADIUS_RATIO: f64 = 0.1;

/// Accent color for selection outlines, handles, and shape previews.
pub const ACCENT_COLOR: &str = "#007AFF";

/// Line width of the rectangle preview, in screen pixels.
pub const PREVIEW_LINE_WIDTH_PX: f64 = 2.0;

/// Dash segment length of the rectangle preview, in screen pixels.
pub const PREVIEW_DASH_PX: f64 = 5.0;

/// Opacity of the rectangle preview.
pub const PREVIEW_ALPHA: f64 = 0.7;

/// Dash segment length of the selection outline, in screen pixels.
pub const SELECTION_DASH_PX: f64 = 4.0;

/// Fill color of transform handles.
pub const HANDLE_FILL: &str = "#ffffff";

// ── Selection ───────────────────────────────────────────────────

/// Side length of a transform handle square, in screen pixels.
pub const HANDLE_SIZE_PX: f64 = 8.0;

/// Drag-start extents below this are treated as zero when deriving resize scale.
pub const MIN_RESIZE_EXTENT: f64 = 1e-6;

// ── Export ──────────────────────────────────────────────────────

/// World-unit margin added around the union of stroke bounds on export.
pub const EXPORT_PADDING: f64 = 20.0;

/// Prefix every exported PNG data URL carries.
pub const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";

// ── Camera ──────────────────────────────────────────────────────

/// Minimum zoom factor.
pub const ZOOM_MIN: f64 = 0.1;

/// Maximum zoom factor.
pub const ZOOM_MAX: f64 = 5.0;

/// Additive zoom change per wheel notch.
pub const ZOOM_STEP: f64 = 0.1;
