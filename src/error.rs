//! Error taxonomy for the canvas crate.
//!
//! Store and selection operations never fail: a reference to a missing stroke
//! id is a silent no-op. Errors only arise at the edges of the crate, when
//! parsing host-supplied strings, loading configuration, talking to the 2D
//! surface backend, or exporting an image.

use wasm_bindgen::JsValue;

/// Errors produced at the boundary between the canvas core and its host.
#[derive(Debug, thiserror::Error)]
pub enum CanvasError {
    /// A stroke kind name did not match any known variant.
    #[error("unknown stroke kind: {0}")]
    UnknownKind(String),

    /// A tool name did not match any known tool.
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    /// A configuration document could not be parsed.
    #[error("config parse failed: {0}")]
    ConfigParse(String),

    /// An exported image was not a base64 PNG data URL.
    #[error("invalid image data url: {0}")]
    InvalidDataUrl(String),

    /// The capture surface could not produce an encoded image.
    #[error("image encode failed: {0}")]
    Encode(String),

    /// Persisting an exported image failed.
    #[error("image save failed: {0}")]
    Save(String),

    /// A drawing call on the 2D surface backend failed.
    #[error("surface call failed: {0}")]
    Surface(String),
}

impl CanvasError {
    /// Stable machine-readable code for the host UI.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownKind(_) => "E_UNKNOWN_KIND",
            Self::UnknownTool(_) => "E_UNKNOWN_TOOL",
            Self::ConfigParse(_) => "E_CONFIG_PARSE",
            Self::InvalidDataUrl(_) => "E_INVALID_DATA_URL",
            Self::Encode(_) => "E_ENCODE",
            Self::Save(_) => "E_SAVE",
            Self::Surface(_) => "E_SURFACE",
        }
    }
}

impl From<JsValue> for CanvasError {
    fn from(value: JsValue) -> Self {
        Self::Surface(format!("{value:?}"))
    }
}
