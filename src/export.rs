//! Image export: capture the drawing to a PNG and hand it to a save strategy.
//!
//! Capture renders every stroke onto an offscreen [`ImageSurface`] sized to
//! the union of stroke bounds plus padding, on a solid background. An empty
//! document captures a blank viewport-sized image instead.
//!
//! Saving is the only asynchronous step. [`save_image`] tries the native sink
//! when the host offers one and falls back to the always-available sink
//! (usually a browser download) if it is absent or fails. There are no
//! retries.

#[cfg(test)]
#[path = "export_test.rs"]
mod export_test;

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::Serialize;
use time::OffsetDateTime;
use tracing::{info, warn};

use crate::camera::Camera;
use crate::consts::PNG_DATA_URL_PREFIX;
use crate::doc::DocStore;
use crate::error::CanvasError;
use crate::geom::Bounds;
use crate::render;
use crate::surface::Surface;

/// An encoded PNG carried as a `data:image/png;base64,` URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageBlob {
    data_url: String,
}

impl ImageBlob {
    /// Wrap a data URL produced by a capture surface.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::InvalidDataUrl`] if it is not a base64 PNG data URL.
    pub fn from_data_url(data_url: String) -> Result<Self, CanvasError> {
        if !data_url.starts_with(PNG_DATA_URL_PREFIX) {
            return Err(CanvasError::InvalidDataUrl("expected a base64 PNG data url".to_owned()));
        }
        Ok(Self { data_url })
    }

    /// Encode raw PNG bytes.
    #[must_use]
    pub fn from_png_bytes(bytes: &[u8]) -> Self {
        Self { data_url: format!("{PNG_DATA_URL_PREFIX}{}", STANDARD.encode(bytes)) }
    }

    #[must_use]
    pub fn data_url(&self) -> &str {
        &self.data_url
    }

    /// Decoded PNG bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::InvalidDataUrl`] if the payload is not valid base64.
    pub fn png_bytes(&self) -> Result<Vec<u8>, CanvasError> {
        let payload = self
            .data_url
            .strip_prefix(PNG_DATA_URL_PREFIX)
            .ok_or_else(|| CanvasError::InvalidDataUrl("missing PNG data url prefix".to_owned()))?;
        STANDARD
            .decode(payload)
            .map_err(|e| CanvasError::InvalidDataUrl(format!("base64 decode failed: {e}")))
    }
}

/// An offscreen pixel buffer that can be drawn on and encoded as an image.
pub trait ImageSurface {
    /// The drawing context for this buffer.
    type Surface: Surface + ?Sized;

    /// Resize the backing store to `width` x `height` pixels, discarding content.
    fn resize(&mut self, width: u32, height: u32);

    /// Drawing context targeting the buffer.
    fn surface(&mut self) -> &mut Self::Surface;

    /// Encode the current content as a PNG.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::Encode`] if the backend cannot produce an image.
    fn encode_png(&self) -> Result<ImageBlob, CanvasError>;
}

/// World region an export covers.
///
/// The union of all stroke bounds grown by `padding`, or the current
/// viewport at 1:1 scale when nothing has geometry.
#[must_use]
pub fn capture_region(doc: &DocStore, camera: &Camera, viewport_w: f64, viewport_h: f64, padding: f64) -> Bounds {
    let content = doc.content_bounds();
    if content.is_empty() {
        Bounds::from_rect(camera.offset_x, camera.offset_y, viewport_w, viewport_h)
    } else {
        content.padded(padding)
    }
}

/// Export parameters for [`capture_image`].
#[derive(Debug, Clone, Copy)]
pub struct CaptureOptions<'a> {
    pub viewport_w: f64,
    pub viewport_h: f64,
    pub padding: f64,
    pub background: &'a str,
}

/// Render the whole drawing into `image` and encode it.
///
/// # Errors
///
/// Returns [`CanvasError::Surface`] if drawing fails or
/// [`CanvasError::Encode`] if encoding fails.
pub fn capture_image<I: ImageSurface + ?Sized>(
    image: &mut I,
    doc: &DocStore,
    camera: &Camera,
    options: &CaptureOptions<'_>,
) -> Result<ImageBlob, CanvasError> {
    let region = capture_region(doc, camera, options.viewport_w, options.viewport_h, options.padding);
    let (width, height) = (pixels(region.width()), pixels(region.height()));
    image.resize(width, height);
    render::draw_region(image.surface(), doc, &region, options.background)?;
    info!(width, height, strokes = doc.len(), "image captured");
    image.encode_png()
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn pixels(extent: f64) -> u32 {
    extent.ceil().clamp(1.0, f64::from(u32::MAX)) as u32
}

/// Result of a successful save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SaveOutcome {
    /// Which sink handled the save.
    pub sink: &'static str,
    /// Human-readable status for the host UI.
    pub message: String,
    /// Where the file landed, when the sink knows.
    pub path: Option<PathBuf>,
}

/// A place exported images can be persisted to.
#[async_trait(?Send)]
pub trait ImageSink {
    /// Short name used in logs and outcomes.
    fn name(&self) -> &'static str;

    /// Persist `blob`.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::Save`] or [`CanvasError::InvalidDataUrl`] if the
    /// image could not be stored.
    async fn save(&self, blob: &ImageBlob) -> Result<SaveOutcome, CanvasError>;
}

/// Native sink that writes timestamped PNG files into a directory.
#[derive(Debug, Clone)]
pub struct FileSink {
    dir: PathBuf,
}

impl FileSink {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// A sink writing into the user's downloads directory.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::Save`] if the platform has no downloads directory.
    pub fn downloads() -> Result<Self, CanvasError> {
        dirs::download_dir()
            .map(Self::new)
            .ok_or_else(|| CanvasError::Save("could not find downloads directory".to_owned()))
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

/// `drawing_YYYYMMDD_HHMMSS.png` for `at`.
#[must_use]
pub fn timestamped_file_name(at: OffsetDateTime) -> String {
    format!(
        "drawing_{:04}{:02}{:02}_{:02}{:02}{:02}.png",
        at.year(),
        u8::from(at.month()),
        at.day(),
        at.hour(),
        at.minute(),
        at.second()
    )
}

#[async_trait(?Send)]
impl ImageSink for FileSink {
    fn name(&self) -> &'static str {
        "file"
    }

    async fn save(&self, blob: &ImageBlob) -> Result<SaveOutcome, CanvasError> {
        let bytes = blob.png_bytes()?;
        let file_name = timestamped_file_name(OffsetDateTime::now_utc());
        let path = self.dir.join(&file_name);
        // Blocking write. A host that adds an async runtime should run this on its blocking pool.
        std::fs::write(&path, bytes).map_err(|e| CanvasError::Save(format!("failed to write {}: {e}", path.display())))?;
        info!(path = %path.display(), "image saved");
        Ok(SaveOutcome { sink: self.name(), message: format!("Image saved as {file_name}"), path: Some(path) })
    }
}

/// Save through `native` when present, falling back to `fallback` on absence
/// or failure. Only the fallback's error reaches the caller.
///
/// # Errors
///
/// Returns the fallback sink's error if it fails too.
pub async fn save_image(
    blob: &ImageBlob,
    native: Option<&dyn ImageSink>,
    fallback: &dyn ImageSink,
) -> Result<SaveOutcome, CanvasError> {
    if let Some(sink) = native {
        match sink.save(blob).await {
            Ok(outcome) => return Ok(outcome),
            Err(e) => {
                warn!(sink = sink.name(), error = %e, code = e.error_code(), "native save failed, falling back");
            }
        }
    }
    fallback.save(blob).await
}
