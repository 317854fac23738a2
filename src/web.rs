//! Browser backend: the HTML canvas 2D context as a [`Surface`], an offscreen
//! canvas for PNG export, and the anchor-click download sink.
//!
//! This module is the only place that touches `web_sys` drawing APIs.

use async_trait::async_trait;
use tracing::info;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, Document, HtmlAnchorElement, HtmlCanvasElement};

use crate::error::CanvasError;
use crate::export::{ImageBlob, ImageSink, ImageSurface, SaveOutcome};
use crate::surface::{CompositeMode, LineCap, LineJoin, Surface};

/// Fetch the 2D context of `canvas`.
///
/// # Errors
///
/// Returns [`CanvasError::Surface`] if the element has no 2D context.
pub fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, CanvasError> {
    let Some(ctx) = canvas.get_context("2d")? else {
        return Err(CanvasError::Surface("canvas has no 2d context".to_owned()));
    };
    ctx.dyn_into::<CanvasRenderingContext2d>()
        .map_err(|_| CanvasError::Surface("2d context has an unexpected type".to_owned()))
}

/// A browser 2D context adapted to [`Surface`].
#[derive(Debug, Clone)]
pub struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    #[must_use]
    pub fn new(ctx: CanvasRenderingContext2d) -> Self {
        Self { ctx }
    }
}

impl Surface for CanvasSurface {
    fn save(&mut self) {
        self.ctx.save();
    }

    fn restore(&mut self) {
        self.ctx.restore();
    }

    fn clear(&mut self, width: f64, height: f64, color: &str) -> Result<(), CanvasError> {
        self.ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)?;
        self.ctx.set_global_alpha(1.0);
        self.ctx.set_global_composite_operation(CompositeMode::SourceOver.as_str())?;
        self.ctx.set_fill_style_str(color);
        self.ctx.fill_rect(0.0, 0.0, width, height);
        Ok(())
    }

    fn scale(&mut self, sx: f64, sy: f64) -> Result<(), CanvasError> {
        self.ctx.scale(sx, sy)?;
        Ok(())
    }

    fn set_stroke_color(&mut self, color: &str) {
        self.ctx.set_stroke_style_str(color);
    }

    fn set_fill_color(&mut self, color: &str) {
        self.ctx.set_fill_style_str(color);
    }

    fn set_line_width(&mut self, width: f64) {
        self.ctx.set_line_width(width);
    }

    fn set_line_cap(&mut self, cap: LineCap) {
        self.ctx.set_line_cap(cap.as_str());
    }

    fn set_line_join(&mut self, join: LineJoin) {
        self.ctx.set_line_join(join.as_str());
    }

    fn set_alpha(&mut self, alpha: f64) {
        self.ctx.set_global_alpha(alpha);
    }

    fn set_composite(&mut self, mode: CompositeMode) -> Result<(), CanvasError> {
        self.ctx.set_global_composite_operation(mode.as_str())?;
        Ok(())
    }

    fn set_line_dash(&mut self, segments: &[f64]) -> Result<(), CanvasError> {
        let dash_array = js_sys::Array::new();
        for &segment in segments {
            dash_array.push(&JsValue::from_f64(segment));
        }
        self.ctx.set_line_dash(&dash_array)?;
        Ok(())
    }

    fn begin_path(&mut self) {
        self.ctx.begin_path();
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.ctx.move_to(x, y);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.ctx.line_to(x, y);
    }

    fn close_path(&mut self) {
        self.ctx.close_path();
    }

    fn arc_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, radius: f64) -> Result<(), CanvasError> {
        self.ctx.arc_to(x1, y1, x2, y2, radius)?;
        Ok(())
    }

    fn stroke(&mut self) {
        self.ctx.stroke();
    }

    fn stroke_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.ctx.stroke_rect(x, y, width, height);
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.ctx.fill_rect(x, y, width, height);
    }
}

/// A detached canvas element used to render exports.
#[derive(Debug, Clone)]
pub struct CanvasCapture {
    canvas: HtmlCanvasElement,
    surface: CanvasSurface,
}

impl CanvasCapture {
    /// Create an offscreen canvas in `document`.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::Surface`] if the element or its context cannot be created.
    pub fn new(document: &Document) -> Result<Self, CanvasError> {
        let canvas = document
            .create_element("canvas")?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| CanvasError::Surface("created element is not a canvas".to_owned()))?;
        let ctx = context_2d(&canvas)?;
        Ok(Self { canvas, surface: CanvasSurface::new(ctx) })
    }
}

impl ImageSurface for CanvasCapture {
    type Surface = CanvasSurface;

    fn resize(&mut self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }

    fn surface(&mut self) -> &mut CanvasSurface {
        &mut self.surface
    }

    fn encode_png(&self) -> Result<ImageBlob, CanvasError> {
        let url = self
            .canvas
            .to_data_url_with_type("image/png")
            .map_err(|e| CanvasError::Encode(format!("{e:?}")))?;
        ImageBlob::from_data_url(url)
    }
}

/// Saves by clicking a temporary `<a download>` pointing at the data URL.
#[derive(Debug, Clone)]
pub struct DownloadSink {
    document: Document,
}

impl DownloadSink {
    #[must_use]
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    /// A sink bound to the global window's document.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::Save`] outside a browser window.
    pub fn from_window() -> Result<Self, CanvasError> {
        web_sys::window()
            .and_then(|w| w.document())
            .map(Self::new)
            .ok_or_else(|| CanvasError::Save("no browser document available".to_owned()))
    }
}

#[async_trait(?Send)]
impl ImageSink for DownloadSink {
    fn name(&self) -> &'static str {
        "download"
    }

    async fn save(&self, blob: &ImageBlob) -> Result<SaveOutcome, CanvasError> {
        let to_save_error = |e: JsValue| CanvasError::Save(format!("{e:?}"));
        let anchor = self
            .document
            .create_element("a")
            .map_err(to_save_error)?
            .dyn_into::<HtmlAnchorElement>()
            .map_err(|_| CanvasError::Save("created element is not an anchor".to_owned()))?;
        #[allow(clippy::cast_possible_truncation)]
        let file_name = format!("drawing_{}.png", js_sys::Date::now() as i64);
        anchor.set_href(blob.data_url());
        anchor.set_download(&file_name);

        let Some(body) = self.document.body() else {
            return Err(CanvasError::Save("document has no body".to_owned()));
        };
        body.append_child(&anchor).map_err(to_save_error)?;
        anchor.click();
        anchor.remove();
        info!(file = %file_name, "image download triggered");
        Ok(SaveOutcome { sink: self.name(), message: "Image downloaded".to_owned(), path: None })
    }
}
