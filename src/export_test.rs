#![allow(clippy::float_cmp)]

use std::cell::Cell;

use futures::executor::block_on;
use uuid::Uuid;

use super::*;
use crate::error::CanvasError;
use crate::stroke::StrokeKind;
use crate::surface::{DrawCommand, RecordingSurface};

const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";

/// Recording surface that remembers its size and "encodes" to fixed bytes.
#[derive(Default)]
struct FakeCanvas {
    rec: RecordingSurface,
    size: (u32, u32),
}

impl ImageSurface for FakeCanvas {
    type Surface = RecordingSurface;

    fn resize(&mut self, width: u32, height: u32) {
        self.size = (width, height);
        self.rec.reset();
    }

    fn surface(&mut self) -> &mut RecordingSurface {
        &mut self.rec
    }

    fn encode_png(&self) -> Result<ImageBlob, CanvasError> {
        Ok(ImageBlob::from_png_bytes(PNG_MAGIC))
    }
}

struct MockSink {
    name: &'static str,
    fail: bool,
    calls: Cell<usize>,
}

impl MockSink {
    fn new(name: &'static str, fail: bool) -> Self {
        Self { name, fail, calls: Cell::new(0) }
    }
}

#[async_trait(?Send)]
impl ImageSink for MockSink {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn save(&self, _blob: &ImageBlob) -> Result<SaveOutcome, CanvasError> {
        self.calls.set(self.calls.get() + 1);
        if self.fail {
            return Err(CanvasError::Save(format!("{} unavailable", self.name)));
        }
        Ok(SaveOutcome { sink: self.name, message: "ok".to_owned(), path: None })
    }
}

fn options() -> CaptureOptions<'static> {
    CaptureOptions { viewport_w: 800.0, viewport_h: 600.0, padding: 20.0, background: "#ffffff" }
}

// =============================================================
// Capture region
// =============================================================

#[test]
fn region_is_padded_union_of_strokes() {
    let mut doc = DocStore::new();
    let id = doc.create_stroke(StrokeKind::Pen, "#000", 5.0).id();
    doc.add_point_to_stroke(&id, -50.0, 10.0, 0.5);
    doc.add_point_to_stroke(&id, 30.0, 40.0, 0.5);
    doc.create_rectangle(100.0, 100.0, 50.0, 50.0, "#000", 1.0);

    let region = capture_region(&doc, &Camera::default(), 800.0, 600.0, 20.0);
    assert_eq!(region, Bounds::new(-70.0, -10.0, 170.0, 170.0));
}

#[test]
fn region_of_empty_doc_is_viewport() {
    let doc = DocStore::new();
    let cam = Camera { offset_x: 10.0, offset_y: 5.0, zoom: 3.0 };
    assert_eq!(capture_region(&doc, &cam, 800.0, 600.0, 20.0), Bounds::new(10.0, 5.0, 810.0, 605.0));
}

#[test]
fn region_ignores_strokes_without_geometry() {
    let mut doc = DocStore::new();
    doc.create_stroke(StrokeKind::Pen, "#000", 5.0);
    let region = capture_region(&doc, &Camera::default(), 640.0, 480.0, 20.0);
    assert_eq!(region.width(), 640.0);
}

// =============================================================
// Capture image
// =============================================================

#[test]
fn capture_sizes_surface_and_paints_background() {
    let mut doc = DocStore::new();
    doc.create_rectangle(0.0, 0.0, 100.0, 60.0, "#000", 2.0);
    let mut canvas = FakeCanvas::default();

    let blob = capture_image(&mut canvas, &doc, &Camera::default(), &options()).unwrap();

    assert_eq!(canvas.size, (140, 100));
    assert_eq!(
        canvas.rec.commands()[0],
        DrawCommand::Clear { width: 140.0, height: 100.0, color: "#ffffff".into() }
    );
    assert!(canvas.rec.commands().iter().any(|c| matches!(c, DrawCommand::RoundRect { x, y, .. } if *x == 20.0 && *y == 20.0)));
    assert_eq!(blob.png_bytes().unwrap(), PNG_MAGIC);
}

#[test]
fn capture_of_empty_doc_does_not_fail() {
    let doc = DocStore::new();
    let mut canvas = FakeCanvas::default();
    let blob = capture_image(&mut canvas, &doc, &Camera::default(), &options()).unwrap();
    assert_eq!(canvas.size, (800, 600));
    assert_eq!(canvas.rec.commands().len(), 1);
    assert!(blob.data_url().starts_with("data:image/png;base64,"));
}

// =============================================================
// ImageBlob
// =============================================================

#[test]
fn blob_rejects_non_png_data_url() {
    let err = ImageBlob::from_data_url("data:image/jpeg;base64,AAAA".to_owned()).unwrap_err();
    assert_eq!(err.error_code(), "E_INVALID_DATA_URL");
}

#[test]
fn blob_rejects_bad_base64() {
    let blob = ImageBlob::from_data_url("data:image/png;base64,@@not-base64@@".to_owned()).unwrap();
    assert!(matches!(blob.png_bytes(), Err(CanvasError::InvalidDataUrl(_))));
}

#[test]
fn blob_decodes_known_payload() {
    let blob = ImageBlob::from_data_url("data:image/png;base64,aGVsbG8=".to_owned()).unwrap();
    assert_eq!(blob.png_bytes().unwrap(), b"hello");
}

// =============================================================
// Sinks
// =============================================================

#[test]
fn file_name_is_timestamped() {
    let at = OffsetDateTime::from_unix_timestamp(1_700_000_000).unwrap();
    assert_eq!(timestamped_file_name(at), "drawing_20231114_221320.png");
}

#[test]
fn file_sink_writes_decoded_png() {
    let dir = std::env::temp_dir().join(format!("inkboard-export-{}", Uuid::new_v4()));
    std::fs::create_dir_all(&dir).unwrap();
    let sink = FileSink::new(&dir);
    let blob = ImageBlob::from_png_bytes(PNG_MAGIC);

    let outcome = block_on(sink.save(&blob)).unwrap();

    let path = outcome.path.clone().unwrap();
    assert_eq!(outcome.sink, "file");
    assert!(outcome.message.starts_with("Image saved as drawing_"));
    assert_eq!(std::fs::read(&path).unwrap(), PNG_MAGIC);
    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn file_sink_reports_unwritable_dir() {
    let dir = std::env::temp_dir().join(format!("inkboard-missing-{}", Uuid::new_v4()));
    let sink = FileSink::new(&dir);
    let err = block_on(sink.save(&ImageBlob::from_png_bytes(PNG_MAGIC))).unwrap_err();
    assert_eq!(err.error_code(), "E_SAVE");
}

#[test]
fn save_prefers_native_sink() {
    let native = MockSink::new("native", false);
    let fallback = MockSink::new("download", false);
    let blob = ImageBlob::from_png_bytes(PNG_MAGIC);

    let outcome = block_on(save_image(&blob, Some(&native), &fallback)).unwrap();

    assert_eq!(outcome.sink, "native");
    assert_eq!(native.calls.get(), 1);
    assert_eq!(fallback.calls.get(), 0);
}

#[test]
fn save_falls_back_when_native_fails() {
    let native = MockSink::new("native", true);
    let fallback = MockSink::new("download", false);
    let blob = ImageBlob::from_png_bytes(PNG_MAGIC);

    let outcome = block_on(save_image(&blob, Some(&native), &fallback)).unwrap();

    assert_eq!(outcome.sink, "download");
    assert_eq!(native.calls.get(), 1);
    assert_eq!(fallback.calls.get(), 1);
}

#[test]
fn save_without_native_uses_fallback() {
    let fallback = MockSink::new("download", false);
    let blob = ImageBlob::from_png_bytes(PNG_MAGIC);
    let outcome = block_on(save_image(&blob, None, &fallback)).unwrap();
    assert_eq!(outcome.sink, "download");
}

#[test]
fn save_surfaces_fallback_error() {
    let native = MockSink::new("native", true);
    let fallback = MockSink::new("download", true);
    let blob = ImageBlob::from_png_bytes(PNG_MAGIC);
    let err = block_on(save_image(&blob, Some(&native), &fallback)).unwrap_err();
    assert!(matches!(err, CanvasError::Save(ref m) if m.contains("download")));
}
