//! Infinite-canvas vector drawing engine.
//!
//! User input is stored as discrete, editable strokes rather than committed
//! pixels. The crate owns the stroke document, tool dispatch, selection with
//! move and corner resize, eraser-as-deletion, viewport rendering, and PNG
//! export. It compiles to WebAssembly for the browser; the host JavaScript
//! layer wires DOM events to [`engine::Engine`] and reacts to the returned
//! [`engine::Action`]s.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level engine and testable [`engine::EngineCore`] |
//! | [`doc`] | Stroke store: ids, z-order, layers, viewport queries |
//! | [`stroke`] | Stroke variants and per-kind dispatch |
//! | [`selection`] | Selection state machine, move and corner resize |
//! | [`eraser`] | Eraser-as-deletion policy |
//! | [`render`] | Viewport renderer and overlays |
//! | [`surface`] | Abstract 2D drawing surface and a recording backend |
//! | [`web`] | Browser canvas backend and download sink |
//! | [`export`] | Image capture and save strategies |
//! | [`camera`] | Pan/zoom camera and coordinate conversions |
//! | [`input`] | Tools, brush state, and the gesture state machine |
//! | [`geom`] | Points, bounds, rectangles |
//! | [`config`] | Session configuration |
//! | [`error`] | Error taxonomy |
//! | [`consts`] | Shared numeric constants |

pub mod camera;
pub mod config;
pub mod consts;
pub mod doc;
pub mod engine;
pub mod eraser;
pub mod error;
pub mod export;
pub mod geom;
pub mod input;
pub mod render;
pub mod selection;
pub mod stroke;
pub mod surface;
pub mod web;
