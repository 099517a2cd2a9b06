//! Annotation engine for placing transcribed text over manuscript images.
//!
//! This crate is compiled to WebAssembly and runs in the browser. It owns the
//! editing session: the span store, the pannable and rotatable view, selection,
//! the scale and path handles, and the text-entry overlay. The host layer wires
//! DOM events to [`engine::Engine`], redraws from [`render::Scene`], and
//! persists the resulting [`engine::Action`]s.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level engine and testable [`engine::EngineCore`] |
//! | [`dispatch`] | Ordered first-claim routing of events to controllers |
//! | [`store`] | Span type and the in-memory span store |
//! | [`viewport`] | Pan, wheel zoom/rotate, two-finger gestures, cursor slot |
//! | [`selection`] | Click toggling and rubber-band box selection |
//! | [`handles`] | Translate and vertical scale of the selection |
//! | [`path_edit`] | Control-point editing of a single span's baseline |
//! | [`text_input`] | Text-entry overlay and double-click detection |
//! | [`measure`] | Font metrics (canvas-backed in the browser, fixed in tests) |
//! | [`render`] | Pure scene description for the presentation layer |
//! | [`export`] | Standalone SVG export |
//! | [`geom`] | Points, rectangles and affine transforms |
//! | [`path`] | Baseline path data and its textual form |
//! | [`input`] | Input event types, tools and cursors |
//! | [`config`] | Tunable editor settings, loaded from JSON |
//! | [`error`] | Error types |
//! | [`consts`] | Shared numeric constants (tolerances and defaults) |

pub mod config;
pub mod consts;
pub mod dispatch;
pub mod engine;
pub mod error;
pub mod export;
pub mod geom;
pub mod handles;
pub mod input;
pub mod measure;
pub mod path;
pub mod path_edit;
pub mod render;
pub mod selection;
pub mod store;
pub mod text_input;
pub mod viewport;
