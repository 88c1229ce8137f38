//! Diagram editor engine for on-site deck estimates.
//!
//! This crate owns the full lifecycle of a diagram: generating a deck layout
//! from entered measurements, translating pointer events into scene
//! mutations, keeping snapshot undo/redo, hit-testing and transforming the
//! selection, and producing a display list that is painted on screen or
//! rasterized to PNG. Hosts wire input events to [`engine::EngineCore`] and
//! react to the returned [`engine::Action`]s.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Testable [`engine::EngineCore`]: tools, commands, export |
//! | [`doc`] | Entities, shapes, styles, and the [`doc::Scene`] store |
//! | [`history`] | Bounded snapshot undo/redo |
//! | [`scale`] | Points, viewport, and the feet/pixel scale model |
//! | [`layout`] | Auto-generated deck layout: posts, stairs, dimension lines |
//! | [`catalog`] | Builder-mode component templates |
//! | [`input`] | Tools, editor mode, and the gesture state machine |
//! | [`hit`] | Hit-testing against entities |
//! | [`transform`] | Snap, resize, rotate, re-layer, duplicate, lock, hide |
//! | [`render`] | Display list and the [`render::Painter`] trait |
//! | [`export`] | tiny-skia raster export and thumbnails |
//! | [`record`] | Saved-drawing record |
//! | [`config`] | Editor tuning knobs |
//! | [`consts`] | Shared numeric constants (grid pitch, floors, stair rise, etc.) |
//! | `web` | HTML canvas painter and `Engine` wrapper (feature `web`) |

pub mod catalog;
pub mod config;
pub mod consts;
pub mod doc;
pub mod engine;
pub mod export;
pub mod history;
pub mod hit;
pub mod input;
pub mod layout;
pub mod record;
pub mod render;
pub mod scale;
pub mod transform;
#[cfg(feature = "web")]
pub mod web;
