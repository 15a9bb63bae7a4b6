//! Rendering: fonts and text measurement, paint plan emission and replay.
//!
//! This module provides:
//! - [`RenderContext`], the explicit font registry and measurement cache
//! - [`emit_paint_plan`], which turns placements into paint commands
//! - [`RenderBackend`] and [`render_plan`] for replaying a plan
//! - Color normalization

pub mod backend;
pub mod colors;
mod context;
pub mod emitter;
mod metrics;

pub use backend::{render_plan, RecordingBackend, RenderBackend, TextRun};
pub use colors::{palette, parse_color, resolve_color, CssColor};
pub use context::{FontRegistry, RenderContext};
pub use emitter::emit_paint_plan;
pub use metrics::{StandardFontMetrics, TextMeasurer};
