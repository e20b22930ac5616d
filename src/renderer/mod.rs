//! The paint loop.
//!
//! [`ProgressiveRenderer::paint`] runs once per host repaint: detect invalidation, pick the
//! frame's kernel samples, render the shadow and main passes with the jitter applied, then blend
//! into the history and select the displayed channel.

/// Renderer state and the per-paint pipeline.
pub mod paint;

pub use paint::{PaintReport, ProgressiveRenderer};
