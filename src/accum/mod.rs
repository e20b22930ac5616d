//! Temporal accumulation and display selection.
//!
//! History is a running average: frame `k` contributes with weight `1 / (k + 1)`. Once the frame
//! budget is spent the driver reports [`crate::frame::AccumFrame::Converged`] and new frames carry
//! no weight.

/// Blend math and the persisted history buffer.
pub mod blend;
/// Debug output channels.
pub mod output;

pub use blend::{AccumulationBuffer, blend, blend_weights};
pub use output::{OutputSources, compose_output};
