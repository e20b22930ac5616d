//! Shadow map pass.
//!
//! The stage hands its light transforms back to the caller, which threads the biased transform
//! into the main pass uniforms.

/// Light frustum setup and the shadow pass.
pub mod stage;

pub use stage::{ShadowStage, ShadowTransforms};
