//! Demo scene content for the CPU backend.

/// Built-in scenes.
pub mod presets;
/// Analytic shapes and ray intersection.
pub mod primitive;

pub use presets::{SceneDescription, ScenePreset};
pub use primitive::{Hit, Primitive, Shape};
