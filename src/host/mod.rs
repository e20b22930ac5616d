//! Contracts with the outside world.
//!
//! The renderer only sees the host through these traits: capabilities for camera and viewport
//! state, a backend for render targets and passes, and drawables for scene content.

/// Render backend trait and pass kinds.
pub mod backend;
/// Viewport, projection, camera and cursor capabilities.
pub mod capabilities;
/// Shareable cursor/keyboard state written by input callbacks.
pub mod input;
/// Size-dependent render targets.
pub mod targets;
/// Named uniform values handed to each pass.
pub mod uniforms;

pub use backend::{Drawable, PassKind, RenderBackend, TargetDesc, TargetStatus};
pub use capabilities::{Capabilities, StaticCapabilities};
pub use input::{CursorState, InputHandle, Key};
pub use targets::{DepthMap, GBuffer};
pub use uniforms::{UniformBlock, UniformValue};
