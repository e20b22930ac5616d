//! Shared value types, errors and small math helpers.

/// Viewport, camera, projection and float image types.
pub mod core;
/// Error taxonomy.
pub mod error;
pub(crate) mod math;
