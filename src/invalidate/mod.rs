//! Camera and projection change detection.
//!
//! Transform changes are detected here; setting changes are detected through
//! [`crate::settings::RenderSettings::generation`] and viewport changes by the renderer.

/// Cached-transform tracker and comparison policy.
pub mod tracker;

pub use tracker::{CameraCompare, InvalidationTracker};
