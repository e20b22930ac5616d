//! Progressive stochastic rendering core.
//!
//! Each paint renders the scene once with per-frame jitter taken from precomputed sample kernels
//! (sub-pixel offset, lens aperture, area-light disc, per-object visibility) and blends the result
//! into a running average. Any change of camera, viewport, settings or scene restarts the average.
//!
//! The host side is abstracted behind [`host::Capabilities`], [`host::RenderBackend`] and
//! [`host::Drawable`]; [`render::CpuBackend`] is a headless reference backend.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

/// Temporal accumulation and output channels.
pub mod accum;
/// Shared value types, errors and math helpers.
pub mod foundation;
/// Frame counter.
pub mod frame;
/// Host-facing traits and render target types.
pub mod host;
/// Camera change detection.
pub mod invalidate;
/// Sample kernels.
pub mod kernel;
/// Stage timings.
pub mod perf;
/// Per-frame jitter.
pub mod perturb;
/// Ambient occlusion.
pub mod post;
/// Reference backends.
pub mod render;
/// The paint loop.
pub mod renderer;
/// Demo scenes.
pub mod scene;
/// Live-editable settings.
pub mod settings;
/// Shadow pass.
pub mod shadow;
/// Stochastic transparency.
pub mod transparency;

pub use accum::{AccumulationBuffer, blend, blend_weights};
pub use foundation::core::{Camera, ImageF32, Projection, Rgba, Viewport};
pub use foundation::error::{ProgressaError, ProgressaResult};
pub use frame::{AccumFrame, FrameDriver, FrameState};
pub use host::{Capabilities, Drawable, RenderBackend, StaticCapabilities};
pub use invalidate::{CameraCompare, InvalidationTracker};
pub use kernel::{KernelDomain, SampleKernel, SortPolicy, generate};
pub use perturb::{PerturbationVector, compute_perturbation};
pub use render::{CpuBackend, CpuBackendOpts};
pub use renderer::{PaintReport, ProgressiveRenderer};
pub use scene::{Primitive, ScenePreset};
pub use settings::RenderSettings;
