//! Reference backends.
//!
//! [`CpuBackend`] ray casts analytic [`Primitive`](crate::scene::Primitive)s into the same targets a
//! rasterizer would fill, so the progressive pipeline can run headless and in tests.

/// CPU ray-cast backend.
pub mod cpu;

pub use cpu::{CpuBackend, CpuBackendOpts, CpuBackendStats};
