//! Per-frame jitter of camera, lens and light.
//!
//! Every value here is a function of the running sample index, the active kernels and the current
//! settings; the only other input is an RNG for [`crate::settings::SamplingMode::Random`].

/// Perturbation vector and the function computing it.
pub mod engine;
/// The three kernels driving the jitter and their regeneration.
pub mod kernels;

pub use engine::{DofShift, FrameInput, PerturbationVector, compute_perturbation};
pub use kernels::KernelSet;
