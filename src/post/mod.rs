//! Frame-independent post-processing.

/// Screen-space ambient occlusion.
pub mod ssao;

pub use ssao::{SSAO_KERNEL_SIZE, SSAO_NOISE_SIZE, SsaoSamples, apply_occlusion, occlusion_map};
