//! Sample kernels.
//!
//! Low-discrepancy 2D point sets drive the per-frame jitter of the progressive loop. Points are placed by
//! dart throwing with a minimum distance, trimmed to an exact count by removing the closest pairs, then
//! remapped into the target domain and ordered.

/// Kernel generation, domains and ordering policies.
pub mod generate;
/// Ambient-occlusion hemisphere kernel and rotation noise.
pub mod hemisphere;
pub(crate) mod poisson;

pub use generate::{KernelDomain, MAX_KERNEL_SIZE, SampleKernel, SortPolicy, generate};
