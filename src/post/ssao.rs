use glam::{Mat3, Mat4, Vec3};
use rand::Rng;
use rayon::prelude::*;

use crate::foundation::core::ImageF32;
use crate::host::targets::GBuffer;
use crate::kernel::hemisphere::{hemisphere_kernel, rotation_noise};
use crate::settings::SsaoSettings;

/// Hemisphere samples per pixel.
pub const SSAO_KERNEL_SIZE: usize = 8;
/// Edge of the tiled rotation noise.
pub const SSAO_NOISE_SIZE: usize = 32;

const DEPTH_BIAS: f32 = 1e-4;

/// Kernel and rotation noise; rebuilt every paint while occlusion is on.
#[derive(Clone, Debug)]
pub struct SsaoSamples {
    kernel: Vec<Vec3>,
    noise: Vec<Vec3>,
}

impl SsaoSamples {
    /// Fresh kernel and noise tile.
    pub fn regenerate(randomize_noise: bool, rng: &mut impl Rng) -> Self {
        Self {
            kernel: hemisphere_kernel(SSAO_KERNEL_SIZE, rng),
            noise: rotation_noise(SSAO_NOISE_SIZE, randomize_noise, rng),
        }
    }

    /// Hemisphere samples.
    pub fn kernel(&self) -> &[Vec3] {
        &self.kernel
    }

    /// Rotation vector for pixel `(x, y)`, tiling the noise.
    pub fn noise_at(&self, x: u32, y: u32) -> Vec3 {
        let n = SSAO_NOISE_SIZE;
        self.noise
            .get((y as usize % n) * n + (x as usize % n))
            .copied()
            .unwrap_or(Vec3::X)
    }
}

/// Per-pixel occlusion factor in `[0, 1]` (`1` = unoccluded), bottom row first.
///
/// `view` and `projection` must be the transforms the G-buffer was rendered with.
pub fn occlusion_map(
    g: &GBuffer,
    view: Mat4,
    projection: Mat4,
    samples: &SsaoSamples,
    settings: &SsaoSettings,
) -> Vec<f32> {
    let (w, h) = (g.width as usize, g.height as usize);
    let mut out = vec![1.0f32; w * h];
    if w == 0 || h == 0 || samples.kernel.is_empty() {
        return out;
    }

    let inv_proj = projection.inverse();
    let normal_to_view = Mat3::from_mat4(view);
    let to_view = |x: usize, y: usize, depth: f32| {
        let ndc = Vec3::new(
            (x as f32 + 0.5) / w as f32 * 2.0 - 1.0,
            (y as f32 + 0.5) / h as f32 * 2.0 - 1.0,
            depth * 2.0 - 1.0,
        );
        inv_proj.project_point3(ndc)
    };

    out.par_chunks_mut(w).enumerate().for_each(|(y, row)| {
        for (x, slot) in row.iter_mut().enumerate() {
            let i = y * w + x;
            if g.id[i] == 0 || g.depth[i] >= 1.0 {
                continue;
            }
            let Some(n) = (normal_to_view * g.normal[i]).try_normalize() else {
                continue;
            };
            let p = to_view(x, y, g.depth[i]);

            let r = samples.noise_at(x as u32, y as u32);
            let tangent = (r - n * r.dot(n))
                .try_normalize()
                .unwrap_or_else(|| n.any_orthonormal_vector());
            let bitangent = n.cross(tangent);

            let mut occlusion = 0.0;
            for s in &samples.kernel {
                let sp = p + (tangent * s.x + bitangent * s.y + n * s.z) * settings.radius;
                let clip = projection * sp.extend(1.0);
                if clip.w <= 0.0 {
                    continue;
                }
                let ndc = clip.truncate() / clip.w;
                let sx = ((ndc.x * 0.5 + 0.5) * w as f32).floor();
                let sy = ((ndc.y * 0.5 + 0.5) * h as f32).floor();
                if sx < 0.0 || sy < 0.0 || sx >= w as f32 || sy >= h as f32 {
                    continue;
                }
                let (sx, sy) = (sx as usize, sy as usize);
                let d = g.depth[sy * w + sx];
                if d >= 1.0 {
                    continue;
                }
                let scene_z = to_view(sx, sy, d).z;
                let range = smoothstep(settings.radius / (p.z - scene_z).abs().max(1e-6));
                if scene_z >= sp.z + DEPTH_BIAS {
                    occlusion += range;
                }
            }
            let factor = occlusion / samples.kernel.len() as f32;
            *slot = (1.0 - factor * settings.intensity).clamp(0.0, 1.0);
        }
    });
    out
}

/// Darken `image` by `occlusion`; alpha is untouched.
pub fn apply_occlusion(image: &mut ImageF32, occlusion: &[f32]) {
    image
        .data
        .par_iter_mut()
        .zip(occlusion.par_iter())
        .for_each(|(px, &o)| {
            px[0] *= o;
            px[1] *= o;
            px[2] *= o;
        });
}

fn smoothstep(x: f32) -> f32 {
    let t = x.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

#[cfg(test)]
#[path = "../../tests/unit/post/ssao.rs"]
mod tests;
