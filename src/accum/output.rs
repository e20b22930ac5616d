use glam::Vec2;

use crate::foundation::core::{ImageF32, Rgba};
use crate::foundation::math::linearize_depth;
use crate::host::targets::{DepthMap, GBuffer};
use crate::settings::OutputChannel;

/// Buffers available to the display stage after a paint.
#[derive(Clone, Copy, Debug)]
pub struct OutputSources<'a> {
    /// Accumulated image.
    pub accumulated: &'a ImageF32,
    /// Current frame's main pass outputs.
    pub gbuffer: &'a GBuffer,
    /// Per-pixel ambient occlusion factor (`1` = unoccluded), if computed.
    pub occlusion: Option<&'a [f32]>,
    /// Current frame's shadow map.
    pub shadow_map: &'a DepthMap,
    /// Camera near plane.
    pub near: f32,
    /// Camera far plane.
    pub far: f32,
}

/// Image shown for `channel`. Never feeds back into accumulation.
pub fn compose_output(channel: OutputChannel, src: &OutputSources<'_>) -> ImageF32 {
    let g = src.gbuffer;
    let (w, h) = (g.width, g.height);
    let gray = |v: f32| -> Rgba { [v, v, v, 1.0] };

    let data: Vec<Rgba> = match channel {
        OutputChannel::Final => return src.accumulated.clone(),
        OutputChannel::Color => return g.color_image(),
        OutputChannel::Normals => g
            .normal
            .iter()
            .zip(&g.id)
            .map(|(n, &id)| {
                if id == 0 {
                    [0.0, 0.0, 0.0, 1.0]
                } else {
                    let c = *n * 0.5 + 0.5;
                    [c.x, c.y, c.z, 1.0]
                }
            })
            .collect(),
        OutputChannel::Geometry => g.id.iter().map(|&id| id_color(id)).collect(),
        OutputChannel::Depth => {
            let range = (src.far - src.near).max(f32::EPSILON);
            g.depth
                .iter()
                .map(|&d| {
                    if d >= 1.0 {
                        return gray(1.0);
                    }
                    let z = linearize_depth(d, src.near, src.far);
                    gray(((z - src.near) / range).clamp(0.0, 1.0))
                })
                .collect()
        }
        OutputChannel::OcclusionMap => match src.occlusion {
            Some(occ) => occ.iter().map(|&o| gray(o)).collect(),
            None => vec![gray(1.0); g.depth.len()],
        },
        OutputChannel::ShadowMap => {
            let size = Vec2::new(w.max(1) as f32, h.max(1) as f32);
            (0..h)
                .flat_map(|y| (0..w).map(move |x| (x, y)))
                .map(|(x, y)| {
                    let uv = (Vec2::new(x as f32, y as f32) + 0.5) / size;
                    gray(src.shadow_map.sample(uv))
                })
                .collect()
        }
    };
    ImageF32 {
        width: w,
        height: h,
        data,
    }
}

/// Stable pseudo-random color per drawable id; background is black.
fn id_color(id: u32) -> Rgba {
    if id == 0 {
        return [0.0, 0.0, 0.0, 1.0];
    }
    let mut x = id.wrapping_mul(0x9e37_79b9);
    x ^= x >> 16;
    x = x.wrapping_mul(0x85eb_ca6b);
    x ^= x >> 13;
    let c = |shift: u32| 0.25 + 0.75 * ((x >> shift) & 0xff) as f32 / 255.0;
    [c(0), c(8), c(16), 1.0]
}

#[cfg(test)]
#[path = "../../tests/unit/accum/output.rs"]
mod tests;
