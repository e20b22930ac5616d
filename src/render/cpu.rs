use glam::{Mat4, Vec2, Vec3};
use rayon::prelude::*;

use crate::foundation::core::Rgba;
use crate::foundation::error::{ProgressaError, ProgressaResult};
use crate::host::backend::{Drawable, PassKind, RenderBackend, TargetDesc, TargetStatus};
use crate::host::targets::{DepthMap, GBuffer, quantize_depth};
use crate::host::uniforms::{UniformBlock, names};
use crate::scene::primitive::Primitive;
use crate::settings::{ColorFormat, ShadowMapFormat};

/// Options for the CPU reference backend.
#[derive(Debug, Clone, Copy)]
pub struct CpuBackendOpts {
    pub(crate) ambient: f32,
    pub(crate) shadow_bias: f32,
}

impl Default for CpuBackendOpts {
    fn default() -> Self {
        Self {
            ambient: 0.25,
            shadow_bias: 0.002,
        }
    }
}

impl CpuBackendOpts {
    /// Return options with a different ambient term in `[0, 1]`.
    pub fn with_ambient(mut self, ambient: f32) -> Self {
        self.ambient = ambient.clamp(0.0, 1.0);
        self
    }

    /// Return options with a different shadow comparison bias.
    pub fn with_shadow_bias(mut self, bias: f32) -> Self {
        self.shadow_bias = bias.max(0.0);
        self
    }
}

/// Counters for tests and diagnostics.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CpuBackendStats {
    /// Calls to [`RenderBackend::resize_targets`].
    pub resizes: u64,
    /// Primitives drawn in main passes.
    pub main_draws: u64,
    /// Primitives drawn in shadow passes.
    pub shadow_draws: u64,
}

/// Per-pixel primary ray in world space.
#[derive(Clone, Copy)]
struct Ray {
    origin: Vec3,
    dir: Vec3,
}

struct MainPass {
    rays: Vec<Ray>,
    view_proj: Mat4,
    light: Vec3,
    biased: Option<Mat4>,
    cull: bool,
}

struct ShadowPass {
    rays: Vec<Ray>,
    transform: Mat4,
}

enum ActivePass {
    Shadow(ShadowPass),
    Main(MainPass),
}

/// Headless ray-cast backend drawing [`Primitive`]s.
///
/// Each draw intersects one primitive with a primary ray per pixel and depth-tests against the
/// G-buffer, the way a rasterizer would with one draw call per mesh.
pub struct CpuBackend {
    opts: CpuBackendOpts,
    desc: Option<TargetDesc>,
    gbuffer: GBuffer,
    shadow: DepthMap,
    pass: Option<ActivePass>,
    stats: CpuBackendStats,
}

impl CpuBackend {
    /// Backend with no targets; call [`RenderBackend::resize_targets`] before drawing.
    pub fn new(opts: CpuBackendOpts) -> Self {
        Self {
            opts,
            desc: None,
            gbuffer: GBuffer::new(0, 0, [0.0; 4]),
            shadow: DepthMap::new(0, ShadowMapFormat::Depth32F),
            pass: None,
            stats: CpuBackendStats::default(),
        }
    }

    /// Counters since construction.
    pub fn stats(&self) -> CpuBackendStats {
        self.stats
    }

    /// Current target shape.
    pub fn target_desc(&self) -> Option<TargetDesc> {
        self.desc
    }

    /// Draw one primitive into the active pass.
    pub fn draw_primitive(&mut self, id: u32, primitive: &Primitive) -> ProgressaResult<()> {
        match &self.pass {
            None => Err(ProgressaError::backend("draw issued outside of a pass")),
            Some(ActivePass::Shadow(pass)) => {
                let size = self.shadow.size as usize;
                let format = self.shadow.format;
                if size == 0 {
                    return Ok(());
                }
                self.shadow
                    .data
                    .par_chunks_mut(size)
                    .zip(pass.rays.par_chunks(size))
                    .for_each(|(row, rays)| {
                        for (texel, ray) in row.iter_mut().zip(rays) {
                            let Some(hit) = primitive.shape.intersect(ray.origin, ray.dir, false)
                            else {
                                continue;
                            };
                            let p = ray.origin + ray.dir * hit.t;
                            let d = window_depth_of(pass.transform, p);
                            let q = quantize_depth(format, d);
                            if q < *texel {
                                *texel = q;
                            }
                        }
                    });
                self.stats.shadow_draws += 1;
                Ok(())
            }
            Some(ActivePass::Main(pass)) => {
                let w = self.gbuffer.width as usize;
                if w == 0 {
                    return Ok(());
                }
                let shadow = &self.shadow;
                let opts = self.opts;
                let g = &mut self.gbuffer;
                g.color
                    .par_chunks_mut(w)
                    .zip(g.normal.par_chunks_mut(w))
                    .zip(g.depth.par_chunks_mut(w))
                    .zip(g.id.par_chunks_mut(w))
                    .zip(pass.rays.par_chunks(w))
                    .for_each(|((((color, normal), depth), ids), rays)| {
                        for (x, ray) in rays.iter().enumerate() {
                            let Some(hit) = primitive.shape.intersect(ray.origin, ray.dir, pass.cull)
                            else {
                                continue;
                            };
                            let p = ray.origin + ray.dir * hit.t;
                            let d = window_depth_of(pass.view_proj, p);
                            if !(0.0..1.0).contains(&d) || d >= depth[x] {
                                continue;
                            }
                            let n = if hit.front_face { hit.normal } else { -hit.normal };
                            depth[x] = d;
                            normal[x] = n;
                            ids[x] = id + 1;
                            color[x] = shade(primitive.albedo, p, n, pass, shadow, opts);
                        }
                    });
                self.stats.main_draws += 1;
                Ok(())
            }
        }
    }

    fn main_pass(&self, u: &UniformBlock) -> MainPass {
        let view = u.mat4(names::VIEW_MATRIX).unwrap_or(Mat4::IDENTITY);
        let projection = u.mat4(names::PROJECTION).unwrap_or(Mat4::IDENTITY);
        let shift = u.vec2(names::SUBPIXEL_SHIFT).unwrap_or(Vec2::ZERO);
        let shear = u.vec2(names::SHEARING_FACTOR).unwrap_or(Vec2::ZERO);
        let focal = u.float(names::FOCAL_PLANE).unwrap_or(0.0);
        let shadows = u.bool(names::SHADOWS_ENABLED).unwrap_or(false);

        let (w, h) = (self.gbuffer.width, self.gbuffer.height);
        let inv_proj = projection.inverse();
        let inv_view = view.inverse();
        let origin_v = (shear * focal).extend(0.0);
        let rays = pixel_grid(w, h)
            .map(|ndc| {
                let near = inv_proj.project_point3((ndc - shift * 2.0).extend(-1.0));
                let depth = (-near.z).max(f32::EPSILON);
                let dir_v = Vec3::new(near.x / depth - shear.x, near.y / depth - shear.y, -1.0);
                Ray {
                    origin: inv_view.transform_point3(origin_v),
                    dir: inv_view.transform_vector3(dir_v),
                }
            })
            .collect();

        MainPass {
            rays,
            view_proj: projection * view,
            light: u.vec3(names::LIGHT_SOURCE).unwrap_or(Vec3::Y * 5.0),
            biased: u.mat4(names::BIASED_DEPTH_TRANSFORM).filter(|_| shadows),
            cull: u.bool(names::BACK_FACE_CULLING).unwrap_or(false),
        }
    }

    fn shadow_pass(&self, u: &UniformBlock) -> ShadowPass {
        let transform = u.mat4(names::TRANSFORM).unwrap_or(Mat4::IDENTITY);
        let inv = transform.inverse();
        let s = self.shadow.size;
        let rays = pixel_grid(s, s)
            .map(|ndc| {
                let near = inv.project_point3(ndc.extend(-1.0));
                let far = inv.project_point3(ndc.extend(1.0));
                Ray {
                    origin: near,
                    dir: far - near,
                }
            })
            .collect();
        ShadowPass { rays, transform }
    }
}

impl Default for CpuBackend {
    fn default() -> Self {
        Self::new(CpuBackendOpts::default())
    }
}

impl RenderBackend for CpuBackend {
    #[tracing::instrument(level = "debug", skip(self))]
    fn resize_targets(&mut self, desc: &TargetDesc) -> ProgressaResult<()> {
        if self.pass.is_some() {
            return Err(ProgressaError::backend("cannot resize targets inside a pass"));
        }
        self.gbuffer = GBuffer::new(desc.width, desc.height, [0.0; 4]);
        self.shadow = DepthMap::new(desc.shadow_map_size, desc.shadow_map_format);
        self.desc = Some(*desc);
        self.stats.resizes += 1;
        Ok(())
    }

    fn target_status(&self) -> TargetStatus {
        match self.desc {
            None => TargetStatus::Incomplete("targets were never allocated".into()),
            Some(d) if d.width == 0 || d.height == 0 => {
                TargetStatus::Incomplete(format!("zero-sized color target {}x{}", d.width, d.height))
            }
            Some(d) if d.shadow_map_size == 0 => {
                TargetStatus::Incomplete("zero-sized shadow map".into())
            }
            Some(_) => TargetStatus::Complete,
        }
    }

    fn begin_pass(&mut self, pass: PassKind, uniforms: &UniformBlock) -> ProgressaResult<()> {
        if self.pass.is_some() {
            return Err(ProgressaError::backend(format!(
                "{pass:?} pass started while another pass is active"
            )));
        }
        if let TargetStatus::Incomplete(reason) = self.target_status() {
            return Err(ProgressaError::incomplete_target(format!("{pass:?} pass: {reason}")));
        }
        let active = match pass {
            PassKind::Shadow => {
                self.shadow.clear();
                ActivePass::Shadow(self.shadow_pass(uniforms))
            }
            PassKind::Main => {
                let clear = uniforms
                    .vec4(names::CLEAR_COLOR)
                    .map(|c| c.to_array())
                    .unwrap_or([0.0, 0.0, 0.0, 1.0]);
                self.gbuffer.clear(clear);
                ActivePass::Main(self.main_pass(uniforms))
            }
        };
        self.pass = Some(active);
        Ok(())
    }

    fn end_pass(&mut self, pass: PassKind) -> ProgressaResult<()> {
        let matches = matches!(
            (&self.pass, pass),
            (Some(ActivePass::Shadow(_)), PassKind::Shadow) | (Some(ActivePass::Main(_)), PassKind::Main)
        );
        if !matches {
            return Err(ProgressaError::backend(format!(
                "end of {pass:?} pass does not match the active pass"
            )));
        }
        self.pass = None;
        if pass == PassKind::Main
            && self.desc.map(|d| d.color_format) == Some(ColorFormat::Rgba8Unorm)
        {
            self.gbuffer
                .color
                .par_iter_mut()
                .for_each(|px| *px = px.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() / 255.0));
        }
        Ok(())
    }

    fn gbuffer(&self) -> &GBuffer {
        &self.gbuffer
    }

    fn shadow_map(&self) -> &DepthMap {
        &self.shadow
    }
}

impl Drawable<CpuBackend> for Primitive {
    fn draw(&self, id: u32, backend: &mut CpuBackend) -> ProgressaResult<()> {
        backend.draw_primitive(id, self)
    }

    fn transparent(&self) -> bool {
        self.transparent
    }
}

/// NDC of every pixel center, bottom row first.
fn pixel_grid(w: u32, h: u32) -> impl Iterator<Item = Vec2> {
    let size = Vec2::new(w.max(1) as f32, h.max(1) as f32);
    (0..h).flat_map(move |y| {
        (0..w).map(move |x| (Vec2::new(x as f32, y as f32) + 0.5) / size * 2.0 - 1.0)
    })
}

fn window_depth_of(view_proj: Mat4, p: Vec3) -> f32 {
    let clip = view_proj * p.extend(1.0);
    if clip.w <= 0.0 {
        return f32::INFINITY;
    }
    clip.z / clip.w * 0.5 + 0.5
}

fn shade(
    albedo: Rgba,
    p: Vec3,
    n: Vec3,
    pass: &MainPass,
    shadow: &DepthMap,
    opts: CpuBackendOpts,
) -> Rgba {
    let l = (pass.light - p).normalize_or_zero();
    let mut diffuse = n.dot(l).max(0.0);
    if diffuse > 0.0
        && let Some(biased) = pass.biased
    {
        let uvz = biased.project_point3(p);
        if uvz.z - opts.shadow_bias > shadow.sample(uvz.truncate()) {
            diffuse = 0.0;
        }
    }
    let k = opts.ambient + (1.0 - opts.ambient) * diffuse;
    [albedo[0] * k, albedo[1] * k, albedo[2] * k, albedo[3]]
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
