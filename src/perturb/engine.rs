use glam::{Mat3, Mat4, Vec2, Vec3};
use rand::Rng;

use crate::foundation::core::{Camera, Viewport};
use crate::foundation::math::rotation_from_z;
use crate::perturb::kernels::KernelSet;
use crate::settings::{DofMode, RenderSettings, SamplingMode};

/// Camera-side state for the frame being perturbed.
#[derive(Clone, Copy, Debug)]
pub struct FrameInput {
    /// Unjittered host camera.
    pub camera: Camera,
    /// Current viewport.
    pub viewport: Viewport,
    /// Whether the invalidation tracker saw a camera change this paint.
    pub camera_changed: bool,
    /// Running sample index.
    pub sample: u64,
}

/// Lens perturbation for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DofShift {
    /// World-space eye offset; the camera is re-aimed at the focal point.
    Eye(Vec3),
    /// Frustum shear around the focal plane.
    Shear(Vec2),
}

/// Everything the frame's passes need to jitter their inputs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PerturbationVector {
    /// Jitter as a fraction of the viewport (pixels / viewport size).
    pub subpixel_shift: Vec2,
    /// Lens jitter.
    pub dof: DofShift,
    /// `eye + normalize(center - eye) * focal_depth` for the unjittered camera.
    pub focal_point: Vec3,
    /// World-space offset added to both light eye and light focus.
    pub light_shift: Vec3,
}

impl PerturbationVector {
    /// No jitter at all, focusing `focal_depth` ahead of `camera`.
    pub fn identity(camera: &Camera, focal_depth: f32) -> Self {
        Self {
            subpixel_shift: Vec2::ZERO,
            dof: DofShift::Eye(Vec3::ZERO),
            focal_point: camera.eye + camera.direction() * focal_depth,
            light_shift: Vec3::ZERO,
        }
    }

    /// Camera used for rasterization: eye shifted for point DoF, aimed at the focal point.
    pub fn jittered_camera(&self, camera: &Camera) -> Camera {
        let eye = match self.dof {
            DofShift::Eye(offset) => camera.eye + offset,
            DofShift::Shear(_) => camera.eye,
        };
        if (self.focal_point - eye).length_squared() <= f32::EPSILON {
            return Camera::new(eye, eye + camera.direction(), camera.up);
        }
        Camera::new(eye, self.focal_point, camera.up)
    }

    /// Shear factor, zero for point DoF.
    pub fn shear(&self) -> Vec2 {
        match self.dof {
            DofShift::Shear(s) => s,
            DofShift::Eye(_) => Vec2::ZERO,
        }
    }

    /// `projection` with the subpixel jitter folded in as a clip-space translation.
    pub fn jittered_projection(&self, projection: Mat4) -> Mat4 {
        let offset = self.subpixel_shift * 2.0;
        Mat4::from_translation(offset.extend(0.0)) * projection
    }
}

/// Compute the perturbation for `input.sample`.
///
/// Kernel lookups use `sample mod len`, so sample 0 is always jitter-free in kernel mode. Point DoF
/// is suppressed on frames where the camera changed.
pub fn compute_perturbation(
    input: &FrameInput,
    kernels: &KernelSet,
    settings: &RenderSettings,
    rng: &mut impl Rng,
) -> PerturbationVector {
    let random = settings.sampling() == SamplingMode::Random;
    let sample = input.sample;

    let aa = if random {
        Vec2::new(rng.gen_range(-0.5..0.5), rng.gen_range(-0.5..0.5))
    } else {
        kernels.aa().offset(sample)
    };
    let subpixel_shift = if input.viewport.is_degenerate() {
        Vec2::ZERO
    } else {
        aa * settings.max_subpixel_shift() / input.viewport.size()
    };

    let camera = input.camera;
    let focal_point = camera.eye + camera.direction() * settings.focal_depth();

    let lens_unit = if random {
        disc_rand(rng)
    } else {
        kernels.dof().offset(sample)
    };
    let lens = lens_unit * settings.max_dof_shift();
    let dof = match settings.dof_mode() {
        DofMode::Point if input.camera_changed => DofShift::Eye(Vec3::ZERO),
        DofMode::Point => {
            let view_to_world = Mat3::from_mat4(camera.view()).transpose();
            DofShift::Eye(view_to_world * lens.extend(0.0))
        }
        DofMode::Plane => DofShift::Shear(lens),
    };

    let light = settings.light();
    let disc = if random {
        disc_rand(rng)
    } else {
        kernels.light().offset(sample)
    };
    let light_shift =
        rotation_from_z(light.focus - light.position) * (disc * light.max_shift).extend(0.0);

    PerturbationVector {
        subpixel_shift,
        dof,
        focal_point,
        light_shift,
    }
}

/// Uniform point in the unit disc.
fn disc_rand(rng: &mut impl Rng) -> Vec2 {
    let r = rng.gen_range(0.0f32..1.0).sqrt();
    let phi = rng.gen_range(0.0..std::f32::consts::TAU);
    Vec2::from_angle(phi) * r
}

#[cfg(test)]
#[path = "../../tests/unit/perturb/engine.rs"]
mod tests;
