use glam::{Mat4, Vec3};

use crate::foundation::core::Projection;
use crate::foundation::error::ProgressaResult;
use crate::foundation::math::NDC_TO_TEXTURE;
use crate::host::backend::{Drawable, PassKind, RenderBackend};
use crate::host::uniforms::{UniformBlock, names};
use crate::settings::LightSettings;

/// Light transforms produced by one shadow pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShadowTransforms {
    /// Shifted light eye.
    pub eye: Vec3,
    /// Shifted light focus.
    pub focus: Vec3,
    /// World to light clip space.
    pub transform: Mat4,
    /// World to shadow-map texture space (`[0, 1]^3`).
    pub biased: Mat4,
}

/// Builds the light frustum and renders the shadow map.
#[derive(Clone, Copy, Debug, Default)]
pub struct ShadowStage;

impl ShadowStage {
    /// Light transforms for a light moved by `light_shift`.
    ///
    /// The frustum reuses the camera's field of view and clip planes with a square aspect.
    pub fn prepare(light: &LightSettings, light_shift: Vec3, projection: &Projection) -> ShadowTransforms {
        let eye = light.position + light_shift;
        let focus = light.focus + light_shift;
        let up = light_up(eye, focus);
        let transform = Mat4::perspective_rh_gl(projection.fovy, 1.0, projection.near, projection.far)
            * Mat4::look_at_rh(eye, focus, up);
        ShadowTransforms {
            eye,
            focus,
            transform,
            biased: NDC_TO_TEXTURE * transform,
        }
    }

    /// Prepare the transforms, draw every drawable into the shadow map and return the transforms.
    pub fn render<B, D>(
        light: &LightSettings,
        light_shift: Vec3,
        projection: &Projection,
        backend: &mut B,
        drawables: &[D],
        visible: impl Fn(usize) -> bool,
    ) -> ProgressaResult<ShadowTransforms>
    where
        B: RenderBackend + ?Sized,
        D: Drawable<B>,
    {
        let transforms = Self::prepare(light, light_shift, projection);
        let mut uniforms = UniformBlock::new();
        uniforms
            .set(names::TRANSFORM, transforms.transform)
            .set(names::NEAR_Z, projection.near)
            .set(names::FAR_Z, projection.far);

        backend.begin_pass(PassKind::Shadow, &uniforms)?;
        let drawn = drawables
            .iter()
            .enumerate()
            .filter(|(i, _)| visible(*i))
            .try_for_each(|(i, d)| d.draw(i as u32, backend));
        backend.end_pass(PassKind::Shadow)?;
        drawn.map(|()| transforms)
    }
}

/// `cross(-eye, (-1, 1, 0))`, or any vector perpendicular to the light direction when that is
/// degenerate.
fn light_up(eye: Vec3, focus: Vec3) -> Vec3 {
    let dir = (focus - eye).try_normalize().unwrap_or(Vec3::NEG_Z);
    let up = (-eye).cross(Vec3::new(-1.0, 1.0, 0.0));
    match up.try_normalize() {
        Some(u) if u.cross(dir).length_squared() > 1e-6 => u,
        _ => dir.any_orthonormal_vector(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/shadow/stage.rs"]
mod tests;
