use glam::{Mat3, Mat4, Vec2, Vec3, Vec4};

use crate::foundation::core::Viewport;

/// Maps NDC `[-1, 1]^3` to texture space `[0, 1]^3`.
pub(crate) const NDC_TO_TEXTURE: Mat4 = Mat4::from_cols(
    Vec4::new(0.5, 0.0, 0.0, 0.0),
    Vec4::new(0.0, 0.5, 0.0, 0.0),
    Vec4::new(0.0, 0.0, 0.5, 0.0),
    Vec4::new(0.5, 0.5, 0.5, 1.0),
);

/// Minimal rotation taking `+Z` onto `dir`.
///
/// Axis is `cross(+Z, dir)` and the angle is measured with `atan2` so directions past 90 degrees
/// keep their sign. Parallel directions yield identity, antiparallel ones a half turn about `+X`.
pub(crate) fn rotation_from_z(dir: Vec3) -> Mat3 {
    let Some(dir) = dir.try_normalize() else {
        return Mat3::IDENTITY;
    };
    let axis = Vec3::Z.cross(dir);
    let sin = axis.length();
    let cos = Vec3::Z.dot(dir);
    if sin <= f32::EPSILON {
        return if cos >= 0.0 {
            Mat3::IDENTITY
        } else {
            Mat3::from_axis_angle(Vec3::X, std::f32::consts::PI)
        };
    }
    Mat3::from_axis_angle(axis / sin, sin.atan2(cos))
}

/// View-space distance for a GL window depth in `[0, 1]`.
pub(crate) fn linearize_depth(window_depth: f32, near: f32, far: f32) -> f32 {
    let ndc = window_depth * 2.0 - 1.0;
    (2.0 * near * far) / (far + near - ndc * (far - near))
}

/// GL window depth in `[0, 1]` for a view-space distance.
pub(crate) fn window_depth(distance: f32, near: f32, far: f32) -> f32 {
    let ndc = (far + near) / (far - near) - (2.0 * far * near) / ((far - near) * distance);
    ndc * 0.5 + 0.5
}

/// Window coordinates (pixels, bottom-left origin) plus window depth back to world space.
pub(crate) fn unproject(window: Vec2, depth: f32, inv_view_proj: Mat4, viewport: Viewport) -> Vec3 {
    let size = viewport.size().max(Vec2::ONE);
    let ndc = Vec3::new(
        (window.x - viewport.x as f32) / size.x * 2.0 - 1.0,
        (window.y - viewport.y as f32) / size.y * 2.0 - 1.0,
        depth * 2.0 - 1.0,
    );
    inv_view_proj.project_point3(ndc)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
