use super::*;
use crate::foundation::error::ProgressaError;
use crate::host::TargetDesc;
use crate::render::CpuBackend;
use crate::settings::{ColorFormat, ShadowMapFormat};

fn light() -> LightSettings {
    LightSettings {
        position: Vec3::new(0.0, 5.0, 0.0),
        focus: Vec3::ZERO,
        max_shift: 0.1,
    }
}

#[test]
fn focus_projects_to_texture_center() {
    let t = ShadowStage::prepare(&light(), Vec3::ZERO, &Projection::default());
    let uv = t.biased.project_point3(Vec3::ZERO);
    assert!((uv.x - 0.5).abs() < 1e-5);
    assert!((uv.y - 0.5).abs() < 1e-5);
    assert!(uv.z > 0.0 && uv.z < 1.0);
}

#[test]
fn shift_translates_eye_and_focus_equally() {
    let shift = Vec3::new(0.05, 0.0, -0.02);
    let t = ShadowStage::prepare(&light(), shift, &Projection::default());
    assert_eq!(t.eye, Vec3::new(0.0, 5.0, 0.0) + shift);
    assert_eq!(t.focus, shift);
    let uv = t.biased.project_point3(shift);
    assert!((uv.x - 0.5).abs() < 1e-5 && (uv.y - 0.5).abs() < 1e-5);
}

#[test]
fn nearer_points_have_smaller_depth() {
    let t = ShadowStage::prepare(&light(), Vec3::ZERO, &Projection::default());
    let near = t.biased.project_point3(Vec3::new(0.0, 2.0, 0.0)).z;
    let far = t.biased.project_point3(Vec3::new(0.0, -1.0, 0.0)).z;
    assert!(near < far);
}

#[test]
fn degenerate_up_falls_back() {
    let l = LightSettings {
        position: Vec3::new(-1.0, 1.0, 0.0),
        focus: Vec3::ZERO,
        max_shift: 0.0,
    };
    let t = ShadowStage::prepare(&l, Vec3::ZERO, &Projection::default());
    assert!(t.transform.is_finite());
}

struct Broken;

impl Drawable<CpuBackend> for Broken {
    fn draw(&self, _id: u32, _backend: &mut CpuBackend) -> ProgressaResult<()> {
        Err(ProgressaError::backend("draw failed"))
    }
}

#[test]
fn failed_draw_still_closes_the_shadow_pass() {
    let mut b = CpuBackend::default();
    b.resize_targets(&TargetDesc {
        width: 4,
        height: 4,
        color_format: ColorFormat::Rgba32F,
        shadow_map_size: 16,
        shadow_map_format: ShadowMapFormat::Depth32F,
    })
    .unwrap();

    let err = ShadowStage::render(&light(), Vec3::ZERO, &Projection::default(), &mut b, &[Broken], |_| true)
        .unwrap_err();
    assert!(matches!(err, ProgressaError::Backend(_)));

    ShadowStage::render(&light(), Vec3::ZERO, &Projection::default(), &mut b, &[] as &[Broken], |_| true)
        .unwrap();
    assert_eq!(b.stats().shadow_draws, 0);
}
