use super::*;
use glam::Vec4;
use crate::foundation::core::{Camera, Projection};
use crate::settings::LightSettings;
use crate::shadow::ShadowStage;

const CLEAR: [f32; 4] = [0.1, 0.2, 0.3, 1.0];

fn desc(size: u32, color_format: ColorFormat) -> TargetDesc {
    TargetDesc {
        width: size,
        height: size,
        color_format,
        shadow_map_size: 64,
        shadow_map_format: ShadowMapFormat::Depth32F,
    }
}

fn backend(size: u32) -> CpuBackend {
    let mut b = CpuBackend::default();
    b.resize_targets(&desc(size, ColorFormat::Rgba32F)).unwrap();
    b
}

fn main_uniforms(camera: &Camera) -> UniformBlock {
    let mut u = UniformBlock::new();
    u.set(names::VIEW_MATRIX, camera.view())
        .set(names::PROJECTION, Projection::default().matrix(1.0))
        .set(names::CLEAR_COLOR, Vec4::from_array(CLEAR))
        .set(names::LIGHT_SOURCE, camera.eye);
    u
}

fn front_camera() -> Camera {
    Camera::new(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::Y)
}

fn draw_main(b: &mut CpuBackend, u: &UniformBlock, prims: &[Primitive]) {
    b.begin_pass(PassKind::Main, u).unwrap();
    for (i, p) in prims.iter().enumerate() {
        p.draw(i as u32, b).unwrap();
    }
    b.end_pass(PassKind::Main).unwrap();
}

fn center(b: &CpuBackend) -> usize {
    let g = b.gbuffer();
    g.index(g.width / 2, g.height / 2).unwrap()
}

#[test]
fn targets_incomplete_until_allocated() {
    let mut b = CpuBackend::default();
    assert!(matches!(b.target_status(), TargetStatus::Incomplete(_)));
    b.resize_targets(&desc(0, ColorFormat::Rgba32F)).unwrap();
    assert!(matches!(b.target_status(), TargetStatus::Incomplete(_)));
    b.resize_targets(&desc(4, ColorFormat::Rgba32F)).unwrap();
    assert_eq!(b.target_status(), TargetStatus::Complete);
    assert_eq!(b.stats().resizes, 2);
    assert_eq!(b.gbuffer().color.len(), 16);
    assert_eq!(b.shadow_map().data.len(), 64 * 64);
}

#[test]
fn passes_refuse_incomplete_targets() {
    let mut b = CpuBackend::default();
    let u = main_uniforms(&front_camera());
    assert!(matches!(
        b.begin_pass(PassKind::Main, &u),
        Err(ProgressaError::IncompleteTarget(_))
    ));
    b.resize_targets(&desc(0, ColorFormat::Rgba32F)).unwrap();
    assert!(matches!(
        b.begin_pass(PassKind::Shadow, &u),
        Err(ProgressaError::IncompleteTarget(_))
    ));
    b.resize_targets(&desc(4, ColorFormat::Rgba32F)).unwrap();
    b.begin_pass(PassKind::Main, &u).unwrap();
    b.end_pass(PassKind::Main).unwrap();
}

#[test]
fn draw_outside_pass_is_an_error() {
    let mut b = backend(4);
    let p = Primitive::sphere(Vec3::ZERO, 1.0, [1.0; 4]);
    assert!(matches!(p.draw(0, &mut b), Err(ProgressaError::Backend(_))));
}

#[test]
fn pass_nesting_and_mismatch_are_errors() {
    let mut b = backend(4);
    let u = main_uniforms(&front_camera());
    assert!(b.end_pass(PassKind::Main).is_err());
    b.begin_pass(PassKind::Main, &u).unwrap();
    assert!(b.begin_pass(PassKind::Shadow, &u).is_err());
    assert!(b.end_pass(PassKind::Shadow).is_err());
    assert!(b.resize_targets(&desc(8, ColorFormat::Rgba32F)).is_err());
    b.end_pass(PassKind::Main).unwrap();
}

#[test]
fn sphere_covers_center_and_leaves_corner_clear() {
    let mut b = backend(9);
    let prims = [Primitive::sphere(Vec3::ZERO, 1.0, [1.0, 0.0, 0.0, 1.0])];
    draw_main(&mut b, &main_uniforms(&front_camera()), &prims);

    let g = b.gbuffer();
    let c = center(&b);
    assert_eq!(g.id[c], 1);
    assert!(g.depth[c] > 0.0 && g.depth[c] < 1.0);
    assert!((g.normal[c] - Vec3::Z).length() < 1e-3);
    assert!(g.color[c][0] > 0.9);

    let corner = g.index(0, 0).unwrap();
    assert_eq!(g.id[corner], 0);
    assert_eq!(g.depth[corner], 1.0);
    assert_eq!(g.color[corner], CLEAR);
    assert_eq!(b.stats().main_draws, 1);
}

#[test]
fn nearer_primitive_wins_in_any_order() {
    let near = Primitive::sphere(Vec3::new(0.0, 0.0, 1.0), 0.5, [0.0, 1.0, 0.0, 1.0]);
    let far = Primitive::sphere(Vec3::ZERO, 1.0, [1.0, 0.0, 0.0, 1.0]);
    for prims in [[near, far], [far, near]] {
        let mut b = backend(9);
        draw_main(&mut b, &main_uniforms(&front_camera()), &prims);
        let c = center(&b);
        let expected = if prims[0] == near { 1 } else { 2 };
        assert_eq!(b.gbuffer().id[c], expected);
        assert!(b.gbuffer().color[c][1] > 0.9);
    }
}

#[test]
fn back_face_culling_drops_quads_facing_away() {
    let away = [Primitive::quad(Vec3::ZERO, Vec3::NEG_Z, 2.0, [1.0; 4])];
    let camera = front_camera();

    let mut b = backend(9);
    draw_main(&mut b, &main_uniforms(&camera), &away);
    assert_eq!(b.gbuffer().id[center(&b)], 1);
    assert!((b.gbuffer().normal[center(&b)] - Vec3::Z).length() < 1e-5);

    let mut u = main_uniforms(&camera);
    u.set(names::BACK_FACE_CULLING, true);
    draw_main(&mut b, &u, &away);
    assert_eq!(b.gbuffer().id[center(&b)], 0);
}

#[test]
fn plane_shear_keeps_focal_plane_in_place() {
    let prims = [Primitive::sphere(Vec3::ZERO, 1.0, [1.0; 4])];
    let camera = front_camera();

    let mut b = backend(9);
    draw_main(&mut b, &main_uniforms(&camera), &prims);
    let sharp = b.gbuffer().depth[center(&b)];

    let mut u = main_uniforms(&camera);
    u.set(names::SHEARING_FACTOR, Vec2::new(0.1, 0.0))
        .set(names::FOCAL_PLANE, 4.0f32);
    draw_main(&mut b, &u, &prims);
    let sheared = b.gbuffer().depth[center(&b)];
    assert!((sharp - sheared).abs() < 1e-4, "{sharp} vs {sheared}");
}

#[test]
fn occluded_floor_is_shadowed_only_when_enabled() {
    let prims = [
        Primitive::quad(Vec3::ZERO, Vec3::Y, 3.0, [1.0; 4]),
        Primitive::sphere(Vec3::new(0.0, 1.0, 0.0), 0.5, [1.0; 4]),
    ];
    let light = LightSettings {
        position: Vec3::new(0.0, 5.0, 0.0),
        focus: Vec3::ZERO,
        max_shift: 0.0,
    };
    let camera = Camera::new(Vec3::new(0.0, 4.0, 4.0), Vec3::ZERO, Vec3::Y);
    let projection = Projection::default();

    let mut b = backend(9);
    let t = ShadowStage::render(&light, Vec3::ZERO, &projection, &mut b, &prims, |_| true).unwrap();
    assert_eq!(b.stats().shadow_draws, 2);
    assert!(b.shadow_map().data.iter().any(|&d| d < 1.0));

    let mut u = main_uniforms(&camera);
    u.set(names::LIGHT_SOURCE, t.eye)
        .set(names::BIASED_DEPTH_TRANSFORM, t.biased);

    draw_main(&mut b, &u, &prims);
    let c = center(&b);
    assert_eq!(b.gbuffer().id[c], 1);
    let lit = b.gbuffer().color[c][0];

    u.set(names::SHADOWS_ENABLED, true);
    draw_main(&mut b, &u, &prims);
    let shadowed = b.gbuffer().color[c][0];

    assert!((lit - 1.0).abs() < 1e-3, "lit = {lit}");
    assert!((shadowed - CpuBackendOpts::default().ambient).abs() < 1e-3, "shadowed = {shadowed}");
}

#[test]
fn rgba8_targets_quantize_color() {
    let mut b = CpuBackend::new(CpuBackendOpts::default().with_ambient(0.37));
    b.resize_targets(&desc(9, ColorFormat::Rgba8Unorm)).unwrap();
    let prims = [Primitive::sphere(Vec3::ZERO, 1.0, [0.3, 0.6, 0.9, 1.0])];
    let mut u = main_uniforms(&front_camera());
    u.set(names::LIGHT_SOURCE, Vec3::new(3.0, 2.0, 1.0));
    draw_main(&mut b, &u, &prims);
    for px in &b.gbuffer().color {
        for c in px {
            assert!(((c * 255.0) - (c * 255.0).round()).abs() < 1e-3);
        }
    }
}

#[test]
fn primitive_reports_transparency_flag() {
    let p = Primitive::sphere(Vec3::ZERO, 1.0, [1.0; 4]);
    assert!(!Drawable::<CpuBackend>::transparent(&p));
    assert!(Drawable::<CpuBackend>::transparent(&p.with_transparency()));
}
