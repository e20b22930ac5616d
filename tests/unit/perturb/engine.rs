use super::*;
use crate::kernel::{KernelDomain, SampleKernel, SortPolicy, generate};
use rand::{SeedableRng, rngs::StdRng};

fn input(sample: u64, camera_changed: bool) -> FrameInput {
    FrameInput {
        camera: Camera::new(Vec3::new(0.0, 1.0, 5.0), Vec3::ZERO, Vec3::Y),
        viewport: Viewport::sized(200, 100),
        camera_changed,
        sample,
    }
}

fn rng() -> StdRng {
    StdRng::seed_from_u64(7)
}

#[test]
fn sample_zero_is_jitter_free() {
    let s = RenderSettings::default();
    let k = KernelSet::from_settings(&s);
    let p = compute_perturbation(&input(0, false), &k, &s, &mut rng());
    assert_eq!(p.subpixel_shift, Vec2::ZERO);
    assert_eq!(p.dof, DofShift::Shear(Vec2::ZERO));
    assert_eq!(p.light_shift, Vec3::ZERO);
}

#[test]
fn subpixel_shift_is_normalized_by_viewport() {
    let mut s = RenderSettings::default();
    s.set_max_subpixel_shift(2.0);
    let mut k = KernelSet::from_settings(&s);
    k.set_aa(generate(16, KernelDomain::Square, SortPolicy::RadiusAscending));
    for i in 0..16u64 {
        let p = compute_perturbation(&input(i, false), &k, &s, &mut rng());
        let expected = (k.aa().sample(i) - Vec2::splat(0.5)) * 2.0 / Vec2::new(200.0, 100.0);
        assert!((p.subpixel_shift - expected).length() < 1e-7);
        assert!(p.subpixel_shift.x.abs() <= 1.0 / 200.0 + 1e-7);
        assert!(p.subpixel_shift.y.abs() <= 1.0 / 100.0 + 1e-7);
    }
}

#[test]
fn focal_point_tracks_live_camera() {
    let s = RenderSettings::default();
    let k = KernelSet::from_settings(&s);
    let inp = input(3, false);
    let p = compute_perturbation(&inp, &k, &s, &mut rng());
    let expected = inp.camera.eye + inp.camera.direction() * s.focal_depth();
    assert!((p.focal_point - expected).length() < 1e-6);
}

#[test]
fn point_dof_moves_eye_perpendicular_to_view() {
    let mut s = RenderSettings::default();
    s.set_dof_mode(DofMode::Point);
    s.set_max_dof_shift(0.2);
    let k = KernelSet::from_settings(&s);
    let inp = input(5, false);
    let p = compute_perturbation(&inp, &k, &s, &mut rng());
    let DofShift::Eye(offset) = p.dof else {
        panic!("expected eye shift");
    };
    let expected_len = k.dof().offset(5).length() * 0.2;
    assert!((offset.length() - expected_len).abs() < 1e-5);
    assert!(offset.dot(inp.camera.direction()).abs() < 1e-5);

    let cam = p.jittered_camera(&inp.camera);
    assert_eq!(cam.center, p.focal_point);
    assert!((cam.eye - (inp.camera.eye + offset)).length() < 1e-6);
}

#[test]
fn point_dof_is_suppressed_on_camera_change() {
    let mut s = RenderSettings::default();
    s.set_dof_mode(DofMode::Point);
    s.set_max_dof_shift(0.5);
    let k = KernelSet::from_settings(&s);
    let p = compute_perturbation(&input(5, true), &k, &s, &mut rng());
    assert_eq!(p.dof, DofShift::Eye(Vec3::ZERO));
}

#[test]
fn plane_dof_survives_camera_change() {
    let mut s = RenderSettings::default();
    s.set_max_dof_shift(0.5);
    let k = KernelSet::from_settings(&s);
    let p = compute_perturbation(&input(5, true), &k, &s, &mut rng());
    assert_eq!(p.shear(), k.dof().offset(5) * 0.5);
    assert_eq!(p.jittered_camera(&input(5, true).camera).eye, Vec3::new(0.0, 1.0, 5.0));
}

#[test]
fn light_shift_lies_in_plane_facing_light() {
    let mut s = RenderSettings::default();
    s.set_light_position(Vec3::new(3.0, 4.0, 1.0));
    s.set_light_focus(Vec3::ZERO);
    s.set_max_light_shift(0.3);
    let k = KernelSet::from_settings(&s);
    let dir = (Vec3::ZERO - Vec3::new(3.0, 4.0, 1.0)).normalize();
    for i in 1..20u64 {
        let p = compute_perturbation(&input(i, false), &k, &s, &mut rng());
        assert!(p.light_shift.dot(dir).abs() < 1e-5);
        assert!((p.light_shift.length() - k.light().offset(i).length() * 0.3).abs() < 1e-5);
    }
}

#[test]
fn empty_kernel_means_no_jitter() {
    let s = RenderSettings::default();
    let mut k = KernelSet::from_settings(&s);
    k.set_aa(SampleKernel::zero(KernelDomain::Square));
    k.set_dof(SampleKernel::zero(KernelDomain::UNIT_DISC));
    k.set_light(SampleKernel::zero(KernelDomain::UNIT_DISC));
    for i in 0..5u64 {
        let p = compute_perturbation(&input(i, false), &k, &s, &mut rng());
        assert_eq!(p.subpixel_shift, Vec2::ZERO);
        assert_eq!(p.shear(), Vec2::ZERO);
        assert_eq!(p.light_shift, Vec3::ZERO);
    }
}

#[test]
fn random_mode_stays_within_bounds() {
    let mut s = RenderSettings::default();
    s.set_sampling(SamplingMode::Random);
    s.set_max_dof_shift(0.1);
    let k = KernelSet::from_settings(&s);
    let mut r = rng();
    for i in 0..100u64 {
        let p = compute_perturbation(&input(i, false), &k, &s, &mut r);
        assert!(p.subpixel_shift.x.abs() <= 0.5 / 200.0);
        assert!(p.shear().length() <= 0.1 + 1e-6);
        assert!(p.light_shift.length() <= s.light().max_shift + 1e-6);
    }
}

#[test]
fn jittered_projection_translates_clip_space() {
    let mut p = PerturbationVector::identity(&input(0, false).camera, 3.0);
    p.subpixel_shift = Vec2::new(0.01, -0.02);
    let proj = Mat4::perspective_rh_gl(1.0, 1.0, 0.3, 30.0);
    let point = Vec3::new(0.2, 0.1, -4.0);
    let a = proj.project_point3(point);
    let b = p.jittered_projection(proj).project_point3(point);
    assert!((b.x - a.x - 0.02).abs() < 1e-5);
    assert!((b.y - a.y + 0.04).abs() < 1e-5);
    assert!((b.z - a.z).abs() < 1e-6);
}
