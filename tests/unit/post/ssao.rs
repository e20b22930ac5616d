use super::*;
use crate::foundation::math::window_depth;
use rand::{SeedableRng, rngs::StdRng};

const NEAR: f32 = 0.3;
const FAR: f32 = 30.0;

fn projection() -> Mat4 {
    Mat4::perspective_rh_gl(50f32.to_radians(), 1.0, NEAR, FAR)
}

fn wall(size: u32, distance: f32) -> GBuffer {
    let mut g = GBuffer::new(size, size, [1.0; 4]);
    g.depth.fill(window_depth(distance, NEAR, FAR));
    g.normal.fill(Vec3::Z);
    g.id.fill(1);
    g
}

fn settings(radius: f32) -> SsaoSettings {
    SsaoSettings {
        enabled: true,
        radius,
        intensity: 1.0,
        noise: false,
    }
}

#[test]
fn regenerate_builds_expected_sizes() {
    let mut rng = StdRng::seed_from_u64(9);
    let s = SsaoSamples::regenerate(false, &mut rng);
    assert_eq!(s.kernel().len(), SSAO_KERNEL_SIZE);
    assert_eq!(s.noise_at(0, 0), Vec3::X);
    assert_eq!(s.noise_at(40, 70), Vec3::X);
    let noisy = SsaoSamples::regenerate(true, &mut rng);
    assert!((noisy.noise_at(33, 1).length() - 1.0).abs() < 1e-5);
    assert_eq!(noisy.noise_at(33, 1), noisy.noise_at(1, 1));
}

#[test]
fn flat_wall_is_unoccluded() {
    let g = wall(16, 4.0);
    let mut rng = StdRng::seed_from_u64(1);
    let samples = SsaoSamples::regenerate(true, &mut rng);
    let occ = occlusion_map(&g, Mat4::IDENTITY, projection(), &samples, &settings(0.5));
    assert!(occ.iter().all(|&o| (o - 1.0).abs() < 1e-6));
}

#[test]
fn pit_is_occluded_by_its_rim() {
    let mut g = wall(16, 4.0);
    let center = 8 * 16 + 8;
    g.depth[center] = window_depth(4.5, NEAR, FAR);
    let samples = SsaoSamples {
        kernel: vec![Vec3::new(0.5, 0.0, 0.1)],
        noise: vec![Vec3::X; SSAO_NOISE_SIZE * SSAO_NOISE_SIZE],
    };
    let occ = occlusion_map(&g, Mat4::IDENTITY, projection(), &samples, &settings(1.0));
    assert!(occ[center] < 0.01, "center {}", occ[center]);
    assert_eq!(occ[0], 1.0);
}

#[test]
fn background_is_skipped() {
    let g = GBuffer::new(4, 4, [0.0; 4]);
    let mut rng = StdRng::seed_from_u64(2);
    let samples = SsaoSamples::regenerate(true, &mut rng);
    let occ = occlusion_map(&g, Mat4::IDENTITY, projection(), &samples, &settings(0.5));
    assert!(occ.iter().all(|&o| o == 1.0));
}

#[test]
fn apply_scales_rgb_only() {
    let mut img = ImageF32::new(2, 1, [0.8, 0.6, 0.4, 1.0]);
    apply_occlusion(&mut img, &[0.5, 1.0]);
    assert_eq!(img.data[0], [0.4, 0.3, 0.2, 1.0]);
    assert_eq!(img.data[1], [0.8, 0.6, 0.4, 1.0]);
}
