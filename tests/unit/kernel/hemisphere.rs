use super::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

#[test]
fn kernel_is_upper_hemisphere_with_growing_reach() {
    let mut rng = StdRng::seed_from_u64(11);
    let k = hemisphere_kernel(8, &mut rng);
    assert_eq!(k.len(), 8);
    for (i, v) in k.iter().enumerate() {
        let t = i as f32 / 8.0;
        let scale = t * t * 0.9 + 0.1;
        assert!((v.length() - scale).abs() < 1e-4, "i={i}");
        assert!(v.z >= 0.1 * scale - 1e-6);
    }
}

#[test]
fn single_sample_kernel_is_zero() {
    let mut rng = StdRng::seed_from_u64(0);
    assert_eq!(hemisphere_kernel(1, &mut rng), vec![Vec3::ZERO]);
}

#[test]
fn noise_is_unit_and_planar() {
    let mut rng = StdRng::seed_from_u64(5);
    let n = rotation_noise(4, true, &mut rng);
    assert_eq!(n.len(), 16);
    assert!(n.iter().all(|v| v.z == 0.0 && (v.length() - 1.0).abs() < 1e-5));
}

#[test]
fn disabled_noise_is_constant_x() {
    let mut rng = StdRng::seed_from_u64(5);
    assert!(rotation_noise(3, false, &mut rng).iter().all(|v| *v == Vec3::X));
}
