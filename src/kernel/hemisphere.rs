use glam::{Vec2, Vec3};
use rand::Rng;

const MIN_SCALE: f32 = 0.1;
const MIN_ELEVATION: f32 = 0.1;

/// Hemisphere kernel around `+Z` for ambient occlusion.
///
/// Samples are rejected below [`MIN_ELEVATION`] and scaled so that later samples reach further out
/// (`lerp(0.1, 1.0, (i / n)^2)`). A one-sample kernel is the zero vector.
pub fn hemisphere_kernel(size: usize, rng: &mut impl Rng) -> Vec<Vec3> {
    if size <= 1 {
        return vec![Vec3::ZERO; size];
    }

    let inverse = 1.0 / size as f32;
    let mut kernel = Vec::with_capacity(size);
    while kernel.len() < size {
        let mut v = random_unit_vector(rng);
        v.z = v.z.abs();
        if v.z < MIN_ELEVATION {
            continue;
        }
        let t = kernel.len() as f32 * inverse;
        let scale = t * t * (1.0 - MIN_SCALE) + MIN_SCALE;
        kernel.push(v * scale);
    }
    kernel
}

/// `size * size` tile of in-plane rotation vectors.
///
/// With `randomize == false` every entry is `+X`, which disables the per-pixel rotation.
pub fn rotation_noise(size: usize, randomize: bool, rng: &mut impl Rng) -> Vec<Vec3> {
    let n = size * size;
    if !randomize {
        return vec![Vec3::X; n];
    }
    (0..n)
        .map(|_| {
            let c = Vec2::from_angle(rng.gen_range(0.0..std::f32::consts::TAU));
            Vec3::new(c.x, c.y, 0.0)
        })
        .collect()
}

fn random_unit_vector(rng: &mut impl Rng) -> Vec3 {
    let z: f32 = rng.gen_range(-1.0..=1.0);
    let phi = rng.gen_range(0.0..std::f32::consts::TAU);
    let r = (1.0 - z * z).max(0.0).sqrt();
    Vec3::new(r * phi.cos(), r * phi.sin(), z)
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/hemisphere.rs"]
mod tests;
