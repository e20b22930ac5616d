use super::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

fn min_pairwise(points: &[Vec2]) -> f32 {
    let mut best = f32::INFINITY;
    for (i, a) in points.iter().enumerate() {
        for b in &points[i + 1..] {
            best = best.min(a.distance(*b));
        }
    }
    best
}

#[test]
fn dart_throw_respects_min_distance_and_seed() {
    let mut rng = StdRng::seed_from_u64(7);
    let seed = Vec2::splat(0.5);
    let pts = dart_throw(0.1, seed, 10_000, &mut rng);
    assert_eq!(pts[0], seed);
    assert!(pts.len() > 20);
    assert!(min_pairwise(&pts) >= 0.1 - 1e-6);
    assert!(
        pts.iter()
            .all(|p| (0.0..1.0).contains(&p.x) && (0.0..1.0).contains(&p.y))
    );
}

#[test]
fn dart_throw_honors_point_cap() {
    let mut rng = StdRng::seed_from_u64(1);
    let pts = dart_throw(0.01, Vec2::splat(0.5), 50, &mut rng);
    assert_eq!(pts.len(), 50);
}

#[test]
fn eliminate_trims_exactly_and_keeps_reference() {
    let mut rng = StdRng::seed_from_u64(3);
    let pts = dart_throw(0.05, Vec2::splat(0.5), 10_000, &mut rng);
    assert!(pts.len() > 40);
    let before = min_pairwise(&pts);
    let trimmed = eliminate(pts.clone(), 40);
    assert_eq!(trimmed.len(), 40);
    assert_eq!(trimmed[0], pts[0]);
    assert!(min_pairwise(&trimmed) >= before);
    assert!(trimmed.iter().all(|p| pts.contains(p)));
}

#[test]
fn eliminate_is_noop_when_small_enough() {
    let pts = vec![Vec2::ZERO, Vec2::ONE];
    assert_eq!(eliminate(pts.clone(), 5), pts);
}
