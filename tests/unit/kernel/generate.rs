use super::*;

fn sorted_bits(points: &[Vec2]) -> Vec<(u32, u32)> {
    let mut v: Vec<_> = points.iter().map(|p| (p.x.to_bits(), p.y.to_bits())).collect();
    v.sort_unstable();
    v
}

#[test]
fn size_is_bounded_for_many_counts() {
    for n in [1usize, 2, 3, 7, 16, 64, 100, 257, 1024, 4096] {
        for domain in [KernelDomain::Square, KernelDomain::UNIT_DISC] {
            let k = generate(n, domain, SortPolicy::RadiusAscending);
            assert!(k.len() >= 1, "n={n}");
            assert!(k.len() <= n, "n={n} len={}", k.len());
        }
    }
}

#[test]
fn square_kernel_hits_exact_count() {
    for n in [2usize, 16, 64, 500] {
        assert_eq!(generate(n, KernelDomain::Square, SortPolicy::RadiusAscending).len(), n);
    }
}

#[test]
fn disc_kernel_stays_inside_unit_disc() {
    let k = generate(256, KernelDomain::UNIT_DISC, SortPolicy::RandomShuffle);
    assert!(k.points().iter().all(|p| p.length() <= 1.0));
}

#[test]
fn disc_radius_scales_points() {
    let k = generate(64, KernelDomain::Disc { radius: 0.25 }, SortPolicy::RadiusAscending);
    assert!(k.points().iter().all(|p| p.length() <= 0.25 + 1e-6));
}

#[test]
fn single_sample_is_domain_center() {
    let sq = generate(1, KernelDomain::Square, SortPolicy::RandomShuffle);
    assert_eq!(sq.points(), &[Vec2::splat(0.5)]);
    let disc = generate(1, KernelDomain::UNIT_DISC, SortPolicy::RadiusAscending);
    assert_eq!(disc.points(), &[Vec2::ZERO]);
}

#[test]
fn zero_count_is_clamped_to_one() {
    assert_eq!(generate(0, KernelDomain::Square, SortPolicy::RadiusAscending).len(), 1);
}

#[test]
fn first_sample_is_reference() {
    let k = generate(32, KernelDomain::UNIT_DISC, SortPolicy::RandomShuffle);
    assert_eq!(k.points()[0], Vec2::ZERO);
    assert_eq!(k.offset(0), Vec2::ZERO);
    let sq = generate(32, KernelDomain::Square, SortPolicy::RadiusAscending);
    assert_eq!(sq.offset(0), Vec2::ZERO);
}

#[test]
fn radius_ascending_is_sorted_after_first() {
    let k = generate(200, KernelDomain::UNIT_DISC, SortPolicy::RadiusAscending);
    for w in k.points()[1..].windows(2) {
        assert!(w[0].length() <= w[1].length());
    }
}

#[test]
fn radius_ascending_is_reproducible() {
    let a = generate(128, KernelDomain::Square, SortPolicy::RadiusAscending);
    let b = generate(128, KernelDomain::Square, SortPolicy::RadiusAscending);
    assert_eq!(a, b);
}

#[test]
fn random_shuffle_is_permutation_with_fixed_reference() {
    let base = generate(96, KernelDomain::UNIT_DISC, SortPolicy::RadiusAscending);
    for _ in 0..4 {
        let k = generate(96, KernelDomain::UNIT_DISC, SortPolicy::RandomShuffle);
        assert_eq!(k.points()[0], base.points()[0]);
        assert_eq!(sorted_bits(k.points()), sorted_bits(base.points()));
    }
}

#[test]
fn reshuffled_preserves_reference_and_multiset() {
    let base = generate(50, KernelDomain::Square, SortPolicy::RadiusAscending);
    let mut rng = rand::thread_rng();
    let again = base.reshuffled(&mut rng);
    assert_eq!(again.points()[0], base.points()[0]);
    assert_eq!(sorted_bits(again.points()), sorted_bits(base.points()));
    assert_eq!(again.sort_policy(), SortPolicy::RandomShuffle);
}

#[test]
fn sample_wraps_modulo_len() {
    let k = generate(16, KernelDomain::Square, SortPolicy::RadiusAscending);
    for i in 0..48u64 {
        assert_eq!(k.slot(i), Some((i % 16) as usize));
        assert_eq!(k.sample(i), k.points()[(i % 16) as usize]);
    }
}

#[test]
fn empty_kernel_falls_back_to_center() {
    let k = SampleKernel {
        points: Vec::new(),
        domain: KernelDomain::UNIT_DISC,
        sort: SortPolicy::RadiusAscending,
    };
    assert_eq!(k.slot(3), None);
    assert_eq!(k.sample(3), Vec2::ZERO);
    assert_eq!(k.offset(3), Vec2::ZERO);
}
