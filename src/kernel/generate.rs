use glam::Vec2;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::kernel::poisson::{dart_throw, eliminate};

/// Largest kernel the generator will produce.
pub const MAX_KERNEL_SIZE: usize = 4096;

const KERNEL_SEED: u64 = 0x5eed_0f_d15c;
const DENSITY: f32 = 0.65;
const OVERSHOOT: f32 = 1.25;
const MAX_ATTEMPTS: usize = 8;

/// Target domain of a kernel's points.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KernelDomain {
    /// Unit square `[0, 1]^2`; the center `(0.5, 0.5)` is the no-jitter sample.
    Square,
    /// Disc of the given radius around the origin.
    Disc {
        /// Disc radius.
        radius: f32,
    },
}

impl KernelDomain {
    /// Unit disc.
    pub const UNIT_DISC: Self = Self::Disc { radius: 1.0 };

    /// No-jitter point of the domain.
    pub fn center(self) -> Vec2 {
        match self {
            Self::Square => Vec2::splat(0.5),
            Self::Disc { .. } => Vec2::ZERO,
        }
    }
}

/// Ordering applied after generation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortPolicy {
    /// Everything after index 0 sorted by distance from the domain center.
    #[default]
    RadiusAscending,
    /// Everything after index 0 randomly permuted.
    RandomShuffle,
}

/// Ordered, immutable set of 2D sample points.
///
/// Index 0 is always the domain center, so the first frame of any sequence renders without jitter.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct SampleKernel {
    points: Vec<Vec2>,
    domain: KernelDomain,
    sort: SortPolicy,
}

impl SampleKernel {
    /// One-sample kernel at the domain center.
    pub fn zero(domain: KernelDomain) -> Self {
        Self {
            points: vec![domain.center()],
            domain,
            sort: SortPolicy::RadiusAscending,
        }
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Return `true` when the kernel has no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// All points in order.
    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    /// Domain the points live in.
    pub fn domain(&self) -> KernelDomain {
        self.domain
    }

    /// Ordering the kernel was built with.
    pub fn sort_policy(&self) -> SortPolicy {
        self.sort
    }

    /// Kernel slot used for a running sample index (`index mod len`).
    pub fn slot(&self, index: u64) -> Option<usize> {
        if self.points.is_empty() {
            return None;
        }
        Some((index % self.points.len() as u64) as usize)
    }

    /// Point for a running sample index; the domain center when the kernel is empty.
    pub fn sample(&self, index: u64) -> Vec2 {
        self.slot(index)
            .map(|i| self.points[i])
            .unwrap_or_else(|| self.domain.center())
    }

    /// Sample recentered so that the reference sample maps to zero.
    pub fn offset(&self, index: u64) -> Vec2 {
        self.sample(index) - self.domain.center()
    }

    /// Same points with everything after index 0 permuted by `rng`.
    pub fn reshuffled(&self, rng: &mut impl Rng) -> Self {
        let mut points = self.points.clone();
        if points.len() > 2 {
            points[1..].shuffle(rng);
        }
        Self {
            points,
            domain: self.domain,
            sort: SortPolicy::RandomShuffle,
        }
    }
}

/// Generate a kernel of at most `count` points.
///
/// Point placement is seeded by `count`, so [`SortPolicy::RadiusAscending`] kernels are exactly
/// reproducible. [`SortPolicy::RandomShuffle`] permutes with the thread RNG.
#[tracing::instrument(level = "debug")]
pub fn generate(count: usize, domain: KernelDomain, sort: SortPolicy) -> SampleKernel {
    generate_with_rng(count, domain, sort, &mut rand::thread_rng())
}

/// [`generate`] with an explicit RNG for the shuffle step.
pub fn generate_with_rng(
    count: usize,
    domain: KernelDomain,
    sort: SortPolicy,
    shuffle_rng: &mut impl Rng,
) -> SampleKernel {
    let count = count.clamp(1, MAX_KERNEL_SIZE);
    let mut points = if count == 1 {
        vec![Vec2::splat(0.5)]
    } else {
        unit_square_points(count)
    };

    if let KernelDomain::Disc { radius } = domain {
        points = points
            .into_iter()
            .map(|p| p * 2.0 - Vec2::ONE)
            .filter(|p| p.length() <= 1.0)
            .map(|p| p * radius)
            .collect();
    }

    if points.is_empty() {
        tracing::warn!(count, "kernel generation produced no samples; using zero kernel");
        return SampleKernel::zero(domain);
    }

    let center = domain.center();
    match sort {
        SortPolicy::RadiusAscending => {
            points[1..].sort_by(|a, b| a.distance(center).total_cmp(&b.distance(center)));
        }
        SortPolicy::RandomShuffle => points[1..].shuffle(shuffle_rng),
    }

    SampleKernel {
        points,
        domain,
        sort,
    }
}

/// Exactly `count` well-spaced points in `[0, 1)^2`, starting with the center.
fn unit_square_points(count: usize) -> Vec<Vec2> {
    let mut rng = StdRng::seed_from_u64(KERNEL_SEED ^ count as u64);
    let mut min_dist = (DENSITY / (count as f32 * OVERSHOOT)).sqrt();
    let cap = count.saturating_mul(4).max(64);

    let mut best = Vec::new();
    for attempt in 0..MAX_ATTEMPTS {
        let pts = dart_throw(min_dist, Vec2::splat(0.5), cap, &mut rng);
        if pts.len() >= count {
            return eliminate(pts, count);
        }
        tracing::debug!(
            attempt,
            got = pts.len(),
            count,
            "dart throwing fell short; relaxing min distance"
        );
        if pts.len() > best.len() {
            best = pts;
        }
        min_dist *= 0.85;
    }
    best
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/generate.rs"]
mod tests;
