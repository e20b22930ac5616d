use std::cmp::Reverse;
use std::collections::BinaryHeap;

use glam::Vec2;
use rand::Rng;

/// Candidates tried around each active sample before it retires.
pub(crate) const RELAXATION_ITERATIONS: usize = 30;

/// Dart throwing with a minimum distance in the unit square.
///
/// The first sample is `seed`; further samples grow outward from the active set. `max_points` caps the
/// result so a tiny `min_dist` cannot run away.
pub(crate) fn dart_throw(
    min_dist: f32,
    seed: Vec2,
    max_points: usize,
    rng: &mut impl Rng,
) -> Vec<Vec2> {
    let min_dist = min_dist.max(1e-4);
    let grid = Grid::new(min_dist / std::f32::consts::SQRT_2);
    let mut cells: Vec<Option<usize>> = vec![None; grid.dim * grid.dim];

    let mut points = vec![seed];
    let mut active = vec![0usize];
    cells[grid.index(seed)] = Some(0);

    while !active.is_empty() && points.len() < max_points {
        let slot = rng.gen_range(0..active.len());
        let origin = points[active[slot]];
        let mut placed = false;

        for _ in 0..RELAXATION_ITERATIONS {
            let angle = rng.gen_range(0.0..std::f32::consts::TAU);
            let radius = rng.gen_range(min_dist..2.0 * min_dist);
            let cand = origin + Vec2::from_angle(angle) * radius;
            if !(0.0..1.0).contains(&cand.x) || !(0.0..1.0).contains(&cand.y) {
                continue;
            }
            if grid.has_neighbor_within(&cells, &points, cand, min_dist) {
                continue;
            }
            cells[grid.index(cand)] = Some(points.len());
            active.push(points.len());
            points.push(cand);
            placed = true;
            break;
        }

        if !placed {
            active.swap_remove(slot);
        }
    }

    points
}

/// Remove samples until `keep` remain, always dropping one end of the closest remaining pair.
///
/// Index 0 is never removed and survivors keep their relative order.
pub(crate) fn eliminate(points: Vec<Vec2>, keep: usize) -> Vec<Vec2> {
    let keep = keep.max(1);
    if points.len() <= keep {
        return points;
    }

    let mut state = Elimination::new(&points);
    let mut heap = BinaryHeap::new();
    for i in 0..points.len() {
        let (d, j) = state.nearest(i);
        state.nn[i] = j;
        heap.push(Reverse((d.to_bits(), i, 0u32)));
    }

    let mut alive_count = points.len();
    while alive_count > keep {
        let Some(Reverse((_, i, version))) = heap.pop() else {
            break;
        };
        if i == 0 || !state.alive[i] || state.version[i] != version {
            continue;
        }
        state.remove(i);
        alive_count -= 1;

        let stale: Vec<usize> = (0..points.len())
            .filter(|&k| state.alive[k] && state.nn[k] == i)
            .collect();
        for k in stale {
            let (d, j) = state.nearest(k);
            state.nn[k] = j;
            state.version[k] = state.version[k].wrapping_add(1);
            heap.push(Reverse((d.to_bits(), k, state.version[k])));
        }
    }

    let alive = state.alive;
    points
        .into_iter()
        .zip(alive)
        .filter_map(|(p, alive)| alive.then_some(p))
        .collect()
}

struct Grid {
    cell: f32,
    dim: usize,
}

impl Grid {
    fn new(cell: f32) -> Self {
        let dim = ((1.0 / cell).ceil() as usize).clamp(1, 4096);
        Self {
            cell: 1.0 / dim as f32,
            dim,
        }
    }

    fn coords(&self, p: Vec2) -> (usize, usize) {
        let x = ((p.x / self.cell) as usize).min(self.dim - 1);
        let y = ((p.y / self.cell) as usize).min(self.dim - 1);
        (x, y)
    }

    fn index(&self, p: Vec2) -> usize {
        let (x, y) = self.coords(p);
        y * self.dim + x
    }

    fn has_neighbor_within(
        &self,
        cells: &[Option<usize>],
        points: &[Vec2],
        p: Vec2,
        min_dist: f32,
    ) -> bool {
        let (cx, cy) = self.coords(p);
        let reach = (min_dist / self.cell).ceil() as usize;
        let (x0, x1) = (cx.saturating_sub(reach), (cx + reach).min(self.dim - 1));
        let (y0, y1) = (cy.saturating_sub(reach), (cy + reach).min(self.dim - 1));
        for y in y0..=y1 {
            for x in x0..=x1 {
                if let Some(i) = cells[y * self.dim + x]
                    && points[i].distance_squared(p) < min_dist * min_dist
                {
                    return true;
                }
            }
        }
        false
    }
}

struct Elimination<'a> {
    points: &'a [Vec2],
    grid: Grid,
    buckets: Vec<Vec<usize>>,
    alive: Vec<bool>,
    nn: Vec<usize>,
    version: Vec<u32>,
}

impl<'a> Elimination<'a> {
    fn new(points: &'a [Vec2]) -> Self {
        let grid = Grid::new(1.0 / (points.len() as f32).sqrt().max(1.0));
        let mut buckets = vec![Vec::new(); grid.dim * grid.dim];
        for (i, &p) in points.iter().enumerate() {
            buckets[grid.index(p.clamp(Vec2::ZERO, Vec2::ONE))].push(i);
        }
        Self {
            points,
            grid,
            buckets,
            alive: vec![true; points.len()],
            nn: vec![usize::MAX; points.len()],
            version: vec![0; points.len()],
        }
    }

    fn remove(&mut self, i: usize) {
        self.alive[i] = false;
        let b = self.grid.index(self.points[i].clamp(Vec2::ZERO, Vec2::ONE));
        self.buckets[b].retain(|&k| k != i);
    }

    /// Nearest alive neighbor of `i`, scanning square rings of cells outward.
    fn nearest(&self, i: usize) -> (f32, usize) {
        let p = self.points[i];
        let (cx, cy) = self.grid.coords(p.clamp(Vec2::ZERO, Vec2::ONE));
        let dim = self.grid.dim as isize;
        let mut best = (f32::INFINITY, usize::MAX);

        for ring in 0..=dim {
            for dy in -ring..=ring {
                for dx in -ring..=ring {
                    if dx.abs() != ring && dy.abs() != ring {
                        continue;
                    }
                    let (x, y) = (cx as isize + dx, cy as isize + dy);
                    if x < 0 || y < 0 || x >= dim || y >= dim {
                        continue;
                    }
                    for &k in &self.buckets[(y * dim + x) as usize] {
                        if k == i {
                            continue;
                        }
                        let d = self.points[k].distance(p);
                        if d < best.0 {
                            best = (d, k);
                        }
                    }
                }
            }
            if best.0 <= ring as f32 * self.grid.cell {
                break;
            }
        }
        best
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/poisson.rs"]
mod tests;
