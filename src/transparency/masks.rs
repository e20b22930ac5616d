use rand::Rng;
use rand::seq::SliceRandom;

/// Precomputed per-object visibility over a period of `samples` frames.
///
/// Each object owns an independently shuffled ramp `k / samples`; it is drawn in slot `k` when its
/// ramp value is below the opacity `1 - transparency`, so over a full period it shows up in
/// `ceil(opacity * samples)` frames.
#[derive(Clone, Debug, PartialEq)]
pub struct TransparencyMasks {
    objects: usize,
    samples: u32,
    transparency: f32,
    table: Vec<bool>,
}

impl TransparencyMasks {
    /// Build tables for `objects` drawables.
    pub fn build(objects: usize, samples: u32, transparency: f32, rng: &mut impl Rng) -> Self {
        let samples = samples.max(1);
        let transparency = if transparency.is_finite() {
            transparency.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let opacity = 1.0 - transparency;
        let n = samples as usize;

        let mut table = Vec::with_capacity(objects * n);
        let mut ramp: Vec<f32> = (0..n).map(|k| k as f32 / samples as f32).collect();
        for _ in 0..objects {
            ramp.shuffle(rng);
            table.extend(ramp.iter().map(|&v| v < opacity));
        }

        Self {
            objects,
            samples,
            transparency,
            table,
        }
    }

    /// Return `true` when the tables were built for different inputs.
    pub fn is_stale(&self, objects: usize, samples: u32, transparency: f32) -> bool {
        self.objects != objects
            || self.samples != samples.max(1)
            || self.transparency != transparency.clamp(0.0, 1.0)
    }

    /// Period in frames.
    pub fn samples(&self) -> u32 {
        self.samples
    }

    /// Number of objects covered.
    pub fn objects(&self) -> usize {
        self.objects
    }

    /// Whether `object` is drawn on running sample `sample`; unknown objects are always drawn.
    pub fn visible(&self, object: usize, sample: u64) -> bool {
        if object >= self.objects {
            return true;
        }
        let slot = (sample % self.samples as u64) as usize;
        self.table[object * self.samples as usize + slot]
    }

    /// Fraction of the period in which `object` is drawn.
    pub fn coverage(&self, object: usize) -> f32 {
        if object >= self.objects {
            return 1.0;
        }
        let n = self.samples as usize;
        let row = &self.table[object * n..(object + 1) * n];
        row.iter().filter(|&&v| v).count() as f32 / n as f32
    }
}

impl Default for TransparencyMasks {
    fn default() -> Self {
        Self {
            objects: 0,
            samples: 1,
            transparency: 0.0,
            table: Vec::new(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/transparency/masks.rs"]
mod tests;
