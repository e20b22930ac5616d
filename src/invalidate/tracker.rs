use glam::Mat4;

/// How two camera transforms are compared.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CameraCompare {
    /// Bit-for-bit equality; any movement invalidates.
    #[default]
    Exact,
    /// Every element within the given absolute tolerance.
    Epsilon(f32),
}

impl CameraCompare {
    /// Return `true` when `a` and `b` count as the same transform.
    pub fn matches(self, a: &Mat4, b: &Mat4) -> bool {
        match self {
            Self::Exact => a == b,
            Self::Epsilon(eps) => a.abs_diff_eq(*b, eps),
        }
    }

    /// Non-finite or non-positive tolerances fall back to exact comparison.
    pub(crate) fn sanitized(self) -> Self {
        match self {
            Self::Epsilon(eps) if eps.is_finite() && eps > 0.0 => self,
            _ => Self::Exact,
        }
    }
}

/// Remembers the last camera x projection transform and reports when it moves.
#[derive(Clone, Debug, Default)]
pub struct InvalidationTracker {
    cached: Option<Mat4>,
    compare: CameraCompare,
}

impl InvalidationTracker {
    /// Tracker with the given comparison policy and nothing cached.
    pub fn new(compare: CameraCompare) -> Self {
        Self {
            cached: None,
            compare: compare.sanitized(),
        }
    }

    /// Active comparison policy.
    pub fn compare(&self) -> CameraCompare {
        self.compare
    }

    /// Replace the comparison policy; the cached transform is kept.
    pub fn set_compare(&mut self, compare: CameraCompare) {
        self.compare = compare.sanitized();
    }

    /// Compare against the cached transform and cache `current`.
    ///
    /// The first call after construction or [`InvalidationTracker::forget`] always reports a change.
    pub fn has_scene_changed(&mut self, current: Mat4) -> bool {
        let changed = match &self.cached {
            Some(prev) => !self.compare.matches(prev, &current),
            None => true,
        };
        if changed {
            self.cached = Some(current);
        }
        changed
    }

    /// Drop the cached transform so the next call reports a change.
    pub fn forget(&mut self) {
        self.cached = None;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/invalidate/tracker.rs"]
mod tests;
