use crate::kernel::{KernelDomain, SampleKernel, generate};
use crate::settings::{KernelConfig, RenderSettings};

/// Anti-aliasing, depth-of-field and light kernels.
///
/// The AA kernel lives in the unit square, the other two in the unit disc; max-shift settings
/// scale them at lookup time so changing a magnitude never regenerates points.
#[derive(Clone, Debug)]
pub struct KernelSet {
    aa: SampleKernel,
    dof: SampleKernel,
    light: SampleKernel,
    configs: [KernelConfig; 3],
}

impl KernelSet {
    /// Generate all three kernels for `settings`.
    pub fn from_settings(settings: &RenderSettings) -> Self {
        let configs = [
            settings.aa_kernel(),
            settings.dof_kernel(),
            settings.light_kernel(),
        ];
        Self {
            aa: generate(configs[0].count, KernelDomain::Square, configs[0].sort),
            dof: generate(configs[1].count, KernelDomain::UNIT_DISC, configs[1].sort),
            light: generate(configs[2].count, KernelDomain::UNIT_DISC, configs[2].sort),
            configs,
        }
    }

    /// Regenerate every kernel whose configuration differs from `settings`.
    ///
    /// Return `true` when anything was regenerated; the caller owns the frame reset.
    pub fn sync(&mut self, settings: &RenderSettings) -> bool {
        let wanted = [
            settings.aa_kernel(),
            settings.dof_kernel(),
            settings.light_kernel(),
        ];
        let mut changed = false;
        if wanted[0] != self.configs[0] {
            self.aa = generate(wanted[0].count, KernelDomain::Square, wanted[0].sort);
            changed = true;
        }
        if wanted[1] != self.configs[1] {
            self.dof = generate(wanted[1].count, KernelDomain::UNIT_DISC, wanted[1].sort);
            changed = true;
        }
        if wanted[2] != self.configs[2] {
            self.light = generate(wanted[2].count, KernelDomain::UNIT_DISC, wanted[2].sort);
            changed = true;
        }
        if changed {
            tracing::debug!(
                aa = self.aa.len(),
                dof = self.dof.len(),
                light = self.light.len(),
                "kernels regenerated"
            );
        }
        self.configs = wanted;
        changed
    }

    /// Replace the anti-aliasing kernel directly.
    pub fn set_aa(&mut self, kernel: SampleKernel) {
        self.aa = kernel;
    }

    /// Replace the depth-of-field kernel directly.
    pub fn set_dof(&mut self, kernel: SampleKernel) {
        self.dof = kernel;
    }

    /// Replace the light kernel directly.
    pub fn set_light(&mut self, kernel: SampleKernel) {
        self.light = kernel;
    }

    /// Anti-aliasing kernel (unit square).
    pub fn aa(&self) -> &SampleKernel {
        &self.aa
    }

    /// Depth-of-field kernel (unit disc).
    pub fn dof(&self) -> &SampleKernel {
        &self.dof
    }

    /// Light kernel (unit disc).
    pub fn light(&self) -> &SampleKernel {
        &self.light
    }
}

impl Default for KernelSet {
    fn default() -> Self {
        Self::from_settings(&RenderSettings::default())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/perturb/kernels.rs"]
mod tests;
