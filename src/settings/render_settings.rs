use glam::Vec3;

use crate::foundation::core::Rgba;
use crate::foundation::error::{ProgressaError, ProgressaResult};
use crate::invalidate::CameraCompare;
use crate::kernel::{MAX_KERNEL_SIZE, SortPolicy};

/// How depth of field perturbs a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DofMode {
    /// Move the eye on the aperture disc and re-aim at the focal point.
    Point,
    /// Keep the eye and shear the frustum around the focal plane.
    Plane,
}

/// Buffer shown by the display stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputChannel {
    /// Accumulated, converging image.
    Final,
    /// Raw color of the current frame.
    Color,
    /// Current frame normals.
    Normals,
    /// Per-drawable geometry ids.
    Geometry,
    /// Linearized depth.
    Depth,
    /// Ambient occlusion factor.
    OcclusionMap,
    /// Light-space depth.
    ShadowMap,
}

/// Depth precision of the shadow map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShadowMapFormat {
    /// 16-bit normalized depth.
    Depth16,
    /// 32-bit float depth.
    Depth32F,
}

/// Pixel format of the color render target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorFormat {
    /// 32-bit float per channel.
    Rgba32F,
    /// 8-bit normalized per channel.
    Rgba8Unorm,
}

/// Where per-frame jitter comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SamplingMode {
    /// Look up the precomputed kernels (`sample mod len`).
    Kernel,
    /// Draw uniform square/disc samples every frame.
    Random,
}

/// Size and order of one sample kernel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct KernelConfig {
    /// Requested number of samples.
    pub count: usize,
    /// Ordering policy.
    pub sort: SortPolicy,
}

impl KernelConfig {
    fn sanitized(self) -> Self {
        Self {
            count: self.count.clamp(1, MAX_KERNEL_SIZE),
            sort: self.sort,
        }
    }
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            count: 64,
            sort: SortPolicy::RadiusAscending,
        }
    }
}

/// Area light used for soft shadows.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LightSettings {
    /// Light eye position.
    pub position: Vec3,
    /// Point the light looks at.
    pub focus: Vec3,
    /// Radius of the disc the light moves on.
    pub max_shift: f32,
}

impl Default for LightSettings {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 5.0, 0.0),
            focus: Vec3::ZERO,
            max_shift: 0.1,
        }
    }
}

/// Screen-space ambient occlusion parameters.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SsaoSettings {
    /// Whether occlusion is applied.
    pub enabled: bool,
    /// Sampling radius in view-space units.
    pub radius: f32,
    /// Strength multiplier.
    pub intensity: f32,
    /// Randomize the per-pixel kernel rotation.
    pub noise: bool,
}

impl Default for SsaoSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            radius: 0.05,
            intensity: 1.0,
            noise: true,
        }
    }
}

/// Every live-editable rendering parameter, versioned by a generation counter.
///
/// Setters clamp or ignore out-of-range input and bump [`RenderSettings::generation`] whenever the
/// stored value actually changes. The render loop compares generations to decide when accumulated
/// history is stale.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    transparency_enabled: bool,
    transparency: f32,
    transparency_samples: u32,
    back_face_culling: bool,
    max_subpixel_shift: f32,
    aa_kernel: KernelConfig,
    dof_mode: DofMode,
    max_dof_shift: f32,
    focal_depth: f32,
    dof_at_cursor: bool,
    dof_kernel: KernelConfig,
    shadows: bool,
    light: LightSettings,
    light_kernel: KernelConfig,
    shadow_map_size: u32,
    shadow_map_format: ShadowMapFormat,
    ssao: SsaoSettings,
    output: OutputChannel,
    background: Rgba,
    color_format: ColorFormat,
    max_frames: u32,
    sampling: SamplingMode,
    camera_compare: CameraCompare,
    #[serde(skip)]
    generation: u64,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            transparency_enabled: true,
            transparency: 0.5,
            transparency_samples: 64,
            back_face_culling: false,
            max_subpixel_shift: 1.0,
            aa_kernel: KernelConfig::default(),
            dof_mode: DofMode::Plane,
            max_dof_shift: 0.01,
            focal_depth: 3.0,
            dof_at_cursor: false,
            dof_kernel: KernelConfig::default(),
            shadows: true,
            light: LightSettings::default(),
            light_kernel: KernelConfig::default(),
            shadow_map_size: 1024,
            shadow_map_format: ShadowMapFormat::Depth16,
            ssao: SsaoSettings::default(),
            output: OutputChannel::Final,
            background: [0.85, 0.87, 0.91, 1.0],
            color_format: ColorFormat::Rgba32F,
            max_frames: 128,
            sampling: SamplingMode::Kernel,
            camera_compare: CameraCompare::Exact,
            generation: 0,
        }
    }
}

/// Smallest and largest shadow map edge in texels.
pub const SHADOW_MAP_SIZE_RANGE: (u32, u32) = (16, 8192);

impl RenderSettings {
    /// Parse settings from JSON and apply setter clamping to every field.
    pub fn from_json(json: &str) -> ProgressaResult<Self> {
        let raw: Self =
            serde_json::from_str(json).map_err(|e| ProgressaError::serde(e.to_string()))?;
        Ok(raw.sanitized())
    }

    /// Pretty JSON; the generation counter is not included.
    pub fn to_json_pretty(&self) -> ProgressaResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| ProgressaError::serde(e.to_string()))
    }

    /// Re-run every clamp, e.g. after deserialization.
    pub fn sanitized(self) -> Self {
        let d = Self::default();
        let finite_or = |v: f32, fallback: f32| if v.is_finite() { v } else { fallback };
        let finite_vec = |v: Vec3, fallback: Vec3| if v.is_finite() { v } else { fallback };
        Self {
            transparency: finite_or(self.transparency, d.transparency).clamp(0.0, 1.0),
            transparency_samples: self.transparency_samples.clamp(1, MAX_KERNEL_SIZE as u32),
            max_subpixel_shift: finite_or(self.max_subpixel_shift, d.max_subpixel_shift).max(0.0),
            aa_kernel: self.aa_kernel.sanitized(),
            max_dof_shift: finite_or(self.max_dof_shift, d.max_dof_shift).max(0.0),
            focal_depth: finite_or(self.focal_depth, d.focal_depth).max(0.0),
            dof_kernel: self.dof_kernel.sanitized(),
            light: LightSettings {
                position: finite_vec(self.light.position, d.light.position),
                focus: finite_vec(self.light.focus, d.light.focus),
                max_shift: finite_or(self.light.max_shift, d.light.max_shift).max(0.0),
            },
            light_kernel: self.light_kernel.sanitized(),
            shadow_map_size: self
                .shadow_map_size
                .clamp(SHADOW_MAP_SIZE_RANGE.0, SHADOW_MAP_SIZE_RANGE.1),
            ssao: SsaoSettings {
                radius: finite_or(self.ssao.radius, d.ssao.radius).max(0.0),
                intensity: finite_or(self.ssao.intensity, d.ssao.intensity).max(0.0),
                ..self.ssao
            },
            background: self.background.map(|c| finite_or(c, 0.0).clamp(0.0, 1.0)),
            max_frames: self.max_frames.max(1),
            camera_compare: self.camera_compare.sanitized(),
            ..self
        }
    }

    /// Monotonic version; changes whenever an output-affecting value changes.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Force an invalidation without changing any value.
    pub fn touch(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }

    fn update<T: PartialEq>(&mut self, value: T, field: fn(&mut Self) -> &mut T) -> bool {
        let slot = field(self);
        if *slot == value {
            return false;
        }
        *slot = value;
        self.touch();
        true
    }

    /// Whether object-based stochastic transparency is active.
    pub fn transparency_enabled(&self) -> bool {
        self.transparency_enabled
    }

    /// Enable or disable stochastic transparency.
    pub fn set_transparency_enabled(&mut self, enabled: bool) -> bool {
        self.update(enabled, |s| &mut s.transparency_enabled)
    }

    /// Transparency level in `[0, 1]` (0 = opaque).
    pub fn transparency(&self) -> f32 {
        self.transparency
    }

    /// Set the transparency level; clamped to `[0, 1]`, non-finite input ignored.
    pub fn set_transparency(&mut self, transparency: f32) -> bool {
        if !transparency.is_finite() {
            return false;
        }
        self.update(transparency.clamp(0.0, 1.0), |s| &mut s.transparency)
    }

    /// Frames in one period of the transparency masks.
    pub fn transparency_samples(&self) -> u32 {
        self.transparency_samples
    }

    /// Set the transparency mask period; clamped to `[1, 4096]`.
    pub fn set_transparency_samples(&mut self, samples: u32) -> bool {
        self.update(samples.clamp(1, MAX_KERNEL_SIZE as u32), |s| {
            &mut s.transparency_samples
        })
    }

    /// Whether back faces are culled.
    pub fn back_face_culling(&self) -> bool {
        self.back_face_culling
    }

    /// Toggle back-face culling.
    pub fn set_back_face_culling(&mut self, enabled: bool) -> bool {
        self.update(enabled, |s| &mut s.back_face_culling)
    }

    /// Maximum anti-aliasing jitter in pixels.
    pub fn max_subpixel_shift(&self) -> f32 {
        self.max_subpixel_shift
    }

    /// Set the anti-aliasing jitter extent; negative values clamp to zero.
    pub fn set_max_subpixel_shift(&mut self, shift: f32) -> bool {
        if !shift.is_finite() {
            return false;
        }
        self.update(shift.max(0.0), |s| &mut s.max_subpixel_shift)
    }

    /// Anti-aliasing kernel configuration.
    pub fn aa_kernel(&self) -> KernelConfig {
        self.aa_kernel
    }

    /// Replace the anti-aliasing kernel configuration.
    pub fn set_aa_kernel(&mut self, config: KernelConfig) -> bool {
        self.update(config.sanitized(), |s| &mut s.aa_kernel)
    }

    /// Depth-of-field mode.
    pub fn dof_mode(&self) -> DofMode {
        self.dof_mode
    }

    /// Switch depth-of-field mode.
    pub fn set_dof_mode(&mut self, mode: DofMode) -> bool {
        self.update(mode, |s| &mut s.dof_mode)
    }

    /// Aperture radius.
    pub fn max_dof_shift(&self) -> f32 {
        self.max_dof_shift
    }

    /// Set the aperture radius; negative values clamp to zero.
    pub fn set_max_dof_shift(&mut self, shift: f32) -> bool {
        if !shift.is_finite() {
            return false;
        }
        self.update(shift.max(0.0), |s| &mut s.max_dof_shift)
    }

    /// Distance from the eye to the focal plane.
    pub fn focal_depth(&self) -> f32 {
        self.focal_depth
    }

    /// Set the focal distance; negative values clamp to zero.
    pub fn set_focal_depth(&mut self, depth: f32) -> bool {
        if !depth.is_finite() {
            return false;
        }
        self.update(depth.max(0.0), |s| &mut s.focal_depth)
    }

    /// Whether the focal depth follows the cursor.
    pub fn dof_at_cursor(&self) -> bool {
        self.dof_at_cursor
    }

    /// Toggle focus-at-cursor. This alone does not change the image, so history is kept.
    pub fn set_dof_at_cursor(&mut self, enabled: bool) {
        self.dof_at_cursor = enabled;
    }

    /// Depth-of-field kernel configuration.
    pub fn dof_kernel(&self) -> KernelConfig {
        self.dof_kernel
    }

    /// Replace the depth-of-field kernel configuration.
    pub fn set_dof_kernel(&mut self, config: KernelConfig) -> bool {
        self.update(config.sanitized(), |s| &mut s.dof_kernel)
    }

    /// Whether the shadow pass runs.
    pub fn shadows(&self) -> bool {
        self.shadows
    }

    /// Toggle shadows.
    pub fn set_shadows(&mut self, enabled: bool) -> bool {
        self.update(enabled, |s| &mut s.shadows)
    }

    /// Light parameters.
    pub fn light(&self) -> LightSettings {
        self.light
    }

    /// Move the light eye; non-finite input ignored.
    pub fn set_light_position(&mut self, position: Vec3) -> bool {
        if !position.is_finite() {
            return false;
        }
        self.update(position, |s| &mut s.light.position)
    }

    /// Move the light focus; non-finite input ignored.
    pub fn set_light_focus(&mut self, focus: Vec3) -> bool {
        if !focus.is_finite() {
            return false;
        }
        self.update(focus, |s| &mut s.light.focus)
    }

    /// Set the light disc radius; negative values clamp to zero.
    pub fn set_max_light_shift(&mut self, shift: f32) -> bool {
        if !shift.is_finite() {
            return false;
        }
        self.update(shift.max(0.0), |s| &mut s.light.max_shift)
    }

    /// Light kernel configuration.
    pub fn light_kernel(&self) -> KernelConfig {
        self.light_kernel
    }

    /// Replace the light kernel configuration.
    pub fn set_light_kernel(&mut self, config: KernelConfig) -> bool {
        self.update(config.sanitized(), |s| &mut s.light_kernel)
    }

    /// Shadow map edge length in texels.
    pub fn shadow_map_size(&self) -> u32 {
        self.shadow_map_size
    }

    /// Set the shadow map resolution; clamped to [`SHADOW_MAP_SIZE_RANGE`].
    pub fn set_shadow_map_size(&mut self, size: u32) -> bool {
        self.update(
            size.clamp(SHADOW_MAP_SIZE_RANGE.0, SHADOW_MAP_SIZE_RANGE.1),
            |s| &mut s.shadow_map_size,
        )
    }

    /// Shadow map depth format.
    pub fn shadow_map_format(&self) -> ShadowMapFormat {
        self.shadow_map_format
    }

    /// Change the shadow map depth format.
    pub fn set_shadow_map_format(&mut self, format: ShadowMapFormat) -> bool {
        self.update(format, |s| &mut s.shadow_map_format)
    }

    /// Ambient occlusion parameters.
    pub fn ssao(&self) -> SsaoSettings {
        self.ssao
    }

    /// Toggle ambient occlusion.
    pub fn set_ssao_enabled(&mut self, enabled: bool) -> bool {
        self.update(enabled, |s| &mut s.ssao.enabled)
    }

    /// Set the occlusion radius; negative values clamp to zero.
    pub fn set_ssao_radius(&mut self, radius: f32) -> bool {
        if !radius.is_finite() {
            return false;
        }
        self.update(radius.max(0.0), |s| &mut s.ssao.radius)
    }

    /// Set the occlusion strength; negative values clamp to zero.
    pub fn set_ssao_intensity(&mut self, intensity: f32) -> bool {
        if !intensity.is_finite() {
            return false;
        }
        self.update(intensity.max(0.0), |s| &mut s.ssao.intensity)
    }

    /// Toggle per-pixel rotation noise for ambient occlusion.
    pub fn set_ssao_noise(&mut self, noise: bool) -> bool {
        self.update(noise, |s| &mut s.ssao.noise)
    }

    /// Displayed buffer.
    pub fn output(&self) -> OutputChannel {
        self.output
    }

    /// Select the displayed buffer.
    pub fn set_output(&mut self, output: OutputChannel) -> bool {
        self.update(output, |s| &mut s.output)
    }

    /// Clear color of the color target.
    pub fn background(&self) -> Rgba {
        self.background
    }

    /// Set the clear color; channels clamp to `[0, 1]`, non-finite input ignored.
    pub fn set_background(&mut self, color: Rgba) -> bool {
        if color.iter().any(|c| !c.is_finite()) {
            return false;
        }
        self.update(color.map(|c| c.clamp(0.0, 1.0)), |s| &mut s.background)
    }

    /// Color target format.
    pub fn color_format(&self) -> ColorFormat {
        self.color_format
    }

    /// Change the color target format.
    pub fn set_color_format(&mut self, format: ColorFormat) -> bool {
        self.update(format, |s| &mut s.color_format)
    }

    /// Frames blended before accumulation freezes.
    pub fn max_frames(&self) -> u32 {
        self.max_frames
    }

    /// Set the accumulation budget; zero clamps to one.
    pub fn set_max_frames(&mut self, frames: u32) -> bool {
        self.update(frames.max(1), |s| &mut s.max_frames)
    }

    /// Jitter source.
    pub fn sampling(&self) -> SamplingMode {
        self.sampling
    }

    /// Switch the jitter source.
    pub fn set_sampling(&mut self, sampling: SamplingMode) -> bool {
        self.update(sampling, |s| &mut s.sampling)
    }

    /// Camera change detection policy.
    pub fn camera_compare(&self) -> CameraCompare {
        self.camera_compare
    }

    /// Change the camera change detection policy.
    pub fn set_camera_compare(&mut self, compare: CameraCompare) -> bool {
        self.update(compare.sanitized(), |s| &mut s.camera_compare)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/settings/render_settings.rs"]
mod tests;
