use glam::{Mat4, Vec2, Vec4};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::accum::{AccumulationBuffer, OutputSources, compose_output};
use crate::foundation::core::{Camera, ImageF32, Projection, Viewport};
use crate::foundation::error::ProgressaResult;
use crate::foundation::math::unproject;
use crate::frame::{AccumFrame, FrameDriver, FrameState};
use crate::host::backend::{Drawable, PassKind, RenderBackend, TargetDesc, TargetStatus};
use crate::host::capabilities::Capabilities;
use crate::host::input::CursorState;
use crate::host::uniforms::{UniformBlock, names};
use crate::invalidate::InvalidationTracker;
use crate::perf::PerfCounter;
use crate::perturb::{FrameInput, KernelSet, PerturbationVector, compute_perturbation};
use crate::post::{SsaoSamples, apply_occlusion, occlusion_map};
use crate::settings::{OutputChannel, RenderSettings};
use crate::shadow::{ShadowStage, ShadowTransforms};
use crate::transparency::TransparencyMasks;

/// Smallest focal depth change that focus-at-cursor applies.
const FOCUS_THRESHOLD: f32 = 0.01;

/// What happened during one [`ProgressiveRenderer::paint`].
#[derive(Clone, Debug, PartialEq)]
pub struct PaintReport {
    /// Counters the frame was rendered with (before advancing).
    pub state: FrameState,
    /// How the frame was blended into the history.
    pub accumulation: AccumFrame,
    /// Whether accumulation restarted at this paint.
    pub invalidated: bool,
    /// Whether the camera transform changed since the previous paint.
    pub camera_changed: bool,
    /// Whether render targets were reallocated.
    pub resized: bool,
    /// Jitter applied to the frame.
    pub perturbation: PerturbationVector,
    /// Light transforms, when shadows are enabled.
    pub shadow: Option<ShadowTransforms>,
    /// Backend target status observed this paint.
    pub target_status: TargetStatus,
}

/// Progressive render loop.
///
/// Each paint renders one jittered frame and blends it into the running average. Any change of
/// camera, viewport, settings or scene size restarts the average.
pub struct ProgressiveRenderer {
    settings: RenderSettings,
    seen_generation: Option<u64>,
    driver: FrameDriver,
    tracker: InvalidationTracker,
    kernels: KernelSet,
    masks: TransparencyMasks,
    accum: AccumulationBuffer,
    targets: Option<TargetDesc>,
    objects: Option<usize>,
    display: Option<ImageF32>,
    perf: PerfCounter,
    rng: StdRng,
}

impl ProgressiveRenderer {
    /// Renderer seeded from OS entropy.
    pub fn new(settings: RenderSettings) -> Self {
        Self::with_rng(settings, StdRng::from_entropy())
    }

    /// Renderer with a fixed seed for transparency masks, ambient occlusion and random sampling.
    pub fn with_seed(settings: RenderSettings, seed: u64) -> Self {
        Self::with_rng(settings, StdRng::seed_from_u64(seed))
    }

    fn with_rng(settings: RenderSettings, rng: StdRng) -> Self {
        let settings = settings.sanitized();
        Self {
            driver: FrameDriver::new(settings.max_frames()),
            tracker: InvalidationTracker::new(settings.camera_compare()),
            kernels: KernelSet::from_settings(&settings),
            seen_generation: Some(settings.generation()),
            settings,
            masks: TransparencyMasks::default(),
            accum: AccumulationBuffer::new(),
            targets: None,
            objects: None,
            display: None,
            perf: PerfCounter::new(),
            rng,
        }
    }

    /// Current settings.
    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    /// Mutable settings; output-affecting changes restart accumulation at the next paint.
    pub fn settings_mut(&mut self) -> &mut RenderSettings {
        &mut self.settings
    }

    /// Replace every setting and restart accumulation at the next paint.
    pub fn set_settings(&mut self, settings: RenderSettings) {
        self.settings = settings.sanitized();
        self.seen_generation = None;
    }

    /// Counters of the frame the next paint renders.
    pub fn frame_state(&self) -> FrameState {
        self.driver.state()
    }

    /// Active jitter kernels.
    pub fn kernels(&self) -> &KernelSet {
        &self.kernels
    }

    /// Replace the jitter kernels, e.g. with externally generated ones. Restarts accumulation.
    pub fn set_kernels(&mut self, kernels: KernelSet) {
        self.kernels = kernels;
        self.driver.reset();
    }

    /// Image shown after the last paint, per the selected output channel.
    pub fn display(&self) -> Option<&ImageF32> {
        self.display.as_ref()
    }

    /// Accumulated history.
    pub fn history(&self) -> Option<&ImageF32> {
        self.accum.history()
    }

    /// Smoothed stage timings.
    pub fn perf(&self) -> &PerfCounter {
        &self.perf
    }

    /// Drop the history and restart at frame 0.
    pub fn reset(&mut self) {
        self.driver.reset();
        self.tracker.forget();
        self.accum.clear();
    }

    /// Render one frame and fold it into the accumulation.
    ///
    /// Returns `None` without touching the backend when the viewport is degenerate.
    #[tracing::instrument(level = "debug", skip_all, fields(objects = drawables.len()))]
    pub fn paint<C, B, D>(
        &mut self,
        caps: &C,
        backend: &mut B,
        drawables: &[D],
    ) -> ProgressaResult<Option<PaintReport>>
    where
        C: Capabilities + ?Sized,
        B: RenderBackend + ?Sized,
        D: Drawable<B>,
    {
        let viewport = caps.viewport();
        if viewport.is_degenerate() {
            tracing::debug!(?viewport, "degenerate viewport; paint skipped");
            return Ok(None);
        }
        let camera = caps.camera();
        let projection = caps.projection();
        let cursor = caps.cursor();

        if self.settings.dof_at_cursor() || cursor.ctrl_pressed {
            self.focus_at_cursor(&cursor, viewport, &camera, &projection, &*backend);
        }

        let mut invalidated = self.sync_settings();

        let desc = self.target_desc(viewport);
        let resized = self.targets != Some(desc);
        if resized {
            tracing::debug!(width = desc.width, height = desc.height, "reallocating render targets");
            backend.resize_targets(&desc)?;
            self.targets = Some(desc);
            self.driver.reset();
            self.accum.clear();
            invalidated = true;
        }
        let target_status = backend.target_status();
        if let TargetStatus::Incomplete(reason) = &target_status {
            tracing::warn!(%reason, "render target incomplete; frame output is undefined");
        }

        if self.objects != Some(drawables.len()) {
            self.objects = Some(drawables.len());
            self.driver.reset();
            invalidated = true;
        }
        let s = &self.settings;
        if self.masks.is_stale(drawables.len(), s.transparency_samples(), s.transparency()) {
            self.masks = TransparencyMasks::build(
                drawables.len(),
                s.transparency_samples(),
                s.transparency(),
                &mut self.rng,
            );
        }

        let proj_matrix = projection.matrix(viewport.aspect());
        let camera_changed = self.tracker.has_scene_changed(proj_matrix * camera.view());
        if camera_changed {
            self.driver.reset();
            invalidated = true;
        }

        let state = self.driver.state();
        let input = FrameInput {
            camera,
            viewport,
            camera_changed,
            sample: state.sample,
        };
        let perturbation = compute_perturbation(&input, &self.kernels, &self.settings, &mut self.rng);

        let masks = &self.masks;
        let use_masks = self.settings.transparency_enabled();
        let visible = |i: usize| {
            !use_masks || !drawables[i].transparent() || masks.visible(i, state.sample)
        };

        let light = self.settings.light();
        let shadow = if self.settings.shadows() {
            Some(self.perf.measure("shadow", || {
                ShadowStage::render(
                    &light,
                    perturbation.light_shift,
                    &projection,
                    backend,
                    drawables,
                    &visible,
                )
            })?)
        } else {
            None
        };

        let jittered = perturbation.jittered_camera(&camera);
        let uniforms = self.main_uniforms(&perturbation, &jittered, proj_matrix, viewport, state, shadow);
        self.perf.measure("scene", || -> ProgressaResult<()> {
            backend.begin_pass(PassKind::Main, &uniforms)?;
            let drawn = drawables
                .iter()
                .enumerate()
                .filter(|(i, _)| visible(*i))
                .try_for_each(|(i, d)| d.draw(i as u32, backend));
            backend.end_pass(PassKind::Main)?;
            drawn
        })?;

        let ssao = self.settings.ssao();
        let occlusion = ssao.enabled.then(|| {
            let samples = SsaoSamples::regenerate(ssao.noise, &mut self.rng);
            self.perf.measure("ssao", || {
                occlusion_map(backend.gbuffer(), jittered.view(), proj_matrix, &samples, &ssao)
            })
        });

        let accumulation = self.driver.accumulation_frame();
        let channel = self.settings.output();
        let accum = &mut self.accum;
        let display = self.perf.measure("accumulate", || {
            let frame = backend.gbuffer().color_image();
            let accumulated = accum.accumulate(&frame, accumulation);
            let mut out = compose_output(
                channel,
                &OutputSources {
                    accumulated,
                    gbuffer: backend.gbuffer(),
                    occlusion: occlusion.as_deref(),
                    shadow_map: backend.shadow_map(),
                    near: projection.near,
                    far: projection.far,
                },
            );
            if channel == OutputChannel::Final
                && let Some(occ) = &occlusion
            {
                apply_occlusion(&mut out, occ);
            }
            out
        });
        self.display = Some(display);
        self.driver.advance();

        tracing::debug!(
            frame = state.frame,
            sample = state.sample,
            invalidated,
            perf = %self.perf.summary(),
            "paint done"
        );
        Ok(Some(PaintReport {
            state,
            accumulation,
            invalidated,
            camera_changed,
            resized,
            perturbation,
            shadow,
            target_status,
        }))
    }

    /// Pick up a new settings generation. Returns `true` when it restarted accumulation.
    fn sync_settings(&mut self) -> bool {
        let generation = self.settings.generation();
        if self.seen_generation == Some(generation) {
            return false;
        }
        tracing::debug!(generation, "settings changed");
        self.seen_generation = Some(generation);
        self.kernels.sync(&self.settings);
        self.driver.set_max_frames(self.settings.max_frames());
        self.tracker.set_compare(self.settings.camera_compare());
        self.driver.reset();
        true
    }

    fn target_desc(&self, viewport: Viewport) -> TargetDesc {
        TargetDesc {
            width: viewport.width,
            height: viewport.height,
            color_format: self.settings.color_format(),
            shadow_map_size: self.settings.shadow_map_size(),
            shadow_map_format: self.settings.shadow_map_format(),
        }
    }

    /// Move the focal plane to the surface under the cursor.
    fn focus_at_cursor<B: RenderBackend + ?Sized>(
        &mut self,
        cursor: &CursorState,
        viewport: Viewport,
        camera: &Camera,
        projection: &Projection,
        backend: &B,
    ) {
        // The G-buffer still holds the previous size until the resize below.
        match self.targets {
            Some(t) if t.width == viewport.width && t.height == viewport.height => {}
            _ => return,
        }
        let local = Vec2::new(cursor.position.x, viewport.height as f32 - 1.0 - cursor.position.y);
        let Some(depth) = backend.depth_at(local) else {
            return;
        };
        if depth >= 1.0 - f32::EPSILON {
            return;
        }
        let view = camera.view();
        let inv_view_proj = (projection.matrix(viewport.aspect()) * view).inverse();
        let origin = Vec2::new(viewport.x as f32, viewport.y as f32);
        let world = unproject(origin + local.floor() + 0.5, depth, inv_view_proj, viewport);
        let distance = -view.transform_point3(world).z;
        if !distance.is_finite() {
            return;
        }
        if (distance - self.settings.focal_depth()).abs() > FOCUS_THRESHOLD {
            tracing::debug!(distance, "focus moved to cursor");
            self.settings.set_focal_depth(distance);
        }
    }

    fn main_uniforms(
        &self,
        p: &PerturbationVector,
        jittered: &Camera,
        projection: Mat4,
        viewport: Viewport,
        state: FrameState,
        shadow: Option<ShadowTransforms>,
    ) -> UniformBlock {
        let s = &self.settings;
        let light = s.light();
        let mut u = UniformBlock::new();
        u.set(names::VIEW_MATRIX, jittered.view())
            .set(names::PROJECTION, projection)
            .set(names::SUBPIXEL_SHIFT, p.subpixel_shift)
            .set(names::SHEARING_FACTOR, p.shear())
            .set(names::FOCAL_PLANE, s.focal_depth())
            .set(names::FRAME, state.frame)
            .set(names::VIEWPORT, viewport.size())
            .set(names::TRANSPARENCY, s.transparency())
            .set(names::LIGHT_SOURCE, light.position + p.light_shift)
            .set(names::SHADOWS_ENABLED, shadow.is_some())
            .set(names::BACK_FACE_CULLING, s.back_face_culling())
            .set(names::CLEAR_COLOR, Vec4::from_array(s.background()));
        if let Some(t) = shadow {
            u.set(names::BIASED_DEPTH_TRANSFORM, t.biased);
        }
        u
    }
}

impl Default for ProgressiveRenderer {
    fn default() -> Self {
        Self::new(RenderSettings::default())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/renderer/paint.rs"]
mod tests;
