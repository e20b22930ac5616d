use glam::Vec2;

use crate::foundation::error::ProgressaResult;
use crate::host::targets::{DepthMap, GBuffer};
use crate::host::uniforms::UniformBlock;
use crate::settings::{ColorFormat, ShadowMapFormat};

/// Passes issued per paint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PassKind {
    /// Light-space depth into the shadow map.
    Shadow,
    /// Camera-space color, normal, depth and id.
    Main,
}

/// Completeness of the backend's render targets.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TargetStatus {
    /// All attachments usable.
    Complete,
    /// Some attachment is unusable; the frame proceeds with undefined output.
    Incomplete(String),
}

/// Shape of every size-dependent target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TargetDesc {
    /// Viewport width in pixels.
    pub width: u32,
    /// Viewport height in pixels.
    pub height: u32,
    /// Color attachment format.
    pub color_format: ColorFormat,
    /// Shadow map edge length.
    pub shadow_map_size: u32,
    /// Shadow map depth format.
    pub shadow_map_format: ShadowMapFormat,
}

/// Framebuffer and program host.
///
/// Uniforms passed to [`RenderBackend::begin_pass`] are visible to every draw until
/// [`RenderBackend::end_pass`].
pub trait RenderBackend {
    /// (Re)allocate every size-dependent target.
    fn resize_targets(&mut self, desc: &TargetDesc) -> ProgressaResult<()>;

    /// Report whether targets are complete.
    fn target_status(&self) -> TargetStatus;

    /// Clear the pass's targets and bind `uniforms`.
    fn begin_pass(&mut self, pass: PassKind, uniforms: &UniformBlock) -> ProgressaResult<()>;

    /// Finish the pass.
    fn end_pass(&mut self, pass: PassKind) -> ProgressaResult<()>;

    /// Main pass outputs.
    fn gbuffer(&self) -> &GBuffer;

    /// Shadow pass output.
    fn shadow_map(&self) -> &DepthMap;

    /// Window depth at `window` (pixels, bottom-left origin); `None` outside the targets.
    fn depth_at(&self, window: Vec2) -> Option<f32> {
        let g = self.gbuffer();
        if window.x < 0.0 || window.y < 0.0 {
            return None;
        }
        g.index(window.x as u32, window.y as u32).map(|i| g.depth[i])
    }
}

/// One piece of scene content.
pub trait Drawable<B: ?Sized> {
    /// Issue draws for this object; `id` is stable for the lifetime of the scene.
    fn draw(&self, id: u32, backend: &mut B) -> ProgressaResult<()>;

    /// Whether stochastic transparency may omit this object.
    fn transparent(&self) -> bool {
        true
    }
}
