use crate::foundation::core::{Camera, Projection, Viewport};
use crate::host::input::{CursorState, InputHandle};

/// State the renderer pulls from its host at the start of each paint.
pub trait Capabilities {
    /// Current viewport.
    fn viewport(&self) -> Viewport;
    /// Current projection parameters.
    fn projection(&self) -> Projection;
    /// Current, unjittered camera.
    fn camera(&self) -> Camera;
    /// Last cursor position and modifier state.
    fn cursor(&self) -> CursorState;
}

/// Plain-value capabilities for headless hosts and tests.
#[derive(Clone, Debug, Default)]
pub struct StaticCapabilities {
    /// Viewport returned by [`Capabilities::viewport`].
    pub viewport: Viewport,
    /// Projection returned by [`Capabilities::projection`].
    pub projection: Projection,
    /// Camera returned by [`Capabilities::camera`].
    pub camera: Camera,
    /// Input state read by [`Capabilities::cursor`].
    pub input: InputHandle,
}

impl StaticCapabilities {
    /// Capabilities with default camera and projection.
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            ..Self::default()
        }
    }
}

impl Capabilities for StaticCapabilities {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn projection(&self) -> Projection {
        self.projection
    }

    fn camera(&self) -> Camera {
        self.camera
    }

    fn cursor(&self) -> CursorState {
        self.input.snapshot()
    }
}
