use crate::foundation::error::{ProgressaError, ProgressaResult};

pub use glam::{Mat3, Mat4, Vec2, Vec3, Vec4};

/// Linear RGBA color with straight alpha, one `f32` per channel.
pub type Rgba = [f32; 4];

/// Render area in target pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    /// Left edge in pixels.
    pub x: i32,
    /// Bottom edge in pixels.
    pub y: i32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Viewport {
    /// Viewport anchored at the origin.
    pub fn sized(width: u32, height: u32) -> Self {
        Self {
            x: 0,
            y: 0,
            width,
            height,
        }
    }

    /// Return `true` when either dimension is zero.
    pub fn is_degenerate(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Dimensions as a float vector.
    pub fn size(self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    /// Width over height; `1.0` for degenerate viewports.
    pub fn aspect(self) -> f32 {
        if self.is_degenerate() {
            return 1.0;
        }
        self.width as f32 / self.height as f32
    }

    /// Number of pixels covered.
    pub fn pixel_count(self) -> usize {
        (self.width as usize).saturating_mul(self.height as usize)
    }
}

/// Look-at camera as supplied by the host.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Camera {
    /// Eye position in world space.
    pub eye: Vec3,
    /// Point the camera looks at.
    pub center: Vec3,
    /// Up hint.
    pub up: Vec3,
}

impl Camera {
    /// Create a camera.
    pub fn new(eye: Vec3, center: Vec3, up: Vec3) -> Self {
        Self { eye, center, up }
    }

    /// World-to-view transform (right-handed).
    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.center, self.up)
    }

    /// Normalized viewing direction; `-Z` when eye and center coincide.
    pub fn direction(&self) -> Vec3 {
        (self.center - self.eye).try_normalize().unwrap_or(Vec3::NEG_Z)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 1.5, 6.0),
            center: Vec3::ZERO,
            up: Vec3::Y,
        }
    }
}

/// Perspective projection parameters. The aspect ratio comes from the viewport.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Projection {
    /// Vertical field of view in radians.
    pub fovy: f32,
    /// Near plane distance.
    pub near: f32,
    /// Far plane distance.
    pub far: f32,
}

impl Projection {
    /// OpenGL-style clip transform (`z` in `[-1, 1]`).
    pub fn matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh_gl(self.fovy, aspect, self.near, self.far)
    }
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            fovy: 50f32.to_radians(),
            near: 0.3,
            far: 30.0,
        }
    }
}

/// Row-major RGBA image with `f32` channels, bottom row first like a GL texture.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageF32 {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixels, `width * height` entries.
    pub data: Vec<Rgba>,
}

impl ImageF32 {
    /// Create an image filled with `fill`.
    pub fn new(width: u32, height: u32, fill: Rgba) -> Self {
        Self {
            width,
            height,
            data: vec![fill; (width as usize) * (height as usize)],
        }
    }

    /// Wrap existing pixels, validating the length.
    pub fn from_pixels(width: u32, height: u32, data: Vec<Rgba>) -> ProgressaResult<Self> {
        if data.len() != (width as usize) * (height as usize) {
            return Err(ProgressaError::validation(
                "image pixel count must equal width*height",
            ));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Return `true` when both images share dimensions.
    pub fn same_size(&self, other: &Self) -> bool {
        self.width == other.width && self.height == other.height
    }

    /// Pixel at `(x, y)`; `None` outside the image.
    pub fn get(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data
            .get((y as usize) * (self.width as usize) + (x as usize))
            .copied()
    }

    /// Quantize to straight RGBA8, flipping rows so the first row is the top of the picture.
    pub fn to_rgba8_top_down(&self) -> Vec<u8> {
        let w = self.width as usize;
        let mut out = Vec::with_capacity(self.data.len() * 4);
        for row in self.data.chunks_exact(w.max(1)).rev() {
            for px in row {
                for c in px {
                    out.push((c.clamp(0.0, 1.0) * 255.0).round() as u8);
                }
            }
        }
        out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
