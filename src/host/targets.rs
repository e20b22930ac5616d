use glam::{Vec2, Vec3};

use crate::foundation::core::{ImageF32, Rgba};
use crate::settings::ShadowMapFormat;

/// Per-pixel outputs of the main pass, bottom row first.
#[derive(Clone, Debug, PartialEq)]
pub struct GBuffer {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Shaded color.
    pub color: Vec<Rgba>,
    /// World-space normals; zero where nothing was drawn.
    pub normal: Vec<Vec3>,
    /// Window depth in `[0, 1]`; `1.0` is background.
    pub depth: Vec<f32>,
    /// Drawable id plus one; `0` is background.
    pub id: Vec<u32>,
}

impl GBuffer {
    /// Buffers cleared to `clear`.
    pub fn new(width: u32, height: u32, clear: Rgba) -> Self {
        let n = (width as usize) * (height as usize);
        Self {
            width,
            height,
            color: vec![clear; n],
            normal: vec![Vec3::ZERO; n],
            depth: vec![1.0; n],
            id: vec![0; n],
        }
    }

    /// Reset every pixel for a new frame.
    pub fn clear(&mut self, clear: Rgba) {
        self.color.fill(clear);
        self.normal.fill(Vec3::ZERO);
        self.depth.fill(1.0);
        self.id.fill(0);
    }

    /// Linear index of `(x, y)`, if inside.
    pub fn index(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height)
            .then(|| (y as usize) * (self.width as usize) + (x as usize))
    }

    /// Copy of the color target.
    pub fn color_image(&self) -> ImageF32 {
        ImageF32 {
            width: self.width,
            height: self.height,
            data: self.color.clone(),
        }
    }
}

/// Square light-space depth map.
#[derive(Clone, Debug, PartialEq)]
pub struct DepthMap {
    /// Edge length in texels.
    pub size: u32,
    /// Storage precision.
    pub format: ShadowMapFormat,
    /// Window depths, bottom row first.
    pub data: Vec<f32>,
}

impl DepthMap {
    /// Map cleared to the far plane.
    pub fn new(size: u32, format: ShadowMapFormat) -> Self {
        Self {
            size,
            format,
            data: vec![1.0; (size as usize) * (size as usize)],
        }
    }

    /// Reset to the far plane.
    pub fn clear(&mut self) {
        self.data.fill(1.0);
    }

    /// Depth as the storage format would hold it.
    pub fn quantize(&self, depth: f32) -> f32 {
        quantize_depth(self.format, depth)
    }

    /// Keep the nearer of the stored depth and `depth` at texel `(x, y)`.
    pub fn store_min(&mut self, x: u32, y: u32, depth: f32) {
        if x >= self.size || y >= self.size {
            return;
        }
        let q = self.quantize(depth);
        let i = (y as usize) * (self.size as usize) + (x as usize);
        if q < self.data[i] {
            self.data[i] = q;
        }
    }

    /// Nearest-texel lookup at texture coordinates; far plane outside `[0, 1]^2`.
    pub fn sample(&self, uv: Vec2) -> f32 {
        if self.size == 0 || !(0.0..=1.0).contains(&uv.x) || !(0.0..=1.0).contains(&uv.y) {
            return 1.0;
        }
        let max = self.size - 1;
        let x = ((uv.x * self.size as f32) as u32).min(max);
        let y = ((uv.y * self.size as f32) as u32).min(max);
        self.data[(y as usize) * (self.size as usize) + (x as usize)]
    }
}

/// Clamp to `[0, 1]` and round to the precision of `format`.
pub(crate) fn quantize_depth(format: ShadowMapFormat, depth: f32) -> f32 {
    let d = depth.clamp(0.0, 1.0);
    match format {
        ShadowMapFormat::Depth16 => (d * 65535.0).round() / 65535.0,
        ShadowMapFormat::Depth32F => d,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/host/targets.rs"]
mod tests;
