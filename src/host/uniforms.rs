use std::collections::BTreeMap;

use glam::{Mat4, Vec2, Vec3, Vec4};

/// Uniform names written by the renderer.
pub mod names {
    /// `vec2`: subpixel jitter as a fraction of the viewport.
    pub const SUBPIXEL_SHIFT: &str = "subpixelShift";
    /// `mat4`: jittered camera view.
    pub const VIEW_MATRIX: &str = "viewMatrix";
    /// `mat4`: unjittered projection.
    pub const PROJECTION: &str = "projection";
    /// `float`: focal distance.
    pub const FOCAL_PLANE: &str = "focalPlane";
    /// `vec2`: plane DoF shear.
    pub const SHEARING_FACTOR: &str = "shearingFactor";
    /// `uint`: accumulation frame.
    pub const FRAME: &str = "frame";
    /// `vec2`: viewport size in pixels.
    pub const VIEWPORT: &str = "viewport";
    /// `float`: transparency level.
    pub const TRANSPARENCY: &str = "transparency";
    /// `vec3`: shifted light eye.
    pub const LIGHT_SOURCE: &str = "lightSource";
    /// `mat4`: world to shadow-map texture space.
    pub const BIASED_DEPTH_TRANSFORM: &str = "biasedDepthTransform";
    /// `bool`: whether the shadow map is valid.
    pub const SHADOWS_ENABLED: &str = "shadowsEnabled";
    /// `bool`: cull back faces.
    pub const BACK_FACE_CULLING: &str = "backFaceCulling";
    /// `vec4`: color target clear value.
    pub const CLEAR_COLOR: &str = "clearColor";
    /// `mat4`: light view-projection (shadow pass).
    pub const TRANSFORM: &str = "transform";
    /// `float`: near plane.
    pub const NEAR_Z: &str = "nearZ";
    /// `float`: far plane.
    pub const FAR_Z: &str = "farZ";
}

/// One typed uniform value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum UniformValue {
    /// `float`
    Float(f32),
    /// `uint`
    UInt(u32),
    /// `bool`
    Bool(bool),
    /// `vec2`
    Vec2(Vec2),
    /// `vec3`
    Vec3(Vec3),
    /// `vec4`
    Vec4(Vec4),
    /// `mat4`
    Mat4(Mat4),
}

macro_rules! impl_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(impl From<$ty> for UniformValue {
            fn from(v: $ty) -> Self {
                Self::$variant(v)
            }
        })*
    };
}

impl_from!(
    f32 => Float,
    u32 => UInt,
    bool => Bool,
    Vec2 => Vec2,
    Vec3 => Vec3,
    Vec4 => Vec4,
    Mat4 => Mat4,
);

/// Named uniforms for one pass, visible to every draw issued in that pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UniformBlock {
    values: BTreeMap<&'static str, UniformValue>,
}

impl UniformBlock {
    /// Empty block.
    pub fn new() -> Self {
        Self::default()
    }

    /// Write a uniform, replacing any previous value.
    pub fn set(&mut self, name: &'static str, value: impl Into<UniformValue>) -> &mut Self {
        self.values.insert(name, value.into());
        self
    }

    /// Raw value.
    pub fn get(&self, name: &str) -> Option<UniformValue> {
        self.values.get(name).copied()
    }

    /// `float` value.
    pub fn float(&self, name: &str) -> Option<f32> {
        match self.get(name)? {
            UniformValue::Float(v) => Some(v),
            _ => None,
        }
    }

    /// `uint` value.
    pub fn uint(&self, name: &str) -> Option<u32> {
        match self.get(name)? {
            UniformValue::UInt(v) => Some(v),
            _ => None,
        }
    }

    /// `bool` value.
    pub fn bool(&self, name: &str) -> Option<bool> {
        match self.get(name)? {
            UniformValue::Bool(v) => Some(v),
            _ => None,
        }
    }

    /// `vec2` value.
    pub fn vec2(&self, name: &str) -> Option<Vec2> {
        match self.get(name)? {
            UniformValue::Vec2(v) => Some(v),
            _ => None,
        }
    }

    /// `vec3` value.
    pub fn vec3(&self, name: &str) -> Option<Vec3> {
        match self.get(name)? {
            UniformValue::Vec3(v) => Some(v),
            _ => None,
        }
    }

    /// `vec4` value.
    pub fn vec4(&self, name: &str) -> Option<Vec4> {
        match self.get(name)? {
            UniformValue::Vec4(v) => Some(v),
            _ => None,
        }
    }

    /// `mat4` value.
    pub fn mat4(&self, name: &str) -> Option<Mat4> {
        match self.get(name)? {
            UniformValue::Mat4(v) => Some(v),
            _ => None,
        }
    }

    /// Number of uniforms written.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Return `true` when nothing was written.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Uniforms in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, UniformValue)> + '_ {
        self.values.iter().map(|(k, v)| (*k, *v))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/host/uniforms.rs"]
mod tests;
