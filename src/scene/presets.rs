use glam::Vec3;

use crate::foundation::core::{Camera, Projection};
use crate::scene::primitive::Primitive;
use crate::settings::RenderSettings;

/// Built-in demo scenes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenePreset {
    /// Overlapping transparent spheres in front of a wall.
    TransparencyTest,
    /// Spheres over a floor under a raised light.
    ShadowStudy,
    /// A receding row of spheres for depth of field.
    FocusRow,
}

impl ScenePreset {
    /// Every preset, in menu order.
    pub const ALL: [Self; 3] = [Self::TransparencyTest, Self::ShadowStudy, Self::FocusRow];

    /// Stable snake_case name.
    pub fn name(self) -> &'static str {
        match self {
            Self::TransparencyTest => "transparency_test",
            Self::ShadowStudy => "shadow_study",
            Self::FocusRow => "focus_row",
        }
    }

    /// Inverse of [`ScenePreset::name`].
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }

    /// Build the scene.
    pub fn build(self) -> SceneDescription {
        match self {
            Self::TransparencyTest => transparency_test(),
            Self::ShadowStudy => shadow_study(),
            Self::FocusRow => focus_row(),
        }
    }
}

/// Scene content plus the camera and settings it was authored for.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SceneDescription {
    /// Display name.
    pub name: String,
    /// Initial camera.
    pub camera: Camera,
    /// Clip planes.
    pub near_far: (f32, f32),
    /// Ambient occlusion `(radius, intensity)`.
    pub ssao: (f32, f32),
    /// Whether shadows are on.
    pub shadows: bool,
    /// Light eye.
    pub light_position: Vec3,
    /// Light disc radius.
    pub light_max_shift: f32,
    /// Whether stochastic transparency is on.
    pub transparency: bool,
    /// Objects, drawn in order.
    pub primitives: Vec<Primitive>,
}

impl SceneDescription {
    /// Projection with the scene's clip planes and the default field of view.
    pub fn projection(&self) -> Projection {
        Projection {
            near: self.near_far.0,
            far: self.near_far.1,
            ..Projection::default()
        }
    }

    /// Push the scene's authored values into `settings`.
    pub fn apply_to(&self, settings: &mut RenderSettings) {
        settings.set_ssao_radius(self.ssao.0);
        settings.set_ssao_intensity(self.ssao.1);
        settings.set_shadows(self.shadows);
        settings.set_light_position(self.light_position);
        settings.set_max_light_shift(self.light_max_shift);
        settings.set_transparency_enabled(self.transparency);
    }
}

const FLOOR: [f32; 4] = [0.78, 0.78, 0.74, 1.0];

fn floor(half_extent: f32) -> Primitive {
    Primitive::quad(Vec3::ZERO, Vec3::Y, half_extent, FLOOR)
}

fn transparency_test() -> SceneDescription {
    SceneDescription {
        name: "transparency test".into(),
        camera: Camera::new(Vec3::new(0.0, 1.2, 4.5), Vec3::new(0.0, 0.8, 0.0), Vec3::Y),
        near_far: (0.3, 30.0),
        ssao: (0.05, 1.0),
        shadows: true,
        light_position: Vec3::new(0.0, 5.0, 0.0),
        light_max_shift: 0.1,
        transparency: true,
        primitives: vec![
            floor(4.0),
            Primitive::quad(Vec3::new(0.0, 2.0, -2.0), Vec3::Z, 2.0, [0.6, 0.65, 0.8, 1.0]),
            Primitive::sphere(Vec3::new(-0.6, 0.8, 0.0), 0.6, [0.9, 0.2, 0.2, 1.0])
                .with_transparency(),
            Primitive::sphere(Vec3::new(0.3, 0.8, -0.5), 0.6, [0.2, 0.8, 0.3, 1.0])
                .with_transparency(),
            Primitive::sphere(Vec3::new(0.0, 0.5, 1.0), 0.4, [0.2, 0.3, 0.9, 1.0]),
        ],
    }
}

fn shadow_study() -> SceneDescription {
    SceneDescription {
        name: "shadow study".into(),
        camera: Camera::new(Vec3::new(3.0, 3.0, 5.0), Vec3::ZERO, Vec3::Y),
        near_far: (0.3, 40.0),
        ssao: (0.1, 1.5),
        shadows: true,
        light_position: Vec3::new(1.0, 6.0, 1.0),
        light_max_shift: 0.4,
        transparency: false,
        primitives: vec![
            floor(6.0),
            Primitive::sphere(Vec3::new(0.0, 1.0, 0.0), 1.0, [0.85, 0.85, 0.85, 1.0]),
            Primitive::sphere(Vec3::new(1.6, 0.4, 1.0), 0.4, [0.9, 0.6, 0.2, 1.0]),
            Primitive::sphere(Vec3::new(-1.5, 0.6, 0.8), 0.6, [0.3, 0.5, 0.9, 1.0]),
        ],
    }
}

fn focus_row() -> SceneDescription {
    let primitives = std::iter::once(floor(10.0))
        .chain((0..6).map(|i| {
            let z = 1.5 - 2.0 * i as f32;
            let hue = i as f32 / 6.0;
            Primitive::sphere(
                Vec3::new(if i % 2 == 0 { -0.6 } else { 0.6 }, 0.5, z),
                0.5,
                [0.3 + 0.6 * hue, 0.8 - 0.5 * hue, 0.4, 1.0],
            )
        }))
        .collect();
    SceneDescription {
        name: "focus row".into(),
        camera: Camera::new(Vec3::new(0.0, 1.0, 5.0), Vec3::new(0.0, 0.5, -4.0), Vec3::Y),
        near_far: (0.3, 30.0),
        ssao: (0.05, 1.0),
        shadows: true,
        light_position: Vec3::new(-2.0, 6.0, 2.0),
        light_max_shift: 0.1,
        transparency: false,
        primitives,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/presets.rs"]
mod tests;
