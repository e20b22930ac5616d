use glam::Vec3;

use crate::foundation::core::Rgba;

/// Analytic surface.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Shape {
    /// Sphere; the outside is the front face.
    Sphere {
        /// Center in world space.
        center: Vec3,
        /// Radius.
        radius: f32,
    },
    /// Square patch of a plane; the side `normal` points to is the front face.
    Quad {
        /// Center in world space.
        center: Vec3,
        /// Front-facing normal.
        normal: Vec3,
        /// Half the edge length.
        half_extent: f32,
    },
}

/// Ray hit on a [`Shape`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hit {
    /// Ray parameter.
    pub t: f32,
    /// Surface normal facing away from the front side.
    pub normal: Vec3,
    /// Whether the ray hit the front face.
    pub front_face: bool,
}

const T_MIN: f32 = 1e-4;

impl Shape {
    /// Nearest hit along `origin + t * dir` with `t > 0`.
    ///
    /// With `cull_back_faces` a back-face hit is discarded.
    pub fn intersect(&self, origin: Vec3, dir: Vec3, cull_back_faces: bool) -> Option<Hit> {
        let hit = match *self {
            Self::Sphere { center, radius } => {
                let oc = origin - center;
                let a = dir.length_squared();
                let half_b = oc.dot(dir);
                let c = oc.length_squared() - radius * radius;
                let disc = half_b * half_b - a * c;
                if a <= 0.0 || disc < 0.0 {
                    return None;
                }
                let sq = disc.sqrt();
                let t = [(-half_b - sq) / a, (-half_b + sq) / a]
                    .into_iter()
                    .find(|&t| t > T_MIN)?;
                let normal = (origin + dir * t - center) / radius;
                Hit {
                    t,
                    normal,
                    front_face: dir.dot(normal) < 0.0,
                }
            }
            Self::Quad {
                center,
                normal,
                half_extent,
            } => {
                let n = normal.try_normalize()?;
                let denom = dir.dot(n);
                if denom.abs() <= f32::EPSILON {
                    return None;
                }
                let t = (center - origin).dot(n) / denom;
                if t <= T_MIN {
                    return None;
                }
                let local = origin + dir * t - center;
                let u = n.any_orthonormal_vector();
                let v = n.cross(u);
                if local.dot(u).abs() > half_extent || local.dot(v).abs() > half_extent {
                    return None;
                }
                Hit {
                    t,
                    normal: n,
                    front_face: denom < 0.0,
                }
            }
        };
        if cull_back_faces && !hit.front_face {
            return None;
        }
        Some(hit)
    }
}

/// Shape plus material, drawn as one object.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Primitive {
    /// Geometry.
    pub shape: Shape,
    /// Diffuse albedo.
    pub albedo: Rgba,
    /// Whether stochastic transparency may omit it.
    pub transparent: bool,
}

impl Primitive {
    /// Opaque sphere.
    pub fn sphere(center: Vec3, radius: f32, albedo: Rgba) -> Self {
        Self {
            shape: Shape::Sphere { center, radius },
            albedo,
            transparent: false,
        }
    }

    /// Opaque quad.
    pub fn quad(center: Vec3, normal: Vec3, half_extent: f32, albedo: Rgba) -> Self {
        Self {
            shape: Shape::Quad {
                center,
                normal,
                half_extent,
            },
            albedo,
            transparent: false,
        }
    }

    /// Same primitive, marked transparent.
    pub fn with_transparency(mut self) -> Self {
        self.transparent = true;
        self
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/primitive.rs"]
mod tests;
