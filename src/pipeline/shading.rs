use crate::core::color::{Color, confine};
use crate::core::math::vector::normalize_or_zero;
use crate::core::math::{Real, Vector};
use crate::error::RenderError;
use crate::scene::light::Light;
use crate::scene::material::Material;
use std::fmt;
use std::str::FromStr;

/// Fraction of the material's ambient coefficient that is always lit.
pub const AMBIENT_FACTOR: Real = 0.1;

/// Local illumination function: lights, viewer, surface and material -> color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReflectionModel {
    /// Base color, no lighting.
    Null,
    /// Mirror-reflection specular term `max(R.V, 0)^shininess`.
    #[default]
    Phong,
    /// Half-vector specular term `max(N.H, 0)^shininess`.
    BlinnPhong,
}

impl ReflectionModel {
    /// Evaluates the model at one surface point.
    ///
    /// `view_dir` points from the surface toward the eye. `normal` need not be
    /// unit length (interpolated normals are renormalized here).
    ///
    /// Lights behind the surface (N.L <= 0) contribute neither diffuse nor
    /// specular. The lit sum is clamped per channel to [0, 1] and then
    /// multiplied by the base color.
    pub fn evaluate(
        &self,
        lights: &[&Light],
        view_dir: &Vector,
        position: &Vector,
        normal: &Vector,
        material: &Material,
    ) -> Color {
        if *self == Self::Null {
            return material.color;
        }

        let n = normalize_or_zero(normal);
        let v = normalize_or_zero(view_dir);

        // Ambient
        let mut lit = Color::repeat(AMBIENT_FACTOR * material.ambient);

        for light in lights {
            let l = light.direction_to_light(position);
            let n_dot_l = n.dot(&l);
            if n_dot_l <= 0.0 {
                continue;
            }

            // Diffuse
            lit += light.diffuse() * (material.diffuse * n_dot_l);

            // Specular
            let spec_angle = match self {
                Self::Phong => {
                    let reflect_dir = n * (2.0 * n_dot_l) - l;
                    reflect_dir.dot(&v)
                }
                Self::BlinnPhong => {
                    let half_dir = normalize_or_zero(&(l + v));
                    n.dot(&half_dir)
                }
                Self::Null => 0.0,
            };
            let spec = spec_angle.max(0.0).powf(material.shininess);
            lit += light.specular() * (material.specular * spec);
        }

        confine(&lit).component_mul(&material.color)
    }
}

impl FromStr for ReflectionModel {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace(['-', '_', ' '], "").as_str() {
            "null" | "none" => Ok(Self::Null),
            "phong" => Ok(Self::Phong),
            "blinnphong" | "blinn" => Ok(Self::BlinnPhong),
            _ => Err(RenderError::UnsupportedConfiguration(format!(
                "unknown reflection model '{s}'"
            ))),
        }
    }
}

impl fmt::Display for ReflectionModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Null => "null",
            Self::Phong => "phong",
            Self::BlinnPhong => "blinn-phong",
        })
    }
}
