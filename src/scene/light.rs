use crate::core::color::{self, Color};
use crate::core::math::vector::{normalize_or_zero, transform_point, try_normalize};
use crate::core::math::{Real, Vector};
use crate::error::Result;
use nalgebra::{Matrix4, Vector4};

/// Represents a light source in the scene.
#[derive(Debug, Clone, PartialEq)]
pub enum Light {
    /// A light source that is infinitely far away (e.g., Sun).
    /// `direction` is a unit vector pointing from the scene toward the light.
    Directional {
        direction: Vector,
        diffuse: Color,
        specular: Color,
    },
    /// A light source at a specific position that radiates in all directions.
    Point {
        position: Vector,
        diffuse: Color,
        specular: Color,
    },
}

impl Light {
    /// White point light.
    pub fn new_point(position: Vector) -> Self {
        Self::Point {
            position,
            diffuse: color::white(),
            specular: color::white(),
        }
    }

    /// White directional light. Fails on a zero-length direction.
    pub fn new_directional(direction: Vector) -> Result<Self> {
        Ok(Self::Directional {
            direction: try_normalize(&direction)?,
            diffuse: color::white(),
            specular: color::white(),
        })
    }

    /// Replaces both light colors.
    pub fn with_colors(self, diffuse: Color, specular: Color) -> Self {
        match self {
            Self::Directional { direction, .. } => Self::Directional {
                direction,
                diffuse,
                specular,
            },
            Self::Point { position, .. } => Self::Point {
                position,
                diffuse,
                specular,
            },
        }
    }

    /// Unit vector FROM the surface point TO the light source.
    pub fn direction_to_light(&self, surface_point: &Vector) -> Vector {
        match self {
            Self::Directional { direction, .. } => *direction,
            Self::Point { position, .. } => normalize_or_zero(&(position - surface_point)),
        }
    }

    /// Where the light sits. Directional lights are pushed out to `Real::MAX`
    /// along their direction.
    pub fn effective_position(&self) -> Vector {
        match self {
            Self::Directional { direction, .. } => direction * Real::MAX,
            Self::Point { position, .. } => *position,
        }
    }

    pub fn diffuse(&self) -> Color {
        match self {
            Self::Directional { diffuse, .. } | Self::Point { diffuse, .. } => *diffuse,
        }
    }

    pub fn specular(&self) -> Color {
        match self {
            Self::Directional { specular, .. } | Self::Point { specular, .. } => *specular,
        }
    }

    /// The same light moved by `m`. Positions take the full transform,
    /// directions only its linear part.
    pub fn transformed(&self, m: &Matrix4<Real>) -> Self {
        match *self {
            Self::Directional { direction, diffuse, specular } => {
                let d = m * Vector4::new(direction.x, direction.y, direction.z, 0.0);
                Self::Directional {
                    direction: normalize_or_zero(&d.xyz()),
                    diffuse,
                    specular,
                }
            }
            Self::Point { position, diffuse, specular } => Self::Point {
                position: transform_point(m, &position),
                diffuse,
                specular,
            },
        }
    }
}
