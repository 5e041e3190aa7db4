use crate::core::color::Color;
use crate::core::math::Real;
use crate::error::{RenderError, Result};

/// Surface response to light, shared read-only between things.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    /// Base color the lit result is multiplied by.
    pub color: Color,
    pub ambient: Real,
    pub diffuse: Real,
    pub specular: Real,
    pub shininess: Real,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            color: Color::new(0.8, 0.8, 0.8),
            ambient: 1.0,
            diffuse: 0.8,
            specular: 0.5,
            shininess: 32.0,
        }
    }
}

impl Material {
    /// Reflectance coefficients must lie in [0, 1] and shininess must be positive.
    pub fn new(
        color: Color,
        ambient: Real,
        diffuse: Real,
        specular: Real,
        shininess: Real,
    ) -> Result<Self> {
        for (name, value) in [("ambient", ambient), ("diffuse", diffuse), ("specular", specular)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(RenderError::UnsupportedConfiguration(format!(
                    "{name} coefficient {value} outside [0, 1]"
                )));
            }
        }
        if shininess.is_nan() || shininess <= 0.0 {
            return Err(RenderError::UnsupportedConfiguration(format!(
                "shininess {shininess} must be positive"
            )));
        }
        Ok(Self {
            color,
            ambient,
            diffuse,
            specular,
            shininess,
        })
    }

    /// Material that shows its base color under the Null reflection model.
    pub fn solid(color: Color) -> Self {
        Self {
            color,
            ..Self::default()
        }
    }
}
