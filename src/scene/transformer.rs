use crate::core::geometry::Triangle;
use crate::core::math::matrix::invert4;
use crate::core::math::transform::TransformFactory;
use crate::core::math::vector::{normalize_or_zero, transform_point};
use crate::core::math::{Real, Vector};
use crate::error::Result;
use nalgebra::{Matrix4, Vector4};

/// Object placement: location, rotation (radians, X then Y then Z) and scale.
///
/// The model matrix and its inverse are rebuilt by every setter, and a setter
/// that would make the model singular leaves the transformer untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct Transformer {
    location: Vector,
    rotation: Vector,
    scale: Vector,
    model: Matrix4<Real>,
    inverse: Matrix4<Real>,
}

impl Default for Transformer {
    fn default() -> Self {
        Self {
            location: Vector::zeros(),
            rotation: Vector::zeros(),
            scale: Vector::repeat(1.0),
            model: Matrix4::identity(),
            inverse: Matrix4::identity(),
        }
    }
}

impl Transformer {
    /// Fails with `DegenerateGeometry` when any scale component is zero.
    pub fn new(location: Vector, rotation: Vector, scale: Vector) -> Result<Self> {
        let (model, inverse) = Self::matrices(&location, &rotation, &scale)?;
        Ok(Self {
            location,
            rotation,
            scale,
            model,
            inverse,
        })
    }

    /// Pure translation.
    pub fn at(location: Vector) -> Self {
        Self {
            location,
            model: TransformFactory::translation(&location),
            inverse: TransformFactory::translation(&-location),
            ..Self::default()
        }
    }

    fn matrices(
        location: &Vector,
        rotation: &Vector,
        scale: &Vector,
    ) -> Result<(Matrix4<Real>, Matrix4<Real>)> {
        let model = TransformFactory::model(location, rotation, scale);
        let inverse = invert4(&model)?;
        Ok((model, inverse))
    }

    fn rebuild(&mut self, location: Vector, rotation: Vector, scale: Vector) -> Result<()> {
        let (model, inverse) = Self::matrices(&location, &rotation, &scale)?;
        self.location = location;
        self.rotation = rotation;
        self.scale = scale;
        self.model = model;
        self.inverse = inverse;
        Ok(())
    }

    pub fn set_location(&mut self, location: Vector) -> Result<()> {
        self.rebuild(location, self.rotation, self.scale)
    }

    pub fn set_rotation(&mut self, rotation: Vector) -> Result<()> {
        self.rebuild(self.location, rotation, self.scale)
    }

    pub fn set_scale(&mut self, scale: Vector) -> Result<()> {
        self.rebuild(self.location, self.rotation, scale)
    }

    pub fn location(&self) -> Vector {
        self.location
    }

    pub fn rotation(&self) -> Vector {
        self.rotation
    }

    pub fn scale(&self) -> Vector {
        self.scale
    }

    pub fn model(&self) -> &Matrix4<Real> {
        &self.model
    }

    pub fn inverse(&self) -> &Matrix4<Real> {
        &self.inverse
    }

    /// Object space -> world space.
    pub fn transform_point(&self, point: &Vector) -> Vector {
        transform_point(&self.model, point)
    }

    /// World space -> object space.
    pub fn detransform(&self, point: &Vector) -> Vector {
        transform_point(&self.inverse, point)
    }

    /// Applies the linear part of the model to a direction and renormalizes.
    ///
    /// Exact for rotations and uniform scale only. Non-uniform scale would
    /// need the inverse transpose.
    pub fn transform_normal(&self, normal: &Vector) -> Vector {
        let h = self.model * Vector4::new(normal.x, normal.y, normal.z, 0.0);
        normalize_or_zero(&Vector::new(h.x, h.y, h.z))
    }

    /// Moves a triangle into world space.
    ///
    /// The face normal is recomputed from the transformed vertices rather
    /// than transformed, so it stays correct under non-uniform scale.
    pub fn transform_triangle(&self, triangle: &Triangle) -> Result<Triangle> {
        let [a, b, c] = triangle.vertices.map(|v| self.transform_point(&v));
        let world = Triangle::new(a, b, c)?;
        Ok(match triangle.vertex_normals {
            Some(normals) => world.with_vertex_normals(normals.map(|n| self.transform_normal(&n))),
            None => world,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RenderError;
    use approx::assert_abs_diff_eq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn identity_transform_only_translates() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..50 {
            let loc = Vector::new(
                rng.random_range(-10.0..10.0),
                rng.random_range(-10.0..10.0),
                rng.random_range(-10.0..10.0),
            );
            let p = Vector::new(
                rng.random_range(-10.0..10.0),
                rng.random_range(-10.0..10.0),
                rng.random_range(-10.0..10.0),
            );
            let t = Transformer::new(loc, Vector::zeros(), Vector::repeat(1.0)).unwrap();
            assert_abs_diff_eq!(t.transform_point(&p), p + loc, epsilon = 1e-12);
            assert_eq!(Transformer::at(loc).transform_point(&p), p + loc);
        }
    }

    #[test]
    fn detransform_inverts_transform() {
        let t = Transformer::new(
            Vector::new(1.0, 2.0, 3.0),
            Vector::new(0.3, -1.1, 2.0),
            Vector::new(2.0, 0.5, 3.0),
        )
        .unwrap();
        let p = Vector::new(-4.0, 7.0, 0.25);
        assert_abs_diff_eq!(t.detransform(&t.transform_point(&p)), p, epsilon = 1e-9);
    }

    #[test]
    fn setters_keep_matrices_in_sync() {
        let mut t = Transformer::default();
        t.set_location(Vector::new(5.0, 0.0, 0.0)).unwrap();
        t.set_rotation(Vector::new(0.0, 0.0, FRAC_PI_2)).unwrap();
        assert_abs_diff_eq!(
            t.transform_point(&Vector::x()),
            Vector::new(5.0, 1.0, 0.0),
            epsilon = 1e-12
        );
        assert_abs_diff_eq!(t.model() * t.inverse(), Matrix4::identity(), epsilon = 1e-12);
    }

    #[test]
    fn singular_scale_is_rejected_without_side_effects() {
        assert!(matches!(
            Transformer::new(Vector::zeros(), Vector::zeros(), Vector::new(1.0, 0.0, 1.0)),
            Err(RenderError::DegenerateGeometry(_))
        ));

        let mut t = Transformer::at(Vector::new(1.0, 1.0, 1.0));
        let before = t.clone();
        assert!(t.set_scale(Vector::zeros()).is_err());
        assert_eq!(t, before);
    }

    #[test]
    fn face_normal_is_recomputed_from_geometry() {
        let quarter_x = Vector::new(FRAC_PI_2, 0.0, 0.0);
        let t = Transformer::new(Vector::zeros(), quarter_x, Vector::repeat(1.0)).unwrap();
        let tri = Triangle::new(Vector::zeros(), Vector::x(), Vector::y()).unwrap();
        let world = t.transform_triangle(&tri).unwrap();
        // +z rotated a quarter turn about x points to -y.
        assert_abs_diff_eq!(world.normal, -Vector::y(), epsilon = 1e-12);
    }

    #[test]
    fn vertex_normals_ignore_translation_and_stay_unit() {
        let t = Transformer::new(
            Vector::new(10.0, 10.0, 10.0),
            Vector::zeros(),
            Vector::repeat(3.0),
        )
        .unwrap();
        let tri = Triangle::new(Vector::zeros(), Vector::x(), Vector::y())
            .unwrap()
            .with_vertex_normals([Vector::z(); 3]);
        let world = t.transform_triangle(&tri).unwrap();
        for n in world.vertex_normals.unwrap() {
            assert_abs_diff_eq!(n, Vector::z(), epsilon = 1e-12);
        }
    }
}
