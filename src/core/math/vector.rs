use crate::core::math::{EPSILON, Real, Vector};
use crate::error::{RenderError, Result};
use nalgebra::{Matrix4, Vector4};

/// L2 normalization that never divides by zero.
///
/// A zero-length input is divided by `Real::MAX` instead, which yields the
/// zero vector rather than NaNs. Use [`try_normalize`] where a zero-length
/// vector is a geometry bug.
#[inline]
pub fn normalize_or_zero(v: &Vector) -> Vector {
    let norm = v.norm();
    if norm == 0.0 { v / Real::MAX } else { v / norm }
}

/// L2 normalization that reports zero-length input.
#[inline]
pub fn try_normalize(v: &Vector) -> Result<Vector> {
    let norm = v.norm();
    if norm <= EPSILON || !norm.is_finite() {
        return Err(RenderError::DegenerateGeometry(format!(
            "cannot normalize vector of length {norm}"
        )));
    }
    Ok(v / norm)
}

/// Euclidean distance between two points.
#[inline]
pub fn distance(a: &Vector, b: &Vector) -> Real {
    (b - a).norm()
}

/// Unit normal of the plane through three points (counter-clockwise winding).
pub fn face_normal(a: &Vector, b: &Vector, c: &Vector) -> Result<Vector> {
    try_normalize(&(b - a).cross(&(c - a)))
}

/// Arithmetic mean of three points.
#[inline]
pub fn centroid(a: &Vector, b: &Vector, c: &Vector) -> Vector {
    (a + b + c) / 3.0
}

/// Applies a 4x4 transform to a point (w = 1) and drops the homogeneous coordinate.
#[inline]
pub fn transform_point(m: &Matrix4<Real>, p: &Vector) -> Vector {
    let h = m * Vector4::new(p.x, p.y, p.z, 1.0);
    Vector::new(h.x, h.y, h.z)
}

/// Applies a 4x4 transform to a point and returns the full homogeneous result.
#[inline]
pub fn transform_homogeneous(m: &Matrix4<Real>, p: &Vector) -> Vector4<Real> {
    m * Vector4::new(p.x, p.y, p.z, 1.0)
}
