use crate::core::math::{EPSILON, Real, Vector};
use crate::error::{RenderError, Result};
use nalgebra::Point2;

/// Signed edge function: twice the signed area of (a, b, p).
/// Positive when p lies to the left of a->b (counter-clockwise).
#[inline(always)]
pub fn edge_function(a: Point2<Real>, b: Point2<Real>, p: Point2<Real>) -> Real {
    (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x)
}

/// Strict 2D point-in-triangle test, independent of winding.
///
/// The sign of the triangle's own orientation is computed first and each of
/// the three edge functions must share it. Points exactly on an edge and
/// zero-area triangles are outside.
pub fn is_inside_triangle(
    p: Point2<Real>,
    v1: Point2<Real>,
    v2: Point2<Real>,
    v3: Point2<Real>,
) -> bool {
    let orientation = edge_function(v1, v2, v3);
    if orientation == 0.0 {
        return false;
    }
    let sign = orientation.signum();

    edge_function(v1, v2, p) * sign > 0.0
        && edge_function(v2, v3, p) * sign > 0.0
        && edge_function(v3, v1, p) * sign > 0.0
}

/// Calculates the barycentric coordinates (alpha, beta, gamma) of point p
/// with respect to triangle (v1, v2, v3).
///
/// Solves the 2x2 system spanned by the edges v1->v2 and v1->v3.
/// A zero-area triangle is reported as `DegenerateGeometry`.
///
/// # Returns
/// A Vector where:
/// - x: alpha (weight for v1)
/// - y: beta  (weight for v2)
/// - z: gamma (weight for v3)
pub fn barycentric_coordinates(
    p: Point2<Real>,
    v1: Point2<Real>,
    v2: Point2<Real>,
    v3: Point2<Real>,
) -> Result<Vector> {
    let e1 = v2 - v1;
    let e2 = v3 - v1;
    let p_v1 = p - v1;

    let total_area_x2 = e1.x * e2.y - e1.y * e2.x;
    if total_area_x2.abs() < EPSILON {
        return Err(RenderError::DegenerateGeometry(format!(
            "zero-area triangle ({}, {}), ({}, {}), ({}, {})",
            v1.x, v1.y, v2.x, v2.y, v3.x, v3.y
        )));
    }

    let inv_total_area_x2 = 1.0 / total_area_x2;
    let beta = (p_v1.x * e2.y - p_v1.y * e2.x) * inv_total_area_x2;
    let gamma = (e1.x * p_v1.y - e1.y * p_v1.x) * inv_total_area_x2;
    let alpha = 1.0 - beta - gamma;

    Ok(Vector::new(alpha, beta, gamma))
}

/// Weighted sum of three vertex attributes.
#[inline(always)]
pub fn interpolate(bary: &Vector, a: &Vector, b: &Vector, c: &Vector) -> Vector {
    a * bary.x + b * bary.y + c * bary.z
}
