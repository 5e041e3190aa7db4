pub mod interpolation;
pub mod matrix;
pub mod transform;
pub mod vector;

/// Scalar type used throughout the renderer.
pub type Real = f64;

/// A 3-component value: point, direction or RGB color depending on context.
pub type Vector = nalgebra::Vector3<Real>;

/// Tolerance for degeneracy checks (zero area, parallel vectors, singular matrices).
pub const EPSILON: Real = 1e-10;
