use crate::core::math::{Real, Vector};
use nalgebra::{Matrix4, Vector4};

//=================================
// Transform Matrix Factory
//=================================

/// Factory for creating various transformation matrices.
/// Manually implemented to keep control over the coordinate system (Right-Handed).
pub struct TransformFactory;

#[rustfmt::skip]
impl TransformFactory {
    /// Creates a rotation matrix around the X-axis.
    pub fn rotation_x(angle_rad: Real) -> Matrix4<Real> {
        let c = angle_rad.cos();
        let s = angle_rad.sin();
        Matrix4::new(
            1.0, 0.0, 0.0, 0.0,
            0.0, c,  -s,   0.0,
            0.0, s,   c,   0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Creates a rotation matrix around the Y-axis.
    pub fn rotation_y(angle_rad: Real) -> Matrix4<Real> {
        let c = angle_rad.cos();
        let s = angle_rad.sin();
        Matrix4::new(
            c,   0.0, s,   0.0,
            0.0, 1.0, 0.0, 0.0,
           -s,   0.0, c,   0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Creates a rotation matrix around the Z-axis.
    pub fn rotation_z(angle_rad: Real) -> Matrix4<Real> {
        let c = angle_rad.cos();
        let s = angle_rad.sin();
        Matrix4::new(
            c,  -s,   0.0, 0.0,
            s,   c,   0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Creates a translation matrix.
    pub fn translation(translation: &Vector) -> Matrix4<Real> {
        Matrix4::new(
            1.0, 0.0, 0.0, translation.x,
            0.0, 1.0, 0.0, translation.y,
            0.0, 0.0, 1.0, translation.z,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Creates a non-uniform scaling matrix.
    pub fn scaling_nonuniform(scale: &Vector) -> Matrix4<Real> {
        Matrix4::new(
            scale.x, 0.0,     0.0,     0.0,
            0.0,     scale.y, 0.0,     0.0,
            0.0,     0.0,     scale.z, 0.0,
            0.0,     0.0,     0.0,     1.0,
        )
    }

    /// Model matrix: Translate * Scale * RotateX * RotateY * RotateZ.
    /// Rotation angles are in radians.
    pub fn model(location: &Vector, rotation: &Vector, scale: &Vector) -> Matrix4<Real> {
        Self::translation(location)
            * Self::scaling_nonuniform(scale)
            * Self::rotation_x(rotation.x)
            * Self::rotation_y(rotation.y)
            * Self::rotation_z(rotation.z)
    }

    /// Camera-to-world matrix [R | eye] whose rotation columns are the camera basis.
    /// The world-to-camera (view) matrix is its inverse.
    pub fn camera_to_world(right: &Vector, up: &Vector, forward: &Vector, eye: &Vector) -> Matrix4<Real> {
        Matrix4::new(
            right.x, up.x, forward.x, eye.x,
            right.y, up.y, forward.y, eye.y,
            right.z, up.z, forward.z, eye.z,
            0.0,     0.0,  0.0,       1.0,
        )
    }

    /// Creates a Perspective Projection matrix (Right-Handed).
    /// Maps the view frustum to NDC [-1, 1], with z = -1 at `near` and +1 at `far`.
    pub fn perspective(aspect_ratio: Real, fov_y_rad: Real, near: Real, far: Real) -> Matrix4<Real> {
        let f = 1.0 / (fov_y_rad / 2.0).tan();
        let nf = 1.0 / (near - far);

        Matrix4::new(
            f / aspect_ratio, 0.0, 0.0,               0.0,
            0.0,              f,   0.0,               0.0,
            0.0,              0.0, (far + near) * nf, 2.0 * far * near * nf,
            0.0,              0.0, -1.0,              0.0,
        )
    }
}

//=================================
// Core Transformation Functions
//=================================

/// Performs perspective division: Clip Space -> NDC.
#[inline]
pub fn apply_perspective_division(clip: &Vector4<Real>) -> Vector {
    let w = clip.w;
    if w.abs() > 1e-12 {
        Vector::new(clip.x / w, clip.y / w, clip.z / w)
    } else {
        Vector::zeros()
    }
}

/// Viewport transform: NDC -> image space.
///
/// x and y map from [-1, 1] to [0, width] and [0, height] with y pointing up.
/// Depth maps from [-1, 1] to [0, 1], growing with distance from the eye.
#[inline]
pub fn ndc_to_image(ndc: &Vector, width: Real, height: Real) -> Vector {
    Vector::new(
        (ndc.x + 1.0) * 0.5 * width,
        (ndc.y + 1.0) * 0.5 * height,
        (ndc.z + 1.0) * 0.5,
    )
}

/// Inverse of [`ndc_to_image`].
#[inline]
pub fn image_to_ndc(image: &Vector, width: Real, height: Real) -> Vector {
    Vector::new(
        image.x / width * 2.0 - 1.0,
        image.y / height * 2.0 - 1.0,
        image.z * 2.0 - 1.0,
    )
}
