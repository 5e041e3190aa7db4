use crate::core::math::matrix::invert4;
use crate::core::math::transform::TransformFactory;
use crate::core::math::vector::{normalize_or_zero, transform_homogeneous, try_normalize};
use crate::core::math::{EPSILON, Real, Vector};
use crate::error::{RenderError, Result};
use nalgebra::{Matrix4, Vector4};

/// Perspective look-at camera.
///
/// All three matrices are derived once in [`Camera::look_at`]; the camera is
/// immutable afterwards. Move it by building a new one.
#[derive(Debug, Clone)]
pub struct Camera {
    eye: Vector,
    at: Vector,
    up: Vector,
    width: usize,
    height: usize,
    near: Real,
    far: Real,
    fov_deg: Real,

    // --- Cached Matrices ---
    world_to_camera: Matrix4<Real>,
    camera_to_ndc: Matrix4<Real>,
    world_to_ndc: Matrix4<Real>,
}

impl Camera {
    /// Builds a camera at `eye` looking at `at`.
    ///
    /// `fov_deg` is the vertical field of view in degrees; the aspect ratio
    /// comes from the image size. Fails with `DegenerateGeometry` when `eye`
    /// and `at` coincide or `up` is parallel to the view direction.
    #[allow(clippy::too_many_arguments)]
    pub fn look_at(
        eye: Vector,
        at: Vector,
        up: Vector,
        width: usize,
        height: usize,
        near: Real,
        far: Real,
        fov_deg: Real,
    ) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(RenderError::UnsupportedConfiguration(format!(
                "image size {width}x{height}"
            )));
        }
        if near.is_nan() || far.is_nan() || near <= 0.0 || far <= near {
            return Err(RenderError::UnsupportedConfiguration(format!(
                "clip planes near={near} far={far}"
            )));
        }
        if fov_deg.is_nan() || fov_deg <= 0.0 || fov_deg >= 180.0 {
            return Err(RenderError::UnsupportedConfiguration(format!(
                "field of view {fov_deg} degrees"
            )));
        }

        // 1. Orthonormal basis
        let forward = try_normalize(&(eye - at))
            .map_err(|_| RenderError::DegenerateGeometry("camera eye and target coincide".into()))?;
        let side = up.cross(&forward);
        if side.norm() <= EPSILON {
            return Err(RenderError::DegenerateGeometry(format!(
                "up vector ({}, {}, {}) is parallel to the view direction",
                up.x, up.y, up.z
            )));
        }
        let right = side.normalize();
        let true_up = forward.cross(&right);

        // 2. World -> camera as the inverse of camera -> world
        let camera_to_world = TransformFactory::camera_to_world(&right, &true_up, &forward, &eye);
        let world_to_camera = invert4(&camera_to_world)?;

        // 3. Camera -> NDC
        let aspect_ratio = width as Real / height as Real;
        let camera_to_ndc =
            TransformFactory::perspective(aspect_ratio, fov_deg.to_radians(), near, far);

        Ok(Self {
            eye,
            at,
            up,
            width,
            height,
            near,
            far,
            fov_deg,
            world_to_camera,
            camera_to_ndc,
            // 4. Compose
            world_to_ndc: camera_to_ndc * world_to_camera,
        })
    }

    pub fn eye(&self) -> Vector {
        self.eye
    }

    pub fn at(&self) -> Vector {
        self.at
    }

    pub fn up(&self) -> Vector {
        self.up
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn near(&self) -> Real {
        self.near
    }

    pub fn far(&self) -> Real {
        self.far
    }

    pub fn fov_deg(&self) -> Real {
        self.fov_deg
    }

    pub fn world_to_camera(&self) -> &Matrix4<Real> {
        &self.world_to_camera
    }

    pub fn camera_to_ndc(&self) -> &Matrix4<Real> {
        &self.camera_to_ndc
    }

    pub fn world_to_ndc(&self) -> &Matrix4<Real> {
        &self.world_to_ndc
    }

    /// Homogeneous clip-space position of a world point. `w` is the distance
    /// in front of the eye along the view direction.
    pub fn world_to_clip(&self, point: &Vector) -> Vector4<Real> {
        transform_homogeneous(&self.world_to_ndc, point)
    }

    /// Unit vector from `point` toward the eye.
    pub fn direction_to_eye(&self, point: &Vector) -> Vector {
        normalize_or_zero(&(self.eye - point))
    }
}
