use crate::core::color::Color;
use crate::core::framebuffer::PixelSink;
use crate::core::geometry::Triangle;
use crate::core::math::interpolation::{barycentric_coordinates, is_inside_triangle};
use crate::core::math::transform::{self, apply_perspective_division};
use crate::core::math::{EPSILON, Real, Vector};
use crate::core::zbuffer::ZBuffer;
use crate::error::Result;
use crate::scene::camera::Camera;
use log::trace;
use nalgebra::Point2;

/// World -> NDC: homogeneous transform followed by the perspective divide.
pub fn world_to_ndc(camera: &Camera, point: &Vector) -> Vector {
    apply_perspective_division(&camera.world_to_clip(point))
}

/// NDC -> image space for the camera's image size.
pub fn ndc_to_image(camera: &Camera, ndc: &Vector) -> Vector {
    transform::ndc_to_image(ndc, camera.width() as Real, camera.height() as Real)
}

pub fn image_to_ndc(camera: &Camera, image: &Vector) -> Vector {
    transform::image_to_ndc(image, camera.width() as Real, camera.height() as Real)
}

/// Projects a world point to image space, or `None` when it lies behind the
/// near plane.
pub fn project(camera: &Camera, point: &Vector) -> Option<Vector> {
    let clip = camera.world_to_clip(point);
    if clip.w < camera.near() {
        trace!("near-plane cull: ({}, {}, {}) w={}", point.x, point.y, point.z, clip.w);
        return None;
    }
    Some(ndc_to_image(camera, &apply_perspective_division(&clip)))
}

/// Projects a world-space triangle into image space.
///
/// Returns `None` when any vertex lies behind the near plane. Normals are
/// carried over unchanged in world space; shading reads them from there.
pub fn rasterize(camera: &Camera, triangle: &Triangle) -> Option<Triangle> {
    let mut vertices = [Vector::zeros(); 3];
    for (out, v) in vertices.iter_mut().zip(&triangle.vertices) {
        *out = project(camera, v)?;
    }
    Some(Triangle {
        vertices,
        normal: triangle.normal,
        vertex_normals: triangle.vertex_normals,
    })
}

/// Fills an image-space triangle with a single color.
///
/// See [`draw_triangle_with`] for coverage and depth rules.
pub fn draw_triangle<S: PixelSink + ?Sized>(
    sink: &mut S,
    triangle: &Triangle,
    color: Color,
    zbuffer: Option<&mut ZBuffer>,
) -> Result<usize> {
    draw_triangle_with(sink, triangle, zbuffer, |_| Ok(color))
}

/// Fills an image-space triangle, asking `shade` for each written pixel's color.
///
/// Pixel centres `(x + 0.5, y + 0.5)` strictly inside the triangle are
/// covered. Depth is the barycentric blend of the vertex depths. With a
/// z-buffer, a pixel is written only when its depth passes
/// [`ZBuffer::test_and_update`], and `shade` runs only for those pixels.
/// Without one every covered pixel is written in submission order.
///
/// `shade` receives the barycentric weights of the pixel centre.
/// Returns the number of pixels written.
pub fn draw_triangle_with<S, F>(
    sink: &mut S,
    triangle: &Triangle,
    mut zbuffer: Option<&mut ZBuffer>,
    mut shade: F,
) -> Result<usize>
where
    S: PixelSink + ?Sized,
    F: FnMut(&Vector) -> Result<Color>,
{
    let (width, height) = (sink.width(), sink.height());
    if width == 0 || height == 0 {
        return Ok(0);
    }
    if triangle.vertices.iter().any(|v| !v.iter().all(|c| c.is_finite())) {
        return Ok(0);
    }
    if triangle.signed_area_xy().abs() < EPSILON {
        return Ok(0);
    }

    let [a, b, c] = &triangle.vertices;
    let screen = [Point2::new(a.x, a.y), Point2::new(b.x, b.y), Point2::new(c.x, c.y)];
    let depths = Vector::new(a.z, b.z, c.z);

    let Some((start_x, start_y, end_x, end_y)) = compute_bounding_box(&screen, width, height)
    else {
        return Ok(0);
    };

    let mut written = 0;
    for y in start_y..=end_y {
        for x in start_x..=end_x {
            let pixel_center = Point2::new(x as Real + 0.5, y as Real + 0.5);
            if !is_inside_triangle(pixel_center, screen[0], screen[1], screen[2]) {
                continue;
            }

            let bary = barycentric_coordinates(pixel_center, screen[0], screen[1], screen[2])?;
            let depth = bary.dot(&depths);

            if let Some(z) = zbuffer.as_deref_mut() {
                if !z.test_and_update(x, y, depth)? {
                    continue;
                }
            }

            let color = shade(&bary)?;
            sink.set_pixel(x, height - 1 - y, color)?;
            written += 1;
        }
    }
    Ok(written)
}

/// Draws an image-space segment with a unit-step DDA.
///
/// No depth test. Pixels outside the sink are skipped. Returns the number of
/// pixels written.
pub fn draw_line<S: PixelSink + ?Sized>(
    sink: &mut S,
    from: &Vector,
    to: &Vector,
    color: Color,
) -> Result<usize> {
    let rows = sink.height();
    let (width, height) = (sink.width() as Real, rows as Real);
    let delta = to - from;
    if !delta.x.is_finite() || !delta.y.is_finite() {
        return Ok(0);
    }
    let steps = delta.x.abs().max(delta.y.abs()).ceil().max(1.0) as usize;

    let mut written = 0;
    for i in 0..=steps {
        let t = i as Real / steps as Real;
        let px = (from.x + delta.x * t).floor();
        let py = (from.y + delta.y * t).floor();
        if px < 0.0 || py < 0.0 || px >= width || py >= height {
            continue;
        }
        let (x, y) = (px as usize, py as usize);
        sink.set_pixel(x, rows - 1 - y, color)?;
        written += 1;
    }
    Ok(written)
}

/// Integer pixel bounds of the triangle clamped to the image, or `None` when
/// the triangle lies entirely off-screen.
fn compute_bounding_box(
    points: &[Point2<Real>; 3],
    width: usize,
    height: usize,
) -> Option<(usize, usize, usize, usize)> {
    let min_x = points[0].x.min(points[1].x).min(points[2].x).floor();
    let min_y = points[0].y.min(points[1].y).min(points[2].y).floor();
    let max_x = points[0].x.max(points[1].x).max(points[2].x).ceil();
    let max_y = points[0].y.max(points[1].y).max(points[2].y).ceil();

    if max_x < 0.0 || max_y < 0.0 || min_x >= width as Real || min_y >= height as Real {
        return None;
    }

    let start_x = min_x.max(0.0) as usize;
    let start_y = min_y.max(0.0) as usize;
    let end_x = (max_x as usize).min(width - 1);
    let end_y = (max_y as usize).min(height - 1);
    Some((start_x, start_y, end_x, end_y))
}
