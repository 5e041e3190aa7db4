use crate::core::color::{self, Color};
use crate::core::framebuffer::PixelSink;
use crate::core::geometry::Triangle;
use crate::core::math::interpolation::interpolate;
use crate::core::math::Vector;
use crate::core::rasterizer::{draw_line, draw_triangle, draw_triangle_with, project};
use crate::core::zbuffer::ZBuffer;
use crate::error::{RenderError, Result};
use crate::pipeline::shading::ReflectionModel;
use crate::scene::camera::Camera;
use crate::scene::light::Light;
use crate::scene::material::Material;

/// Everything a shading pass needs besides the triangle itself.
pub struct ShadingContext<'a> {
    pub camera: &'a Camera,
    pub lights: &'a [&'a Light],
    pub material: &'a Material,
    pub reflection: ReflectionModel,
}

impl ShadingContext<'_> {
    fn shade(&self, position: &Vector, normal: &Vector) -> Color {
        let view_dir = self.camera.direction_to_eye(position);
        self.reflection
            .evaluate(self.lights, &view_dir, position, normal, self.material)
    }
}

fn vertex_normals(world: &Triangle) -> Result<[Vector; 3]> {
    world.vertex_normals.ok_or_else(|| {
        RenderError::UnsupportedConfiguration(
            "smooth shading requires per-vertex normals".into(),
        )
    })
}

/// Projected edges in blue. With `normals`, also the face normal (red, from
/// the centroid) and vertex normals (white), each one world unit long.
pub fn wireframe_pass<S: PixelSink + ?Sized>(
    sink: &mut S,
    camera: &Camera,
    world: &Triangle,
    image: &Triangle,
    normals: bool,
) -> Result<usize> {
    let mut written = 0;
    for i in 0..3 {
        let (from, to) = (&image.vertices[i], &image.vertices[(i + 1) % 3]);
        written += draw_line(sink, from, to, color::blue())?;
    }
    if !normals {
        return Ok(written);
    }

    let mut segment = |from: &Vector, dir: &Vector, color: Color| -> Result<usize> {
        match (project(camera, from), project(camera, &(from + dir))) {
            (Some(a), Some(b)) => draw_line(&mut *sink, &a, &b, color),
            _ => Ok(0),
        }
    };

    written += segment(&world.centroid(), &world.normal, color::red())?;
    if let Some(vertex_normals) = world.vertex_normals {
        for (v, n) in world.vertices.iter().zip(&vertex_normals) {
            written += segment(v, n, color::white())?;
        }
    }
    Ok(written)
}

/// One reflection evaluation at the centroid with the face normal.
pub fn flat_pass<S: PixelSink + ?Sized>(
    sink: &mut S,
    zbuffer: &mut ZBuffer,
    ctx: &ShadingContext<'_>,
    world: &Triangle,
    image: &Triangle,
) -> Result<usize> {
    let color = ctx.shade(&world.centroid(), &world.normal);
    draw_triangle(sink, image, color, Some(zbuffer))
}

/// One reflection evaluation per vertex, colors blended per pixel.
pub fn gouraud_pass<S: PixelSink + ?Sized>(
    sink: &mut S,
    zbuffer: &mut ZBuffer,
    ctx: &ShadingContext<'_>,
    world: &Triangle,
    image: &Triangle,
) -> Result<usize> {
    let normals = vertex_normals(world)?;
    let [c0, c1, c2] = [0, 1, 2].map(|i| ctx.shade(&world.vertices[i], &normals[i]));
    draw_triangle_with(sink, image, Some(zbuffer), |bary| {
        Ok(interpolate(bary, &c0, &c1, &c2))
    })
}

/// One reflection evaluation per pixel on the interpolated world-space
/// position and normal.
pub fn phong_pass<S: PixelSink + ?Sized>(
    sink: &mut S,
    zbuffer: &mut ZBuffer,
    ctx: &ShadingContext<'_>,
    world: &Triangle,
    image: &Triangle,
) -> Result<usize> {
    let [n0, n1, n2] = vertex_normals(world)?;
    let [p0, p1, p2] = world.vertices;
    draw_triangle_with(sink, image, Some(zbuffer), |bary| {
        let position = interpolate(bary, &p0, &p1, &p2);
        let normal = interpolate(bary, &n0, &n1, &n2);
        Ok(ctx.shade(&position, &normal))
    })
}
