use crate::core::geometry::Triangle;
use crate::core::math::vector::normalize_or_zero;
use crate::core::math::{Real, Vector};
use crate::error::{RenderError, Result};
use std::collections::HashMap;
use std::f64::consts::PI;

/// Grid used to merge coincident vertices when averaging normals.
const VERTEX_KEY_QUANTUM: Real = 1e-6;

/// An ordered list of triangles in object space.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn new(triangles: Vec<Triangle>) -> Self {
        Self { triangles }
    }

    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    pub fn push(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Triangle> {
        self.triangles.iter()
    }

    /// True when every triangle carries per-vertex normals.
    pub fn has_vertex_normals(&self) -> bool {
        !self.triangles.is_empty() && self.triangles.iter().all(|t| t.vertex_normals.is_some())
    }

    /// Annotates each vertex with the average face normal of all triangles
    /// sharing its position. Positions are matched on a 1e-6 grid.
    pub fn compute_vertex_normals(&mut self) {
        let key = |v: &Vector| {
            (
                (v.x / VERTEX_KEY_QUANTUM).round() as i64,
                (v.y / VERTEX_KEY_QUANTUM).round() as i64,
                (v.z / VERTEX_KEY_QUANTUM).round() as i64,
            )
        };

        let mut sums: HashMap<(i64, i64, i64), Vector> = HashMap::new();
        for tri in &self.triangles {
            for v in &tri.vertices {
                *sums.entry(key(v)).or_insert_with(Vector::zeros) += tri.normal;
            }
        }

        for tri in &mut self.triangles {
            let normals = tri
                .vertices
                .map(|v| normalize_or_zero(&sums.get(&key(&v)).copied().unwrap_or(tri.normal)));
            tri.vertex_normals = Some(normals);
        }
    }

    //=================================
    // Procedural primitives
    //=================================

    /// Creates a simple triangle for testing purposes.
    ///
    /// Vertices are arranged Counter-Clockwise (CCW), facing +Z.
    pub fn test_triangle() -> Self {
        Self::new(vec![Triangle::with_normal(
            Vector::new(0.0, 0.5, 0.0),   // Top
            Vector::new(-0.5, -0.5, 0.0), // Bottom Left
            Vector::new(0.5, -0.5, 0.0),  // Bottom Right
            Vector::z(),
        )])
    }

    /// Axis-aligned cube of edge `size` centred on the origin, 12 triangles
    /// wound counter-clockwise when seen from outside.
    pub fn cube(size: Real) -> Result<Self> {
        if size.is_nan() || size <= 0.0 {
            return Err(RenderError::UnsupportedConfiguration(format!(
                "cube size {size} must be positive"
            )));
        }
        let h = size / 2.0;
        let v = |x: Real, y: Real, z: Real| Vector::new(x * h, y * h, z * h);

        #[rustfmt::skip]
        let faces = [
            [v( 1.0, -1.0, -1.0), v( 1.0,  1.0, -1.0), v( 1.0,  1.0,  1.0), v( 1.0, -1.0,  1.0)], // +X
            [v(-1.0, -1.0, -1.0), v(-1.0, -1.0,  1.0), v(-1.0,  1.0,  1.0), v(-1.0,  1.0, -1.0)], // -X
            [v(-1.0,  1.0, -1.0), v(-1.0,  1.0,  1.0), v( 1.0,  1.0,  1.0), v( 1.0,  1.0, -1.0)], // +Y
            [v(-1.0, -1.0, -1.0), v( 1.0, -1.0, -1.0), v( 1.0, -1.0,  1.0), v(-1.0, -1.0,  1.0)], // -Y
            [v(-1.0, -1.0,  1.0), v( 1.0, -1.0,  1.0), v( 1.0,  1.0,  1.0), v(-1.0,  1.0,  1.0)], // +Z
            [v(-1.0, -1.0, -1.0), v(-1.0,  1.0, -1.0), v( 1.0,  1.0, -1.0), v( 1.0, -1.0, -1.0)], // -Z
        ];

        let mut mesh = Self::default();
        for [a, b, c, d] in faces {
            mesh.push(Triangle::new(a, b, c)?);
            mesh.push(Triangle::new(c, d, a)?);
        }
        Ok(mesh)
    }

    /// Quad from four corners, split as (0, 1, 2) and (2, 3, 0).
    pub fn plane(corners: [Vector; 4], normal: Vector) -> Self {
        let [a, b, c, d] = corners;
        Self::new(vec![
            Triangle::with_normal(a, b, c, normal),
            Triangle::with_normal(c, d, a, normal),
        ])
    }

    /// Latitude/longitude sphere centred on the origin with `partition`
    /// rings and `partition` segments.
    pub fn uv_sphere(radius: Real, partition: usize) -> Result<Self> {
        if partition < 3 {
            return Err(RenderError::UnsupportedConfiguration(format!(
                "sphere partition {partition} (need at least 3)"
            )));
        }
        if radius.is_nan() || radius <= 0.0 {
            return Err(RenderError::UnsupportedConfiguration(format!(
                "sphere radius {radius} must be positive"
            )));
        }

        let point = |ring: usize, segment: usize| {
            let theta = PI * ring as Real / partition as Real;
            let phi = 2.0 * PI * (segment % partition) as Real / partition as Real;
            Vector::new(
                radius * theta.sin() * phi.cos(),
                radius * theta.cos(),
                radius * theta.sin() * phi.sin(),
            )
        };

        let mut mesh = Self::default();
        let mut push_outward = |a: Vector, b: Vector, c: Vector| -> Result<()> {
            let tri = Triangle::new(a, b, c)?;
            mesh.push(if tri.normal.dot(&tri.centroid()) < 0.0 {
                Triangle::new(a, c, b)?
            } else {
                tri
            });
            Ok(())
        };

        let north = Vector::new(0.0, radius, 0.0);
        let south = Vector::new(0.0, -radius, 0.0);
        for s in 0..partition {
            push_outward(north, point(1, s), point(1, s + 1))?;
            for r in 1..partition - 1 {
                let (a, b) = (point(r, s), point(r, s + 1));
                let (c, d) = (point(r + 1, s + 1), point(r + 1, s));
                push_outward(a, b, c)?;
                push_outward(c, d, a)?;
            }
            push_outward(point(partition - 1, s), south, point(partition - 1, s + 1))?;
        }
        Ok(mesh)
    }
}

impl<'a> IntoIterator for &'a Mesh {
    type Item = &'a Triangle;
    type IntoIter = std::slice::Iter<'a, Triangle>;

    fn into_iter(self) -> Self::IntoIter {
        self.triangles.iter()
    }
}
