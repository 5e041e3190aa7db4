use crate::core::math::vector::{centroid, face_normal, normalize_or_zero};
use crate::core::math::{Real, Vector};
use crate::error::Result;

/// A triangle as it flows through the pipeline.
///
/// Each stage produces a new value instead of mutating its input. The face
/// normal follows the counter-clockwise winding of `vertices`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub vertices: [Vector; 3],
    /// Unit face (surface) normal.
    pub normal: Vector,
    /// Per-vertex normals, present once a mesh has been smoothed.
    pub vertex_normals: Option<[Vector; 3]>,
}

impl Triangle {
    /// Builds a triangle and derives its face normal from the winding.
    pub fn new(a: Vector, b: Vector, c: Vector) -> Result<Self> {
        Ok(Self {
            normal: face_normal(&a, &b, &c)?,
            vertices: [a, b, c],
            vertex_normals: None,
        })
    }

    /// Builds a triangle with an explicit face normal (as read from a mesh file).
    pub fn with_normal(a: Vector, b: Vector, c: Vector, normal: Vector) -> Self {
        Self {
            vertices: [a, b, c],
            normal: normalize_or_zero(&normal),
            vertex_normals: None,
        }
    }

    pub fn with_vertex_normals(mut self, normals: [Vector; 3]) -> Self {
        self.vertex_normals = Some(normals);
        self
    }

    pub fn centroid(&self) -> Vector {
        centroid(&self.vertices[0], &self.vertices[1], &self.vertices[2])
    }

    /// Twice the signed area of the xy projection (positive when counter-clockwise).
    pub fn signed_area_xy(&self) -> Real {
        let [a, b, c] = &self.vertices;
        (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
    }
}
