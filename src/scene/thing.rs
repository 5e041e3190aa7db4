use crate::core::geometry::Triangle;
use crate::error::Result;
use crate::scene::material::Material;
use crate::scene::mesh::Mesh;
use crate::scene::transformer::Transformer;
use std::sync::Arc;

/// A placed object: one mesh, one transformer, one shared material.
#[derive(Debug, Clone)]
pub struct Thing {
    pub name: String,
    pub mesh: Mesh,
    pub transformer: Transformer,
    pub material: Arc<Material>,
}

impl Thing {
    pub fn new(mesh: Mesh, transformer: Transformer, material: Arc<Material>) -> Self {
        Self {
            name: String::from("thing"),
            mesh,
            transformer,
            material,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// The mesh's triangles moved into world space, in mesh order.
    pub fn world_triangles(&self) -> impl Iterator<Item = Result<Triangle>> + '_ {
        self.mesh
            .iter()
            .map(|tri| self.transformer.transform_triangle(tri))
    }
}
