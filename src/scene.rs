pub mod camera;
pub mod light;
pub mod loader;
pub mod material;
pub mod mesh;
pub mod thing;
pub mod transformer;
pub mod world;
