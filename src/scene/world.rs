use crate::scene::camera::Camera;
use crate::scene::light::Light;
use crate::scene::thing::Thing;

/// Everything a frame is rendered from.
///
/// The scene owns its camera and things. Lights are borrowed: callers keep
/// ownership and may share one light between several scenes, e.g. one per
/// frame of a parallel render.
#[derive(Debug, Clone)]
pub struct Scene<'l> {
    camera: Camera,
    things: Vec<Thing>,
    lights: Vec<&'l Light>,
}

impl<'l> Scene<'l> {
    pub fn new(camera: Camera) -> Self {
        Self {
            camera,
            things: Vec::new(),
            lights: Vec::new(),
        }
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn set_camera(&mut self, camera: Camera) {
        self.camera = camera;
    }

    /// Appends a thing; things render in insertion order.
    pub fn add_thing(&mut self, thing: Thing) {
        self.things.push(thing);
    }

    pub fn add_light(&mut self, light: &'l Light) {
        self.lights.push(light);
    }

    pub fn things(&self) -> &[Thing] {
        &self.things
    }

    pub fn things_mut(&mut self) -> &mut [Thing] {
        &mut self.things
    }

    pub fn lights(&self) -> &[&'l Light] {
        &self.lights
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::math::Vector;
    use crate::scene::material::Material;
    use crate::scene::mesh::Mesh;
    use crate::scene::transformer::Transformer;
    use std::sync::Arc;

    fn camera() -> Camera {
        Camera::look_at(
            Vector::new(0.0, 0.0, 5.0),
            Vector::zeros(),
            Vector::y(),
            32,
            32,
            0.1,
            100.0,
            60.0,
        )
        .unwrap()
    }

    #[test]
    fn keeps_insertion_order() {
        let key = Light::new_point(Vector::new(1.0, 0.0, 0.0));
        let fill = Light::new_point(Vector::new(-1.0, 0.0, 0.0));
        let mut scene = Scene::new(camera());
        scene.add_light(&key);
        scene.add_light(&fill);
        let material = Arc::new(Material::default());
        for name in ["a", "b", "c"] {
            scene.add_thing(
                Thing::new(Mesh::test_triangle(), Transformer::default(), material.clone())
                    .with_name(name),
            );
        }

        let names: Vec<&str> = scene.things().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["a", "b", "c"]);
        assert_eq!(*scene.lights()[0], key);
        assert_eq!(*scene.lights()[1], fill);
    }

    #[test]
    fn one_light_can_serve_several_scenes() {
        let sun = Light::new_directional(Vector::new(1.0, 1.0, 1.0)).unwrap();
        let mut first = Scene::new(camera());
        let mut second = Scene::new(camera());
        first.add_light(&sun);
        second.add_light(&sun);
        assert!(std::ptr::eq(first.lights()[0], second.lights()[0]));
    }
}
