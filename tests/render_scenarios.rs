use softraster::core::color::Color;
use softraster::core::framebuffer::FrameBuffer;
use softraster::core::math::Vector;
use softraster::core::rasterizer::project;
use softraster::pipeline::renderer::{RenderMode, RenderSettings, Renderer, Shading};
use softraster::pipeline::shading::ReflectionModel;
use softraster::scene::camera::Camera;
use softraster::scene::material::Material;
use softraster::scene::mesh::Mesh;
use softraster::scene::thing::Thing;
use softraster::scene::transformer::Transformer;
use softraster::scene::world::Scene;
use std::sync::Arc;

const WIDTH: usize = 64;
const HEIGHT: usize = 48;

fn flat_null() -> RenderSettings {
    RenderSettings::new(RenderMode::Shaded, Shading::Flat, ReflectionModel::Null)
}

fn camera(eye: Vector) -> Camera {
    Camera::look_at(eye, Vector::zeros(), Vector::y(), WIDTH, HEIGHT, 0.1, 1000.0, 60.0).unwrap()
}

fn solid(mesh: Mesh, transformer: Transformer, color: Color) -> Thing {
    Thing::new(mesh, transformer, Arc::new(Material::solid(color)))
}

fn render(scene: &Scene<'_>) -> FrameBuffer {
    let mut renderer = Renderer::new(WIDTH, HEIGHT, flat_null());
    renderer.render(scene).unwrap();
    renderer.framebuffer
}

#[test]
fn cube_stays_inside_its_projected_silhouette() {
    let color = Color::new(0.2, 0.6, 0.9);
    let cam = camera(Vector::new(2.0, 0.0, 0.0));
    let cube = Mesh::cube(1.0).unwrap();

    // Bounding box of the eight projected corners, in y-up image space.
    let corners: Vec<Vector> = cube
        .iter()
        .flat_map(|t| t.vertices)
        .map(|v| project(&cam, &v).unwrap())
        .collect();
    let min_x = corners.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
    let max_x = corners.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max);
    let min_y = corners.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
    let max_y = corners.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);

    let mut scene = Scene::new(cam);
    scene.add_thing(solid(cube, Transformer::default(), color));
    let fb = render(&scene);

    let mut inside = 0;
    for row in 0..HEIGHT {
        for x in 0..WIDTH {
            if fb.get_pixel(x, row) != Some(color) {
                continue;
            }
            let cx = x as f64 + 0.5;
            let cy = (HEIGHT - 1 - row) as f64 + 0.5;
            assert!(
                (min_x..=max_x).contains(&cx) && (min_y..=max_y).contains(&cy),
                "pixel ({x}, {row}) outside the silhouette box"
            );
            inside += 1;
        }
    }
    assert!(inside > 0);
    assert_eq!(inside, fb.count_pixels(|c| *c == color));
}

#[test]
fn nearer_triangle_wins_in_either_order() {
    let far_color = Color::new(1.0, 0.0, 0.0);
    let near_color = Color::new(0.0, 1.0, 0.0);
    let cam = camera(Vector::new(0.0, 0.0, 5.0));

    let big = Vector::repeat(3.0);
    let far = || {
        solid(
            Mesh::test_triangle(),
            Transformer::new(Vector::zeros(), Vector::zeros(), big).unwrap(),
            far_color,
        )
    };
    let near = || {
        solid(
            Mesh::test_triangle(),
            Transformer::new(Vector::new(0.0, 0.0, 1.0), Vector::zeros(), big).unwrap(),
            near_color,
        )
    };

    let alone = |thing: Thing| {
        let mut scene = Scene::new(cam.clone());
        scene.add_thing(thing);
        render(&scene)
    };
    let far_alone = alone(far());
    let near_alone = alone(near());

    let both = |first: Thing, second: Thing| {
        let mut scene = Scene::new(cam.clone());
        scene.add_thing(first);
        scene.add_thing(second);
        render(&scene)
    };
    let far_first = both(far(), near());
    let near_first = both(near(), far());

    let mut overlap = 0;
    for row in 0..HEIGHT {
        for x in 0..WIDTH {
            let covered_far = far_alone.get_pixel(x, row) == Some(far_color);
            let covered_near = near_alone.get_pixel(x, row) == Some(near_color);
            if covered_far && covered_near {
                overlap += 1;
                assert_eq!(far_first.get_pixel(x, row), Some(near_color));
                assert_eq!(near_first.get_pixel(x, row), Some(near_color));
            }
        }
    }
    assert!(overlap > 0);
    assert_eq!(far_first, near_first);
}

#[test]
fn every_mode_renders_the_lit_sphere() {
    use softraster::scene::light::Light;

    let light = Light::new_point(Vector::new(4.0, 4.0, 4.0));
    let mut sphere = Mesh::uv_sphere(1.0, 12).unwrap();
    sphere.compute_vertex_normals();

    let mut scene = Scene::new(camera(Vector::new(0.0, 0.0, 4.0)));
    scene.add_thing(Thing::new(sphere, Transformer::default(), Arc::new(Material::default())));
    scene.add_light(&light);

    for mode in ["wireframe", "wireframe-normals", "shaded"] {
        for shading in ["flat", "gouraud", "phong"] {
            for reflection in ["null", "phong", "blinn-phong"] {
                let settings = RenderSettings::parse(mode, shading, reflection).unwrap();
                let mut renderer = Renderer::new(WIDTH, HEIGHT, settings);
                let stats = renderer.render(&scene).unwrap();
                assert!(stats.pixels_written > 0, "{settings} wrote nothing");
                assert_eq!(stats.triangles_culled, 0);
            }
        }
    }
}
