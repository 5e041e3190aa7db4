use crate::core::math::{Real, Vector};
use crate::error::RenderError;
use crate::io::config::{CameraConfig, Config, ConfigError, LightConfig, ObjectConfig};
use crate::pipeline::renderer::RenderSettings;
use crate::scene::camera::Camera;
use crate::scene::light::Light;
use crate::scene::material::Material;
use crate::scene::mesh::Mesh;
use crate::scene::thing::Thing;
use crate::scene::transformer::Transformer;
use log::{debug, info};
use std::sync::Arc;

fn invalid(message: String) -> ConfigError {
    ConfigError::Invalid(RenderError::UnsupportedConfiguration(message))
}

pub fn build_camera(config: &Config) -> Result<Camera, ConfigError> {
    let CameraConfig { eye, at, up, fov, near, far } = config.camera;
    Ok(Camera::look_at(
        Vector::from(eye),
        Vector::from(at),
        Vector::from(up),
        config.render.width,
        config.render.height,
        near,
        far,
        fov,
    )?)
}

pub fn build_settings(config: &Config) -> Result<RenderSettings, ConfigError> {
    let render = &config.render;
    Ok(RenderSettings::parse(&render.mode, &render.shading, &render.reflection)?)
}

fn build_light(index: usize, l: &LightConfig) -> Result<Light, ConfigError> {
    let light = match l.r#type.as_str() {
        "directional" => {
            let dir = l
                .direction
                .ok_or_else(|| invalid(format!("directional light #{index} has no direction")))?;
            Light::new_directional(Vector::from(dir))?
        }
        "point" => {
            let pos = l
                .position
                .ok_or_else(|| invalid(format!("point light #{index} has no position")))?;
            Light::new_point(Vector::from(pos))
        }
        other => return Err(invalid(format!("light #{index} has unknown type '{other}'"))),
    };
    Ok(light.with_colors(Vector::from(l.diffuse), Vector::from(l.specular)))
}

/// Rebuilds the light list from config, in file order.
pub fn build_lights_from_config(config: &Config) -> Result<Vec<Light>, ConfigError> {
    config
        .lights
        .iter()
        .enumerate()
        .map(|(i, l)| build_light(i, l))
        .collect()
}

fn build_mesh(obj: &ObjectConfig) -> Result<Mesh, ConfigError> {
    let mut mesh = match obj.primitive.as_str() {
        "cube" => Mesh::cube(obj.size)?,
        "sphere" => Mesh::uv_sphere(obj.radius, obj.partition)?,
        "plane" => {
            // Square in the XZ plane facing +Y
            let h = obj.size / 2.0;
            Mesh::plane(
                [
                    Vector::new(-h, 0.0, h),
                    Vector::new(h, 0.0, h),
                    Vector::new(h, 0.0, -h),
                    Vector::new(-h, 0.0, -h),
                ],
                Vector::y(),
            )
        }
        "triangle" => Mesh::test_triangle(),
        other => return Err(invalid(format!("unknown primitive '{other}'"))),
    };
    if obj.smooth {
        mesh.compute_vertex_normals();
    }
    Ok(mesh)
}

fn build_thing(index: usize, obj: &ObjectConfig) -> Result<Thing, ConfigError> {
    let mesh = build_mesh(obj)?;

    let [rx, ry, rz] = obj.rotation.map(Real::to_radians);
    let transformer = Transformer::new(
        Vector::from(obj.location),
        Vector::new(rx, ry, rz),
        Vector::from(obj.scale),
    )?;

    let m = &obj.material;
    let material = Material::new(
        Vector::from(m.color),
        m.ambient,
        m.diffuse,
        m.specular,
        m.shininess,
    )?;

    let name = obj
        .name
        .clone()
        .unwrap_or_else(|| format!("{}#{index}", obj.primitive));
    debug!("Built '{}' with {} triangles", name, mesh.len());
    Ok(Thing::new(mesh, transformer, Arc::new(material)).with_name(name))
}

/// Builds every configured object, in file order.
pub fn build_things_from_config(config: &Config) -> Result<Vec<Thing>, ConfigError> {
    let things = config
        .objects
        .iter()
        .enumerate()
        .map(|(i, obj)| build_thing(i, obj))
        .collect::<Result<Vec<_>, _>>()?;
    info!(
        "Scene: {} objects, {} triangles, {} lights",
        things.len(),
        things.iter().map(|t| t.mesh.len()).sum::<usize>(),
        config.lights.len()
    );
    Ok(things)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::renderer::{RenderMode, Shading};
    use crate::pipeline::shading::ReflectionModel;
    use approx::assert_abs_diff_eq;

    #[test]
    fn default_config_builds_a_renderable_scene() {
        let config = Config::default();
        let camera = build_camera(&config).unwrap();
        assert_eq!((camera.width(), camera.height()), (640, 480));

        let lights = build_lights_from_config(&config).unwrap();
        assert_eq!(lights.len(), 1);
        assert!(matches!(lights[0], Light::Point { .. }));

        let things = build_things_from_config(&config).unwrap();
        assert_eq!(things.len(), 1);
        assert_eq!(things[0].name, "cube#0");
        assert_eq!(things[0].mesh.len(), 12);

        let settings = build_settings(&config).unwrap();
        assert_eq!(settings.mode, RenderMode::Shaded);
        assert_eq!(settings.shading, Shading::Flat);
        assert_eq!(settings.reflection, ReflectionModel::Phong);
    }

    #[test]
    fn objects_take_their_transform_and_material() {
        let config = Config::parse(
            r#"
            [[objects]]
            name = "ball"
            primitive = "sphere"
            partition = 6
            smooth = true
            location = [1.0, 2.0, 3.0]
            rotation = [0.0, 90.0, 0.0]

            [objects.material]
            color = [0.0, 1.0, 0.0]
            "#,
        )
        .unwrap();
        let things = build_things_from_config(&config).unwrap();
        let ball = &things[0];
        assert_eq!(ball.name, "ball");
        assert!(ball.mesh.has_vertex_normals());
        assert_abs_diff_eq!(
            ball.transformer.rotation().y,
            std::f64::consts::FRAC_PI_2,
            epsilon = 1e-12
        );
        assert_eq!(ball.transformer.location(), Vector::new(1.0, 2.0, 3.0));
        assert_eq!(ball.material.color, Vector::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn plane_faces_up() {
        let config = Config::parse("[[objects]]\nprimitive = \"plane\"\nsize = 4.0").unwrap();
        let things = build_things_from_config(&config).unwrap();
        for tri in &things[0].mesh {
            assert_eq!(tri.normal, Vector::y());
        }
    }

    #[test]
    fn unknown_names_are_invalid() {
        let bad_primitive = Config::parse("[[objects]]\nprimitive = \"teapot\"").unwrap();
        assert!(matches!(
            build_things_from_config(&bad_primitive),
            Err(ConfigError::Invalid(RenderError::UnsupportedConfiguration(_)))
        ));

        let bad_light = Config::parse("[[lights]]\ntype = \"spot\"").unwrap();
        assert!(build_lights_from_config(&bad_light).is_err());

        let no_position = Config::parse("[[lights]]\ntype = \"point\"").unwrap();
        assert!(build_lights_from_config(&no_position).is_err());

        let bad_mode = Config::parse("[render]\nmode = \"points\"").unwrap();
        assert!(matches!(
            build_settings(&bad_mode),
            Err(ConfigError::Invalid(RenderError::UnsupportedConfiguration(_)))
        ));
    }

    #[test]
    fn degenerate_camera_is_reported() {
        let config = Config::parse("[camera]\neye = [0.0, 5.0, 0.0]").unwrap();
        assert!(matches!(
            build_camera(&config),
            Err(ConfigError::Invalid(RenderError::DegenerateGeometry(_)))
        ));
    }
}
