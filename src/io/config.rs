use crate::core::math::Real;
use crate::error::RenderError;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Failure to turn a scene file into a renderable scene.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid scene: {0}")]
    Invalid(#[from] RenderError),
}

/// A TOML scene description. Every section is optional; an empty file
/// describes a lit gray cube seen from above and to the side.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub render: RenderConfig,
    pub camera: CameraConfig,
    pub lights: Vec<LightConfig>,
    pub objects: Vec<ObjectConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            render: RenderConfig::default(),
            camera: CameraConfig::default(),
            lights: vec![LightConfig {
                r#type: "point".to_string(),
                position: Some([2.0, 4.0, 3.0]),
                direction: None,
                diffuse: default_light_color(),
                specular: default_light_color(),
            }],
            objects: vec![ObjectConfig::default()],
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RenderConfig {
    // --- Output ---
    #[serde(default = "default_width")]
    pub width: usize,
    #[serde(default = "default_height")]
    pub height: usize,
    #[serde(default = "default_output")]
    pub output: String,
    /// Z-buffer visualisation of the first frame.
    #[serde(default)]
    pub depth_output: Option<String>,
    #[serde(default = "default_frames")]
    pub frames: usize,

    // --- Pipeline ---
    #[serde(default = "default_mode")]
    pub mode: String, // "wireframe", "wireframe-normals", "shaded"
    #[serde(default = "default_shading")]
    pub shading: String, // "flat", "gouraud", "phong"
    #[serde(default = "default_reflection")]
    pub reflection: String, // "null", "phong", "blinn-phong"
    #[serde(default)]
    pub background: [Real; 3],
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            output: default_output(),
            depth_output: None,
            frames: default_frames(),
            mode: default_mode(),
            shading: default_shading(),
            reflection: default_reflection(),
            background: [0.0; 3],
        }
    }
}

fn default_width() -> usize {
    640
}
fn default_height() -> usize {
    480
}
fn default_output() -> String {
    "output.png".to_string()
}
fn default_frames() -> usize {
    1
}
fn default_mode() -> String {
    "shaded".to_string()
}
fn default_shading() -> String {
    "flat".to_string()
}
fn default_reflection() -> String {
    "phong".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct CameraConfig {
    #[serde(default = "default_eye")]
    pub eye: [Real; 3],
    #[serde(default)]
    pub at: [Real; 3],
    #[serde(default = "default_up")]
    pub up: [Real; 3],
    /// Vertical field of view in degrees.
    #[serde(default = "default_fov")]
    pub fov: Real,
    #[serde(default = "default_near")]
    pub near: Real,
    #[serde(default = "default_far")]
    pub far: Real,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            eye: default_eye(),
            at: [0.0; 3],
            up: default_up(),
            fov: default_fov(),
            near: default_near(),
            far: default_far(),
        }
    }
}

fn default_eye() -> [Real; 3] {
    [2.0, 1.5, 3.0]
}
fn default_up() -> [Real; 3] {
    [0.0, 1.0, 0.0]
}
fn default_fov() -> Real {
    60.0
}
fn default_near() -> Real {
    0.1
}
fn default_far() -> Real {
    100.0
}

#[derive(Debug, Clone, Deserialize)]
pub struct LightConfig {
    #[serde(default = "default_light_type")]
    pub r#type: String, // "point" or "directional"
    pub position: Option<[Real; 3]>,
    /// Points from the scene toward the light.
    pub direction: Option<[Real; 3]>,
    #[serde(default = "default_light_color")]
    pub diffuse: [Real; 3],
    #[serde(default = "default_light_color")]
    pub specular: [Real; 3],
}

fn default_light_type() -> String {
    "point".to_string()
}
fn default_light_color() -> [Real; 3] {
    [1.0, 1.0, 1.0]
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObjectConfig {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default = "default_primitive")]
    pub primitive: String, // "cube", "sphere", "plane", "triangle"

    // --- Shape ---
    /// Edge length of cubes and planes.
    #[serde(default = "default_one")]
    pub size: Real,
    #[serde(default = "default_one")]
    pub radius: Real,
    #[serde(default = "default_partition")]
    pub partition: usize,
    /// Average face normals into vertex normals (needed by Gouraud and Phong).
    #[serde(default)]
    pub smooth: bool,

    // --- Transform ---
    #[serde(default)]
    pub location: [Real; 3],
    /// Degrees about X, then Y, then Z.
    #[serde(default)]
    pub rotation: [Real; 3],
    #[serde(default = "default_scale")]
    pub scale: [Real; 3],

    #[serde(default)]
    pub material: MaterialConfig,
}

impl Default for ObjectConfig {
    fn default() -> Self {
        Self {
            name: None,
            primitive: default_primitive(),
            size: default_one(),
            radius: default_one(),
            partition: default_partition(),
            smooth: false,
            location: [0.0; 3],
            rotation: [0.0; 3],
            scale: default_scale(),
            material: MaterialConfig::default(),
        }
    }
}

fn default_primitive() -> String {
    "cube".to_string()
}
fn default_one() -> Real {
    1.0
}
fn default_partition() -> usize {
    16
}
fn default_scale() -> [Real; 3] {
    [1.0, 1.0, 1.0]
}

#[derive(Debug, Clone, Deserialize)]
pub struct MaterialConfig {
    #[serde(default = "default_material_color")]
    pub color: [Real; 3],
    #[serde(default = "default_one")]
    pub ambient: Real,
    #[serde(default = "default_diffuse")]
    pub diffuse: Real,
    #[serde(default = "default_specular")]
    pub specular: Real,
    #[serde(default = "default_shininess")]
    pub shininess: Real,
}

impl Default for MaterialConfig {
    fn default() -> Self {
        Self {
            color: default_material_color(),
            ambient: default_one(),
            diffuse: default_diffuse(),
            specular: default_specular(),
            shininess: default_shininess(),
        }
    }
}

fn default_material_color() -> [Real; 3] {
    [0.8, 0.8, 0.8]
}
fn default_diffuse() -> Real {
    0.8
}
fn default_specular() -> Real {
    0.5
}
fn default_shininess() -> Real {
    32.0
}
