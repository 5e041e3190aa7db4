use crate::core::color::{self, Color};
use crate::core::framebuffer::{FrameBuffer, PixelSink};
use crate::core::rasterizer::rasterize;
use crate::core::zbuffer::ZBuffer;
use crate::error::{RenderError, Result};
use crate::pipeline::passes::{self, ShadingContext};
use crate::pipeline::shading::ReflectionModel;
use crate::scene::world::Scene;
use log::{debug, trace};
use std::fmt;
use std::ops::AddAssign;
use std::str::FromStr;

/// What gets drawn for each triangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// Projected edges only.
    Wireframe,
    /// Edges plus face and vertex normal indicators.
    WireframeWithNormals,
    /// Filled, lit and depth-tested triangles.
    #[default]
    Shaded,
}

/// Granularity of reflection-model evaluation in `Shaded` mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Shading {
    /// Once per triangle.
    #[default]
    Flat,
    /// Once per vertex, colors interpolated.
    Gouraud,
    /// Once per pixel, position and normal interpolated.
    Phong,
}

fn normalized_name(s: &str) -> String {
    s.to_ascii_lowercase().replace(['-', '_', ' '], "")
}

impl FromStr for RenderMode {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self> {
        match normalized_name(s).as_str() {
            "wireframe" => Ok(Self::Wireframe),
            "wireframenormals" | "wireframewithnormals" => Ok(Self::WireframeWithNormals),
            "shaded" => Ok(Self::Shaded),
            _ => Err(RenderError::UnsupportedConfiguration(format!(
                "unknown render mode '{s}'"
            ))),
        }
    }
}

impl FromStr for Shading {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self> {
        match normalized_name(s).as_str() {
            "flat" => Ok(Self::Flat),
            "gouraud" => Ok(Self::Gouraud),
            "phong" => Ok(Self::Phong),
            _ => Err(RenderError::UnsupportedConfiguration(format!(
                "unknown shading '{s}'"
            ))),
        }
    }
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Wireframe => "wireframe",
            Self::WireframeWithNormals => "wireframe-normals",
            Self::Shaded => "shaded",
        })
    }
}

impl fmt::Display for Shading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Flat => "flat",
            Self::Gouraud => "gouraud",
            Self::Phong => "phong",
        })
    }
}

/// The three-axis render selection, fixed for a whole frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderSettings {
    pub mode: RenderMode,
    pub shading: Shading,
    pub reflection: ReflectionModel,
}

impl RenderSettings {
    pub fn new(mode: RenderMode, shading: Shading, reflection: ReflectionModel) -> Self {
        Self {
            mode,
            shading,
            reflection,
        }
    }

    /// Parses all three axes from their names.
    pub fn parse(mode: &str, shading: &str, reflection: &str) -> Result<Self> {
        Ok(Self::new(mode.parse()?, shading.parse()?, reflection.parse()?))
    }

    fn needs_vertex_normals(&self) -> bool {
        self.mode == RenderMode::Shaded && self.shading != Shading::Flat
    }
}

impl fmt::Display for RenderSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.mode, self.shading, self.reflection)
    }
}

/// Counters collected while rendering a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderStats {
    pub triangles_drawn: usize,
    /// Triangles dropped for crossing the near plane.
    pub triangles_culled: usize,
    /// Triangles with zero area in world space.
    pub triangles_degenerate: usize,
    pub pixels_written: usize,
}

impl AddAssign for RenderStats {
    fn add_assign(&mut self, other: Self) {
        self.triangles_drawn += other.triangles_drawn;
        self.triangles_culled += other.triangles_culled;
        self.triangles_degenerate += other.triangles_degenerate;
        self.pixels_written += other.pixels_written;
    }
}

/// Renders every thing of `scene` into `sink`.
///
/// Things and their triangles are processed in insertion order. Shaded
/// modes go through `zbuffer`; wireframe modes draw on top without depth.
/// Zero-area triangles are skipped and counted, never fatal.
/// The sink, the z-buffer and the camera must agree on image size.
pub fn render_frame<S: PixelSink + ?Sized>(
    scene: &Scene<'_>,
    sink: &mut S,
    zbuffer: &mut ZBuffer,
    settings: RenderSettings,
) -> Result<RenderStats> {
    let camera = scene.camera();
    let (width, height) = (sink.width(), sink.height());
    if (zbuffer.width, zbuffer.height) != (width, height)
        || (camera.width(), camera.height()) != (width, height)
    {
        return Err(RenderError::Dimension(format!(
            "sink {width}x{height}, z-buffer {}x{}, camera {}x{}",
            zbuffer.width,
            zbuffer.height,
            camera.width(),
            camera.height()
        )));
    }

    let mut stats = RenderStats::default();
    for thing in scene.things() {
        if settings.needs_vertex_normals()
            && !thing.mesh.is_empty()
            && !thing.mesh.has_vertex_normals()
        {
            return Err(RenderError::UnsupportedConfiguration(format!(
                "{} shading of '{}' needs vertex normals",
                settings.shading, thing.name
            )));
        }

        let ctx = ShadingContext {
            camera,
            lights: scene.lights(),
            material: &thing.material,
            reflection: settings.reflection,
        };

        let mut thing_stats = RenderStats::default();
        for world in thing.world_triangles() {
            let world = match world {
                Ok(world) => world,
                Err(RenderError::DegenerateGeometry(reason)) => {
                    trace!("'{}': skipping degenerate triangle ({reason})", thing.name);
                    thing_stats.triangles_degenerate += 1;
                    continue;
                }
                Err(e) => return Err(e),
            };
            let Some(image) = rasterize(camera, &world) else {
                thing_stats.triangles_culled += 1;
                continue;
            };

            thing_stats.pixels_written += match (settings.mode, settings.shading) {
                (RenderMode::Wireframe, _) => {
                    passes::wireframe_pass(sink, camera, &world, &image, false)?
                }
                (RenderMode::WireframeWithNormals, _) => {
                    passes::wireframe_pass(sink, camera, &world, &image, true)?
                }
                (RenderMode::Shaded, Shading::Flat) => {
                    passes::flat_pass(sink, zbuffer, &ctx, &world, &image)?
                }
                (RenderMode::Shaded, Shading::Gouraud) => {
                    passes::gouraud_pass(sink, zbuffer, &ctx, &world, &image)?
                }
                (RenderMode::Shaded, Shading::Phong) => {
                    passes::phong_pass(sink, zbuffer, &ctx, &world, &image)?
                }
            };
            thing_stats.triangles_drawn += 1;
        }

        debug!(
            "'{}': {} triangles drawn, {} culled, {} degenerate, {} pixels",
            thing.name,
            thing_stats.triangles_drawn,
            thing_stats.triangles_culled,
            thing_stats.triangles_degenerate,
            thing_stats.pixels_written
        );
        stats += thing_stats;
    }
    Ok(stats)
}

/// The high-level renderer: owns one frame's color and depth buffers.
pub struct Renderer {
    pub framebuffer: FrameBuffer,
    pub zbuffer: ZBuffer,
    pub settings: RenderSettings,
    pub background: Color,
}

impl Renderer {
    pub fn new(width: usize, height: usize, settings: RenderSettings) -> Self {
        Self {
            framebuffer: FrameBuffer::new(width, height),
            zbuffer: ZBuffer::new(width, height),
            settings,
            background: color::black(),
        }
    }

    pub fn with_background(mut self, background: Color) -> Self {
        self.background = background;
        self.framebuffer.clear(background);
        self
    }

    /// Resets color to the background and depth to untouched.
    pub fn clear(&mut self) {
        self.framebuffer.clear(self.background);
        self.zbuffer.reset();
    }

    /// Clears, then renders `scene` into the owned buffers.
    pub fn render(&mut self, scene: &Scene<'_>) -> Result<RenderStats> {
        self.clear();
        render_frame(scene, &mut self.framebuffer, &mut self.zbuffer, self.settings)
    }
}
