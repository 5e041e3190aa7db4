use crate::core::math::Real;
use crate::core::math::transform::TransformFactory;
use crate::error::RenderError;
use crate::io::config::{Config, ConfigError};
use crate::io::image::save_framebuffer;
use crate::pipeline::renderer::{RenderStats, Renderer};
use crate::pipeline::shading::ReflectionModel;
use crate::scene::light::Light;
use crate::scene::loader::{
    build_camera, build_lights_from_config, build_settings, build_things_from_config,
};
use crate::scene::world::Scene;
use image::ImageError;
use log::{error, info, warn};
use nalgebra::Vector3;
use rayon::prelude::*;
use std::f64::consts::TAU;
use std::path::{Path, PathBuf};
use std::time::Instant;
use thiserror::Error;

/// Light set for one turntable frame: the first light is turned about the
/// world Y axis by `frame / frames` of a full circle, the others stay put.
pub fn orbit_lights(lights: &[Light], frame: usize, frames: usize) -> Vec<Light> {
    let angle = TAU * frame as Real / frames.max(1) as Real;
    let rotation = TransformFactory::rotation_y(angle);
    lights
        .iter()
        .enumerate()
        .map(|(i, light)| {
            if i == 0 {
                light.transformed(&rotation)
            } else {
                light.clone()
            }
        })
        .collect()
}

/// Output path of one frame. Single renders keep `output` as is; sequences
/// get a zero-padded frame index before the extension.
pub fn frame_path(output: &str, frame: usize, frames: usize) -> PathBuf {
    let path = Path::new(output);
    if frames <= 1 {
        return path.to_path_buf();
    }
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("frame");
    let name = match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{stem}_{frame:03}.{ext}"),
        None => format!("{stem}_{frame:03}"),
    };
    path.with_file_name(name)
}

/// Anything that stops a headless run.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("render failed: {0}")]
    Render(#[from] RenderError),

    #[error("failed to write image: {0}")]
    Image(#[from] ImageError),
}

/// Renders every frame of `config` in parallel and hands each finished
/// frame to `on_frame` together with its index.
///
/// Each frame owns its renderer, which is dropped as soon as `on_frame`
/// returns, so memory stays bounded by the number of worker threads rather
/// than the number of frames. Returns the stats of every frame, in order.
pub fn render_frames<F>(config: &Config, on_frame: F) -> Result<Vec<RenderStats>, AppError>
where
    F: Fn(usize, &Renderer) -> Result<(), AppError> + Sync,
{
    let camera = build_camera(config)?;
    let settings = build_settings(config)?;
    let lights = build_lights_from_config(config)?;
    let things = build_things_from_config(config)?;
    let background = Vector3::from(config.render.background);
    let (width, height) = (config.render.width, config.render.height);

    let frames = config.render.frames.max(1);
    let frame_lights: Vec<Vec<Light>> = (0..frames)
        .map(|frame| orbit_lights(&lights, frame, frames))
        .collect();

    frame_lights
        .par_iter()
        .enumerate()
        .map(|(frame, lights)| -> Result<RenderStats, AppError> {
            let mut scene = Scene::new(camera.clone());
            for thing in &things {
                scene.add_thing(thing.clone());
            }
            for light in lights {
                scene.add_light(light);
            }

            let mut renderer = Renderer::new(width, height, settings).with_background(background);
            let stats = renderer.render(&scene)?;
            on_frame(frame, &renderer)?;
            Ok(stats)
        })
        .collect()
}

/// Runs the headless render described by `config` and writes the images.
pub fn run_cli(config: &Config) -> Result<(), String> {
    info!("Starting CLI mode...");
    let settings = build_settings(config).map_err(|e| {
        error!("{e}");
        e.to_string()
    })?;
    let frames = config.render.frames.max(1);
    info!(
        "{}x{}, {} frame(s), {}",
        config.render.width, config.render.height, frames, settings
    );
    if config.render.frames == 0 {
        warn!("frames = 0 in config, rendering a single frame");
    }
    if config.lights.is_empty() && settings.reflection != ReflectionModel::Null {
        warn!("No lights configured, shaded objects will only get ambient light");
    }

    let start_time = Instant::now();
    let stats = render_frames(config, |frame, renderer| {
        let path = frame_path(&config.render.output, frame, frames);
        save_framebuffer(&renderer.framebuffer, &path)?;
        if frame == 0
            && let Some(depth_path) = &config.render.depth_output
        {
            info!("Saving depth visualisation to '{depth_path}'...");
            save_framebuffer(&renderer.zbuffer.export_to_image()?, depth_path)?;
        }
        Ok(())
    })
    .map_err(|e| {
        error!("{e}");
        e.to_string()
    })?;
    info!("Render completed in {:.2?}", start_time.elapsed());

    for (frame, stats) in stats.iter().enumerate() {
        info!(
            "Frame {frame}: {} triangles drawn, {} culled, {} degenerate, {} pixels -> '{}'",
            stats.triangles_drawn,
            stats.triangles_culled,
            stats.triangles_degenerate,
            stats.pixels_written,
            frame_path(&config.render.output, frame, frames).display()
        );
        if stats.triangles_drawn == 0 {
            warn!("Frame {frame} is empty; check the camera placement");
        }
    }

    info!("Done.");
    Ok(())
}
