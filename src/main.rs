use clap::Parser;
use log::{error, info};
use softraster::app::run_cli;
use softraster::io::config::Config;

/// Headless software rasterizer driven by a TOML scene file.
#[derive(Parser, Debug)]
#[command(name = "softraster")]
#[command(about = "Render a TOML scene to PNG with a Z-buffer rasterizer")]
struct Cli {
    /// Scene file (TOML). Without it the built-in cube scene is rendered.
    #[arg(short, long, value_name = "FILE")]
    config: Option<String>,

    /// Overrides `render.output`.
    #[arg(short, long, value_name = "FILE")]
    output: Option<String>,

    /// Overrides `render.frames`; the first light orbits once over the sequence.
    #[arg(short, long, value_name = "N")]
    frames: Option<usize>,

    /// Overrides `render.depth_output`.
    #[arg(long, value_name = "FILE")]
    depth_output: Option<String>,
}

impl Cli {
    fn load_config(&self) -> Result<Config, String> {
        let mut config = match &self.config {
            Some(path) => {
                info!("Loading config: {path}");
                Config::load(path).map_err(|e| {
                    error!("Failed to load '{path}': {e}");
                    e.to_string()
                })?
            }
            None => {
                info!("No config given, using the default scene");
                Config::default()
            }
        };

        if let Some(output) = &self.output {
            config.render.output = output.clone();
        }
        if let Some(frames) = self.frames {
            config.render.frames = frames;
        }
        if let Some(depth) = &self.depth_output {
            config.render.depth_output = Some(depth.clone());
        }
        Ok(config)
    }
}

fn main() -> Result<(), String> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .format_timestamp(None)
        .format_level(true)
        .init();

    let cli = Cli::parse();
    let config = cli.load_config()?;
    run_cli(&config)
}
