use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use pixless::{config::Config, pixelate_image, PixelateParams, VideoPixelator};

#[derive(Parser)]
#[command(
    name = "pixless",
    version,
    about = "Turn photos and videos into pixel art",
    long_about = "Pixless shrinks an image, reduces it to a small palette and blows it back up into crisp blocks, giving photos and videos a retro low-resolution camera look."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Configuration file (optional)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Pixelate a still image into a PNG
    Image {
        /// Input image path
        #[arg(short, long)]
        input: PathBuf,

        /// Output PNG path (defaults to <input>_pixelated.png)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        pipeline: PipelineArgs,
    },

    /// Pixelate every frame of a video
    Video {
        /// Input video path
        #[arg(short, long)]
        input: PathBuf,

        /// Output video path (defaults to <input>_pixelated.mp4)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output frame rate, capped at the input's frame rate
        #[arg(long)]
        fps: Option<f64>,

        #[command(flatten)]
        pipeline: PipelineArgs,
    },

    /// Write the default configuration to a TOML file
    InitConfig {
        /// Where to write the configuration
        path: PathBuf,
    },
}

/// Pipeline options; each one overrides the configuration file
#[derive(Args)]
struct PipelineArgs {
    /// Width of the low-resolution image
    #[arg(short = 'w', long)]
    width: Option<u32>,

    /// Number of colors when no palette file is used
    #[arg(long)]
    colors: Option<u32>,

    /// Size of each enlarged pixel block
    #[arg(short, long)]
    scale: Option<u32>,

    /// Brightness factor (1.0 = unchanged)
    #[arg(long)]
    brightness: Option<f32>,

    /// Contrast factor (1.0 = unchanged)
    #[arg(long)]
    contrast: Option<f32>,

    /// Palette file with one hex color per line
    #[arg(short, long)]
    palette: Option<PathBuf>,
}

impl PipelineArgs {
    fn apply(self, mut params: PixelateParams) -> PixelateParams {
        if let Some(width) = self.width {
            params.target_width = width;
        }
        if let Some(colors) = self.colors {
            params.palette_size = colors;
        }
        if let Some(scale) = self.scale {
            params.pixel_scale = scale;
        }
        if let Some(brightness) = self.brightness {
            params.brightness = brightness;
        }
        if let Some(contrast) = self.contrast {
            params.contrast = contrast;
        }
        if let Some(palette) = self.palette {
            params.palette_file = Some(palette);
        }
        params
    }
}

/// `samples/brabham.jpg` -> `samples/brabham_pixelated.<extension>`
fn default_output(input: &Path, extension: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    input.with_file_name(format!("{}_pixelated.{}", stem, extension))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging; RUST_LOG takes precedence over --verbose
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    info!("Starting Pixless v{}", env!("CARGO_PKG_VERSION"));

    run(cli).map_err(cli_error)
}

/// The single message printed for a failed run
fn cli_error(error: pixless::PixlessError) -> anyhow::Error {
    anyhow!(error.user_message())
}

fn run(cli: Cli) -> pixless::Result<()> {
    // Load configuration
    let config = match &cli.config {
        Some(config_path) => {
            info!("Loading configuration from {:?}", config_path);
            Config::load(config_path)?
        }
        None => Config::default(),
    };

    match cli.command {
        Command::Image { input, output, pipeline } => {
            let output = output.unwrap_or_else(|| default_output(&input, "png"));
            let params = pipeline.apply(config.pixelate);

            info!("Input: {:?}", input);
            info!("Output: {:?}", output);
            pixelate_image(&input, &output, &params)?;
        }
        Command::Video { input, output, fps, pipeline } => {
            let output = output.unwrap_or_else(|| default_output(&input, "mp4"));
            let params = pipeline.apply(config.pixelate);
            let fps = fps.unwrap_or(config.video.fps);

            info!("Input: {:?}", input);
            info!("Output: {:?}", output);
            let video = VideoPixelator::new(config.video).pixelate(&input, &output, &params, fps)?;
            info!("Done! {} frames at {} fps", video.frame_count, video.fps);
        }
        Command::InitConfig { path } => {
            Config::default().save_to_file(&path)?;
            info!("Default configuration written to {:?}", path);
        }
    }
    Ok(())
}
