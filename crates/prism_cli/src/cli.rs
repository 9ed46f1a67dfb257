use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::LevelFilter;
use prism_renderer::{RenderConfig, ShadowMode};

/// Log levels accepted on the command line
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Shadow handling during shading
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shadows {
    /// Lights are never blocked
    Off,
    /// Cast shadow rays toward each light
    On,
}

impl From<Shadows> for ShadowMode {
    fn from(shadows: Shadows) -> Self {
        match shadows {
            Shadows::Off => ShadowMode::Disabled,
            Shadows::On => ShadowMode::Occlusion,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "prism")]
#[command(version, about = "Recursive ray tracer for JSON scene files")]
pub struct Args {
    /// Scene file to render
    pub scene: PathBuf,

    /// Output image path; the format follows the extension
    #[arg(short, long, default_value = "render.png")]
    pub output: PathBuf,

    /// Image width in pixels
    #[arg(long, default_value_t = 512)]
    pub width: u32,

    /// Image height in pixels (defaults to width / camera aspect ratio)
    #[arg(long)]
    pub height: Option<u32>,

    /// Maximum reflection/refraction recursion depth
    #[arg(short, long, default_value_t = 3)]
    pub depth: u32,

    /// Supersampling rays per pixel axis (N x N rays per pixel)
    #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub rays: u32,

    /// Shadow mode
    #[arg(long, value_enum, default_value = "off")]
    pub shadows: Shadows,

    /// Worker threads (defaults to one per core)
    #[arg(short, long)]
    pub threads: Option<usize>,

    /// Cancel the render after this many seconds
    #[arg(long)]
    pub time_limit: Option<f64>,

    /// Set the logging level
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,
}

impl Args {
    pub fn render_config(&self) -> RenderConfig {
        let config = RenderConfig::default()
            .with_max_depth(self.depth)
            .with_rays(self.rays)
            .with_shadows(self.shadows.into());

        match self.threads {
            Some(threads) => config.with_threads(threads),
            None => config,
        }
    }

    /// Output height: explicit, or derived from the camera aspect ratio.
    pub fn image_height(&self, aspect: f32) -> u32 {
        self.height.unwrap_or_else(|| {
            if aspect > 0.0 {
                ((self.width as f32 / aspect).round() as u32).max(1)
            } else {
                self.width
            }
        })
    }
}
