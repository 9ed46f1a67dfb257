mod cli;
mod logger;

use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use prism_renderer::{CancelToken, RayTracer, RenderError};

use cli::Args;
use logger::init_logger;

fn main() -> Result<()> {
    let args = Args::parse();
    init_logger(args.log_level.into());

    log::info!("Starting Prism");

    let mut tracer = RayTracer::new();
    tracer
        .load_scene(&args.scene)
        .with_context(|| format!("Failed to load scene {}", args.scene.display()))?;

    let width = args.width;
    let height = args.image_height(tracer.aspect_ratio());
    let config = args.render_config();
    let cancel = CancelToken::new();

    if let Some(secs) = args.time_limit {
        let limit = Duration::try_from_secs_f64(secs.max(0.0)).unwrap_or(Duration::MAX);
        let watchdog = cancel.clone();
        // Detached: the process exits when the render returns.
        thread::spawn(move || {
            thread::sleep(limit);
            log::warn!("Time limit of {:.1}s reached, cancelling", limit.as_secs_f64());
            watchdog.cancel();
        });
    }

    match tracer.render(width, height, &config, &cancel) {
        Ok(stats) => {
            log::info!(
                "{} primary rays in {:.2}s",
                stats.primary_rays,
                stats.elapsed.as_secs_f64()
            );
        }
        Err(RenderError::Cancelled {
            rows_done,
            rows_total,
        }) => {
            log::warn!(
                "Saving partial image ({}/{} rows)",
                rows_done,
                rows_total
            );
        }
        Err(e) => return Err(e.into()),
    }

    tracer
        .buffer()
        .save(&args.output)
        .with_context(|| format!("Failed to save {}", args.output.display()))?;

    log::info!("Saved {}", args.output.display());
    Ok(())
}
