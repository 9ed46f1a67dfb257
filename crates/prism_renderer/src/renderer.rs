//! Recursive Whitted ray tracing.
//!
//! Implements:
//! - Local Phong shading at every hit
//! - Mirror reflection and Snell refraction up to a configurable depth
//! - Supersampling on a regular N x N grid per pixel
//! - Parallel frame rendering over image rows with cooperative cancellation

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use prism_core::Color;
use prism_math::{Ray, RayKind, Vec3};
use rayon::prelude::*;
use thiserror::Error;

use crate::framebuffer::FrameBuffer;
use crate::shading::{shade, ShadowMode};
use crate::world::World;

/// Render configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    /// Deepest recursion level that is still traced. Primary rays are depth 0.
    pub max_depth: u32,
    /// Samples per pixel axis; every pixel traces `rays * rays` rays.
    pub rays: u32,
    /// Light visibility mode for local shading
    pub shadows: ShadowMode,
    /// Worker threads for frame renders (`None` uses the global rayon pool)
    pub threads: Option<usize>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            max_depth: 3,
            rays: 1,
            shadows: ShadowMode::Disabled,
            threads: None,
        }
    }
}

impl RenderConfig {
    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Samples per pixel axis, clamped to at least 1.
    pub fn with_rays(mut self, rays: u32) -> Self {
        self.rays = rays.max(1);
        self
    }

    pub fn with_shadows(mut self, shadows: ShadowMode) -> Self {
        self.shadows = shadows;
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads.max(1));
        self
    }

    /// Samples per pixel axis, never below 1.
    pub fn rays_per_axis(&self) -> u32 {
        self.rays.max(1)
    }

    /// Samples per pixel (N x N), computed in floating point.
    pub fn samples_per_pixel(&self) -> f32 {
        let n = self.rays_per_axis() as f32;
        n * n
    }
}

/// Render errors.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("no scene loaded")]
    NoScene,

    #[error("render cancelled after {rows_done} of {rows_total} rows")]
    Cancelled { rows_done: usize, rows_total: usize },

    #[error("failed to build render thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

pub type RenderResult<T> = Result<T, RenderError>;

/// Shared flag for stopping a frame render from another thread.
///
/// Workers check it between pixels, so a cancelled render stops within one
/// pixel's worth of work per thread.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Summary of a finished frame.
#[derive(Debug, Clone, Copy)]
pub struct RenderStats {
    pub width: u32,
    pub height: u32,
    /// Primary rays traced (pixels times samples per pixel)
    pub primary_rays: u64,
    pub elapsed: Duration,
}

/// Color seen along `ray` at recursion `depth`.
///
/// Black past `max_depth` or on a miss. Otherwise the local Phong color plus
/// `kr` times the mirror reflection plus `kt` times the refracted ray. Total
/// internal reflection drops the refraction term. The result is not clamped.
pub fn trace_ray(world: &World, ray: &Ray, depth: u32, config: &RenderConfig) -> Color {
    if depth > config.max_depth {
        return Color::ZERO;
    }

    let Some(isect) = world.intersect(ray) else {
        return Color::ZERO;
    };

    let material = isect.material;
    let uv = isect.uv;
    let point = ray.at(isect.t);
    let view = -ray.direction();

    let mut color = shade(world, ray, &isect, config.shadows);

    let reflection = Ray::new(
        point,
        reflection_direction(view, isect.normal),
        RayKind::Reflection,
    );
    color += material.kr(uv) * trace_ray(world, &reflection, depth + 1, config);

    let kt = material.kt(uv);
    if kt.element_sum() > 0.0 {
        if let Some(dir) = refraction_direction(view, isect.normal, material.index(uv)) {
            let refraction = Ray::new(point, dir, RayKind::Refraction);
            color += kt * trace_ray(world, &refraction, depth + 1, config);
        }
    }

    color
}

/// Mirror of the incoming ray about `normal`. `view` points back toward the
/// ray origin.
pub fn reflection_direction(view: Vec3, normal: Vec3) -> Vec3 {
    (2.0 * normal.dot(view) * normal - view).normalize_or_zero()
}

/// Snell refraction for a surface of refractive `index` in air.
///
/// A positive `view . normal` means the ray enters the material, otherwise it
/// leaves it. Returns `None` on total internal reflection.
pub fn refraction_direction(view: Vec3, normal: Vec3, index: f32) -> Option<Vec3> {
    let cos_i = normal.dot(view);
    let entering = cos_i > 0.0;
    let ratio = if entering { 1.0 / index } else { index };

    let k = 1.0 - ratio * ratio * (1.0 - cos_i * cos_i);
    if k <= 0.0 {
        return None;
    }
    let cos_t = k.sqrt();

    let dir = if entering {
        normal * (ratio * cos_i - cos_t) - view * ratio
    } else {
        normal * (ratio * cos_i + cos_t) - view * ratio
    };
    Some(dir.normalize_or_zero())
}

/// Trace through normalized window coordinates and clamp to `[0, 1]`.
pub fn trace(world: &World, x: f32, y: f32, config: &RenderConfig) -> Color {
    let ray = world.camera().ray_through(x, y);
    trace_ray(world, &ray, 0, config).clamp(Color::ZERO, Color::ONE)
}

/// Average of the `N x N` sub-cell centers of pixel `(i, j)`, as 8-bit RGB.
///
/// `j` counts rows from the bottom of the image.
pub fn sample_pixel(
    world: &World,
    i: u32,
    j: u32,
    width: u32,
    height: u32,
    config: &RenderConfig,
) -> [u8; 3] {
    let n = config.rays_per_axis();
    let spacing = 1.0 / n as f32;

    let mut sum = Color::ZERO;
    for sx in 0..n {
        for sy in 0..n {
            let x = (i as f32 + spacing * (sx as f32 + 0.5)) / width as f32;
            let y = (j as f32 + spacing * (sy as f32 + 0.5)) / height as f32;
            sum += trace(world, x, y, config);
        }
    }

    color_to_rgb(sum / config.samples_per_pixel())
}

/// Convert a color to 8-bit RGB, truncating and clamping each channel.
pub fn color_to_rgb(color: Color) -> [u8; 3] {
    let c = (color * 255.0).clamp(Vec3::ZERO, Vec3::splat(255.0));
    [c.x as u8, c.y as u8, c.z as u8]
}

/// Render every pixel of `buffer` in parallel.
///
/// Rows are distributed over rayon workers. When `cancel` fires, workers stop
/// at the next pixel and the function returns `RenderError::Cancelled`; the
/// rows finished so far stay in the buffer.
pub fn render(
    world: &World,
    buffer: &mut FrameBuffer,
    config: &RenderConfig,
    cancel: &CancelToken,
) -> RenderResult<RenderStats> {
    match config.threads {
        Some(threads) => {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()?;
            pool.install(|| render_rows(world, buffer, config, cancel))
        }
        None => render_rows(world, buffer, config, cancel),
    }
}

fn render_rows(
    world: &World,
    buffer: &mut FrameBuffer,
    config: &RenderConfig,
    cancel: &CancelToken,
) -> RenderResult<RenderStats> {
    let start = Instant::now();
    let (width, height) = (buffer.width(), buffer.height());
    let n = config.rays_per_axis() as u64;

    log::info!(
        "Rendering '{}' at {}x{}, {}x{} rays per pixel, max depth {}",
        world.scene().name,
        width,
        height,
        n,
        n,
        config.max_depth
    );

    if width == 0 || height == 0 {
        return Ok(RenderStats {
            width,
            height,
            primary_rays: 0,
            elapsed: start.elapsed(),
        });
    }

    let rows_total = height as usize;
    let rows_done = AtomicUsize::new(0);
    let progress_step = (rows_total / 10).max(1);

    buffer
        .rows_mut()
        .enumerate()
        .for_each(|(j, row)| {
            for (i, pixel) in row.chunks_exact_mut(3).enumerate() {
                if cancel.is_cancelled() {
                    return;
                }
                pixel.copy_from_slice(&sample_pixel(
                    world, i as u32, j as u32, width, height, config,
                ));
            }

            let done = rows_done.fetch_add(1, Ordering::Relaxed) + 1;
            if done % progress_step == 0 {
                log::debug!(
                    "Progress: {}/{} rows ({:.0}%)",
                    done,
                    rows_total,
                    100.0 * done as f32 / rows_total as f32
                );
            }
        });

    let rows_done = rows_done.into_inner();
    if rows_done < rows_total {
        log::warn!("Render cancelled after {}/{} rows", rows_done, rows_total);
        return Err(RenderError::Cancelled {
            rows_done,
            rows_total,
        });
    }

    let elapsed = start.elapsed();
    log::info!("Render complete in {:.2}s", elapsed.as_secs_f32());

    Ok(RenderStats {
        width,
        height,
        primary_rays: width as u64 * height as u64 * n * n,
        elapsed,
    })
}
