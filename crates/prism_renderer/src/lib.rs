//! Prism Renderer - recursive Whitted ray tracing on the CPU
//!
//! Traces primary rays through a pinhole camera, shades hits with the Phong
//! model and recurses on mirror reflection and refraction. Frames are
//! supersampled on a regular grid and rendered in parallel over rows.

mod bvh;
mod framebuffer;
mod hittable;
mod renderer;
mod shading;
mod sphere;
mod tracer;
mod triangle;
mod world;

pub use bvh::BvhNode;
pub use framebuffer::FrameBuffer;
pub use hittable::{Hittable, Intersection};
pub use renderer::{
    color_to_rgb, reflection_direction, refraction_direction, render, sample_pixel, trace,
    trace_ray, CancelToken, RenderConfig, RenderError, RenderResult, RenderStats,
};
pub use shading::{shade, shadow_attenuation, ShadowMode};
pub use sphere::Sphere;
pub use tracer::RayTracer;
pub use triangle::Triangle;
pub use world::World;

/// Re-export common math types from prism_math
pub use prism_math::{Aabb, Interval, Ray, RayKind, Vec3};
