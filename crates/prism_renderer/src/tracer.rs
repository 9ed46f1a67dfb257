//! The ray tracer facade: current scene, frame buffer and tracing entry points.

use std::path::Path;

use prism_core::{load_scene, Color, LoadResult, Scene};
use prism_math::Ray;

use crate::framebuffer::FrameBuffer;
use crate::renderer::{self, CancelToken, RenderConfig, RenderError, RenderResult, RenderStats};
use crate::world::World;

/// Initial frame buffer size before the first `trace_setup`.
const DEFAULT_BUFFER_SIZE: u32 = 256;

/// Owns the current scene and the frame buffer it is rendered into.
pub struct RayTracer {
    world: Option<World>,
    buffer: FrameBuffer,
}

impl Default for RayTracer {
    fn default() -> Self {
        Self::new()
    }
}

impl RayTracer {
    /// Tracer with no scene and a zeroed 256x256 buffer.
    pub fn new() -> Self {
        Self {
            world: None,
            buffer: FrameBuffer::new(DEFAULT_BUFFER_SIZE, DEFAULT_BUFFER_SIZE),
        }
    }

    /// Replace the current scene with an already built one.
    pub fn set_scene(&mut self, scene: Scene) {
        log::info!(
            "Scene '{}': {} objects ({} primitives), {} lights",
            scene.name,
            scene.object_count(),
            scene.primitive_count(),
            scene.light_count()
        );
        self.world = Some(World::new(scene));
    }

    /// Load a scene file, replacing the current scene.
    ///
    /// The previous scene is dropped before parsing, so a failed load leaves
    /// the tracer with no scene.
    pub fn load_scene(&mut self, path: impl AsRef<Path>) -> LoadResult<()> {
        let path = path.as_ref();
        self.world = None;

        match load_scene(path) {
            Ok(scene) => {
                self.set_scene(scene);
                Ok(())
            }
            Err(e) => {
                log::error!("Failed to load scene {}: {}", path.display(), e);
                Err(e)
            }
        }
    }

    pub fn scene_loaded(&self) -> bool {
        self.world.is_some()
    }

    pub fn world(&self) -> Option<&World> {
        self.world.as_ref()
    }

    pub fn scene(&self) -> Option<&Scene> {
        self.world.as_ref().map(World::scene)
    }

    /// Camera aspect ratio of the current scene, 1 without a scene.
    pub fn aspect_ratio(&self) -> f32 {
        self.world
            .as_ref()
            .map_or(1.0, |world| world.camera().aspect_ratio())
    }

    pub fn buffer(&self) -> &FrameBuffer {
        &self.buffer
    }

    /// Size and zero the frame buffer for a `width x height` frame.
    pub fn trace_setup(&mut self, width: u32, height: u32) {
        if self.buffer.setup(width, height) {
            log::debug!("Frame buffer resized to {}x{}", width, height);
        }
    }

    /// Clamped color at normalized window coordinates, black without a scene.
    ///
    /// Coordinates outside `[0, 1]` are clamped onto the window.
    pub fn trace(&self, x: f32, y: f32, config: &RenderConfig) -> Color {
        match &self.world {
            Some(world) => renderer::trace(world, x.clamp(0.0, 1.0), y.clamp(0.0, 1.0), config),
            None => Color::ZERO,
        }
    }

    /// Unclamped color along `ray` at recursion `depth`, black without a scene.
    pub fn trace_ray(&self, ray: &Ray, depth: u32, config: &RenderConfig) -> Color {
        match &self.world {
            Some(world) => renderer::trace_ray(world, ray, depth, config),
            None => Color::ZERO,
        }
    }

    /// Trace pixel `(i, j)` of the current buffer and store the result.
    ///
    /// Does nothing without a scene or for coordinates outside the buffer.
    pub fn trace_pixel(&mut self, i: u32, j: u32, config: &RenderConfig) {
        let Some(world) = &self.world else {
            return;
        };
        let (width, height) = (self.buffer.width(), self.buffer.height());
        if i >= width || j >= height {
            return;
        }

        let rgb = renderer::sample_pixel(world, i, j, width, height, config);
        self.buffer.set_pixel(i, j, rgb);
    }

    /// Set up a `width x height` buffer and trace every pixel in parallel.
    pub fn render(
        &mut self,
        width: u32,
        height: u32,
        config: &RenderConfig,
        cancel: &CancelToken,
    ) -> RenderResult<RenderStats> {
        self.trace_setup(width, height);
        let world = self.world.as_ref().ok_or(RenderError::NoScene)?;
        renderer::render(world, &mut self.buffer, config, cancel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prism_core::{Camera, Light, Material};
    use prism_math::Vec3;
    use std::sync::Arc;

    fn lit_scene() -> Scene {
        let mut scene = Scene::new("lit").with_camera(
            Camera::new()
                .with_position(Vec3::new(0.0, 0.0, 4.0), Vec3::ZERO, Vec3::Y)
                .with_fov(45.0),
        );
        scene.add_sphere(
            Vec3::ZERO,
            1.0,
            Arc::new(Material::new("white", Color::ONE)),
        );
        scene.add_light(Light::directional(Vec3::NEG_Z, Color::ONE));
        scene
    }

    #[test]
    fn test_new_tracer_has_no_scene() {
        let tracer = RayTracer::new();
        assert!(!tracer.scene_loaded());
        assert_eq!(tracer.buffer().width(), 256);
        assert_eq!(tracer.trace(0.5, 0.5, &RenderConfig::default()), Color::ZERO);
        assert!((tracer.aspect_ratio() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_render_without_scene_fails() {
        let mut tracer = RayTracer::new();
        let err = tracer
            .render(4, 4, &RenderConfig::default(), &CancelToken::new())
            .unwrap_err();
        assert!(matches!(err, RenderError::NoScene));
    }

    #[test]
    fn test_failed_load_clears_scene() {
        let mut tracer = RayTracer::new();
        tracer.set_scene(lit_scene());
        assert!(tracer.scene_loaded());

        assert!(tracer.load_scene("/nonexistent/scene.json").is_err());
        assert!(!tracer.scene_loaded());
    }

    #[test]
    fn test_trace_clamps_coordinates() {
        let mut tracer = RayTracer::new();
        tracer.set_scene(lit_scene());
        let config = RenderConfig::default();

        assert_eq!(tracer.trace(-3.0, 7.0, &config), tracer.trace(0.0, 1.0, &config));
    }

    #[test]
    fn test_trace_pixel_writes_buffer() {
        let mut tracer = RayTracer::new();
        tracer.set_scene(lit_scene());
        tracer.trace_setup(8, 8);

        tracer.trace_pixel(4, 4, &RenderConfig::default());
        let center = tracer.buffer().pixel(4, 4).unwrap();
        assert!(center[0] > 0);

        // Out of range is a no-op
        tracer.trace_pixel(8, 0, &RenderConfig::default());
    }
}
